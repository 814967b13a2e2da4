use crate::prelude::*;
use rand::{
    distributions::{Distribution, Uniform},
    Rng,
};
use std::ops::{Index, IndexMut};

pub mod ops;

/// Dense row-major matrix with a fixed, non-zero shape.
///
/// Operations come in two flavours. Value operations (`map`, `transpose`,
/// `dot`, `+`, `-`, `hadamard`, `scale`, `convolve`) borrow their operands and
/// return a newly owned matrix. Builder operations (`fill`, `apply`,
/// `randomize`, `xavier_init`) modify the receiver and hand it back only so
/// calls can be chained.
#[derive(Debug, PartialEq, Clone)]
pub struct Matrix<T> {
    data: Vec<T>,
    dim: (usize, usize),
}

impl<T: Default + Clone> Matrix<T> {
    /// Zero-filled matrix. Both dimensions must be at least one.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidShape);
        }

        Ok(Self {
            data: vec![T::default(); rows * cols],
            dim: (rows, cols),
        })
    }
}

impl<T> Matrix<T> {
    pub fn from_array<const R: usize, const C: usize>(arr: [[T; C]; R]) -> Self {
        assert!(R > 0 && C > 0, "matrix must have at least one row and one column");
        let mut data = Vec::with_capacity(R * C);

        for row in arr {
            for x in row {
                data.push(x);
            }
        }

        Self { data, dim: (R, C) }
    }

    /// Builds a matrix from a table of rows. Every row must have the same,
    /// non-zero length.
    pub fn from_vec(vec: Vec<Vec<T>>) -> Result<Self> {
        let rows = vec.len();
        let cols = vec.first().map(|row| row.len()).unwrap_or(0);
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidShape);
        }

        let mut data = Vec::with_capacity(rows * cols);
        for row in vec {
            if cols != row.len() {
                return Err(Error::InvalidShape);
            }

            data.extend(row);
        }

        Ok(Self {
            data,
            dim: (rows, cols),
        })
    }

    /// Reinterprets a vector as a (len, 1) column matrix without copying it.
    pub fn column(vec: Vec<T>) -> Result<Self> {
        if vec.is_empty() {
            return Err(Error::InvalidShape);
        }

        Ok(Self {
            dim: (vec.len(), 1),
            data: vec,
        })
    }

    pub fn dim(&self) -> (usize, usize) {
        self.dim
    }

    pub fn rows(&self) -> usize {
        self.dim.0
    }

    pub fn cols(&self) -> usize {
        self.dim.1
    }

    /// Flat row-major contents. The caller is expected to know the shape.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn to_vec(self) -> Vec<Vec<T>> {
        let (rows, cols) = self.dim;
        let mut res = Vec::with_capacity(rows);
        let mut elements = self.data.into_iter();
        for _ in 0..rows {
            res.push(elements.by_ref().take(cols).collect());
        }
        res
    }

    fn offset(&self, i: usize, j: usize) -> Result<usize> {
        if i >= self.rows() || j >= self.cols() {
            return Err(Error::IndexOutOfRange);
        }
        Ok(i * self.cols() + j)
    }

    pub fn get(&self, i: usize, j: usize) -> Result<&T> {
        let idx = self.offset(i, j)?;
        Ok(&self.data[idx])
    }

    pub fn set(&mut self, i: usize, j: usize, value: T) -> Result<()> {
        let idx = self.offset(i, j)?;
        self.data[idx] = value;
        Ok(())
    }
}

impl<T: Copy> Matrix<T> {
    /// Sets every element to `value`. Mutates the receiver.
    pub fn fill(&mut self, value: T) -> &mut Self {
        for x in &mut self.data {
            *x = value;
        }
        self
    }

    /// Applies a function to every element of the matrix in place.
    /// The function receives the element together with its row and column.
    pub fn apply<F: FnMut(T, usize, usize) -> T>(&mut self, mut f: F) -> &mut Self {
        let cols = self.cols();
        for (idx, x) in self.data.iter_mut().enumerate() {
            *x = f(*x, idx / cols, idx % cols);
        }
        self
    }

    /// Pure counterpart of [`Matrix::apply`]: leaves `self` untouched and
    /// returns the mapped matrix.
    pub fn map<U, F: FnMut(T, usize, usize) -> U>(&self, mut f: F) -> Matrix<U> {
        let cols = self.cols();
        let data = self
            .data
            .iter()
            .enumerate()
            .map(|(idx, &x)| f(x, idx / cols, idx % cols))
            .collect();

        Matrix {
            data,
            dim: self.dim,
        }
    }
}

impl Matrix<f64> {
    /// Fills the matrix with independent uniform samples in `[min, max)`.
    /// An empty range (`min >= max`) fills every element with `min`.
    /// Both bounds must be finite.
    pub fn randomize<R: Rng>(&mut self, min: f64, max: f64, rng: &mut R) -> &mut Self {
        if min >= max {
            return self.fill(min);
        }

        let die = Uniform::new(min, max);
        for x in &mut self.data {
            *x = die.sample(rng);
        }
        self
    }

    /// Glorot/Xavier uniform initialization. Replaces the contents with samples
    /// in `[-s, s)`, `s = sqrt(2 / (fan_in + fan_out))`, and reshapes the matrix
    /// to `(fan_out, fan_in)`.
    pub fn xavier_init<R: Rng>(
        &mut self,
        fan_out: usize,
        fan_in: usize,
        rng: &mut R,
    ) -> Result<&mut Self> {
        if fan_out == 0 || fan_in == 0 {
            return Err(Error::InvalidShape);
        }

        let limit = (2.0 / (fan_in + fan_out) as f64).sqrt();
        self.data.resize(fan_out * fan_in, 0.0);
        self.dim = (fan_out, fan_in);
        Ok(self.randomize(-limit, limit, rng))
    }

    /// New `(fan_out, fan_in)` matrix with Xavier initialized contents.
    pub fn xavier<R: Rng>(fan_out: usize, fan_in: usize, rng: &mut R) -> Result<Self> {
        let mut weights = Self::new(fan_out, fan_in)?;
        weights.xavier_init(fan_out, fan_in, rng)?;
        Ok(weights)
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;
    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        assert!(j < self.cols(), "column {j} out of range for {:?} matrix", self.dim);
        &self.data[i * self.cols() + j]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Self::Output {
        assert!(j < self.cols(), "column {j} out of range for {:?} matrix", self.dim);
        let idx = i * self.cols() + j;
        &mut self.data[idx]
    }
}

impl From<Matrix<i32>> for Matrix<f64> {
    fn from(value: Matrix<i32>) -> Self {
        Self {
            dim: value.dim(),
            data: value.data.into_iter().map(f64::from).collect(),
        }
    }
}
