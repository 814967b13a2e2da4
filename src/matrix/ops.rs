use super::Matrix;
use crate::prelude::*;
use std::ops::{Add, AddAssign, Mul, Sub};

pub trait Dot<I> {
    type Output;
    fn dot(self, rhs: I) -> Result<Self::Output>;
}

pub trait Transpose {
    fn transpose(&self) -> Self;
}

/// Element-wise product of two equally shaped matrices.
pub trait Hadamard<I> {
    type Output;
    fn hadamard(&self, rhs: I) -> Result<Self::Output>;
}

impl<T: Copy> Transpose for Matrix<T> {
    fn transpose(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());

        for col in 0..self.cols() {
            for row in 0..self.rows() {
                data.push(self[(row, col)]);
            }
        }

        Matrix {
            data,
            dim: (self.cols(), self.rows()),
        }
    }
}

impl<'a, T> Dot<&Matrix<T>> for &'a Matrix<T>
where
    T: Mul<Output = T> + Default + AddAssign + Copy,
{
    type Output = Matrix<T>;
    fn dot(self, rhs: &Matrix<T>) -> Result<Self::Output> {
        if self.cols() != rhs.rows() {
            return Err(Error::DimensionMismatch);
        }

        let mut data = Vec::with_capacity(self.rows() * rhs.cols());

        for lhs_row in 0..self.rows() {
            for rhs_col in 0..rhs.cols() {
                let mut sum = T::default();
                for n in 0..self.cols() {
                    sum += self[(lhs_row, n)] * rhs[(n, rhs_col)]
                }
                data.push(sum);
            }
        }

        Ok(Matrix {
            data,
            dim: (self.rows(), rhs.cols()),
        })
    }
}

impl<T> Matrix<T> {
    /// Combines two equally shaped matrices element by element.
    fn zip_with<'a, F>(&'a self, rhs: &'a Matrix<T>, f: F) -> Result<Matrix<T>>
    where
        F: Fn(&'a T, &'a T) -> T,
    {
        if self.dim != rhs.dim {
            return Err(Error::DimensionMismatch);
        }

        Ok(Matrix {
            data: self.data.iter().zip(&rhs.data).map(|(a, b)| f(a, b)).collect(),
            dim: self.dim,
        })
    }
}

/// Adds two matrices element-wise.
impl<'a, T> Add for &'a Matrix<T>
where
    &'a T: Add<Output = T>,
{
    type Output = Result<Matrix<T>>;
    fn add(self, rhs: Self) -> Self::Output {
        self.zip_with(rhs, |a, b| a + b)
    }
}

/// Subtracts two matrices element-wise.
impl<'a, T> Sub for &'a Matrix<T>
where
    &'a T: Sub<Output = T>,
{
    type Output = Result<Matrix<T>>;
    fn sub(self, rhs: Self) -> Self::Output {
        self.zip_with(rhs, |a, b| a - b)
    }
}

impl<T> Hadamard<&Matrix<T>> for Matrix<T>
where
    T: Mul<Output = T> + Copy,
{
    type Output = Matrix<T>;
    fn hadamard(&self, rhs: &Matrix<T>) -> Result<Self::Output> {
        self.zip_with(rhs, |&a, &b| a * b)
    }
}

impl<T> Matrix<T>
where
    T: Mul<Output = T> + Copy,
{
    /// Every element multiplied by `k`.
    pub fn scale(&self, k: T) -> Matrix<T> {
        self.map(|x, _, _| x * k)
    }
}

impl<T> Matrix<T>
where
    T: Mul<Output = T> + AddAssign + Default + Copy,
{
    /// Valid 2D convolution (stride 1, no padding). Each output cell is the sum
    /// of the kernel multiplied element-wise with the input window under it.
    pub fn convolve(&self, kernel: &Matrix<T>) -> Result<Matrix<T>> {
        if self.rows() < kernel.rows() || self.cols() < kernel.cols() {
            return Err(Error::InvalidShape);
        }

        let out_rows = self.rows() - kernel.rows() + 1;
        let out_cols = self.cols() - kernel.cols() + 1;
        let mut data = Vec::with_capacity(out_rows * out_cols);

        for i in 0..out_rows {
            for j in 0..out_cols {
                let mut sum = T::default();
                for k in 0..kernel.rows() {
                    for l in 0..kernel.cols() {
                        sum += self[(i + k, j + l)] * kernel[(k, l)];
                    }
                }
                data.push(sum);
            }
        }

        Ok(Matrix {
            data,
            dim: (out_rows, out_cols),
        })
    }
}
