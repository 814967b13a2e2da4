use crate::prelude::*;

/// Paired input and output vectors, matched by index.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    inputs: Vec<Vec<f64>>,
    outputs: Vec<Vec<f64>>,
}

impl Dataset {
    /// Both tables must be non-empty and of equal length, and every vector in
    /// a table must share the same non-zero width.
    pub fn new(inputs: Vec<Vec<f64>>, outputs: Vec<Vec<f64>>) -> Result<Self> {
        if inputs.is_empty() || inputs.len() != outputs.len() {
            return Err(Error::InvalidShape);
        }

        for table in [&inputs, &outputs] {
            let width = table[0].len();
            if width == 0 || table.iter().any(|row| row.len() != width) {
                return Err(Error::InvalidShape);
            }
        }

        Ok(Self { inputs, outputs })
    }

    /// The four truth-table rows of logical XOR.
    pub fn xor() -> Self {
        Self {
            inputs: vec![
                vec![1.0, 1.0],
                vec![1.0, 0.0],
                vec![0.0, 1.0],
                vec![0.0, 0.0],
            ],
            outputs: vec![vec![0.0], vec![1.0], vec![1.0], vec![0.0]],
        }
    }

    pub fn inputs(&self) -> &[Vec<f64>] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[Vec<f64>] {
        &self.outputs
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn input_width(&self) -> usize {
        self.inputs[0].len()
    }

    pub fn output_width(&self) -> usize {
        self.outputs[0].len()
    }

    /// Returns the `index`-th (input, output) pair.
    pub fn sample(&self, index: usize) -> Option<(&[f64], &[f64])> {
        let input = self.inputs.get(index)?;
        let output = self.outputs.get(index)?;
        Some((input.as_slice(), output.as_slice()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[f64], &[f64])> {
        self.inputs
            .iter()
            .zip(&self.outputs)
            .map(|(input, output)| (input.as_slice(), output.as_slice()))
    }
}
