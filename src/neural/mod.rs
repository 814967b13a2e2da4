pub mod activations;
pub mod classifier;
pub mod dataset;

use crate::prelude::*;
use rand::Rng;

use crate::matrix::{
    ops::{Dot, Hadamard, Transpose},
    Matrix,
};

use self::{
    activations::{Activation, Sigmoid},
    dataset::Dataset,
};

pub const DEFAULT_LEARNING_RATE: f64 = 0.1;

/// Biases start as uniform noise in this range.
const BIAS_INIT_RANGE: (f64, f64) = (-0.01, 0.01);

/// A perceptron with one sigmoid hidden layer and a sigmoid output layer.
///
/// The four parameter matrices are the whole learned state:
/// `weights_ih` is (hidden, inputs), `weights_ho` is (outputs, hidden),
/// `bias_h` is (hidden, 1) and `bias_o` is (outputs, 1).
#[derive(Debug, Clone, PartialEq)]
pub struct NeuralNet {
    weights_ih: Matrix<f64>,
    weights_ho: Matrix<f64>,
    bias_h: Matrix<f64>,
    bias_o: Matrix<f64>,
    learning_rate: f64,
}

impl NeuralNet {
    /// Creates a network with Xavier initialized weights and near zero biases,
    /// drawing every random number from `rng`.
    pub fn new<R: Rng>(
        n_inputs: usize,
        n_hidden: usize,
        n_outputs: usize,
        rng: &mut R,
    ) -> Result<Self> {
        let weights_ih = Matrix::<f64>::xavier(n_hidden, n_inputs, rng)?;
        let weights_ho = Matrix::<f64>::xavier(n_outputs, n_hidden, rng)?;

        let (min, max) = BIAS_INIT_RANGE;
        let mut bias_h = Matrix::<f64>::new(n_hidden, 1)?;
        bias_h.randomize(min, max, rng);
        let mut bias_o = Matrix::<f64>::new(n_outputs, 1)?;
        bias_o.randomize(min, max, rng);

        Ok(Self {
            weights_ih,
            weights_ho,
            bias_h,
            bias_o,
            learning_rate: DEFAULT_LEARNING_RATE,
        })
    }

    /// Builds a network from existing parameters. The shapes must line up as
    /// (hidden, inputs), (outputs, hidden), (hidden, 1) and (outputs, 1).
    pub fn from_parameters(
        weights_ih: Matrix<f64>,
        weights_ho: Matrix<f64>,
        bias_h: Matrix<f64>,
        bias_o: Matrix<f64>,
    ) -> Result<Self> {
        let n_hidden = weights_ih.rows();
        let n_outputs = weights_ho.rows();
        if weights_ho.cols() != n_hidden
            || bias_h.dim() != (n_hidden, 1)
            || bias_o.dim() != (n_outputs, 1)
        {
            return Err(Error::DimensionMismatch);
        }

        Ok(Self {
            weights_ih,
            weights_ho,
            bias_h,
            bias_o,
            learning_rate: DEFAULT_LEARNING_RATE,
        })
    }

    /// Sets the rate applied to the bias updates.
    pub fn with_learning_rate(mut self, rate: f64) -> Self {
        self.learning_rate = rate;
        self
    }

    /// Runs `input` through both layers and returns the output vector.
    pub fn forward(&self, input: &[f64]) -> Result<Vec<f64>> {
        let input = self.input_column(input)?;
        let (_, output) = self.forward_layers(&input)?;
        Ok(output.into_vec())
    }

    /// One step of online gradient descent on a single (input, target) pair.
    ///
    /// All four parameter matrices are computed from the current ones before
    /// any of them is replaced, so a failed step leaves the network untouched.
    /// Only the bias updates are scaled by the learning rate.
    pub fn train_step(&mut self, input: &[f64], target: &[f64]) -> Result<()> {
        if target.len() != self.output_amount() {
            return Err(Error::DimensionMismatch);
        }
        let input = self.input_column(input)?;
        let target = Matrix::column(target.to_vec())?;

        let (hidden, output) = self.forward_layers(&input)?;

        let output_error = (&target - &output)?;
        let output_gradient = output_error.hadamard(&Self::slope(&output))?;

        let bias_o = (&self.bias_o + &output_gradient.scale(self.learning_rate))?;
        let weights_ho = (&self.weights_ho + &output_gradient.dot(&hidden.transpose())?)?;

        // the error is propagated through the weights as they were before this step
        let hidden_error = self.weights_ho.transpose().dot(&output_error)?;
        let hidden_gradient = hidden_error.hadamard(&Self::slope(&hidden))?;

        let bias_h = (&self.bias_h + &hidden_gradient.scale(self.learning_rate))?;
        let weights_ih = (&self.weights_ih + &hidden_gradient.dot(&input.transpose())?)?;

        self.weights_ih = weights_ih;
        self.weights_ho = weights_ho;
        self.bias_h = bias_h;
        self.bias_o = bias_o;
        Ok(())
    }

    pub fn predict(&self, input: &[f64]) -> Result<Vec<f64>> {
        self.forward(input)
    }

    /// Predicts every input and keeps only the first output of each.
    /// Meant for networks with a single output neuron.
    pub fn predict_batch(&self, inputs: &[Vec<f64>]) -> Result<Vec<f64>> {
        inputs
            .iter()
            .map(|input| self.predict(input).map(|output| output[0]))
            .collect()
    }

    /// Mean-squared error over every sample and output of `dataset`
    pub fn mean_squared_error(&self, dataset: &Dataset) -> Result<f64> {
        if dataset.output_width() != self.output_amount() {
            return Err(Error::DimensionMismatch);
        }

        let mut sum = 0.0;
        for (input, target) in dataset.iter() {
            let output = self.forward(input)?;
            for (o, t) in output.iter().zip(target) {
                let diff = o - t;
                sum += diff * diff;
            }
        }
        Ok(sum / (dataset.len() * self.output_amount()) as f64)
    }

    /// Returns the amount of inputs this network accepts
    pub fn input_amount(&self) -> usize {
        self.weights_ih.cols()
    }

    /// Returns the amount of neurons in the hidden layer
    pub fn hidden_amount(&self) -> usize {
        self.weights_ih.rows()
    }

    /// Returns the amount of neurons in the output layer
    pub fn output_amount(&self) -> usize {
        self.weights_ho.rows()
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn weights_ih(&self) -> &Matrix<f64> {
        &self.weights_ih
    }

    pub fn weights_ho(&self) -> &Matrix<f64> {
        &self.weights_ho
    }

    pub fn bias_h(&self) -> &Matrix<f64> {
        &self.bias_h
    }

    pub fn bias_o(&self) -> &Matrix<f64> {
        &self.bias_o
    }

    fn input_column(&self, input: &[f64]) -> Result<Matrix<f64>> {
        if input.len() != self.input_amount() {
            return Err(Error::DimensionMismatch);
        }
        Matrix::column(input.to_vec())
    }

    /// Returns (hidden, output) activations for a column input.
    fn forward_layers(&self, input: &Matrix<f64>) -> Result<(Matrix<f64>, Matrix<f64>)> {
        let hidden = Self::layer(&self.weights_ih, &self.bias_h, input)?;
        let output = Self::layer(&self.weights_ho, &self.bias_o, &hidden)?;
        Ok((hidden, output))
    }

    fn layer(
        weights: &Matrix<f64>,
        bias: &Matrix<f64>,
        input: &Matrix<f64>,
    ) -> Result<Matrix<f64>> {
        let mut z = (&weights.dot(input)? + bias)?;
        z.apply(|x, _, _| Sigmoid.call(x));
        Ok(z)
    }

    fn slope(activations: &Matrix<f64>) -> Matrix<f64> {
        activations.map(|a, _, _| Sigmoid.derivative(a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn seeded_net(seed: u64) -> NeuralNet {
        NeuralNet::new(2, 5, 1, &mut StdRng::seed_from_u64(seed)).unwrap()
    }

    fn sigmoid(x: f64) -> f64 {
        1.0 / (1.0 + (-x).exp())
    }

    #[test]
    fn parameter_shapes() {
        let net = NeuralNet::new(3, 4, 2, &mut StdRng::seed_from_u64(1)).unwrap();

        assert_eq!(net.weights_ih().dim(), (4, 3));
        assert_eq!(net.weights_ho().dim(), (2, 4));
        assert_eq!(net.bias_h().dim(), (4, 1));
        assert_eq!(net.bias_o().dim(), (2, 1));
        assert_eq!(net.input_amount(), 3);
        assert_eq!(net.hidden_amount(), 4);
        assert_eq!(net.output_amount(), 2);
        assert_eq!(net.learning_rate(), DEFAULT_LEARNING_RATE);
    }

    #[test]
    fn initial_parameter_ranges() {
        let net = seeded_net(2);

        let ih_limit = (2.0f64 / 7.0).sqrt();
        let ho_limit = (2.0f64 / 6.0).sqrt();
        assert!(net.weights_ih().as_slice().iter().all(|w| w.abs() <= ih_limit));
        assert!(net.weights_ho().as_slice().iter().all(|w| w.abs() <= ho_limit));
        for b in net.bias_h().as_slice().iter().chain(net.bias_o().as_slice()) {
            assert!((-0.01..0.01).contains(b));
        }
    }

    #[test]
    fn zero_sized_layers_are_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(NeuralNet::new(0, 5, 1, &mut rng), Err(Error::InvalidShape));
        assert_eq!(NeuralNet::new(2, 0, 1, &mut rng), Err(Error::InvalidShape));
        assert_eq!(NeuralNet::new(2, 5, 0, &mut rng), Err(Error::InvalidShape));
    }

    #[test]
    fn forward_output() {
        let net = NeuralNet::new(4, 20, 3, &mut StdRng::seed_from_u64(3)).unwrap();
        let before = net.clone();

        let out = net.forward(&[1.0, 2.0, -3.0, 2.5]).unwrap();

        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|&x| x > 0.0 && x < 1.0));
        assert_eq!(net, before);
        assert_eq!(net.predict(&[1.0, 2.0, -3.0, 2.5]).unwrap(), out);
    }

    #[test]
    fn forward_wrong_width() {
        let net = seeded_net(4);
        assert_eq!(net.forward(&[1.0]), Err(Error::DimensionMismatch));
        assert_eq!(net.forward(&[]), Err(Error::DimensionMismatch));
    }

    #[test]
    fn forward_by_hand() {
        let net = NeuralNet::from_parameters(
            Matrix::from_array([[0.5, -1.0]]),
            Matrix::from_array([[2.0]]),
            Matrix::from_array([[0.25]]),
            Matrix::from_array([[-0.5]]),
        )
        .unwrap();

        let hidden = sigmoid(0.5 * 1.0 - 1.0 * 3.0 + 0.25);
        let expected = sigmoid(2.0 * hidden - 0.5);
        let out = net.forward(&[1.0, 3.0]).unwrap();
        assert!((out[0] - expected).abs() < 1e-12);
    }

    #[test]
    fn from_parameters_checks_shapes() {
        let res = NeuralNet::from_parameters(
            Matrix::from_array([[0.5, -1.0], [0.1, 0.2]]),
            Matrix::from_array([[2.0]]),
            Matrix::from_array([[0.25], [0.0]]),
            Matrix::from_array([[-0.5]]),
        );
        assert_eq!(res, Err(Error::DimensionMismatch));
    }

    #[test]
    fn train_step_by_hand() {
        let (w1, w2, b1, b2, lr) = (0.5, -0.3, 0.1, 0.2, 0.1);
        let mut net = NeuralNet::from_parameters(
            Matrix::from_array([[w1]]),
            Matrix::from_array([[w2]]),
            Matrix::from_array([[b1]]),
            Matrix::from_array([[b2]]),
        )
        .unwrap()
        .with_learning_rate(lr);

        let (x, t) = (1.0, 1.0);
        net.train_step(&[x], &[t]).unwrap();

        let h = sigmoid(w1 * x + b1);
        let o = sigmoid(w2 * h + b2);
        let out_err = t - o;
        let out_grad = out_err * o * (1.0 - o);
        let hid_grad = w2 * out_err * h * (1.0 - h);

        let close = |a: f64, b: f64| (a - b).abs() < 1e-12;
        assert!(close(net.bias_o()[(0, 0)], b2 + lr * out_grad));
        assert!(close(net.weights_ho()[(0, 0)], w2 + out_grad * h));
        assert!(close(net.bias_h()[(0, 0)], b1 + lr * hid_grad));
        assert!(close(net.weights_ih()[(0, 0)], w1 + hid_grad * x));
    }

    #[test]
    fn failed_train_step_keeps_parameters() {
        let mut net = seeded_net(5);
        let before = net.clone();

        assert_eq!(
            net.train_step(&[1.0, 0.0], &[1.0, 0.0]),
            Err(Error::DimensionMismatch)
        );
        assert_eq!(net.train_step(&[1.0], &[1.0]), Err(Error::DimensionMismatch));
        assert_eq!(net, before);
    }

    #[test]
    fn train_step_moves_output_toward_target() {
        let mut net = seeded_net(6);
        let start = net.forward(&[1.0, 0.0]).unwrap()[0];

        for _ in 0..200 {
            net.train_step(&[1.0, 0.0], &[1.0]).unwrap();
        }

        let end = net.forward(&[1.0, 0.0]).unwrap()[0];
        assert!(end > start, "{start} -> {end}");
        assert!(end > 0.5);
    }

    #[test]
    fn predict_batch_takes_first_output() {
        let net = seeded_net(7);
        let data = Dataset::xor();

        let batch = net.predict_batch(data.inputs()).unwrap();
        assert_eq!(batch.len(), 4);
        for (input, &p) in data.inputs().iter().zip(&batch) {
            assert_eq!(net.predict(input).unwrap()[0], p);
        }

        assert_eq!(
            net.predict_batch(&[vec![1.0, 0.0], vec![1.0]]),
            Err(Error::DimensionMismatch)
        );
    }

    #[test]
    fn mean_squared_error_bounds() {
        let net = seeded_net(8);
        let mse = net.mean_squared_error(&Dataset::xor()).unwrap();
        assert!(mse > 0.0 && mse < 1.0);

        let wide = Dataset::new(vec![vec![0.0, 1.0]], vec![vec![1.0, 0.0]]).unwrap();
        assert_eq!(net.mean_squared_error(&wide), Err(Error::DimensionMismatch));
    }

    #[test]
    fn same_seed_same_network() {
        assert_eq!(seeded_net(9), seeded_net(9));
        assert_ne!(seeded_net(9), seeded_net(10));
    }
}
