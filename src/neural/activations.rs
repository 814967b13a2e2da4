pub trait Activation {
    /// Returns activation function at x
    fn call(&self, x: f64) -> f64;
    /// Returns derivative of activation function with respect to the function at x.
    /// For sigmoid we express the derivative as `a_x * (1-a_x)` instead of
    /// `sigmoid(x)(1-sigmoid(x))`, so `a_x` must already be a sigmoid output.
    fn derivative(&self, a_x: f64) -> f64;
}

/// Logistic sigmoid, `1 / (1 + e^-x)`. The only nonlinearity of the network,
/// used by both the hidden and the output layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sigmoid;

impl Activation for Sigmoid {
    fn call(&self, x: f64) -> f64 {
        1.0 / (1.0 + (-x).exp())
    }

    fn derivative(&self, a_x: f64) -> f64 {
        a_x * (1.0 - a_x)
    }
}
