pub mod matrix;
pub mod neural;
pub mod prelude;
pub mod viz;

pub use matrix::Matrix;
pub use neural::{
    classifier::{Classifier, TrainConfig},
    dataset::Dataset,
    NeuralNet,
};
pub use prelude::{Error, Result};
