use std::sync::mpsc;

use log::{debug, info};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    neural::{dataset::Dataset, NeuralNet, DEFAULT_LEARNING_RATE},
    prelude::*,
    viz::{IterationState, Visualizer},
};

pub const DEFAULT_ITERATIONS: usize = 10_000;

/// Knobs for a [`Classifier`] training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainConfig {
    /// Number of single-sample training steps.
    pub iterations: usize,
    pub learning_rate: f64,
    /// Log the error every this many steps.
    pub iterations_per_log: Option<usize>,
    /// Seed for weight initialization and sample selection. `None` seeds from
    /// the operating system.
    pub seed: Option<u64>,
    /// Stop once the validation error drops below this value at a log point.
    /// Ignored when the classifier has no validation set.
    pub target_error: Option<f64>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            learning_rate: DEFAULT_LEARNING_RATE,
            iterations_per_log: Some(1_000),
            seed: None,
            target_error: None,
        }
    }
}

impl TrainConfig {
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_learning_rate(mut self, rate: f64) -> Self {
        self.learning_rate = rate;
        self
    }

    pub fn with_log(mut self, iterations_per_log: Option<usize>) -> Self {
        self.iterations_per_log = iterations_per_log;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_target_error(mut self, target_error: Option<f64>) -> Self {
        self.target_error = target_error;
        self
    }

    fn is_log_step(&self, i: usize) -> bool {
        self.iterations_per_log
            .is_some_and(|ipl| ipl > 0 && i % ipl == 0)
    }
}

/// Trains a [`NeuralNet`] on a dataset by repeatedly drawing one random
/// sample and taking a gradient step on it.
pub struct Classifier {
    net: NeuralNet,
    training: Dataset,
    validation: Option<Dataset>,
    config: TrainConfig,
    rng: StdRng,
}

impl Classifier {
    /// Sizes the network from the training set. A validation set, when given,
    /// must have the same input and output widths.
    pub fn new(
        training: Dataset,
        validation: Option<Dataset>,
        hidden_nodes: usize,
        config: TrainConfig,
    ) -> Result<Self> {
        if let Some(validation) = &validation {
            if validation.input_width() != training.input_width()
                || validation.output_width() != training.output_width()
            {
                return Err(Error::DimensionMismatch);
            }
        }

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let net = NeuralNet::new(
            training.input_width(),
            hidden_nodes,
            training.output_width(),
            &mut rng,
        )?
        .with_learning_rate(config.learning_rate);

        Ok(Self {
            net,
            training,
            validation,
            config,
            rng,
        })
    }

    pub fn fit(&mut self) -> Result<()> {
        let completed = self.run(|_| Ok(()))?;
        info!("Training complete after {completed} iterations");
        Ok(())
    }

    /// Same as [`Classifier::fit`], but trains on a worker thread while a
    /// window plots the error at every log point. The GUI's listener owns the
    /// receiver, so closing the window early does not stop training: this
    /// returns once the worker has run to completion.
    pub fn fit_gui<Gui: Visualizer>(&mut self) -> Result<()> {
        std::thread::scope(|scope| -> Result<()> {
            let (tx, rx) = mpsc::channel();
            let handle = scope.spawn(move || -> Result<usize> {
                self.run(|state| tx.send(state).map_err(|_| Error::ThreadErr))
            });

            let _ = eframe::run_native(
                "xor_nn",
                eframe::NativeOptions::default(),
                Box::new(|cc| Box::new(Gui::new(cc, rx))),
            );

            let completed = handle.join().map_err(|_| Error::ThreadErr)??;
            info!("Training complete after {completed} iterations");
            Ok(())
        })
    }

    pub fn predict(&self, input: &[f64]) -> Result<Vec<f64>> {
        let result = self.net.predict(input)?;
        debug!("Prediction: {}", result[0]);
        Ok(result)
    }

    pub fn network(&self) -> &NeuralNet {
        &self.net
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    /// Runs the training loop, handing every logged state to `on_log`.
    /// Returns the number of steps taken.
    fn run<F>(&mut self, mut on_log: F) -> Result<usize>
    where
        F: FnMut(IterationState) -> Result<()>,
    {
        for i in 0..self.config.iterations {
            let index = self.rng.gen_range(0..self.training.len());
            let (input, target) = self
                .training
                .sample(index)
                .ok_or(Error::IndexOutOfRange)?;
            self.net.train_step(input, target)?;

            if !self.config.is_log_step(i) {
                continue;
            }

            let error = self.net.mean_squared_error(&self.training)?;
            let validation_error = match &self.validation {
                Some(validation) => {
                    let validation_error = self.net.mean_squared_error(validation)?;
                    info!("Iteration {i} error: {error} validation error: {validation_error}");
                    Some(validation_error)
                }
                None => {
                    info!("Iteration {i} error: {error}");
                    None
                }
            };
            on_log((i, error))?;

            // only a held-out error may end training early
            if let (Some(monitored), Some(target)) = (validation_error, self.config.target_error) {
                if monitored < target {
                    info!("Validation error {monitored} reached target at iteration {i}");
                    return Ok(i + 1);
                }
            }
        }
        Ok(self.config.iterations)
    }
}
