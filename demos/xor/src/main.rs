use log::{error, info};
use xor_nn::{Classifier, Dataset, TrainConfig};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let dataset = Dataset::xor();
    let mut classifier = match Classifier::new(dataset.clone(), None, 5, TrainConfig::default()) {
        Ok(classifier) => classifier,
        Err(e) => {
            error!("Could not build classifier: {e}");
            return;
        }
    };

    if let Err(e) = classifier.fit() {
        error!("Training failed: {e}");
        return;
    }

    println!("------------------");
    for input in dataset.inputs() {
        match classifier.predict(input) {
            Ok(output) => println!("{input:?} -> {:.4}", output[0]),
            Err(e) => error!("Prediction for {input:?} failed: {e}"),
        }
    }

    match classifier.network().mean_squared_error(&dataset) {
        Ok(mse) => info!("Final training cost: {mse}"),
        Err(e) => error!("Could not compute final cost: {e}"),
    }
}
