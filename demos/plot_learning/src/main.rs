use xor_nn::{viz::NNGui, Classifier, Dataset, TrainConfig};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let dataset = Dataset::xor();
    let config = TrainConfig::default()
        .with_iterations(100_000)
        .with_log(Some(100));

    let mut classifier = Classifier::new(dataset.clone(), Some(dataset.clone()), 5, config)
        .expect("XOR dataset fits a 2-5-1 network");

    if let Err(e) = classifier.fit_gui::<NNGui>() {
        log::error!("Training failed: {e}");
        return;
    }

    println!("------------------");
    println!(
        "Final training cost: {}",
        classifier
            .network()
            .mean_squared_error(&dataset)
            .unwrap()
    );

    let predictions = classifier.network().predict_batch(dataset.inputs()).unwrap();
    for (input, p) in dataset.inputs().iter().zip(predictions) {
        println!("{input:?} -> {p:.4}");
    }
}
