//! Trains a two-layer perceptron on a synthetic classification set
//! using the library provided by `dense_rs`
//!
//! # Usage
//! Runnable via
//! ```sh
//! cargo run -- -h
//! RUST_LOG=info cargo run --release
//! ```
//!
//! Network shape and the training schedule are configurable; the defaults mirror MNIST
//! (784 inputs, 10 classes) with a 512-unit hidden layer.

use std::process;

use dense_rs::{
    datasets::gen_blobs_split,
    nn::Sequential,
    optim::SGD,
    train::{TrainConfig, evaluate, fit},
};

use clap::Parser;
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

#[derive(Parser)]
struct Args {
    #[clap(long, default_value_t = 28 * 28)]
    input_size: usize,
    #[clap(long, default_value_t = 512)]
    hidden_size: usize,
    #[clap(long, default_value_t = 10)]
    output_size: usize,
    #[clap(short, long, default_value_t = 20)]
    epochs: usize,
    #[clap(short, long, default_value_t = 64)]
    batch_size: usize,
    #[clap(short, long, default_value_t = SGD::DEFAULT_LEARNING_RATE)]
    lr: f32,
    /// Report the loss every this many batches
    #[clap(long, default_value_t = 100)]
    log_every: usize,
    /// Seeds the synthetic data; weight initialization uses the next seed up
    #[clap(short, long, default_value_t = 42)]
    seed: u64,
    #[clap(long, default_value_t = 1000)]
    train_samples: usize,
    #[clap(long, default_value_t = 200)]
    test_samples: usize,
    /// Standard deviation of the noise around each class prototype
    #[clap(long, default_value_t = 0.1)]
    noise: f32,
}

/// Weight initialization gets its own stream so it never replays the data generator's draws
fn weight_seed(seed: u64) -> u64 {
    seed.wrapping_add(1)
}

fn run(args: Args) -> Result<f32, Box<dyn std::error::Error>> {
    let (train, test) = gen_blobs_split(
        args.train_samples,
        args.test_samples,
        args.input_size,
        args.output_size,
        args.noise,
        args.seed,
    )?;

    let mut rng = Pcg64Mcg::seed_from_u64(weight_seed(args.seed));
    let mut model = Sequential::mlp(args.input_size, args.hidden_size, args.output_size, &mut rng);
    log::info!(
        "network {}->{}->{} with {} parameters",
        args.input_size,
        args.hidden_size,
        args.output_size,
        model.num_parameters()
    );

    let mut optim = SGD::new(args.lr);
    let config = TrainConfig {
        epochs: args.epochs,
        batch_size: args.batch_size,
        log_every: args.log_every,
    };
    fit(&mut model, &mut optim, &train, &config)?;

    Ok(evaluate(&model, &test)?)
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    match run(args) {
        Ok(accuracy) => println!("accuracy: {:.2}", accuracy),
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}
