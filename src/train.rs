//! Training loop and evaluation
//!
//! One epoch walks a fresh [`BatchGenerator`] over the training set; every batch goes
//! through forward, loss, backward and an optimizer update, in that order.

use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

use crate::{
    dataloader::{BatchGenerator, DataLoaderError},
    datasets::Dataset,
    loss::SparseCategoricalCrossEntropy,
    nn::{Module, NNError, Sequential},
    optim::Optim,
    tensor::{Matrix, MatrixView, ShapeError},
};

/// Errors which abort a training run
#[derive(Debug, Error)]
pub enum TrainError {
    #[error(transparent)]
    NN(#[from] NNError),
    #[error(transparent)]
    DataLoader(#[from] DataLoaderError),
    #[error("Loss diverged to {loss} at epoch {epoch}, batch {batch}")]
    NonFiniteLoss { epoch: usize, batch: usize, loss: f32 },
    #[error("Training cancelled at epoch {epoch}, batch {batch}")]
    Cancelled { epoch: usize, batch: usize },
}

/// Training schedule, fixed for the whole run
#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub epochs: usize,
    pub batch_size: usize,
    /// report the running loss every `log_every` batches, 0 disables it
    pub log_every: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            epochs: 20,
            batch_size: 64,
            log_every: 100,
        }
    }
}

/// Losses recorded during `fit`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FitReport {
    /// loss of every training step, in order
    pub step_losses: Vec<f32>,
    /// mean step loss of every epoch
    pub epoch_losses: Vec<f32>,
}

impl FitReport {
    pub fn final_loss(&self) -> Option<f32> {
        self.epoch_losses.last().copied()
    }
}

/// Forward, loss, backward and one optimizer update on a single batch; returns the batch loss
pub fn one_training_step<O: Optim>(
    model: &mut Sequential,
    optim: &mut O,
    images: MatrixView<'_>,
    labels: &[usize],
) -> Result<f32, NNError> {
    let predictions = model.forward(images)?;
    let loss = SparseCategoricalCrossEntropy::call(labels, &predictions)?;
    let output_gradient = SparseCategoricalCrossEntropy::gradient(labels, &predictions)?;
    let gradients = model.backward(&output_gradient)?;
    optim.apply(model.parameters_mut(), &gradients)?;
    Ok(loss)
}

/// Trains `model` on `dataset` for `config.epochs` epochs
pub fn fit<O: Optim>(
    model: &mut Sequential,
    optim: &mut O,
    dataset: &Dataset,
    config: &TrainConfig,
) -> Result<FitReport, TrainError> {
    fit_with_cancel(model, optim, dataset, config, &AtomicBool::new(false))
}

/// Like [`fit`] but checks `cancel` between steps and stops with
/// [`TrainError::Cancelled`] once it is set
pub fn fit_with_cancel<O: Optim>(
    model: &mut Sequential,
    optim: &mut O,
    dataset: &Dataset,
    config: &TrainConfig,
    cancel: &AtomicBool,
) -> Result<FitReport, TrainError> {
    let mut report = FitReport::default();
    for epoch in 0..config.epochs {
        log::info!("Epoch {}", epoch);
        let mut batch_generator = BatchGenerator::from_dataset(dataset, config.batch_size)?;
        let mut epoch_loss = 0.0;
        let num_batches = batch_generator.num_batches();
        for batch in 0..num_batches {
            if cancel.load(Ordering::Relaxed) {
                log::warn!("Training cancelled at epoch {}, batch {}", epoch, batch);
                return Err(TrainError::Cancelled { epoch, batch });
            }
            let (images, labels) = batch_generator.next_batch();
            let loss = one_training_step(model, optim, images, labels)?;
            if !loss.is_finite() {
                return Err(TrainError::NonFiniteLoss { epoch, batch, loss });
            }
            if config.log_every > 0 && batch % config.log_every == 0 {
                log::info!("loss at batch {}: {:.2}", batch, loss);
            }
            report.step_losses.push(loss);
            epoch_loss += loss;
        }
        if num_batches > 0 {
            let mean = epoch_loss / num_batches as f32;
            log::info!("epoch: {}, mean loss: {:.4}", epoch, mean);
            report.epoch_losses.push(mean);
        }
    }
    Ok(report)
}

/// Fraction of rows whose argmax equals the label
pub fn accuracy(predictions: &Matrix, labels: &[usize]) -> Result<f32, NNError> {
    if predictions.rows() != labels.len() {
        return Err(ShapeError::Count {
            what: "accuracy labels",
            expected: predictions.rows(),
            got: labels.len(),
        }
        .into());
    }
    if labels.is_empty() {
        return Err(ShapeError::Empty { op: "accuracy" }.into());
    }
    let matches = predictions
        .view()
        .argmax_rows()
        .iter()
        .zip(labels)
        .filter(|(predicted, label)| predicted == label)
        .count();
    Ok(matches as f32 / labels.len() as f32)
}

/// Runs inference over the whole dataset and returns the accuracy
pub fn evaluate<M: Module>(model: &M, dataset: &Dataset) -> Result<f32, NNError> {
    let predictions = model.predict(dataset.images().view())?;
    accuracy(&predictions, dataset.labels())
}
