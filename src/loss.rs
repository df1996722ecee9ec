//! Loss function(s)

use crate::{
    nn::NNError,
    tensor::{Matrix, ShapeError},
};

/// Smallest probability fed to the logarithm; predictions are clamped to `[EPSILON, 1 - EPSILON]`
pub const EPSILON: f32 = 1e-7;

/// Sparse categorical cross-entropy between integer class labels and softmax probabilities
pub struct SparseCategoricalCrossEntropy;

impl SparseCategoricalCrossEntropy {
    /// Mean over the batch of `-log(predictions[row, labels[row]])`
    pub fn call(labels: &[usize], predictions: &Matrix) -> Result<f32, NNError> {
        validate(labels, predictions)?;
        let total: f32 = labels
            .iter()
            .enumerate()
            .map(|(row, &label)| -predictions.get(row, label).clamp(EPSILON, 1.0 - EPSILON).ln())
            .sum();
        Ok(total / labels.len() as f32)
    }

    /// Gradient of the mean loss w.r.t. the logits feeding the softmax,
    /// `(predictions - one_hot(labels)) / batch_size`
    pub fn gradient(labels: &[usize], predictions: &Matrix) -> Result<Matrix, NNError> {
        validate(labels, predictions)?;
        let batch_size = labels.len() as f32;
        Ok(Matrix::from_fn(
            predictions.rows(),
            predictions.cols(),
            |row, col| {
                let target = if labels[row] == col { 1.0 } else { 0.0 };
                (predictions.get(row, col) - target) / batch_size
            },
        ))
    }
}

fn validate(labels: &[usize], predictions: &Matrix) -> Result<(), NNError> {
    if labels.len() != predictions.rows() {
        return Err(ShapeError::Count {
            what: "cross-entropy labels",
            expected: predictions.rows(),
            got: labels.len(),
        }
        .into());
    }
    if labels.is_empty() {
        return Err(ShapeError::Empty {
            op: "cross-entropy",
        }
        .into());
    }
    let num_classes = predictions.cols();
    if let Some((row, &label)) = labels.iter().enumerate().find(|(_, l)| **l >= num_classes) {
        return Err(NNError::LabelOutOfRange {
            row,
            label,
            num_classes,
        });
    }
    Ok(())
}
