//! Optimizer(s)

use crate::{
    nn::{Gradients, NNError, ParametersMut},
    tensor::ShapeError,
};

/// Common interface for optimizers
///
/// `parameters` and `gradients` are paired positionally, both in layer order as produced
/// by `Sequential::parameters_mut` and `Sequential::backward`.
pub trait Optim {
    /// Applies one update in place
    fn apply(
        &mut self,
        parameters: Vec<ParametersMut<'_>>,
        gradients: &[Gradients],
    ) -> Result<(), NNError>;
}

/// Plain stochastic gradient descent, `parameter -= lr * gradient`
#[derive(Debug, Clone, Copy)]
pub struct SGD {
    // fixed for the whole run, no decay
    lr: f32,
}

impl SGD {
    pub const DEFAULT_LEARNING_RATE: f32 = 1e-3;

    pub fn new(lr: f32) -> Self {
        Self { lr }
    }

    pub fn learning_rate(&self) -> f32 {
        self.lr
    }
}

impl Default for SGD {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LEARNING_RATE)
    }
}

impl Optim for SGD {
    fn apply(
        &mut self,
        mut parameters: Vec<ParametersMut<'_>>,
        gradients: &[Gradients],
    ) -> Result<(), NNError> {
        if parameters.len() != gradients.len() {
            return Err(ShapeError::Count {
                what: "sgd gradients",
                expected: parameters.len(),
                got: gradients.len(),
            }
            .into());
        }
        // everything is validated before the first write so a mismatch leaves the network intact
        for (param, grad) in parameters.iter().zip(gradients) {
            if param.weights.shape() != grad.weights.shape() {
                return Err(ShapeError::Incompatible {
                    op: "sgd weights",
                    lhs: param.weights.shape(),
                    rhs: grad.weights.shape(),
                }
                .into());
            }
            if param.bias.len() != grad.bias.len() {
                return Err(ShapeError::Incompatible {
                    op: "sgd bias",
                    lhs: (1, param.bias.len()),
                    rhs: (1, grad.bias.len()),
                }
                .into());
            }
        }
        for (param, grad) in parameters.iter_mut().zip(gradients) {
            param.weights.scaled_sub_assign(self.lr, &grad.weights)?;
            param.bias.scaled_sub_assign(self.lr, &grad.bias)?;
        }
        Ok(())
    }
}
