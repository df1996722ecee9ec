//! Activation functions and their local gradient rules
//!
//! Each activation maps a pre-activation matrix `z` to an output matrix, and on the
//! backward pass maps `dL/d(output)` to `dL/dz` using the cached `z`.

use crate::tensor::{Matrix, MatrixView, ShapeError};

/// Stateless activation applied after a dense layer's affine transform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    ReLU,
    /// Row-wise softmax. Its backward rule assumes the incoming gradient is already
    /// taken with respect to the logits, which is what the fused softmax + cross-entropy
    /// gradient in [`crate::loss`] produces, so `Sequential` only allows it on the last layer.
    Softmax,
}

impl Activation {
    pub fn forward(self, z: MatrixView<'_>) -> Matrix {
        match self {
            Activation::ReLU => relu(z),
            Activation::Softmax => softmax(z),
        }
    }

    /// Maps the gradient w.r.t. the activation output to the gradient w.r.t. `pre_activation`
    pub fn backward(
        self,
        pre_activation: MatrixView<'_>,
        output_gradient: MatrixView<'_>,
    ) -> Result<Matrix, ShapeError> {
        match self {
            Activation::ReLU => relu_backward(pre_activation, output_gradient),
            Activation::Softmax => {
                if pre_activation.shape() != output_gradient.shape() {
                    return Err(ShapeError::Incompatible {
                        op: "softmax backward",
                        lhs: pre_activation.shape(),
                        rhs: output_gradient.shape(),
                    });
                }
                Ok(output_gradient.to_matrix())
            }
        }
    }
}

/// `max(0, x)` element-wise
pub fn relu(z: MatrixView<'_>) -> Matrix {
    z.map(|x| x.max(0.0))
}

/// Passes the upstream gradient through where `x > 0`; `x == 0` gets no gradient
pub fn relu_backward(
    pre_activation: MatrixView<'_>,
    output_gradient: MatrixView<'_>,
) -> Result<Matrix, ShapeError> {
    pre_activation.zip_map(output_gradient, |x, g| if x > 0.0 { g } else { 0.0 })
}

/// Row-wise softmax with the row maximum subtracted before exponentiating
pub fn softmax(z: MatrixView<'_>) -> Matrix {
    let mut out = z.to_matrix();
    let cols = out.cols();
    for row in out.as_mut_slice().chunks_mut(cols.max(1)) {
        let max = row.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let mut sum = 0.0;
        for v in row.iter_mut() {
            *v = (*v - max).exp();
            sum += *v;
        }
        for v in row.iter_mut() {
            *v /= sum;
        }
    }
    out
}
