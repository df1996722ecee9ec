//! Components to build a neural network

use std::ops::Range;

use rand::Rng;
use thiserror::Error;

use crate::{
    activation::Activation,
    tensor::{Matrix, MatrixView, ShapeError, Vector},
};

/// Errors for the neural network
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NNError {
    #[error(transparent)]
    Shape(#[from] ShapeError),
    #[error("Label {label} at row {row} is outside the {num_classes} valid classes")]
    LabelOutOfRange {
        row: usize,
        label: usize,
        num_classes: usize,
    },
    #[error("Softmax is only supported on the last layer, found on layer {layer} of {num_layers}")]
    HiddenSoftmax { layer: usize, num_layers: usize },
    #[error("Backward called on dense layer {input_size}->{output_size} before any forward pass")]
    BackwardBeforeForward {
        input_size: usize,
        output_size: usize,
    },
}

/// Common interface of a layer and of a network of layers
pub trait Module {
    /// Forward pass which caches whatever the backward pass needs
    fn forward(&mut self, input: MatrixView<'_>) -> Result<Matrix, NNError>;
    /// Forward pass for inference only, nothing is cached and the cache of the last
    /// `forward` is left as it was
    fn predict(&self, input: MatrixView<'_>) -> Result<Matrix, NNError>;
    /// Trainable tensors, one `(W, b)` pair per dense layer in layer order
    fn parameters(&self) -> Vec<Parameters<'_>>;
}

/// Borrowed weight and bias of one dense layer
#[derive(Debug, Clone, Copy)]
pub struct Parameters<'a> {
    pub weights: &'a Matrix,
    pub bias: &'a Vector,
}

/// Mutably borrowed weight and bias of one dense layer, handed to the optimizer
#[derive(Debug)]
pub struct ParametersMut<'a> {
    pub weights: &'a mut Matrix,
    pub bias: &'a mut Vector,
}

/// Gradient of the loss w.r.t. one dense layer's weight and bias
#[derive(Debug, Clone, PartialEq)]
pub struct Gradients {
    pub weights: Matrix,
    pub bias: Vector,
}

impl Gradients {
    pub fn zeros_like(parameters: Parameters<'_>) -> Self {
        Self {
            weights: Matrix::zeros(parameters.weights.rows(), parameters.weights.cols()),
            bias: Vector::zeros(parameters.bias.len()),
        }
    }
}

#[derive(Debug, Clone)]
struct ForwardCache {
    input: Matrix,
    pre_activation: Matrix,
}

/// Fully connected layer computing `activation(input · W + b)`
#[derive(Debug, Clone)]
pub struct Dense {
    /// shape (input_size, output_size)
    weights: Matrix,
    /// shape (output_size,)
    bias: Vector,
    activation: Activation,
    cache: Option<ForwardCache>,
}

impl Dense {
    /// Weights are drawn uniformly from [0, 0.1), biases start at zero
    pub fn new<R: Rng>(
        input_size: usize,
        output_size: usize,
        activation: Activation,
        rng: &mut R,
    ) -> Self {
        let weights = Matrix::from_fn(input_size, output_size, |_, _| rng.random_range(0.0..0.1));
        Self {
            weights,
            bias: Vector::zeros(output_size),
            activation,
            cache: None,
        }
    }

    /// Creates a layer from explicit parameters
    pub fn from_parameters(
        weights: Matrix,
        bias: Vector,
        activation: Activation,
    ) -> Result<Self, NNError> {
        if bias.len() != weights.cols() {
            return Err(ShapeError::Incompatible {
                op: "dense bias",
                lhs: weights.shape(),
                rhs: (1, bias.len()),
            }
            .into());
        }
        Ok(Self {
            weights,
            bias,
            activation,
            cache: None,
        })
    }

    pub fn input_size(&self) -> usize {
        self.weights.rows()
    }

    pub fn output_size(&self) -> usize {
        self.weights.cols()
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn bias(&self) -> &Vector {
        &self.bias
    }

    pub fn parameters_mut(&mut self) -> ParametersMut<'_> {
        ParametersMut {
            weights: &mut self.weights,
            bias: &mut self.bias,
        }
    }

    fn pre_activation(&self, input: MatrixView<'_>) -> Result<Matrix, NNError> {
        if input.cols() != self.weights.rows() {
            return Err(ShapeError::Incompatible {
                op: "dense forward",
                lhs: input.shape(),
                rhs: self.weights.shape(),
            }
            .into());
        }
        let z = input.matmul(self.weights.view())?;
        Ok(z.view().add_row_vector(&self.bias)?)
    }

    /// Computes `(input_gradient, dW, db)` from the gradient w.r.t. this layer's output,
    /// using the input and pre-activation cached by the last `forward`.
    /// Calls to `predict` in between do not touch that cache.
    pub fn backward(&self, output_gradient: &Matrix) -> Result<(Matrix, Gradients), NNError> {
        let cache = self
            .cache
            .as_ref()
            .ok_or(NNError::BackwardBeforeForward {
                input_size: self.input_size(),
                output_size: self.output_size(),
            })?;
        let delta = self
            .activation
            .backward(cache.pre_activation.view(), output_gradient.view())?;
        let weights = cache.input.view().t_matmul(delta.view())?;
        let bias = delta.view().column_sums();
        let input_gradient = delta.view().matmul_t(self.weights.view())?;
        Ok((input_gradient, Gradients { weights, bias }))
    }
}

impl Module for Dense {
    fn forward(&mut self, input: MatrixView<'_>) -> Result<Matrix, NNError> {
        let z = self.pre_activation(input)?;
        let output = self.activation.forward(z.view());

        if log::log_enabled!(log::Level::Debug) {
            let n_output_nans = output.as_slice().iter().filter(|v| !v.is_finite()).count();
            let n_inactive = match self.activation {
                Activation::ReLU => z.as_slice().iter().filter(|v| **v <= 0.0).count(),
                Activation::Softmax => 0,
            };
            log::debug!(
                "dense {}->{}: n_output_nans: {}, n_inactive: {}",
                self.input_size(),
                self.output_size(),
                n_output_nans,
                n_inactive
            );
        }

        self.cache = Some(ForwardCache {
            input: input.to_matrix(),
            pre_activation: z,
        });
        Ok(output)
    }

    fn predict(&self, input: MatrixView<'_>) -> Result<Matrix, NNError> {
        let z = self.pre_activation(input)?;
        Ok(self.activation.forward(z.view()))
    }

    fn parameters(&self) -> Vec<Parameters<'_>> {
        vec![Parameters {
            weights: &self.weights,
            bias: &self.bias,
        }]
    }
}

/// Ordered stack of dense layers
///
/// `parameters`, `parameters_mut` and `backward` all go through `layer_order`, so the
/// i-th gradient always belongs to the i-th parameter pair.
#[derive(Debug, Clone)]
pub struct Sequential {
    layers: Vec<Dense>,
}

impl Sequential {
    /// Fails if a layer's output size does not match the next layer's input size, or if
    /// softmax is used anywhere but the last layer
    pub fn new(layers: Vec<Dense>) -> Result<Self, NNError> {
        let num_layers = layers.len();
        if let Some(layer) = layers
            .iter()
            .take(num_layers.saturating_sub(1))
            .position(|l| l.activation == Activation::Softmax)
        {
            return Err(NNError::HiddenSoftmax { layer, num_layers });
        }
        for pair in layers.windows(2) {
            if pair[0].output_size() != pair[1].input_size() {
                return Err(ShapeError::Incompatible {
                    op: "sequential layer chain",
                    lhs: pair[0].weights.shape(),
                    rhs: pair[1].weights.shape(),
                }
                .into());
            }
        }
        Ok(Self { layers })
    }

    /// Two-layer perceptron: `input -> hidden` with ReLU, `hidden -> output` with softmax
    pub fn mlp<R: Rng>(
        input_size: usize,
        hidden_size: usize,
        output_size: usize,
        rng: &mut R,
    ) -> Self {
        Self {
            layers: vec![
                Dense::new(input_size, hidden_size, Activation::ReLU, rng),
                Dense::new(hidden_size, output_size, Activation::Softmax, rng),
            ],
        }
    }

    pub fn layers(&self) -> &[Dense] {
        &self.layers
    }

    /// Total number of trainable scalars
    pub fn num_parameters(&self) -> usize {
        self.parameters()
            .iter()
            .map(|p| p.weights.as_slice().len() + p.bias.len())
            .sum()
    }

    /// Layer indices in the order parameters and gradients are listed
    fn layer_order(&self) -> Range<usize> {
        0..self.layers.len()
    }

    pub fn parameters_mut(&mut self) -> Vec<ParametersMut<'_>> {
        let order = self.layer_order();
        let mut slots: Vec<Option<&mut Dense>> = self.layers.iter_mut().map(Some).collect();
        order
            .filter_map(|i| slots[i].take())
            .map(|l| l.parameters_mut())
            .collect()
    }

    /// Threads `output_gradient` back through the layers and returns the
    /// per-layer gradients in layer order
    pub fn backward(&self, output_gradient: &Matrix) -> Result<Vec<Gradients>, NNError> {
        let mut slots: Vec<Option<Gradients>> = vec![None; self.layers.len()];
        let mut grad = output_gradient.clone();
        for i in self.layer_order().rev() {
            let (input_gradient, layer_gradients) = self.layers[i].backward(&grad)?;
            slots[i] = Some(layer_gradients);
            grad = input_gradient;
        }
        Ok(self.layer_order().filter_map(|i| slots[i].take()).collect())
    }
}

impl Module for Sequential {
    fn forward(&mut self, input: MatrixView<'_>) -> Result<Matrix, NNError> {
        let mut x = input.to_matrix();
        for layer in self.layers.iter_mut() {
            x = layer.forward(x.view())?;
        }
        Ok(x)
    }

    fn predict(&self, input: MatrixView<'_>) -> Result<Matrix, NNError> {
        let mut x = input.to_matrix();
        for layer in self.layers.iter() {
            x = layer.predict(x.view())?;
        }
        Ok(x)
    }

    fn parameters(&self) -> Vec<Parameters<'_>> {
        self.layer_order()
            .flat_map(|i| self.layers[i].parameters())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    use crate::{assert_eq_float, loss::SparseCategoricalCrossEntropy};

    use super::*;

    fn m(rows: usize, cols: usize, data: &[f32]) -> Matrix {
        Matrix::from_vec(rows, cols, data.to_vec()).unwrap()
    }

    // Testing utility for a deterministic and simple layer
    fn dense_ones(input_size: usize, output_size: usize, activation: Activation) -> Dense {
        Dense::from_parameters(
            Matrix::from_fn(input_size, output_size, |_, _| 1.0),
            Vector::from_vec(vec![1.0; output_size]),
            activation,
        )
        .unwrap()
    }

    fn assert_close(analytic: f32, numeric: f32) {
        let tol = 1e-3 + 1e-2 * numeric.abs().max(analytic.abs());
        assert!(
            (analytic - numeric).abs() <= tol,
            "analytic {analytic} vs numeric {numeric}"
        );
    }

    #[test]
    fn test_layer_forward() {
        let mut layer = dense_ones(2, 3, Activation::ReLU);
        let inputs = m(1, 2, &[1.0, 2.0]);
        let outputs = layer.forward(inputs.view()).unwrap();
        assert_eq!(outputs.shape(), (1, 3));
        assert_eq!(outputs.as_slice(), &[4.0, 4.0, 4.0]);
    }

    #[test]
    fn test_forward_shape_for_batches() {
        let mut rng = Pcg64Mcg::seed_from_u64(0);
        for (batch, input_size, output_size) in [(1, 3, 2), (7, 5, 4), (64, 16, 10)] {
            let mut layer = Dense::new(input_size, output_size, Activation::ReLU, &mut rng);
            let input = Matrix::from_fn(batch, input_size, |r, c| (r + c) as f32 * 0.1);
            let out = layer.forward(input.view()).unwrap();
            assert_eq!(out.shape(), (batch, output_size));
        }
    }

    #[test]
    fn test_initialization() {
        let mut rng = Pcg64Mcg::seed_from_u64(1);
        let layer = Dense::new(20, 30, Activation::ReLU, &mut rng);
        assert_eq!(layer.weights().shape(), (20, 30));
        assert!(
            layer
                .weights()
                .as_slice()
                .iter()
                .all(|w| (0.0..0.1).contains(w))
        );
        assert!(layer.bias().as_slice().iter().all(|b| *b == 0.0));
    }

    #[test]
    fn test_dim_mismatch() {
        let mut layer = dense_ones(2, 3, Activation::ReLU);
        let inputs = m(1, 1, &[1.0]);
        let err = layer.forward(inputs.view()).unwrap_err();
        assert!(matches!(
            err,
            NNError::Shape(ShapeError::Incompatible {
                op: "dense forward",
                lhs: (1, 1),
                rhs: (2, 3)
            })
        ));
    }

    #[test]
    fn test_backward_before_forward() {
        let layer = dense_ones(2, 3, Activation::ReLU);
        let err = layer.backward(&Matrix::zeros(1, 3)).unwrap_err();
        assert_eq!(
            err,
            NNError::BackwardBeforeForward {
                input_size: 2,
                output_size: 3
            }
        );
    }

    #[test]
    fn test_backward_gradient_shape_mismatch() {
        let mut layer = dense_ones(2, 3, Activation::ReLU);
        layer.forward(m(1, 2, &[1.0, 2.0]).view()).unwrap();
        assert!(matches!(
            layer.backward(&Matrix::zeros(2, 3)),
            Err(NNError::Shape(_))
        ));
    }

    #[test]
    fn test_forward_and_backward_leave_parameters_untouched() {
        let mut layer = dense_ones(2, 2, Activation::ReLU);
        let before = (layer.weights().clone(), layer.bias().clone());
        layer.forward(m(1, 2, &[1.0, -3.0]).view()).unwrap();
        layer.backward(&m(1, 2, &[1.0, 1.0])).unwrap();
        assert_eq!(&before.0, layer.weights());
        assert_eq!(&before.1, layer.bias());
    }

    #[test]
    fn test_backward_known_values() {
        // z = x·W + b with W = ones, b = ones
        let mut layer = dense_ones(2, 2, Activation::ReLU);
        let x = m(2, 2, &[1.0, 2.0, -3.0, -4.0]);
        layer.forward(x.view()).unwrap();
        // z = [[4, 4], [-6, -6]], second row is masked by relu
        let (dx, grads) = layer.backward(&m(2, 2, &[1.0, 2.0, 5.0, 5.0])).unwrap();
        assert_eq!(grads.weights.as_slice(), &[1.0, 2.0, 2.0, 4.0]);
        assert_eq!(grads.bias.as_slice(), &[1.0, 2.0]);
        assert_eq!(dx.as_slice(), &[3.0, 3.0, 0.0, 0.0]);
    }

    // L = sum(output ⊙ r) so dL/d(output) = r
    fn weighted_sum(layer: &Dense, x: &Matrix, r: &Matrix) -> f32 {
        let out = layer.predict(x.view()).unwrap();
        out.as_slice()
            .iter()
            .zip(r.as_slice())
            .map(|(o, r)| o * r)
            .sum()
    }

    #[test]
    fn test_relu_layer_gradient_check() {
        let w = m(3, 2, &[0.5, -0.4, 0.3, 0.8, -0.6, 0.2]);
        let b = Vector::from_vec(vec![0.1, -0.2]);
        let layer_with = |w: &Matrix, b: &Vector| {
            Dense::from_parameters(w.clone(), b.clone(), Activation::ReLU).unwrap()
        };
        // pre-activations stay well away from the relu kink
        let x = m(2, 3, &[1.0, 2.0, 0.5, -1.0, 0.5, 1.5]);
        let r = m(2, 2, &[0.3, -0.7, 1.1, 0.4]);

        let mut layer = layer_with(&w, &b);
        layer.forward(x.view()).unwrap();
        let (dx, grads) = layer.backward(&r).unwrap();

        let eps = 1e-2;
        for i in 0..w.rows() {
            for j in 0..w.cols() {
                let mut wp = w.clone();
                wp.set(i, j, w.get(i, j) + eps);
                let mut wm = w.clone();
                wm.set(i, j, w.get(i, j) - eps);
                let numeric = (weighted_sum(&layer_with(&wp, &b), &x, &r)
                    - weighted_sum(&layer_with(&wm, &b), &x, &r))
                    / (2.0 * eps);
                assert_close(grads.weights.get(i, j), numeric);
            }
        }
        for j in 0..b.len() {
            let mut bp = b.clone();
            bp.as_mut_slice()[j] += eps;
            let mut bm = b.clone();
            bm.as_mut_slice()[j] -= eps;
            let numeric = (weighted_sum(&layer_with(&w, &bp), &x, &r)
                - weighted_sum(&layer_with(&w, &bm), &x, &r))
                / (2.0 * eps);
            assert_close(grads.bias.as_slice()[j], numeric);
        }
        for i in 0..x.rows() {
            for j in 0..x.cols() {
                let mut xp = x.clone();
                xp.set(i, j, x.get(i, j) + eps);
                let mut xm = x.clone();
                xm.set(i, j, x.get(i, j) - eps);
                let numeric =
                    (weighted_sum(&layer, &xp, &r) - weighted_sum(&layer, &xm, &r)) / (2.0 * eps);
                assert_close(dx.get(i, j), numeric);
            }
        }
    }

    #[test]
    fn test_softmax_layer_with_cross_entropy_gradient_check() {
        let mut rng = Pcg64Mcg::seed_from_u64(3);
        let w = Matrix::from_fn(4, 3, |_, _| rng.random_range(-0.5..0.5));
        let b = Vector::from_vec(vec![0.05, -0.1, 0.0]);
        let x = Matrix::from_fn(5, 4, |_, _| rng.random_range(0.0..1.0));
        let labels: [usize; 5] = [0, 2, 1, 1, 0];
        let loss_with = |w: &Matrix, b: &Vector, x: &Matrix| {
            let layer = Dense::from_parameters(w.clone(), b.clone(), Activation::Softmax).unwrap();
            let p = layer.predict(x.view()).unwrap();
            SparseCategoricalCrossEntropy::call(&labels, &p).unwrap()
        };

        let mut layer = Dense::from_parameters(w.clone(), b.clone(), Activation::Softmax).unwrap();
        let p = layer.forward(x.view()).unwrap();
        let grad = SparseCategoricalCrossEntropy::gradient(&labels, &p).unwrap();
        let (dx, grads) = layer.backward(&grad).unwrap();

        let eps = 1e-2;
        for i in 0..w.rows() {
            for j in 0..w.cols() {
                let mut wp = w.clone();
                wp.set(i, j, w.get(i, j) + eps);
                let mut wm = w.clone();
                wm.set(i, j, w.get(i, j) - eps);
                let numeric = (loss_with(&wp, &b, &x) - loss_with(&wm, &b, &x)) / (2.0 * eps);
                assert_close(grads.weights.get(i, j), numeric);
            }
        }
        for j in 0..b.len() {
            let mut bp = b.clone();
            bp.as_mut_slice()[j] += eps;
            let mut bm = b.clone();
            bm.as_mut_slice()[j] -= eps;
            let numeric = (loss_with(&w, &bp, &x) - loss_with(&w, &bm, &x)) / (2.0 * eps);
            assert_close(grads.bias.as_slice()[j], numeric);
        }
        for i in 0..x.rows() {
            for j in 0..x.cols() {
                let mut xp = x.clone();
                xp.set(i, j, x.get(i, j) + eps);
                let mut xm = x.clone();
                xm.set(i, j, x.get(i, j) - eps);
                let numeric = (loss_with(&w, &b, &xp) - loss_with(&w, &b, &xm)) / (2.0 * eps);
                assert_close(dx.get(i, j), numeric);
            }
        }
    }

    #[test]
    fn test_sequential_chain_validation() {
        let err = Sequential::new(vec![
            dense_ones(4, 3, Activation::ReLU),
            dense_ones(2, 2, Activation::Softmax),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            NNError::Shape(ShapeError::Incompatible {
                op: "sequential layer chain",
                ..
            })
        ));
    }

    #[test]
    fn test_sequential_rejects_hidden_softmax() {
        let err = Sequential::new(vec![
            dense_ones(2, 3, Activation::Softmax),
            dense_ones(3, 2, Activation::Softmax),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            NNError::HiddenSoftmax {
                layer: 0,
                num_layers: 2
            }
        );
        assert!(Sequential::new(vec![dense_ones(2, 2, Activation::Softmax)]).is_ok());
        assert!(
            Sequential::new(vec![
                dense_ones(2, 3, Activation::ReLU),
                dense_ones(3, 2, Activation::Softmax),
            ])
            .is_ok()
        );
    }

    #[test]
    fn test_predict_does_not_replace_forward_cache() {
        let x = m(1, 2, &[1.0, -0.5]);
        let other = m(3, 2, &[-1.0, 2.0, 0.5, 0.5, 3.0, -2.0]);
        let grad = m(1, 3, &[0.2, -0.1, 0.4]);

        let mut reference = dense_ones(2, 3, Activation::ReLU);
        reference.forward(x.view()).unwrap();
        let expected = reference.backward(&grad).unwrap();

        let mut layer = dense_ones(2, 3, Activation::ReLU);
        layer.forward(x.view()).unwrap();
        layer.predict(other.view()).unwrap();
        assert_eq!(layer.backward(&grad).unwrap(), expected);
    }

    #[test]
    fn test_sequential_parameters_in_layer_order() {
        let mut rng = Pcg64Mcg::seed_from_u64(0);
        let model = Sequential::mlp(28 * 28, 512, 10, &mut rng);
        let params = model.parameters();
        // (W, b) for each of the two layers
        assert_eq!(params.len() * 2, 4);
        assert_eq!(params[0].weights.shape(), (784, 512));
        assert_eq!(params[0].bias.len(), 512);
        assert_eq!(params[1].weights.shape(), (512, 10));
        assert_eq!(params[1].bias.len(), 10);
        assert_eq!(model.num_parameters(), 784 * 512 + 512 + 512 * 10 + 10);
    }

    #[test]
    fn test_sequential_forward_and_backward_align_with_parameters() {
        let mut rng = Pcg64Mcg::seed_from_u64(5);
        let mut model = Sequential::mlp(6, 4, 3, &mut rng);
        let x = Matrix::from_fn(2, 6, |r, c| ((r + c) % 3) as f32 * 0.3);
        let p = model.forward(x.view()).unwrap();
        assert_eq!(p.shape(), (2, 3));
        for r in 0..2 {
            assert_eq_float!(p.row(r).iter().sum::<f32>(), 1.0, 1e-5);
        }
        assert_eq!(p, model.predict(x.view()).unwrap());

        let grad = SparseCategoricalCrossEntropy::gradient(&[0, 2], &p).unwrap();
        let grads = model.backward(&grad).unwrap();
        let params = model.parameters();
        assert_eq!(grads.len(), params.len());
        for (g, p) in grads.iter().zip(params.iter()) {
            assert_eq!(g.weights.shape(), p.weights.shape());
            assert_eq!(g.bias.len(), p.bias.len());
        }
    }

    #[test]
    fn test_three_layer_gradients_follow_parameter_order() {
        let mut rng = Pcg64Mcg::seed_from_u64(8);
        let mut model = Sequential::new(vec![
            Dense::new(5, 4, Activation::ReLU, &mut rng),
            Dense::new(4, 3, Activation::ReLU, &mut rng),
            Dense::new(3, 2, Activation::Softmax, &mut rng),
        ])
        .unwrap();
        let x = Matrix::from_fn(4, 5, |r, c| ((r * 5 + c) % 7) as f32 * 0.2);
        let p = model.forward(x.view()).unwrap();
        let grad = SparseCategoricalCrossEntropy::gradient(&[0, 1, 1, 0], &p).unwrap();
        let grads = model.backward(&grad).unwrap();

        let shapes: Vec<_> = grads.iter().map(|g| (g.weights.shape(), g.bias.len())).collect();
        assert_eq!(shapes, vec![((5, 4), 4), ((4, 3), 3), ((3, 2), 2)]);
        let param_shapes: Vec<_> = model
            .parameters()
            .iter()
            .map(|p| (p.weights.shape(), p.bias.len()))
            .collect();
        assert_eq!(param_shapes, shapes);
        let param_mut_shapes: Vec<_> = model
            .parameters_mut()
            .iter()
            .map(|p| (p.weights.shape(), p.bias.len()))
            .collect();
        assert_eq!(param_mut_shapes, shapes);
    }

    #[test]
    fn test_sequential_backward_before_forward() {
        let mut rng = Pcg64Mcg::seed_from_u64(5);
        let model = Sequential::mlp(3, 3, 2, &mut rng);
        assert!(matches!(
            model.backward(&Matrix::zeros(1, 2)),
            Err(NNError::BackwardBeforeForward {
                input_size: 3,
                output_size: 2
            })
        ));
    }
}
