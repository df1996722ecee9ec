//! A minimal library for training small feedforward networks with
//! hand-written backpropagation and plain SGD.

pub mod activation;
pub mod dataloader;
pub mod datasets;
pub mod loss;
pub mod nn;
pub mod optim;
pub mod tensor;
pub mod train;
