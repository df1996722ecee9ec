//! Classification datasets: images as a `(num_samples, feature_dim)` matrix with values in
//! [0, 1] and integer class labels
//!
//! Loading real data from disk is left to the caller; `Dataset::new` checks that whatever
//! the caller hands over honours that contract. `gen_blobs` produces seeded synthetic data
//! of the same shape for demos and tests.

use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal, NormalError};
use rand_pcg::Pcg64Mcg;
use thiserror::Error;

use crate::tensor::Matrix;

/// Errors for datasets
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DatasetError {
    #[error("Labels must have the same length as the data: {label_len} labels for {data_len} samples")]
    LabelLengthMismatch { label_len: usize, data_len: usize },
    #[error("Label {label} at row {row} is outside the {num_classes} valid classes")]
    LabelOutOfRange {
        row: usize,
        label: usize,
        num_classes: usize,
    },
    #[error("Pixel ({row}, {col}) = {value} is not in [0, 1]")]
    PixelOutOfRange { row: usize, col: usize, value: f32 },
    #[error("Noise level must be finite and non-negative, got {noise}")]
    InvalidNoise { noise: f32 },
    #[error("Invalid noise level: {0}")]
    Noise(#[from] NormalError),
    #[error("A dataset needs at least one class")]
    NoClasses,
}

/// Read-only images and labels for one split
#[derive(Debug, Clone)]
pub struct Dataset {
    images: Matrix,
    labels: Vec<usize>,
    num_classes: usize,
}

impl Dataset {
    pub fn new(images: Matrix, labels: Vec<usize>, num_classes: usize) -> Result<Self, DatasetError> {
        if num_classes == 0 {
            return Err(DatasetError::NoClasses);
        }
        if images.rows() != labels.len() {
            return Err(DatasetError::LabelLengthMismatch {
                label_len: labels.len(),
                data_len: images.rows(),
            });
        }
        if let Some((row, &label)) = labels.iter().enumerate().find(|(_, l)| **l >= num_classes) {
            return Err(DatasetError::LabelOutOfRange {
                row,
                label,
                num_classes,
            });
        }
        if let Some(idx) = images
            .as_slice()
            .iter()
            .position(|v| !(0.0..=1.0).contains(v))
        {
            return Err(DatasetError::PixelOutOfRange {
                row: idx / images.cols(),
                col: idx % images.cols(),
                value: images.as_slice()[idx],
            });
        }
        Ok(Self {
            images,
            labels,
            num_classes,
        })
    }

    pub fn images(&self) -> &Matrix {
        &self.images
    }

    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    pub fn feature_dim(&self) -> usize {
        self.images.cols()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// The first `n` samples (or all of them if there are fewer)
    pub fn take(&self, n: usize) -> Dataset {
        let n = n.min(self.len());
        Dataset {
            images: self.images.slice_rows(0..n).to_matrix(),
            labels: self.labels[..n].to_vec(),
            num_classes: self.num_classes,
        }
    }
}

/// Generates `num_samples` points around one random prototype per class
///
/// Every feature of a prototype is uniform in [0, 1); samples add Gaussian noise with
/// standard deviation `noise` and are clamped back into [0, 1]. Labels cycle through the
/// classes so every class is represented. With small noise the classes are linearly separable.
pub fn gen_blobs(
    num_samples: usize,
    feature_dim: usize,
    num_classes: usize,
    noise: f32,
    seed: u64,
) -> Result<Dataset, DatasetError> {
    if num_classes == 0 {
        return Err(DatasetError::NoClasses);
    }
    if !(noise >= 0.0 && noise.is_finite()) {
        return Err(DatasetError::InvalidNoise { noise });
    }
    let mut rng = Pcg64Mcg::seed_from_u64(seed);
    let normal = Normal::new(0.0, noise)?;
    let prototypes = Matrix::from_fn(num_classes, feature_dim, |_, _| rng.random::<f32>());

    let labels: Vec<usize> = (0..num_samples).map(|i| i % num_classes).collect();
    let images = Matrix::from_fn(num_samples, feature_dim, |r, c| {
        (prototypes.get(labels[r], c) + normal.sample(&mut rng)).clamp(0.0, 1.0)
    });

    Dataset::new(images, labels, num_classes)
}

/// Like [`gen_blobs`] but with a disjoint stream of samples drawn around the same
/// prototypes, for a held-out split
pub fn gen_blobs_split(
    train_samples: usize,
    test_samples: usize,
    feature_dim: usize,
    num_classes: usize,
    noise: f32,
    seed: u64,
) -> Result<(Dataset, Dataset), DatasetError> {
    let all = gen_blobs(
        train_samples + test_samples,
        feature_dim,
        num_classes,
        noise,
        seed,
    )?;
    let test = Dataset {
        images: all
            .images
            .slice_rows(train_samples..train_samples + test_samples)
            .to_matrix(),
        labels: all.labels[train_samples..].to_vec(),
        num_classes,
    };
    Ok((all.take(train_samples), test))
}
