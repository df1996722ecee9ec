//! Batch generator

use thiserror::Error;

use crate::{datasets::Dataset, tensor::MatrixView};

/// Errors for the batch generator
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DataLoaderError {
    #[error("Labels must have the same length as the data: {label_len} labels for {data_len} samples")]
    LabelLengthMismatch { label_len: usize, data_len: usize },
    #[error("Batch size must be at least 1")]
    ZeroBatchSize,
}

/// Walks a dataset front to back in contiguous, non-overlapping mini-batches
///
/// Batches borrow from the dataset, nothing is copied. Order is the dataset order and is
/// never shuffled, so two passes over the same data always produce the same batches. The
/// cursor is never reset: build a fresh generator for every epoch.
#[derive(Debug)]
pub struct BatchGenerator<'a> {
    images: MatrixView<'a>,
    labels: &'a [usize],
    batch_size: usize,
    index: usize,
    num_batches: usize,
}

impl<'a> BatchGenerator<'a> {
    pub fn new(
        images: MatrixView<'a>,
        labels: &'a [usize],
        batch_size: usize,
    ) -> Result<Self, DataLoaderError> {
        if images.rows() != labels.len() {
            return Err(DataLoaderError::LabelLengthMismatch {
                label_len: labels.len(),
                data_len: images.rows(),
            });
        }
        if batch_size == 0 {
            return Err(DataLoaderError::ZeroBatchSize);
        }
        Ok(Self {
            images,
            labels,
            batch_size,
            index: 0,
            num_batches: labels.len().div_ceil(batch_size),
        })
    }

    pub fn from_dataset(dataset: &'a Dataset, batch_size: usize) -> Result<Self, DataLoaderError> {
        Self::new(dataset.images().view(), dataset.labels(), batch_size)
    }

    /// `ceil(num_samples / batch_size)`
    pub fn num_batches(&self) -> usize {
        self.num_batches
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Returns the batch at the cursor and advances it by `batch_size`
    ///
    /// The last batch of a pass may be short; once the data is exhausted the slices are empty.
    pub fn next_batch(&mut self) -> (MatrixView<'a>, &'a [usize]) {
        let start = self.index.min(self.labels.len());
        let end = self.index.saturating_add(self.batch_size).min(self.labels.len());
        self.index = self.index.saturating_add(self.batch_size);
        (self.images.slice_rows(start..end), &self.labels[start..end])
    }
}

impl<'a> Iterator for BatchGenerator<'a> {
    type Item = (MatrixView<'a>, &'a [usize]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.labels.len() {
            return None;
        }
        Some(self.next_batch())
    }
}
