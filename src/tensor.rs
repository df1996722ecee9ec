//! Dense row-major buffers of `f32` and the linear algebra the network needs
//!
//! `Matrix` owns its storage, `MatrixView` borrows a contiguous block of rows (used for
//! mini-batches so slicing a dataset never copies), and `Vector` holds biases and column sums.

use std::ops::Range;

use thiserror::Error;

/// Dimension mismatches between buffers
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("{op}: incompatible shapes {lhs:?} and {rhs:?}")]
    Incompatible {
        op: &'static str,
        lhs: (usize, usize),
        rhs: (usize, usize),
    },
    #[error("Buffer of length {len} cannot be viewed as shape {shape:?}")]
    BufferLength { len: usize, shape: (usize, usize) },
    #[error("{what}: expected {expected} entries, got {got}")]
    Count {
        what: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("{op}: received an empty batch")]
    Empty { op: &'static str },
}

/// Owned 2-D buffer, row-major, with a shape fixed at construction
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Wraps a row-major buffer, failing if its length does not match `rows * cols`
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f32>) -> Result<Self, ShapeError> {
        if data.len() != rows * cols {
            return Err(ShapeError::BufferLength {
                len: data.len(),
                shape: (rows, cols),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Builds a matrix by evaluating `f(row, col)` for every element
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> f32) -> Self {
        let data = (0..rows)
            .flat_map(|r| (0..cols).map(move |c| (r, c)))
            .map(|(r, c)| f(r, c))
            .collect();
        Self { rows, cols, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.data[row * self.cols + col] = value;
    }

    pub fn row(&self, row: usize) -> &[f32] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn view(&self) -> MatrixView<'_> {
        MatrixView {
            rows: self.rows,
            cols: self.cols,
            data: &self.data,
        }
    }

    /// Borrows rows `range`, clamped to the rows that exist
    pub fn slice_rows(&self, range: Range<usize>) -> MatrixView<'_> {
        self.view().slice_rows(range)
    }

    /// `self -= alpha * other`, in place
    pub fn scaled_sub_assign(&mut self, alpha: f32, other: &Matrix) -> Result<(), ShapeError> {
        if self.shape() != other.shape() {
            return Err(ShapeError::Incompatible {
                op: "scaled_sub_assign",
                lhs: self.shape(),
                rhs: other.shape(),
            });
        }
        axpy_neg(&mut self.data, alpha, &other.data);
        Ok(())
    }
}

/// Borrowed row-major window over a block of consecutive rows
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatrixView<'a> {
    rows: usize,
    cols: usize,
    data: &'a [f32],
}

impl<'a> MatrixView<'a> {
    pub fn new(rows: usize, cols: usize, data: &'a [f32]) -> Result<Self, ShapeError> {
        if data.len() != rows * cols {
            return Err(ShapeError::BufferLength {
                len: data.len(),
                shape: (rows, cols),
            });
        }
        Ok(Self { rows, cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn as_slice(&self) -> &'a [f32] {
        self.data
    }

    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.cols + col]
    }

    pub fn row(&self, row: usize) -> &'a [f32] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn slice_rows(&self, range: Range<usize>) -> MatrixView<'a> {
        let end = range.end.min(self.rows);
        let start = range.start.min(end);
        MatrixView {
            rows: end - start,
            cols: self.cols,
            data: &self.data[start * self.cols..end * self.cols],
        }
    }

    pub fn to_matrix(&self) -> Matrix {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.to_vec(),
        }
    }

    /// `self · other`, shapes `(m, k) · (k, n) -> (m, n)`
    pub fn matmul(&self, other: MatrixView<'_>) -> Result<Matrix, ShapeError> {
        if self.cols != other.rows {
            return Err(ShapeError::Incompatible {
                op: "matmul",
                lhs: self.shape(),
                rhs: other.shape(),
            });
        }
        let (m, n) = (self.rows, other.cols);
        let mut out = Matrix::zeros(m, n);
        // i-k-j order so the innermost loop walks both `other` and `out` contiguously
        for i in 0..m {
            let out_row = &mut out.data[i * n..(i + 1) * n];
            for (p, &a) in self.row(i).iter().enumerate() {
                for (o, &b) in out_row.iter_mut().zip(other.row(p)) {
                    *o += a * b;
                }
            }
        }
        Ok(out)
    }

    /// `selfᵗ · other`, shapes `(m, k)ᵗ · (m, n) -> (k, n)`
    pub fn t_matmul(&self, other: MatrixView<'_>) -> Result<Matrix, ShapeError> {
        if self.rows != other.rows {
            return Err(ShapeError::Incompatible {
                op: "t_matmul",
                lhs: self.shape(),
                rhs: other.shape(),
            });
        }
        let (k, n) = (self.cols, other.cols);
        let mut out = Matrix::zeros(k, n);
        for i in 0..self.rows {
            let b_row = other.row(i);
            for (p, &a) in self.row(i).iter().enumerate() {
                let out_row = &mut out.data[p * n..(p + 1) * n];
                for (o, &b) in out_row.iter_mut().zip(b_row) {
                    *o += a * b;
                }
            }
        }
        Ok(out)
    }

    /// `self · otherᵗ`, shapes `(m, k) · (n, k)ᵗ -> (m, n)`
    pub fn matmul_t(&self, other: MatrixView<'_>) -> Result<Matrix, ShapeError> {
        if self.cols != other.cols {
            return Err(ShapeError::Incompatible {
                op: "matmul_t",
                lhs: self.shape(),
                rhs: other.shape(),
            });
        }
        Ok(Matrix::from_fn(self.rows, other.rows, |i, j| {
            self.row(i)
                .iter()
                .zip(other.row(j))
                .map(|(a, b)| a * b)
                .sum()
        }))
    }

    /// Adds `bias` to every row
    pub fn add_row_vector(&self, bias: &Vector) -> Result<Matrix, ShapeError> {
        if bias.len() != self.cols {
            return Err(ShapeError::Incompatible {
                op: "add_row_vector",
                lhs: self.shape(),
                rhs: (1, bias.len()),
            });
        }
        Ok(Matrix::from_fn(self.rows, self.cols, |r, c| {
            self.get(r, c) + bias.as_slice()[c]
        }))
    }

    /// Applies `f` to every element
    pub fn map(&self, f: impl Fn(f32) -> f32) -> Matrix {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Combines two equally shaped matrices element by element
    pub fn zip_map(
        &self,
        other: MatrixView<'_>,
        f: impl Fn(f32, f32) -> f32,
    ) -> Result<Matrix, ShapeError> {
        if self.shape() != other.shape() {
            return Err(ShapeError::Incompatible {
                op: "zip_map",
                lhs: self.shape(),
                rhs: other.shape(),
            });
        }
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .zip(other.data)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        })
    }

    /// Sums over rows, giving one value per column
    pub fn column_sums(&self) -> Vector {
        let mut sums = vec![0.0; self.cols];
        for r in 0..self.rows {
            for (s, &v) in sums.iter_mut().zip(self.row(r)) {
                *s += v;
            }
        }
        Vector::from_vec(sums)
    }

    /// Column index of the largest value in every row, ties going to the lowest index
    pub fn argmax_rows(&self) -> Vec<usize> {
        (0..self.rows)
            .map(|r| {
                let mut best = 0;
                for (c, &v) in self.row(r).iter().enumerate() {
                    if v > self.row(r)[best] {
                        best = c;
                    }
                }
                best
            })
            .collect()
    }
}

/// Owned 1-D buffer
#[derive(Debug, Clone, PartialEq)]
pub struct Vector {
    data: Vec<f32>,
}

impl Vector {
    pub fn zeros(len: usize) -> Self {
        Self {
            data: vec![0.0; len],
        }
    }

    pub fn from_vec(data: Vec<f32>) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// `self -= alpha * other`, in place
    pub fn scaled_sub_assign(&mut self, alpha: f32, other: &Vector) -> Result<(), ShapeError> {
        if self.len() != other.len() {
            return Err(ShapeError::Incompatible {
                op: "scaled_sub_assign",
                lhs: (1, self.len()),
                rhs: (1, other.len()),
            });
        }
        axpy_neg(&mut self.data, alpha, &other.data);
        Ok(())
    }
}

fn axpy_neg(target: &mut [f32], alpha: f32, update: &[f32]) {
    for (t, &u) in target.iter_mut().zip(update) {
        *t -= alpha * u;
    }
}
