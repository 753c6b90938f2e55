//! Batch driver
//!
//! Runs a [`BinaryLinalgKernel`] over every trailing 2-D slice of a pair of
//! input tensors. Shapes are validated and the output is allocated up front;
//! each element then writes only its own output slice, so elements can run
//! on the thread pool without synchronization. Failures are collected per
//! element and never stop sibling elements.

use crate::config::BatchConfig;
use crate::error::{Result, SolveError};
use crate::op::MatrixSolveOp;
use crate::parallel::{
    min_elements_per_task, parallel_map_indexed_owned, sequential_map_indexed_owned,
    should_run_parallel,
};
use crate::shape::{batch_count, split_batch_shape, validate_batch_shapes};
use crate::traits::{BinaryLinalgKernel, RealField};
use ndarray::{Array2, ArrayD, ArrayView2, ArrayViewD, ArrayViewMut2, Axis, IxDyn};
use std::time::Instant;

/// A batch element that failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementFailure {
    /// Flat index of the element over the leading dimensions
    pub index: usize,
    /// Why it failed
    pub error: SolveError,
}

/// Output of a batched run
///
/// Failed elements keep a zero-filled output slice and are listed in
/// [`failures`](Self::failures).
#[derive(Debug, Clone)]
pub struct BatchSolution<T: RealField> {
    output: ArrayD<T>,
    failures: Vec<ElementFailure>,
    len: usize,
}

impl<T: RealField> BatchSolution<T> {
    /// Full output tensor `[..., n, k]`
    pub fn output(&self) -> ArrayViewD<'_, T> {
        self.output.view()
    }

    /// Take the output tensor, ignoring failures
    pub fn into_output(self) -> ArrayD<T> {
        self.output
    }

    /// Number of batch elements
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the batch had no elements
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Elements that failed, in index order
    pub fn failures(&self) -> &[ElementFailure] {
        &self.failures
    }

    /// Whether every element succeeded
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of successfully solved elements
    pub fn num_solved(&self) -> usize {
        self.len - self.failures.len()
    }

    /// Solution of one element, or the error it failed with.
    ///
    /// # Panics
    ///
    /// If `index >= self.len()`.
    pub fn element(&self, index: usize) -> Result<ArrayView2<'_, T>> {
        if let Some(failure) = self.failures.iter().find(|f| f.index == index) {
            return Err(failure.error.clone());
        }
        let (_, [rows, cols]) = split_batch_shape(self.output.shape());
        let batch = self
            .output
            .view()
            .into_shape_with_order((self.len, rows, cols))
            .map_err(|e| SolveError::Layout(e.to_string()))?;
        Ok(batch.index_axis_move(Axis(0), index))
    }

    /// The output if every element succeeded, otherwise the first failure
    pub fn into_result(self) -> Result<ArrayD<T>> {
        match self.failures.into_iter().next() {
            Some(failure) => Err(failure.error),
            None => Ok(self.output),
        }
    }
}

/// Drives a kernel over a batch of matrices
#[derive(Debug, Clone, Default)]
pub struct BatchDriver {
    config: BatchConfig,
}

impl BatchDriver {
    /// Create a driver with the given configuration
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    /// Driver configuration
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Run `kernel` over every `(matrix, rhs)` pair.
    ///
    /// Structural errors shared by the whole batch (rank, leading dimensions,
    /// per-matrix shape) are returned before any element runs. Errors from
    /// individual elements are reported in the returned [`BatchSolution`].
    pub fn run<T, K>(
        &self,
        kernel: &K,
        matrix: ArrayViewD<'_, T>,
        rhs: ArrayViewD<'_, T>,
    ) -> Result<BatchSolution<T>>
    where
        T: RealField,
        K: BinaryLinalgKernel<T>,
    {
        let start = Instant::now();
        let name = kernel.name();

        let batch_dims = validate_batch_shapes(
            name,
            kernel.supports_batch_operation(),
            matrix.shape(),
            rhs.shape(),
        )?
        .to_vec();
        let (_, matrix_shape) = split_batch_shape(matrix.shape());
        let (_, rhs_shape) = split_batch_shape(rhs.shape());
        let out_matrix_shape = kernel.output_matrix_shape(&matrix_shape, &rhs_shape)?;
        let (out_rows, out_cols) = (out_matrix_shape[0], out_matrix_shape[1]);

        let units = batch_count(&batch_dims);
        let mut out_shape = batch_dims;
        out_shape.extend_from_slice(&out_matrix_shape);
        let mut output = ArrayD::<T>::zeros(IxDyn(&out_shape));

        let cost_per_unit = kernel.cost_per_unit(&matrix_shape, &rhs_shape);
        let parallel = should_run_parallel(&self.config, cost_per_unit, units);
        let min_len = min_elements_per_task(cost_per_unit, self.config.min_task_cost, units);

        log::debug!(
            "{}<{}>: {} systems of {:?} with rhs {:?}, cost/unit {}, {}",
            name,
            T::DTYPE,
            units,
            matrix_shape,
            rhs_shape,
            cost_per_unit,
            if parallel {
                format!("parallel (>= {} per task)", min_len)
            } else {
                "sequential".to_string()
            }
        );

        let results = {
            let matrix = matrix.as_standard_layout();
            let rhs = rhs.as_standard_layout();
            let matrices = matrix
                .view()
                .into_shape_with_order((units, matrix_shape[0], matrix_shape[1]))
                .map_err(|e| SolveError::Layout(e.to_string()))?;
            let rhss = rhs
                .view()
                .into_shape_with_order((units, rhs_shape[0], rhs_shape[1]))
                .map_err(|e| SolveError::Layout(e.to_string()))?;
            let mut outputs = output
                .view_mut()
                .into_shape_with_order((units, out_rows, out_cols))
                .map_err(|e| SolveError::Layout(e.to_string()))?;
            let out_views: Vec<ArrayViewMut2<'_, T>> = outputs.outer_iter_mut().collect();

            let compute = |i: usize, out: ArrayViewMut2<'_, T>| {
                kernel.compute_matrix(
                    matrices.index_axis(Axis(0), i),
                    rhss.index_axis(Axis(0), i),
                    out,
                )
            };

            if parallel {
                parallel_map_indexed_owned(out_views, min_len, &compute)
            } else {
                sequential_map_indexed_owned(out_views, &compute)
            }
        };

        let failures: Vec<ElementFailure> = results
            .into_iter()
            .enumerate()
            .filter_map(|(index, r)| r.err().map(|error| ElementFailure { index, error }))
            .collect();

        if self.config.verbosity > 0 {
            for failure in &failures {
                log::warn!("{} element {}: {}", name, failure.index, failure.error);
            }
            log::info!(
                "{}: solved {}/{} systems in {:.1}ms",
                name,
                units - failures.len(),
                units,
                start.elapsed().as_secs_f64() * 1000.0
            );
        }

        Ok(BatchSolution {
            output,
            failures,
            len: units,
        })
    }
}

/// Solve a single system `A·X = B`
pub fn matrix_solve<T: RealField>(
    matrix: ArrayView2<'_, T>,
    rhs: ArrayView2<'_, T>,
) -> Result<Array2<T>> {
    let kernel = MatrixSolveOp::<T, false>::new();
    let shape = kernel.output_matrix_shape(matrix.shape(), rhs.shape())?;
    let mut x = Array2::zeros((shape[0], shape[1]));
    kernel.compute_matrix(matrix, rhs, x.view_mut())?;
    Ok(x)
}

/// Solve every system of a batch `A: [..., n, n]`, `B: [..., n, k]`
pub fn batch_matrix_solve<T: RealField>(
    matrix: ArrayViewD<'_, T>,
    rhs: ArrayViewD<'_, T>,
    config: &BatchConfig,
) -> Result<BatchSolution<T>> {
    config.validate()?;
    BatchDriver::new(config.clone()).run(&MatrixSolveOp::<T, true>::new(), matrix, rhs)
}
