//! LU decomposition with partial pivoting
//!
//! Factorizes a dense square matrix as `P·A = L·U` and solves against any
//! number of right-hand sides. Invertibility is judged only by an exact zero
//! pivot; near-singular matrices factorize and solve without complaint.

use crate::error::{Result, SolveError};
use crate::shape::validate_output_shape;
use crate::traits::RealField;
use ndarray::{Array2, ArrayView2, ArrayViewMut2};

/// LU factorization result
///
/// Owned scratch for one solve. `L` is unit lower triangular and stored below
/// the diagonal, `U` is stored on and above it.
#[derive(Debug, Clone)]
pub struct LuFactorization<T: RealField> {
    /// Combined L and U factors
    lu: Array2<T>,
    /// Row `i` of `P·A` is row `permutation[i]` of `A`
    permutation: Vec<usize>,
    /// Matrix dimension
    n: usize,
}

impl<T: RealField> LuFactorization<T> {
    /// Factorize a square matrix.
    ///
    /// At each step the remaining row with the largest magnitude in the pivot
    /// column is swapped into place (the first one on ties). A column that is
    /// exactly zero below the diagonal is skipped, leaving a zero pivot.
    pub fn factorize(matrix: ArrayView2<'_, T>) -> Result<Self> {
        let (rows, cols) = matrix.dim();
        if rows != cols {
            return Err(SolveError::NotSquare { rows, cols });
        }

        let n = rows;
        let mut lu = matrix.to_owned();
        let mut permutation: Vec<usize> = (0..n).collect();

        for k in 0..n {
            // Find pivot
            let mut max_val = lu[[k, k]].abs();
            let mut max_row = k;
            for i in (k + 1)..n {
                let val = lu[[i, k]].abs();
                if val > max_val {
                    max_val = val;
                    max_row = i;
                }
            }

            if max_row != k {
                for j in 0..n {
                    lu.swap([k, j], [max_row, j]);
                }
                permutation.swap(k, max_row);
            }

            if max_val == T::zero() {
                continue;
            }

            // Compute multipliers and eliminate
            let pivot = lu[[k, k]];
            for i in (k + 1)..n {
                let mult = lu[[i, k]] / pivot;
                lu[[i, k]] = mult;
                if mult == T::zero() {
                    continue;
                }
                for j in (k + 1)..n {
                    let update = mult * lu[[k, j]];
                    lu[[i, j]] -= update;
                }
            }
        }

        Ok(Self {
            lu,
            permutation,
            n,
        })
    }

    /// Matrix dimension
    pub fn dim(&self) -> usize {
        self.n
    }

    /// Row permutation applied during pivoting
    pub fn permutation(&self) -> &[usize] {
        &self.permutation
    }

    /// Packed `L\U` factors
    pub fn factors(&self) -> ArrayView2<'_, T> {
        self.lu.view()
    }

    /// Smallest absolute value on the diagonal of `U`.
    ///
    /// Infinity for an empty matrix, NaN if any pivot is NaN.
    pub fn min_abs_pivot(&self) -> T {
        self.lu.diag().iter().fold(T::infinity(), |acc, &u| {
            let mag = u.abs();
            if mag.is_nan() || mag < acc { mag } else { acc }
        })
    }

    /// Whether every pivot is nonzero and not NaN
    pub fn is_invertible(&self) -> bool {
        self.min_abs_pivot() > T::zero()
    }

    /// Solve `A·X = B` into `output`.
    ///
    /// Fails with [`SolveError::NotInvertible`] before touching `output` when a
    /// pivot is exactly zero, and with [`SolveError::OutputShapeMismatch`] when
    /// `output` is not `n x k`.
    pub fn solve_into(
        &self,
        rhs: ArrayView2<'_, T>,
        mut output: ArrayViewMut2<'_, T>,
    ) -> Result<()> {
        let n = self.n;
        let (rhs_rows, k) = rhs.dim();
        if rhs_rows != n {
            return Err(SolveError::IncompatibleDimensions {
                matrix_rows: n,
                rhs_rows,
            });
        }
        validate_output_shape([n, k], output.shape())?;

        if !self.is_invertible() {
            return Err(SolveError::NotInvertible);
        }

        // Apply row permutation: output = P·B
        for (i, &src) in self.permutation.iter().enumerate() {
            output.row_mut(i).assign(&rhs.row(src));
        }

        for col in 0..k {
            // Forward substitution: L·y = P·b
            for i in 0..n {
                let mut sum = output[[i, col]];
                for j in 0..i {
                    sum -= self.lu[[i, j]] * output[[j, col]];
                }
                output[[i, col]] = sum;
            }

            // Backward substitution: U·x = y
            for i in (0..n).rev() {
                let mut sum = output[[i, col]];
                for j in (i + 1)..n {
                    sum -= self.lu[[i, j]] * output[[j, col]];
                }
                output[[i, col]] = sum / self.lu[[i, i]];
            }
        }

        Ok(())
    }

    /// Solve `A·X = B`, allocating the solution
    pub fn solve(&self, rhs: ArrayView2<'_, T>) -> Result<Array2<T>> {
        let mut x = Array2::zeros((self.n, rhs.ncols()));
        self.solve_into(rhs, x.view_mut())?;
        Ok(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{Array1, array};

    #[test]
    fn test_lu_solve_real() {
        let a = array![[4.0_f64, 1.0], [1.0, 3.0]];
        let b = array![[1.0_f64], [2.0]];

        let lu = LuFactorization::factorize(a.view()).expect("factorization should succeed");
        let x = lu.solve(b.view()).expect("solve should succeed");

        // Verify: Ax = b
        let ax = a.dot(&x);
        for i in 0..2 {
            assert_relative_eq!(ax[[i, 0]], b[[i, 0]], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_lu_identity() {
        let n = 5;
        let a = Array2::from_diag(&Array1::from_elem(n, 1.0_f64));
        let b = Array2::from_shape_fn((n, 2), |(i, j)| (i * 2 + j) as f64);

        let x = LuFactorization::factorize(a.view())
            .unwrap()
            .solve(b.view())
            .unwrap();
        assert_eq!(x, b);
    }

    #[test]
    fn test_partial_pivoting_picks_largest() {
        let a = array![[1.0_f64, 2.0, 0.0], [-5.0, 1.0, 1.0], [3.0, 0.0, 4.0]];
        let lu = LuFactorization::factorize(a.view()).unwrap();
        assert_eq!(lu.permutation()[0], 1);

        // Multipliers are bounded by one in magnitude
        let f = lu.factors();
        for i in 0..3 {
            for j in 0..i {
                assert!(f[[i, j]].abs() <= 1.0);
            }
        }
    }

    #[test]
    fn test_factors_reconstruct_permuted_matrix() {
        let a = array![[2.0_f64, 1.0, 1.0], [4.0, -6.0, 0.0], [-2.0, 7.0, 2.0]];
        let lu = LuFactorization::factorize(a.view()).unwrap();
        let f = lu.factors();
        let n = lu.dim();

        let l = Array2::from_shape_fn((n, n), |(i, j)| match i.cmp(&j) {
            std::cmp::Ordering::Greater => f[[i, j]],
            std::cmp::Ordering::Equal => 1.0,
            std::cmp::Ordering::Less => 0.0,
        });
        let u = Array2::from_shape_fn((n, n), |(i, j)| if i <= j { f[[i, j]] } else { 0.0 });
        let lu_product = l.dot(&u);

        for (i, &src) in lu.permutation().iter().enumerate() {
            for j in 0..n {
                assert_relative_eq!(lu_product[[i, j]], a[[src, j]], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_lu_singular() {
        let a = array![[1.0_f64, 2.0], [2.0, 4.0]]; // Singular matrix
        let b = array![[1.0_f64], [2.0]];

        let lu = LuFactorization::factorize(a.view()).unwrap();
        assert!(!lu.is_invertible());
        assert_eq!(lu.min_abs_pivot(), 0.0);
        assert_eq!(lu.solve(b.view()), Err(SolveError::NotInvertible));
    }

    #[test]
    fn test_nan_pivot_is_not_invertible() {
        let a = array![[f64::NAN, 0.0], [0.0, 0.0]];
        let b = array![[1.0_f64], [1.0]];
        let lu = LuFactorization::factorize(a.view()).unwrap();
        assert!(lu.min_abs_pivot().is_nan());
        assert!(!lu.is_invertible());
        assert_eq!(lu.solve(b.view()), Err(SolveError::NotInvertible));

        // A single NaN among finite pivots is enough
        let a = array![[2.0_f64, 0.0], [0.0, f64::NAN]];
        let lu = LuFactorization::factorize(a.view()).unwrap();
        assert!(!lu.is_invertible());

        let a = Array2::from_elem((3, 3), f64::NAN);
        let b = Array2::<f64>::ones((3, 1));
        let lu = LuFactorization::factorize(a.view()).unwrap();
        assert_eq!(lu.solve(b.view()), Err(SolveError::NotInvertible));
    }

    #[test]
    fn test_wrong_output_shape_is_an_error() {
        let a = array![[1.0_f64, 0.0], [0.0, 1.0]];
        let b = array![[1.0_f64], [2.0]];
        let mut out = Array2::<f64>::zeros((2, 2));
        let lu = LuFactorization::factorize(a.view()).unwrap();
        let err = lu.solve_into(b.view(), out.view_mut()).unwrap_err();
        assert!(matches!(err, SolveError::OutputShapeMismatch { .. }));
        assert!(out.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_zero_column_keeps_factorizing() {
        let a = array![[0.0_f64, 1.0, 2.0], [0.0, 3.0, 4.0], [0.0, 5.0, 7.0]];
        let lu = LuFactorization::factorize(a.view()).unwrap();
        assert_eq!(lu.min_abs_pivot(), 0.0);
        assert!(lu.factors().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_singular_leaves_output_untouched() {
        let a = array![[0.0_f32, 0.0], [0.0, 0.0]];
        let b = array![[1.0_f32], [1.0]];
        let mut out = Array2::from_elem((2, 1), -7.0_f32);

        let lu = LuFactorization::factorize(a.view()).unwrap();
        assert!(lu.solve_into(b.view(), out.view_mut()).is_err());
        assert!(out.iter().all(|&v| v == -7.0));
    }

    #[test]
    fn test_tiny_pivot_is_not_an_error() {
        let a = array![[1e-300_f64, 0.0], [0.0, 1.0]];
        let b = array![[1.0_f64], [1.0]];
        let lu = LuFactorization::factorize(a.view()).unwrap();
        assert!(lu.is_invertible());
        let x = lu.solve(b.view()).unwrap();
        assert_relative_eq!(x[[0, 0]], 1e300, max_relative = 1e-12);
    }

    #[test]
    fn test_factorize_and_solve_multiple_rhs() {
        let a = array![[4.0_f64, 1.0, 0.0], [1.0, 3.0, 1.0], [0.0, 1.0, 2.0]];
        let lu = LuFactorization::factorize(a.view()).expect("factorization should succeed");

        let b = array![[1.0_f64, 4.0], [2.0, 5.0], [3.0, 6.0]];
        let x = lu.solve(b.view()).expect("solve should succeed");

        let ax = a.dot(&x);
        for i in 0..3 {
            for j in 0..2 {
                assert_relative_eq!(ax[[i, j]], b[[i, j]], epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_not_square() {
        let a = Array2::<f64>::zeros((2, 3));
        let err = LuFactorization::factorize(a.view()).unwrap_err();
        assert_eq!(err, SolveError::NotSquare { rows: 2, cols: 3 });
    }

    #[test]
    fn test_rhs_row_mismatch() {
        let a = array![[1.0_f64, 0.0], [0.0, 1.0]];
        let b = Array2::<f64>::zeros((3, 1));
        let lu = LuFactorization::factorize(a.view()).unwrap();
        assert!(matches!(
            lu.solve(b.view()),
            Err(SolveError::IncompatibleDimensions { .. })
        ));
    }
}
