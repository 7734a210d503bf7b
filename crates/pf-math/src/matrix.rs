//! Dense linear algebra on top of `nalgebra`.

use nalgebra::{DMatrix, DVector};
use pf_core::{
    errors::{Error, Result},
    Real,
};

/// Dynamically sized column vector.
pub type Array = DVector<Real>;

/// Dynamically sized matrix.
pub type Matrix = DMatrix<Real>;

const SYMMETRY_TOLERANCE: Real = 1e-12;
const EIGEN_TOLERANCE: Real = 1e-12;

/// A matrix `L` with `L · Lᵀ = C` for a correlation matrix `C`.
///
/// Uses the Cholesky factor when `C` is positive definite and falls back to
/// the symmetric eigen square root for semi-definite input (perfectly
/// correlated factors). Anything that is not a valid correlation matrix is a
/// [`Error::Precondition`].
pub fn correlation_sqrt(corr: &Matrix) -> Result<Matrix> {
    let n = corr.nrows();
    if corr.ncols() != n {
        return Err(Error::Precondition(format!(
            "correlation matrix must be square, got {}x{}",
            n,
            corr.ncols()
        )));
    }
    for i in 0..n {
        if (corr[(i, i)] - 1.0).abs() > SYMMETRY_TOLERANCE {
            return Err(Error::Precondition(format!(
                "correlation matrix diagonal must be 1, got {} at {i}",
                corr[(i, i)]
            )));
        }
        for j in 0..i {
            let c = corr[(i, j)];
            if !(-1.0..=1.0).contains(&c) || (c - corr[(j, i)]).abs() > SYMMETRY_TOLERANCE {
                return Err(Error::Precondition(format!(
                    "invalid correlation {c} at ({i}, {j})"
                )));
            }
        }
    }

    if let Some(chol) = corr.clone().cholesky() {
        return Ok(chol.l());
    }

    let eigen = corr.clone().symmetric_eigen();
    if let Some(min) = eigen
        .eigenvalues
        .iter()
        .copied()
        .find(|&lambda| lambda < -EIGEN_TOLERANCE)
    {
        return Err(Error::Precondition(format!(
            "correlation matrix is not positive semi-definite (eigenvalue {min})"
        )));
    }
    let sqrt_values = eigen.eigenvalues.map(|lambda| lambda.max(0.0).sqrt());
    Ok(&eigen.eigenvectors * Matrix::from_diagonal(&sqrt_values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn reconstructs(corr: &Matrix) {
        let l = correlation_sqrt(corr).unwrap();
        let back = &l * l.transpose();
        for i in 0..corr.nrows() {
            for j in 0..corr.ncols() {
                assert_abs_diff_eq!(back[(i, j)], corr[(i, j)], epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn positive_definite_uses_cholesky() {
        let corr = Matrix::from_row_slice(3, 3, &[1.0, 0.3, -0.5, 0.3, 1.0, 0.2, -0.5, 0.2, 1.0]);
        let l = correlation_sqrt(&corr).unwrap();
        assert_eq!(l[(0, 1)], 0.0);
        assert_eq!(l[(0, 2)], 0.0);
        reconstructs(&corr);
    }

    #[test]
    fn perfectly_correlated_falls_back_to_eigen() {
        let corr = Matrix::from_row_slice(2, 2, &[1.0, 1.0, 1.0, 1.0]);
        reconstructs(&corr);
    }

    #[test]
    fn identity() {
        let l = correlation_sqrt(&Matrix::identity(3, 3)).unwrap();
        assert_eq!(l, Matrix::identity(3, 3));
    }

    #[test]
    fn rejects_incoherent_correlations() {
        // pairwise 0.9, 0.9 and -0.9 is not PSD
        let corr = Matrix::from_row_slice(3, 3, &[1.0, 0.9, 0.9, 0.9, 1.0, -0.9, 0.9, -0.9, 1.0]);
        assert!(matches!(correlation_sqrt(&corr), Err(Error::Precondition(_))));
    }

    #[test]
    fn rejects_bad_shape_and_entries() {
        assert!(correlation_sqrt(&Matrix::zeros(2, 3)).is_err());
        let corr = Matrix::from_row_slice(2, 2, &[1.0, 1.5, 1.5, 1.0]);
        assert!(correlation_sqrt(&corr).is_err());
        let corr = Matrix::from_row_slice(2, 2, &[2.0, 0.0, 0.0, 1.0]);
        assert!(correlation_sqrt(&corr).is_err());
    }
}
