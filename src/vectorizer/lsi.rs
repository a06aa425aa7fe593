use ndarray::{s, Array2};
use tracing::debug;

use crate::error::{RelatedError, Result};
use crate::utils::math::{svd, Matrix, Svd};

/// Zero-based cutoff `floor(vocab_size * accuracy) - 1`
///
/// `degree + 1` singular components are kept by `reduce`.
pub fn latent_degree(vocab_size: usize, accuracy: f64) -> Result<usize> {
    if !accuracy.is_finite() || accuracy <= 0.0 || accuracy > 1.0 {
        return Err(RelatedError::InvalidAccuracy(accuracy));
    }
    let kept = (vocab_size as f64 * accuracy).floor() as usize;
    if kept == 0 {
        return Err(RelatedError::InvalidDegree {
            vocabulary: vocab_size,
            accuracy,
        });
    }
    Ok(kept - 1)
}

/// Rank-reduced reconstruction of a documents x terms TF-IDF matrix
///
/// Decomposes the terms x documents transpose, keeps the leading
/// `degree + 1` singular triplets (fewer when the matrix has fewer) and
/// transposes the product back. The output has the input's shape.
pub fn reduce(tfidf: &Matrix, accuracy: f64) -> Result<Matrix> {
    let degree = latent_degree(tfidf.ncols(), accuracy)?;
    let Svd { u, sigma, vt } = svd(tfidf.t())?;

    let kept = (degree + 1).min(sigma.len());
    debug!(
        terms = tfidf.ncols(),
        documents = tfidf.nrows(),
        degree,
        kept,
        "latent reduction"
    );

    let sigma_d = Array2::from_diag(&sigma.slice(s![..kept]));
    let approx = u
        .slice(s![.., ..kept])
        .dot(&sigma_d)
        .dot(&vt.slice(s![..kept, ..]));
    Ok(approx.reversed_axes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::math::MatrixOps;
    use ndarray::array;

    fn max_abs_diff(a: &Matrix, b: &Matrix) -> f64 {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y).abs())
            .fold(0.0, f64::max)
    }

    #[test]
    fn degree_from_accuracy() {
        assert_eq!(latent_degree(10, 1.0).unwrap(), 9);
        assert_eq!(latent_degree(10, 0.5).unwrap(), 4);
        assert_eq!(latent_degree(10, 0.19).unwrap(), 0);
    }

    #[test]
    fn degree_below_zero_is_rejected() {
        assert!(matches!(
            latent_degree(3, 0.2),
            Err(RelatedError::InvalidDegree { vocabulary: 3, .. })
        ));
        assert!(matches!(
            latent_degree(0, 1.0),
            Err(RelatedError::InvalidDegree { vocabulary: 0, .. })
        ));
        assert!(matches!(latent_degree(10, 0.0), Err(RelatedError::InvalidAccuracy(_))));
        assert!(matches!(latent_degree(10, 1.5), Err(RelatedError::InvalidAccuracy(_))));
    }

    #[test]
    fn full_accuracy_reproduces_input() {
        let tfidf = array![
            [0.0, 1.1, 0.4, 0.0],
            [0.7, 0.0, 0.4, 0.0],
            [0.0, 0.0, 0.0, 1.4]
        ];
        let out = reduce(&tfidf, 1.0).unwrap();
        assert_eq!(out.dim(), tfidf.dim());
        assert!(max_abs_diff(&out, &tfidf) < 1e-10);
    }

    #[test]
    fn reduction_lowers_rank_and_keeps_shape() {
        let tfidf = array![
            [1.0, 1.0, 0.0, 0.0],
            [1.0, 0.9, 0.0, 0.0],
            [0.0, 0.0, 1.0, 1.0]
        ];
        // 4 terms * 0.25 keeps a single component
        let out = reduce(&tfidf, 0.25).unwrap();
        assert_eq!(out.dim(), (3, 4));
        let sigma = out.svd().unwrap().sigma;
        assert!(sigma[1] < 1e-10 * sigma[0]);
        assert!(out.all_finite());
    }

    #[test]
    fn zero_matrix_fails_to_decompose() {
        let tfidf = Matrix::zeros((2, 3));
        assert!(matches!(reduce(&tfidf, 0.5), Err(RelatedError::Decomposition(_))));
    }
}
