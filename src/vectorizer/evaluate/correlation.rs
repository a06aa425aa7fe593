use ndarray::Zip;

use crate::utils::math::{Matrix, MatrixOps};

/// Tanimoto coefficient from a Gram entry and the two squared norms
///
/// d(a, b) = a·b / (|a|² + |b|² - a·b)
/// Two zero vectors give a zero denominator; that pair scores 0.
#[inline]
pub fn tanimoto(dot: f64, norm_sq_a: f64, norm_sq_b: f64) -> f64 {
    let denom = norm_sq_a + norm_sq_b - dot;
    if denom > 0.0 && denom.is_finite() {
        dot / denom
    } else {
        0.0
    }
}

/// Document x document similarity from a documents x terms score matrix
///
/// Symmetric by construction: both `(u, v)` and `(v, u)` are computed from
/// the upper-triangle Gram entry. The diagonal is always exactly 0.
pub fn correlate(scores: &Matrix) -> Matrix {
    let gram = scores.gram();
    let diag = gram.diag();
    let mut corr = Matrix::zeros(gram.raw_dim());
    Zip::indexed(&mut corr).par_for_each(|(u, v), c| {
        if u == v {
            return;
        }
        let (a, b) = if u < v { (u, v) } else { (v, u) };
        *c = tanimoto(gram[[a, b]], diag[a], diag[b]);
    });
    corr
}
