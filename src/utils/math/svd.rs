use std::cmp::Ordering;

use ndarray::{s, Array1, Array2, ArrayView2, Zip};
use num::{Float, NumCast};

use crate::error::{RelatedError, Result};

/// sweeps over all column pairs before giving up
const MAX_SWEEPS: usize = 64;

/// Thin singular value decomposition `A = U · diag(sigma) · Vt`
///
/// For an `m x n` input with `r = min(m, n)`:
/// - `u` is `m x r`
/// - `sigma` has `r` values, sorted descending
/// - `vt` is `r x n`
#[derive(Debug, Clone)]
pub struct Svd<N> {
    pub u: Array2<N>,
    pub sigma: Array1<N>,
    pub vt: Array2<N>,
}

impl<N> Svd<N>
where
    N: Float + 'static,
{
    /// number of singular values above the numerical noise floor
    pub fn numerical_rank(&self) -> usize {
        let largest = self.sigma.iter().copied().fold(N::zero(), N::max);
        if largest <= N::zero() {
            return 0;
        }
        let dims = <N as NumCast>::from(self.u.nrows().max(self.vt.ncols())).unwrap_or_else(N::one);
        let tol = largest * dims * N::epsilon();
        self.sigma.iter().filter(|v| **v > tol).count()
    }
}

/// One-sided Jacobi SVD
///
/// Works on the columns of the taller orientation so the rotated basis is
/// always the short side. Fails on an empty or all-zero input and when the
/// rotations do not settle within `MAX_SWEEPS`.
pub fn svd<N>(a: ArrayView2<'_, N>) -> Result<Svd<N>>
where
    N: Float + 'static,
{
    let (m, n) = a.dim();
    if m == 0 || n == 0 {
        return Err(RelatedError::Decomposition(format!(
            "cannot decompose an empty {m}x{n} matrix"
        )));
    }
    if a.iter().any(|v| !v.is_finite()) {
        return Err(RelatedError::Decomposition(
            "matrix contains non-finite values".to_string(),
        ));
    }

    let result = if m >= n {
        jacobi(a.to_owned())?
    } else {
        // A^t = U' S V'^t  =>  A = V' S U'^t
        let Svd { u, sigma, vt } = jacobi(a.t().to_owned())?;
        Svd {
            u: vt.t().to_owned(),
            sigma,
            vt: u.t().to_owned(),
        }
    };

    if result.numerical_rank() == 0 {
        return Err(RelatedError::Decomposition(format!(
            "cannot decompose a zero-rank {m}x{n} matrix"
        )));
    }
    Ok(result)
}

/// Hestenes rotation on a matrix with at least as many rows as columns
fn jacobi<N>(mut w: Array2<N>) -> Result<Svd<N>>
where
    N: Float + 'static,
{
    let n = w.ncols();
    let mut v: Array2<N> = Array2::eye(n);
    let two = N::one() + N::one();
    // orthogonality tolerance relative to the column norms
    let tol = N::epsilon() * <N as NumCast>::from(w.nrows()).unwrap_or_else(N::one);
    let floor = N::min_positive_value();

    let mut converged = n < 2;
    for _ in 0..MAX_SWEEPS {
        if converged {
            break;
        }
        let mut rotated = false;
        for p in 0..n - 1 {
            for q in p + 1..n {
                let (alpha, beta, gamma) = {
                    let cp = w.column(p);
                    let cq = w.column(q);
                    let mut alpha = N::zero();
                    let mut beta = N::zero();
                    let mut gamma = N::zero();
                    Zip::from(&cp).and(&cq).for_each(|&x, &y| {
                        alpha = alpha + x * x;
                        beta = beta + y * y;
                        gamma = gamma + x * y;
                    });
                    (alpha, beta, gamma)
                };
                if alpha < floor || beta < floor || gamma.abs() <= tol * (alpha * beta).sqrt() {
                    continue;
                }
                rotated = true;

                let zeta = (beta - alpha) / (two * gamma);
                let sign = if zeta < N::zero() { -N::one() } else { N::one() };
                let t = sign / (zeta.abs() + (N::one() + zeta * zeta).sqrt());
                let c = N::one() / (N::one() + t * t).sqrt();
                let sn = c * t;

                rotate(&mut w, p, q, c, sn);
                rotate(&mut v, p, q, c, sn);
            }
        }
        converged = !rotated;
    }
    if !converged {
        return Err(RelatedError::Decomposition(format!(
            "Jacobi rotations did not converge after {MAX_SWEEPS} sweeps"
        )));
    }

    // column norms are the singular values
    let norms: Vec<N> = w
        .columns()
        .into_iter()
        .map(|col| col.iter().fold(N::zero(), |acc, x| acc + *x * *x).sqrt())
        .collect();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| norms[j].partial_cmp(&norms[i]).unwrap_or(Ordering::Equal).then(i.cmp(&j)));

    let m = w.nrows();
    let mut u = Array2::<N>::zeros((m, n));
    let mut vt = Array2::<N>::zeros((n, n));
    let mut sigma = Array1::<N>::zeros(n);
    for (dst, &src) in order.iter().enumerate() {
        let norm = norms[src];
        sigma[dst] = norm;
        if norm > N::zero() {
            let scaled = w.column(src).mapv(|x| x / norm);
            u.column_mut(dst).assign(&scaled);
        }
        vt.row_mut(dst).assign(&v.column(src));
    }

    Ok(Svd { u, sigma, vt })
}

/// apply the plane rotation (c, s) to columns p and q
#[inline]
fn rotate<N>(mat: &mut Array2<N>, p: usize, q: usize, c: N, sn: N)
where
    N: Float + 'static,
{
    let (mut cp, mut cq) = mat.multi_slice_mut((s![.., p], s![.., q]));
    Zip::from(&mut cp).and(&mut cq).for_each(|x, y| {
        let xp = *x;
        let xq = *y;
        *x = c * xp - sn * xq;
        *y = sn * xp + c * xq;
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    fn reconstruct(svd: &Svd<f64>) -> Array2<f64> {
        let sigma = Array2::from_diag(&svd.sigma);
        svd.u.dot(&sigma).dot(&svd.vt)
    }

    fn assert_close(a: &Array2<f64>, b: &Array2<f64>, tol: f64) {
        assert_eq!(a.dim(), b.dim());
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < tol, "{x} != {y}\n{a:?}\n{b:?}");
        }
    }

    #[test]
    fn reconstructs_tall_matrix() {
        let a = array![[3.0, 1.0], [1.0, 3.0], [0.0, 2.0]];
        let svd = svd(a.view()).unwrap();
        assert_eq!(svd.u.dim(), (3, 2));
        assert_eq!(svd.vt.dim(), (2, 2));
        assert_close(&reconstruct(&svd), &a, 1e-10);
    }

    #[test]
    fn reconstructs_wide_matrix() {
        let a = array![[1.0, 0.0, 2.0, 0.5], [0.0, 1.5, 0.0, 1.0]];
        let svd = svd(a.view()).unwrap();
        assert_eq!(svd.u.dim(), (2, 2));
        assert_eq!(svd.sigma.len(), 2);
        assert_eq!(svd.vt.dim(), (2, 4));
        assert_close(&reconstruct(&svd), &a, 1e-10);
    }

    #[test]
    fn singular_values_sorted_descending() {
        let a = array![[1.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 3.0]];
        let svd = svd(a.view()).unwrap();
        let sigma: Vec<f64> = svd.sigma.to_vec();
        assert!((sigma[0] - 5.0).abs() < 1e-12);
        assert!((sigma[1] - 3.0).abs() < 1e-12);
        assert!((sigma[2] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn known_singular_values() {
        // eigenvalues of A^t A are 16 and 4
        let a = array![[3.0, 1.0], [1.0, 3.0]];
        let svd = svd(a.view()).unwrap();
        assert!((svd.sigma[0] - 4.0).abs() < 1e-12);
        assert!((svd.sigma[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn rank_deficient_input_reports_rank() {
        let a = array![[1.0, 2.0], [2.0, 4.0], [3.0, 6.0]];
        let svd = svd(a.view()).unwrap();
        assert!(svd.sigma[1] < 1e-12 * svd.sigma[0]);
        assert_close(&reconstruct(&svd), &a, 1e-10);
    }

    #[test]
    fn works_in_f32() {
        let a = array![[2.0_f32, 0.0], [0.0, 1.0]];
        let svd = svd(a.view()).unwrap();
        assert!((svd.sigma[0] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn empty_matrix_is_an_error() {
        let a = Array2::<f64>::zeros((0, 3));
        assert!(matches!(svd(a.view()), Err(RelatedError::Decomposition(_))));
    }

    #[test]
    fn zero_matrix_is_an_error() {
        let a = Array2::<f64>::zeros((3, 2));
        assert!(matches!(svd(a.view()), Err(RelatedError::Decomposition(_))));
    }

    #[test]
    fn nan_is_an_error() {
        let a = array![[1.0, f64::NAN], [0.0, 1.0]];
        assert!(matches!(svd(a.view()), Err(RelatedError::Decomposition(_))));
    }
}
