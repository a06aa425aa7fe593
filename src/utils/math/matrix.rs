use ndarray::{parallel::prelude::*, Array1, Array2, Axis, Zip};

use crate::error::Result;
use crate::utils::math::svd::{svd, Svd};

/// dense documents x terms (or documents x documents) matrix
pub type Matrix = Array2<f64>;
/// dense per-term or per-document vector
pub type Vector = Array1<f64>;

/// The matrix operations the weighting, reduction and correlation stages need
///
/// Kept narrow so those stages never reach into the numeric backend directly.
pub trait MatrixOps {
    /// multiply every column `j` by `factors[j]`
    fn scale_columns(&mut self, factors: &Vector);
    /// divide every row `i` by `divisors[i]`; a zero (or non-finite) divisor zeroes the row
    fn div_rows_or_zero(&mut self, divisors: &Vector);
    /// number of rows with a positive value, per column
    fn column_occurrences(&self) -> Vec<usize>;
    /// `self · selfᵗ`
    fn gram(&self) -> Matrix;
    fn svd(&self) -> Result<Svd<f64>>;
    fn all_finite(&self) -> bool;
}

impl MatrixOps for Matrix {
    fn scale_columns(&mut self, factors: &Vector) {
        debug_assert_eq!(self.ncols(), factors.len(), "one factor per column");
        *self *= factors;
    }

    fn div_rows_or_zero(&mut self, divisors: &Vector) {
        debug_assert_eq!(self.nrows(), divisors.len(), "one divisor per row");
        Zip::from(self.rows_mut()).and(divisors).par_for_each(|mut row, &d| {
            if d != 0.0 && d.is_finite() {
                row.mapv_inplace(|x| x / d);
            } else {
                row.fill(0.0);
            }
        });
    }

    fn column_occurrences(&self) -> Vec<usize> {
        self.axis_iter(Axis(1))
            .into_par_iter()
            .map(|col| col.iter().filter(|v| **v > 0.0).count())
            .collect()
    }

    fn gram(&self) -> Matrix {
        self.dot(&self.t())
    }

    fn svd(&self) -> Result<Svd<f64>> {
        svd(self.view())
    }

    fn all_finite(&self) -> bool {
        self.iter().all(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn scale_columns_broadcasts_over_rows() {
        let mut m = array![[1.0, 2.0], [3.0, 4.0]];
        m.scale_columns(&array![10.0, 0.5]);
        assert_eq!(m, array![[10.0, 1.0], [30.0, 2.0]]);
    }

    #[test]
    fn div_rows_zeroes_degenerate_rows() {
        let mut m = array![[2.0, 4.0], [0.0, 0.0], [3.0, 6.0]];
        m.div_rows_or_zero(&array![2.0, 0.0, 3.0]);
        assert_eq!(m, array![[1.0, 2.0], [0.0, 0.0], [1.0, 2.0]]);
        assert!(m.all_finite());
    }

    #[test]
    fn column_occurrences_count_positive_rows() {
        let m = array![[0.0, 3.0, 1.0], [0.0, 0.0, 2.0]];
        assert_eq!(m.column_occurrences(), vec![0, 1, 2]);
    }

    #[test]
    fn gram_is_symmetric() {
        let m = array![[1.0, 2.0, 0.0], [0.0, 1.0, 3.0]];
        let g = m.gram();
        assert_eq!(g, array![[5.0, 2.0], [2.0, 10.0]]);
    }
}
