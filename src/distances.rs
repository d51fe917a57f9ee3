/*!
Reference distance functions between observations.

Incomparable inputs are handled per metric:

| Metric | Mismatched input |
|---|---|
| [`Hausdorff`] | different point dimension or an empty cloud: returns `NaN` |
| [`Mse`] | different shapes: [`AbcError::ShapeMismatch`] |
| [`MeanDistance`], [`StdDistance`] | any shapes are comparable; empty input gives `NaN` |

A `NaN` distance flows through the samplers as a non-informative record.
*/

use ndarray::prelude::*;
use ndarray::Zip;
use ndarray_stats::QuantileExt;

use crate::core::DistanceMetric;
use crate::error::{AbcError, Result};

/// Symmetric Hausdorff distance between two point clouds under the Euclidean metric.
///
/// Rows are points, columns are coordinates.
///
/// ```rust
/// use ndarray::array;
/// use tabac::core::DistanceMetric;
/// use tabac::distances::Hausdorff;
///
/// let a = array![[0.0, 0.0], [1.0, 0.0]];
/// let b = array![[0.0, 0.0], [4.0, 0.0]];
/// assert_eq!(Hausdorff.evaluate(&a, &b).unwrap(), 3.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Hausdorff;

impl DistanceMetric<Array2<f64>> for Hausdorff {
    fn evaluate(&self, a: &Array2<f64>, b: &Array2<f64>) -> Result<f64> {
        if a.ncols() != b.ncols() || a.nrows() == 0 || b.nrows() == 0 {
            return Ok(f64::NAN);
        }
        let mut pairwise = Array2::<f64>::zeros((a.nrows(), b.nrows()));
        Zip::from(pairwise.rows_mut())
            .and(a.rows())
            .for_each(|mut out, p| {
                for (d, q) in out.iter_mut().zip(b.rows()) {
                    *d = (&p - &q).mapv(|v| v * v).sum().sqrt();
                }
            });

        let a_to_b = *pairwise
            .map_axis(Axis(1), |row| *row.min_skipnan())
            .max_skipnan();
        let b_to_a = *pairwise
            .map_axis(Axis(0), |col| *col.min_skipnan())
            .max_skipnan();
        Ok(a_to_b.max(b_to_a))
    }
}

/// Mean squared elementwise difference. Both inputs must have the same shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mse;

impl<D: Dimension> DistanceMetric<Array<f64, D>> for Mse {
    fn evaluate(&self, a: &Array<f64, D>, b: &Array<f64, D>) -> Result<f64> {
        if a.shape() != b.shape() {
            return Err(AbcError::ShapeMismatch {
                left: a.shape().to_vec(),
                right: b.shape().to_vec(),
            });
        }
        Ok((a - b).mapv(|v| v * v).mean().unwrap_or(f64::NAN))
    }
}

/// Absolute difference of the means over all entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanDistance;

impl<D: Dimension> DistanceMetric<Array<f64, D>> for MeanDistance {
    fn evaluate(&self, a: &Array<f64, D>, b: &Array<f64, D>) -> Result<f64> {
        match (a.mean(), b.mean()) {
            (Some(ma), Some(mb)) => Ok((ma - mb).abs()),
            _ => Ok(f64::NAN),
        }
    }
}

/// Absolute difference of the population standard deviations over all entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDistance;

impl<D: Dimension> DistanceMetric<Array<f64, D>> for StdDistance {
    fn evaluate(&self, a: &Array<f64, D>, b: &Array<f64, D>) -> Result<f64> {
        if a.is_empty() || b.is_empty() {
            return Ok(f64::NAN);
        }
        Ok((a.std(0.0) - b.std(0.0)).abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_hausdorff_symmetric() {
        let a = array![[0.0, 0.0], [0.0, 1.0], [5.0, 5.0]];
        let b = array![[0.0, 0.5], [1.0, 1.0]];
        let ab = Hausdorff.evaluate(&a, &b).unwrap();
        let ba = Hausdorff.evaluate(&b, &a).unwrap();
        assert_eq!(ab, ba);
        // (5, 5) is farthest from its nearest neighbour (1, 1).
        assert_abs_diff_eq!(ab, 32.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_hausdorff_identical_is_zero() {
        let a = array![[0.3, 0.1, 2.0], [1.0, 1.0, 1.0]];
        assert_eq!(Hausdorff.evaluate(&a, &a).unwrap(), 0.0);
    }

    #[test]
    fn test_hausdorff_sentinel() {
        let a = array![[0.0, 0.0]];
        let b = array![[0.0, 0.0, 0.0]];
        assert!(Hausdorff.evaluate(&a, &b).unwrap().is_nan());
        let empty = Array2::<f64>::zeros((0, 2));
        assert!(Hausdorff.evaluate(&a, &empty).unwrap().is_nan());
    }

    #[test]
    fn test_mse() {
        let a = array![1.0, 2.0, 3.0, 4.0];
        let b = array![1.0, 0.0, 3.0, 6.0];
        assert_abs_diff_eq!(Mse.evaluate(&a, &b).unwrap(), 2.0);
        let c = array![1.0, 2.0];
        assert!(matches!(
            Mse.evaluate(&a, &c),
            Err(AbcError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_mean_and_std() {
        let a = array![[1.0, 3.0], [1.0, 3.0]];
        let b = array![[2.0, 2.0], [2.0, 2.0]];
        assert_abs_diff_eq!(MeanDistance.evaluate(&a, &b).unwrap(), 0.0);
        assert_abs_diff_eq!(StdDistance.evaluate(&a, &b).unwrap(), 1.0);
        let empty = Array2::<f64>::zeros((0, 2));
        assert!(StdDistance.evaluate(&a, &empty).unwrap().is_nan());
        assert!(MeanDistance.evaluate(&empty, &b).unwrap().is_nan());
    }
}
