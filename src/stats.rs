//! Point estimators over sampler output, and acceptance bookkeeping for the MCMC chain.

use ndarray::prelude::*;
use ndarray::Zip;

use crate::config::{check_gamma, EstimatorConfig};
use crate::core::AbcResult;
use crate::distributions::normal_pdf;
use crate::error::{AbcError, Result};

/// Counts of proposed and accepted moves in one MCMC run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChainStats {
    pub n_proposed: u64,
    pub n_accepted: u64,
}

impl ChainStats {
    pub fn record(&mut self, accepted: bool) {
        self.n_proposed += 1;
        if accepted {
            self.n_accepted += 1;
        }
    }

    /// Fraction of accepted proposals, `None` before any proposal.
    pub fn acceptance_rate(&self) -> Option<f64> {
        (self.n_proposed > 0).then(|| self.n_accepted as f64 / self.n_proposed as f64)
    }
}

/**
Kernel-weighted mean of the sampled parameters.

For every record and every parameter dimension `k`

```text
w_k = exp(-gamma * distance) * N(theta_k; anchor_k, std) * scale
estimate_k = sum(theta_k * w_k) / sum(w_k)
```

The anchor only centres the Gaussian kernel. Records with a NaN distance carry no
information and are skipped; an infinite distance gets zero weight for any `gamma`.

# Errors

- [`AbcError::EmptyResults`] for an empty slice.
- [`AbcError::DimensionMismatch`] if a theta differs in length from the anchor.
- [`AbcError::InvalidParameter`] for a negative or non-finite `gamma`, or a `std` or
  `scale` that is not positive and finite.
- [`AbcError::DegenerateWeights`] if the weights of some dimension sum to zero or
  overflow.

# Examples

```rust
use tabac::config::EstimatorConfig;
use tabac::core::AbcResult;
use tabac::stats::estimate_importance;

let results = vec![
    AbcResult::new(0.0, vec![1.0], ()),
    AbcResult::new(0.0, vec![3.0], ()),
];
let est = estimate_importance(&results, &[2.0], &EstimatorConfig::default()).unwrap();
assert!((est[0] - 2.0).abs() < 1e-12);
```
*/
pub fn estimate_importance<O>(
    results: &[AbcResult<O>],
    theta_anchor: &[f64],
    config: &EstimatorConfig,
) -> Result<Array1<f64>> {
    if results.is_empty() {
        return Err(AbcError::EmptyResults);
    }
    check_gamma(config.gamma)?;
    if !(config.scale.is_finite() && config.scale > 0.0) {
        return Err(AbcError::InvalidParameter(format!(
            "weight scale must be positive and finite, got {}",
            config.scale
        )));
    }
    if !(config.std.is_finite() && config.std > 0.0) {
        return Err(AbcError::InvalidParameter(format!(
            "kernel std must be positive and finite, got {}",
            config.std
        )));
    }

    let dim = theta_anchor.len();
    let anchor = ArrayView1::from(theta_anchor);
    let mut numerator = Array1::<f64>::zeros(dim);
    let mut denominator = Array1::<f64>::zeros(dim);

    for result in results {
        let theta = ArrayView1::from(result.theta());
        if theta.len() != dim {
            return Err(AbcError::DimensionMismatch {
                expected: dim,
                found: theta.len(),
            });
        }
        if result.distance().is_nan() {
            continue;
        }
        let kernel = if result.distance() == f64::INFINITY {
            0.0
        } else {
            (-config.gamma * result.distance()).exp() * config.scale
        };
        let weights = Zip::from(&theta)
            .and(&anchor)
            .map_collect(|&t, &a| kernel * normal_pdf(t, a, config.std));
        numerator += &(&theta * &weights);
        denominator += &weights;
    }

    if let Some(k) = denominator
        .iter()
        .position(|&w| !(w.is_finite() && w > 0.0))
    {
        return Err(AbcError::DegenerateWeights { dim: k });
    }
    Ok(numerator / denominator)
}

/// Unweighted mean of the theta trajectory, counting repeated chain states.
pub fn estimate_mcmc_mean<O>(results: &[AbcResult<O>]) -> Result<Array1<f64>> {
    let first = results.first().ok_or(AbcError::EmptyResults)?;
    let dim = first.theta().len();

    let mut thetas = Array2::<f64>::zeros((results.len(), dim));
    for (mut row, result) in thetas.rows_mut().into_iter().zip(results) {
        if result.theta().len() != dim {
            return Err(AbcError::DimensionMismatch {
                expected: dim,
                found: result.theta().len(),
            });
        }
        row.assign(&ArrayView1::from(result.theta()));
    }
    thetas.mean_axis(Axis(0)).ok_or(AbcError::EmptyResults)
}
