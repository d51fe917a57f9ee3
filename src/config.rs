//! Tunables for the MCMC sampler and the importance-weighted point estimator.

use serde::{Deserialize, Serialize};

use crate::error::{AbcError, Result};

/// How the MCMC acceptance ratio accounts for the absolute value applied to proposals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoldCorrection {
    /// Evaluate the proposal density as if it were the unfolded Gaussian.
    #[default]
    Ignore,
    /// Evaluate the exact folded-normal proposal density.
    Exact,
}

/// Settings of the Metropolis random walk in [`crate::mcmc::McmcSampler`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McmcConfig {
    /// Inverse temperature of the exponential distance kernel.
    #[serde(default = "default_gamma")]
    pub gamma: f64,
    /// Per-dimension standard deviation of the Gaussian proposal.
    #[serde(default = "default_std")]
    pub proposal_std: f64,
    #[serde(default)]
    pub fold: FoldCorrection,
}

/// Kernel used by [`crate::stats::estimate_importance`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Inverse temperature of the exponential distance kernel.
    #[serde(default = "default_gamma")]
    pub gamma: f64,
    /// Standard deviation of the Gaussian kernel centred on the anchor.
    #[serde(default = "default_std")]
    pub std: f64,
    /// Constant factor applied to every weight. Cancels in the ratio.
    #[serde(default = "default_scale")]
    pub scale: f64,
}

fn default_gamma() -> f64 {
    10.0
}

fn default_std() -> f64 {
    0.25
}

fn default_scale() -> f64 {
    200.0
}

impl Default for McmcConfig {
    fn default() -> Self {
        Self {
            gamma: default_gamma(),
            proposal_std: default_std(),
            fold: FoldCorrection::default(),
        }
    }
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            gamma: default_gamma(),
            std: default_std(),
            scale: default_scale(),
        }
    }
}

/// Rejects a kernel inverse temperature that is negative or not finite.
pub(crate) fn check_gamma(gamma: f64) -> Result<f64> {
    if !(gamma.is_finite() && gamma >= 0.0) {
        return Err(AbcError::InvalidParameter(format!(
            "gamma must be finite and non-negative, got {gamma}"
        )));
    }
    Ok(gamma)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let mcmc = McmcConfig::default();
        assert_eq!(mcmc.gamma, 10.0);
        assert_eq!(mcmc.proposal_std, 0.25);
        assert_eq!(mcmc.fold, FoldCorrection::Ignore);

        let est = EstimatorConfig::default();
        assert_eq!((est.gamma, est.std, est.scale), (10.0, 0.25, 200.0));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg: McmcConfig = serde_json::from_str(r#"{"fold": "exact"}"#).unwrap();
        assert_eq!(cfg.fold, FoldCorrection::Exact);
        assert_eq!(cfg.gamma, 10.0);
        assert_eq!(cfg.proposal_std, 0.25);

        let est: EstimatorConfig = serde_json::from_str(r#"{"gamma": 2.5}"#).unwrap();
        assert_eq!(est.gamma, 2.5);
        assert_eq!(est.scale, 200.0);
    }

    #[test]
    fn test_check_gamma() {
        assert_eq!(check_gamma(0.0).unwrap(), 0.0);
        assert_eq!(check_gamma(10.0).unwrap(), 10.0);
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                check_gamma(bad),
                Err(AbcError::InvalidParameter(_))
            ));
        }
    }
}
