/*!
Gaussian densities and the folded Gaussian random-walk proposal used across the crate.

The proposal perturbs every coordinate of a parameter vector with independent
`Normal(0, std)` noise and takes the absolute value, so proposed parameters are never
negative. [`ProposalSimulation`] couples that proposal with a [`Simulator`] to form the
standard "simulation function" consumed by the rejection and importance samplers.

# Examples

```rust
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tabac::config::FoldCorrection;
use tabac::distributions::FoldedGaussian;

let proposal = FoldedGaussian::new(0.25, FoldCorrection::Ignore).unwrap();
let mut rng = SmallRng::seed_from_u64(42);
let candidate = proposal.sample(&[1.0, 0.0], &mut rng);
assert_eq!(candidate.len(), 2);
assert!(candidate.iter().all(|&t| t >= 0.0));
```
*/

use rand::rngs::SmallRng;
use rand::{thread_rng, Rng, SeedableRng};
use rand_distr::StandardNormal;
use std::f64::consts::PI;

use crate::config::FoldCorrection;
use crate::core::{ParameterDraw, Simulator, Trial};
use crate::error::{AbcError, Result};

/// Density of `Normal(mean, std)` at `x`.
pub fn normal_pdf(x: f64, mean: f64, std: f64) -> f64 {
    let var = std * std;
    let coeff = 1.0 / ((2.0 * PI * var).sqrt());
    coeff * (-((x - mean).powi(2)) / (2.0 * var)).exp()
}

/// Log-density of a Gaussian with covariance `diag(std^2, ..., std^2)`.
pub fn diag_gaussian_log_pdf(x: &[f64], mean: &[f64], std: f64) -> f64 {
    let d = x.len() as f64;
    let var = std * std;
    let quad: f64 = x
        .iter()
        .zip(mean)
        .map(|(&xi, &mi)| (xi - mi).powi(2) / var)
        .sum();
    -0.5 * (quad + d * (2.0 * PI * var).ln())
}

/**
Random-walk proposal `theta'_k = |theta_k + Normal(0, std)|`.

The `fold` setting selects which density [`FoldedGaussian::log_prob`] reports: the plain
Gaussian density (the folding is ignored), or the exact folded-normal density
`φ((t - f) / σ) / σ + φ((t + f) / σ) / σ` per coordinate.
*/
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoldedGaussian {
    pub std: f64,
    pub fold: FoldCorrection,
}

impl Default for FoldedGaussian {
    fn default() -> Self {
        Self {
            std: 0.25,
            fold: FoldCorrection::Ignore,
        }
    }
}

impl FoldedGaussian {
    pub fn new(std: f64, fold: FoldCorrection) -> Result<Self> {
        if !(std.is_finite() && std > 0.0) {
            return Err(AbcError::InvalidParameter(format!(
                "proposal std must be positive and finite, got {std}"
            )));
        }
        Ok(Self { std, fold })
    }

    /// Draws a candidate around `current`.
    pub fn sample<R: Rng + ?Sized>(&self, current: &[f64], rng: &mut R) -> Vec<f64> {
        current
            .iter()
            .map(|&t| {
                let eps: f64 = rng.sample(StandardNormal);
                (t + self.std * eps).abs()
            })
            .collect()
    }

    /// Evaluates log q(`to` | `from`).
    pub fn log_prob(&self, from: &[f64], to: &[f64]) -> f64 {
        match self.fold {
            FoldCorrection::Ignore => diag_gaussian_log_pdf(to, from, self.std),
            FoldCorrection::Exact => from
                .iter()
                .zip(to)
                .map(|(&f, &t)| (normal_pdf(t, f, self.std) + normal_pdf(t, -f, self.std)).ln())
                .sum(),
        }
    }
}

/**
A simulation function that proposes `theta` around a fixed anchor and simulates `n`
points from it.

Each [`ParameterDraw::draw`] call samples `theta_k = |Normal(anchor_k, std)|` and returns
`simulator.simulate(n, theta)`. Randomness for both steps comes from one internal
`SmallRng`, seeded with [`ProposalSimulation::set_seed`].

```rust
use tabac::core::ParameterDraw;
use tabac::distributions::ProposalSimulation;
use tabac::shapes::Sphere;

let mut sim = ProposalSimulation::new(Sphere::default(), 50, vec![1.0], 0.25)
    .unwrap()
    .set_seed(42);
let trial = sim.draw().unwrap();
assert_eq!(trial.theta.len(), 1);
assert_eq!(trial.sample.dim(), (50, 3));
```
*/
#[derive(Debug, Clone)]
pub struct ProposalSimulation<S> {
    pub simulator: S,
    /// Size of every simulated data set.
    pub n: usize,
    /// Centre of the proposal, typically the nominal parameter.
    pub anchor: Vec<f64>,
    pub proposal: FoldedGaussian,
    pub seed: u64,
    rng: SmallRng,
}

impl<S: Simulator> ProposalSimulation<S> {
    pub fn new(simulator: S, n: usize, anchor: Vec<f64>, std: f64) -> Result<Self> {
        let proposal = FoldedGaussian::new(std, FoldCorrection::Ignore)?;
        let seed = thread_rng().gen::<u64>();
        Ok(Self {
            simulator,
            n,
            anchor,
            proposal,
            seed,
            rng: SmallRng::seed_from_u64(seed),
        })
    }

    pub fn set_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }
}

impl<S: Simulator> ParameterDraw for ProposalSimulation<S> {
    type Observation = S::Observation;

    fn draw(&mut self) -> Result<Trial<S::Observation>> {
        let theta = self.proposal.sample(&self.anchor, &mut self.rng);
        let sample = self.simulator.simulate(self.n, &theta, &mut self.rng)?;
        Ok(Trial::new(theta, sample))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_normal_pdf() {
        assert_abs_diff_eq!(
            normal_pdf(1.0, 0.0, 1.0),
            0.24197072451914337,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            normal_pdf(0.0, 0.0, 0.25),
            1.5957691216057308,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_diag_log_pdf_matches_product_of_marginals() {
        let x = [0.42, 9.6, 1.0];
        let mean = [0.0, 9.0, 1.5];
        let std = 2.0;
        let expected: f64 = x
            .iter()
            .zip(&mean)
            .map(|(&xi, &mi)| normal_pdf(xi, mi, std).ln())
            .sum();
        assert_abs_diff_eq!(
            diag_gaussian_log_pdf(&x, &mean, std),
            expected,
            epsilon = 1e-10
        );
    }

    #[test]
    fn test_fold_correction_densities() {
        let plain = FoldedGaussian::new(0.25, FoldCorrection::Ignore).unwrap();
        let exact = FoldedGaussian::new(0.25, FoldCorrection::Exact).unwrap();

        // Far from zero the reflected mass is negligible.
        assert_abs_diff_eq!(
            plain.log_prob(&[5.0], &[5.1]),
            exact.log_prob(&[5.0], &[5.1]),
            epsilon = 1e-12
        );
        // At the origin the folded density is twice the Gaussian one.
        assert_abs_diff_eq!(
            exact.log_prob(&[0.0], &[0.1]),
            plain.log_prob(&[0.0], &[0.1]) + 2.0_f64.ln(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_invalid_std() {
        assert!(FoldedGaussian::new(0.0, FoldCorrection::Ignore).is_err());
        assert!(FoldedGaussian::new(f64::NAN, FoldCorrection::Ignore).is_err());
        assert!(FoldedGaussian::new(-1.0, FoldCorrection::Exact).is_err());
    }

    #[test]
    fn test_samples_non_negative() {
        let proposal = FoldedGaussian::new(1.0, FoldCorrection::Ignore).unwrap();
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..1_000 {
            let c = proposal.sample(&[0.0, 0.1], &mut rng);
            assert!(c.iter().all(|&t| t >= 0.0), "negative proposal {c:?}");
        }
    }

    #[test]
    fn test_proposal_simulation_is_seeded() {
        struct Echo;
        impl Simulator for Echo {
            type Observation = Vec<f64>;
            fn simulate<R: Rng + ?Sized>(
                &self,
                n: usize,
                theta: &[f64],
                rng: &mut R,
            ) -> Result<Vec<f64>> {
                Ok((0..n).map(|_| theta[0] + rng.gen::<f64>()).collect())
            }
        }

        let mut a = ProposalSimulation::new(Echo, 4, vec![2.0, 3.0], 0.25)
            .unwrap()
            .set_seed(11);
        let mut b = ProposalSimulation::new(Echo, 4, vec![2.0, 3.0], 0.25)
            .unwrap()
            .set_seed(11);
        let first = a.draw().unwrap();
        assert_eq!(first, b.draw().unwrap());
        assert_eq!(first.theta.len(), 2);
        assert_eq!(first.sample.len(), 4);
        // Successive draws advance the generator.
        assert_ne!(first, a.draw().unwrap());
    }
}
