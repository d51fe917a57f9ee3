/*!
# ABC Metropolis sampler

A single Markov chain over parameter vectors. Each step

1. proposes `theta'_k = |Normal(theta_k, std)|` for every dimension,
2. simulates a candidate data set of size `n` from `theta'`,
3. weighs both states with `w(theta, x) = exp(-gamma * d(x, y))` times the proposal
   density of the reverse move, and
4. moves to the candidate iff `w(candidate) / w(current) > U`, `U ~ Uniform(0, 1)`.

The ratio is evaluated in log space. A NaN distance counts as zero weight: a NaN
candidate is never accepted, and a chain sitting on a NaN state leaves it for any
comparable candidate.

The sampler owns one `SmallRng` that drives proposals, simulations and acceptance draws.
It is seeded once (see [`McmcSampler::set_seed`]) and only ever advanced.

```rust
use tabac::core::Simulator;
use tabac::distances::Hausdorff;
use tabac::mcmc::McmcSampler;
use tabac::shapes::Sphere;
use rand::rngs::SmallRng;
use rand::SeedableRng;

let sphere = Sphere::default();
let mut rng = SmallRng::seed_from_u64(42);
let y = sphere.simulate(50, &[1.0], &mut rng).unwrap();
let x0 = sphere.simulate(50, &[1.2], &mut rng).unwrap();

let mut mcmc = McmcSampler::new(y, sphere, Hausdorff, 50).set_seed(42);
let results = mcmc.run(10, vec![1.2], x0).unwrap();
assert_eq!(results.len(), 10);
assert_eq!(results[0].theta(), &[1.2]);
```
*/

use rand::rngs::SmallRng;
use rand::{thread_rng, Rng, SeedableRng};

use crate::config::{check_gamma, McmcConfig};
use crate::core::{phase_bar, AbcResult, DistanceMetric, Simulator};
use crate::distributions::FoldedGaussian;
use crate::error::Result;
use crate::stats::ChainStats;

/// Position of the chain: a parameter vector, the data simulated from it, and that
/// data's distance to the observations.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainState<O> {
    pub theta: Vec<f64>,
    pub sample: O,
    pub distance: f64,
}

pub struct McmcSampler<S: Simulator, M> {
    /// The observed data set.
    pub y: S::Observation,
    pub simulator: S,
    pub distance: M,
    /// Size of every simulated data set.
    pub n: usize,
    pub config: McmcConfig,
    pub seed: u64,
    proposal: FoldedGaussian,
    rng: SmallRng,
    stats: ChainStats,
}

impl<S, M> McmcSampler<S, M>
where
    S: Simulator,
    S::Observation: Clone,
    M: DistanceMetric<S::Observation>,
{
    /// Creates a sampler with the default [`McmcConfig`] and a random seed.
    pub fn new(y: S::Observation, simulator: S, distance: M, n: usize) -> Self {
        let config = McmcConfig::default();
        let proposal = FoldedGaussian {
            std: config.proposal_std,
            fold: config.fold,
        };
        let seed = thread_rng().gen::<u64>();
        Self {
            y,
            simulator,
            distance,
            n,
            config,
            seed,
            proposal,
            rng: SmallRng::seed_from_u64(seed),
            stats: ChainStats::default(),
        }
    }

    /// Replaces the configuration. Fails if the proposal std is not positive or `gamma`
    /// is negative or not finite.
    pub fn with_config(mut self, config: McmcConfig) -> Result<Self> {
        check_gamma(config.gamma)?;
        self.proposal = FoldedGaussian::new(config.proposal_std, config.fold)?;
        self.config = config;
        Ok(self)
    }

    pub fn set_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    /// Acceptance counts of the most recent run.
    pub fn stats(&self) -> &ChainStats {
        &self.stats
    }

    /// Runs the chain for `n_samples` steps starting at `(theta_0, sample_0)`.
    ///
    /// Every step records the state *before* its transition, so the first record is the
    /// seed state and rejected moves show up as repeats. Distances in the returned
    /// records are `d(y, sample)`, evaluated after the chain has finished.
    pub fn run(
        &mut self,
        n_samples: usize,
        theta_0: Vec<f64>,
        sample_0: S::Observation,
    ) -> Result<Vec<AbcResult<S::Observation>>> {
        self.run_inner(n_samples, theta_0, sample_0, false)
    }

    /// Like [`McmcSampler::run`], with progress bars for the chain and the final scoring.
    pub fn run_progress(
        &mut self,
        n_samples: usize,
        theta_0: Vec<f64>,
        sample_0: S::Observation,
    ) -> Result<Vec<AbcResult<S::Observation>>> {
        self.run_inner(n_samples, theta_0, sample_0, true)
    }

    fn run_inner(
        &mut self,
        n_samples: usize,
        theta_0: Vec<f64>,
        sample_0: S::Observation,
        visible: bool,
    ) -> Result<Vec<AbcResult<S::Observation>>> {
        self.stats = ChainStats::default();
        if n_samples == 0 {
            return Ok(Vec::new());
        }

        let pb = phase_bar(n_samples, "Chain", visible);
        let mut history: Vec<(Vec<f64>, S::Observation)> = Vec::with_capacity(n_samples);
        let mut state = self.score_state(theta_0, sample_0)?;
        for _ in 0..n_samples {
            history.push((state.theta.clone(), state.sample.clone()));
            let (next, accepted) = self.step(state)?;
            self.stats.record(accepted);
            state = next;
            pb.inc(1);
        }
        pb.finish_with_message("Done!");

        let pb = phase_bar(history.len(), "Distance calculation", visible);
        let results = history
            .into_iter()
            .map(|(theta, sample)| {
                let d = self.distance.evaluate(&self.y, &sample)?;
                pb.inc(1);
                Ok(AbcResult::new(d, theta, sample))
            })
            .collect::<Result<Vec<_>>>()?;
        pb.finish_with_message("Done!");
        Ok(results)
    }

    /// Pairs `theta` and `sample` with the sample's distance to the observations.
    pub fn score_state(
        &self,
        theta: Vec<f64>,
        sample: S::Observation,
    ) -> Result<ChainState<S::Observation>> {
        let distance = self.distance.evaluate(&sample, &self.y)?;
        Ok(ChainState {
            theta,
            sample,
            distance,
        })
    }

    /// Proposes, simulates and accepts or rejects one candidate.
    ///
    /// Returns the next state and whether the candidate was accepted.
    pub fn step(
        &mut self,
        current: ChainState<S::Observation>,
    ) -> Result<(ChainState<S::Observation>, bool)> {
        let theta = self.proposal.sample(&current.theta, &mut self.rng);
        let sample = self.simulator.simulate(self.n, &theta, &mut self.rng)?;
        let candidate = self.score_state(theta, sample)?;
        let u: f64 = self.rng.gen();
        Ok(self.transition(current, candidate, u))
    }

    /// The accept/reject decision for a given uniform draw `u`.
    pub fn transition(
        &self,
        current: ChainState<S::Observation>,
        candidate: ChainState<S::Observation>,
        u: f64,
    ) -> (ChainState<S::Observation>, bool) {
        if self.log_acceptance_ratio(&current, &candidate) > u.ln() {
            (candidate, true)
        } else {
            (current, false)
        }
    }

    /// `ln(w(candidate) / w(current))`.
    pub fn log_acceptance_ratio(
        &self,
        current: &ChainState<S::Observation>,
        candidate: &ChainState<S::Observation>,
    ) -> f64 {
        let numerator = self.log_kernel(candidate.distance)
            + self.proposal.log_prob(&candidate.theta, &current.theta);
        let denominator = self.log_kernel(current.distance)
            + self.proposal.log_prob(&current.theta, &candidate.theta);
        numerator - denominator
    }

    fn log_kernel(&self, distance: f64) -> f64 {
        if distance.is_nan() || distance == f64::INFINITY {
            f64::NEG_INFINITY
        } else {
            -self.config.gamma * distance
        }
    }
}
