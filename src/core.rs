/*!
# Sample / distance contract

The pieces every sampler in this crate is built from:

- [`Simulator`]: produces an observation for a parameter vector `theta`, drawing its
  randomness from a caller-supplied random source.
- [`ParameterDraw`]: a "simulation function" that proposes its own `theta` and returns a
  [`Trial`]. Any `FnMut() -> Result<Trial<O>>` closure qualifies.
- [`DistanceMetric`]: scores two observations of the same representation. Any
  `Fn(&O, &O) -> Result<f64>` closure qualifies.
- [`AbcResult`]: the immutable record emitted for every simulate-and-score trial.

```rust
use tabac::core::{AbcResult, DistanceMetric, ParameterDraw, Trial};
use tabac::error::Result;

let mut draw = || -> Result<Trial<f64>> { Ok(Trial::new(vec![1.0], 0.5)) };
let trial = draw.draw().unwrap();
assert_eq!(trial.theta, vec![1.0]);

let dist = |a: &f64, b: &f64| -> Result<f64> { Ok((a - b).abs()) };
let record = AbcResult::new(dist.evaluate(&1.0, &trial.sample).unwrap(), trial.theta, trial.sample);
assert_eq!(record.distance(), 0.5);
```
*/

use indicatif::{ProgressBar, ProgressStyle};
use rand::Rng;

use crate::error::{AbcError, Result};

/// The outcome of one simulate-and-score trial.
///
/// Fields are private: a record never changes after the sampler created it.
#[derive(Debug, Clone, PartialEq)]
pub struct AbcResult<O> {
    distance: f64,
    theta: Vec<f64>,
    sample: O,
}

impl<O> AbcResult<O> {
    pub fn new(distance: f64, theta: Vec<f64>, sample: O) -> Self {
        Self {
            distance,
            theta,
            sample,
        }
    }

    /// Distance between the observed data and [`AbcResult::sample`]. NaN marks an
    /// incomparable (non-informative) trial.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn theta(&self) -> &[f64] {
        &self.theta
    }

    pub fn sample(&self) -> &O {
        &self.sample
    }

    /// Consumes the record, returning `(distance, theta, sample)`.
    pub fn into_parts(self) -> (f64, Vec<f64>, O) {
        (self.distance, self.theta, self.sample)
    }
}

/// A parameter vector together with the observation simulated from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Trial<O> {
    pub theta: Vec<f64>,
    pub sample: O,
}

impl<O> Trial<O> {
    pub fn new(theta: Vec<f64>, sample: O) -> Self {
        Self { theta, sample }
    }
}

/// Generates synthetic data of size `n` for a parameter vector.
pub trait Simulator {
    /// Representation of one simulated (or observed) data set.
    type Observation;

    /// Simulates one observation. All randomness must come from `rng`.
    fn simulate<R: Rng + ?Sized>(
        &self,
        n: usize,
        theta: &[f64],
        rng: &mut R,
    ) -> Result<Self::Observation>;
}

/// A no-argument simulation function: proposes `theta` and simulates from it.
pub trait ParameterDraw {
    type Observation;

    fn draw(&mut self) -> Result<Trial<Self::Observation>>;
}

impl<F, O> ParameterDraw for F
where
    F: FnMut() -> Result<Trial<O>>,
{
    type Observation = O;

    fn draw(&mut self) -> Result<Trial<O>> {
        self()
    }
}

/// Scores the dissimilarity of two observations.
pub trait DistanceMetric<O: ?Sized> {
    fn evaluate(&self, a: &O, b: &O) -> Result<f64>;
}

impl<O, F> DistanceMetric<O> for F
where
    O: ?Sized,
    F: Fn(&O, &O) -> Result<f64>,
{
    fn evaluate(&self, a: &O, b: &O) -> Result<f64> {
        self(a, b)
    }
}

pub(crate) fn progress_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{prefix} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-")
}

/// A bar for one sampling phase, or a hidden one when `visible` is false.
pub(crate) fn phase_bar(len: usize, prefix: &str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len as u64);
    pb.set_style(progress_style());
    pb.set_prefix(prefix.to_string());
    pb
}

pub(crate) fn ensure_dim(expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(AbcError::DimensionMismatch { expected, found });
    }
    Ok(())
}

/// Draws `n_samples` trials, then scores every one of them against `y`.
///
/// Shared by the rejection and importance samplers. The first error aborts the batch.
pub(crate) fn draw_and_score<P, M>(
    y: &P::Observation,
    simulation: &mut P,
    distance: &M,
    n_samples: usize,
    visible: bool,
) -> Result<Vec<AbcResult<P::Observation>>>
where
    P: ParameterDraw,
    M: DistanceMetric<P::Observation>,
{
    let pb = phase_bar(n_samples, "Sample simulation", visible);
    let mut trials: Vec<Trial<P::Observation>> = Vec::with_capacity(n_samples);
    for _ in 0..n_samples {
        let trial = simulation.draw()?;
        if let Some(first) = trials.first() {
            ensure_dim(first.theta.len(), trial.theta.len())?;
        }
        trials.push(trial);
        pb.inc(1);
    }
    pb.finish_with_message("Done!");

    let pb = phase_bar(trials.len(), "Distance calculation", visible);
    let results = trials
        .into_iter()
        .map(|trial| {
            let d = distance.evaluate(y, &trial.sample)?;
            pb.inc(1);
            Ok(AbcResult::new(d, trial.theta, trial.sample))
        })
        .collect::<Result<Vec<_>>>()?;
    pb.finish_with_message("Done!");
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_contracts() {
        let mut k = 0.0;
        let mut draw = || -> Result<Trial<f64>> {
            k += 1.0;
            Ok(Trial::new(vec![k], k * 10.0))
        };
        let dist = |a: &f64, b: &f64| -> Result<f64> { Ok((a - b).abs()) };

        let results = draw_and_score(&15.0, &mut draw, &dist, 3, false).unwrap();
        assert_eq!(results.len(), 3);
        let distances: Vec<f64> = results.iter().map(|r| r.distance()).collect();
        assert_eq!(distances, vec![5.0, 5.0, 15.0]);
        assert_eq!(results[2].theta(), &[3.0]);
        assert_eq!(*results[2].sample(), 30.0);
    }

    #[test]
    fn test_mixed_theta_lengths_abort() {
        let mut i = 0;
        let mut draw = || -> Result<Trial<f64>> {
            i += 1;
            Ok(Trial::new(vec![0.0; i], 0.0))
        };
        let dist = |_: &f64, _: &f64| -> Result<f64> { Ok(0.0) };
        let err = draw_and_score(&0.0, &mut draw, &dist, 2, false).unwrap_err();
        assert!(matches!(
            err,
            AbcError::DimensionMismatch {
                expected: 1,
                found: 2
            }
        ));
    }

    #[test]
    fn test_into_parts() {
        let record = AbcResult::new(0.25, vec![1.0, 2.0], "x");
        let (d, theta, sample) = record.into_parts();
        assert_eq!(d, 0.25);
        assert_eq!(theta, vec![1.0, 2.0]);
        assert_eq!(sample, "x");
    }
}
