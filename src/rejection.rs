/*!
# Rejection sampler

Draws `n_samples` independent trials from a simulation function, scores each against the
observed data, and keeps the trials whose distance is at most `epsilon`. Without a
threshold every trial is returned.

```rust
use tabac::core::Trial;
use tabac::error::Result;
use tabac::rejection::RejectionSampler;

let mut k = 0.0;
let simulation = move || -> Result<Trial<f64>> {
    k += 1.0;
    Ok(Trial::new(vec![k], k))
};
let distance = |a: &f64, b: &f64| -> Result<f64> { Ok((a - b).abs()) };

let mut sampler = RejectionSampler::new(3.0, simulation, distance).with_epsilon(1.0);
let results = sampler.run(5).unwrap();
assert_eq!(results.len(), 3); // samples 2, 3 and 4
assert!(results.iter().all(|r| r.distance() <= 1.0));
```
*/

use crate::core::{draw_and_score, AbcResult, DistanceMetric, ParameterDraw};
use crate::error::Result;

/// Rejection sampler over observed data `y`.
pub struct RejectionSampler<P: ParameterDraw, M> {
    /// The observed data set.
    pub y: P::Observation,
    pub simulation: P,
    pub distance: M,
    /// Acceptance threshold; `None` keeps all trials.
    pub epsilon: Option<f64>,
}

impl<P, M> RejectionSampler<P, M>
where
    P: ParameterDraw,
    M: DistanceMetric<P::Observation>,
{
    pub fn new(y: P::Observation, simulation: P, distance: M) -> Self {
        Self {
            y,
            simulation,
            distance,
            epsilon: None,
        }
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = Some(epsilon);
        self
    }

    /// Simulates and scores `n_samples` trials, returning the accepted ones in
    /// generation order.
    pub fn run(&mut self, n_samples: usize) -> Result<Vec<AbcResult<P::Observation>>> {
        self.run_inner(n_samples, false)
    }

    /// Like [`RejectionSampler::run`], showing a progress bar for each phase.
    pub fn run_progress(&mut self, n_samples: usize) -> Result<Vec<AbcResult<P::Observation>>> {
        self.run_inner(n_samples, true)
    }

    fn run_inner(
        &mut self,
        n_samples: usize,
        visible: bool,
    ) -> Result<Vec<AbcResult<P::Observation>>> {
        let results = draw_and_score(
            &self.y,
            &mut self.simulation,
            &self.distance,
            n_samples,
            visible,
        )?;
        Ok(match self.epsilon {
            Some(eps) => results
                .into_iter()
                .filter(|r| r.distance() <= eps)
                .collect(),
            None => results,
        })
    }
}
