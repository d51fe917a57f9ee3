//! Importance sampler: every simulated trial is kept; weighting happens later in
//! [`crate::stats::estimate_importance`].

use crate::core::{draw_and_score, AbcResult, DistanceMetric, ParameterDraw};
use crate::error::Result;

/**
Importance sampler over observed data `y`.

Generates and scores trials exactly like [`crate::rejection::RejectionSampler`] but
performs no filtering, so `run(n)` always yields `n` records.

```rust
use tabac::core::Trial;
use tabac::error::Result;
use tabac::importance::ImportanceSampler;

let simulation = || -> Result<Trial<f64>> { Ok(Trial::new(vec![2.0], 2.0)) };
let distance = |a: &f64, b: &f64| -> Result<f64> { Ok((a - b).abs()) };
let mut sampler = ImportanceSampler::new(0.0, simulation, distance);
let results = sampler.run(4).unwrap();
assert_eq!(results.len(), 4);
assert!(results.iter().all(|r| r.distance() == 2.0));
```
*/
pub struct ImportanceSampler<P: ParameterDraw, M> {
    /// The observed data set.
    pub y: P::Observation,
    pub simulation: P,
    pub distance: M,
}

impl<P, M> ImportanceSampler<P, M>
where
    P: ParameterDraw,
    M: DistanceMetric<P::Observation>,
{
    pub fn new(y: P::Observation, simulation: P, distance: M) -> Self {
        Self {
            y,
            simulation,
            distance,
        }
    }

    pub fn run(&mut self, n_samples: usize) -> Result<Vec<AbcResult<P::Observation>>> {
        draw_and_score(
            &self.y,
            &mut self.simulation,
            &self.distance,
            n_samples,
            false,
        )
    }

    pub fn run_progress(&mut self, n_samples: usize) -> Result<Vec<AbcResult<P::Observation>>> {
        draw_and_score(
            &self.y,
            &mut self.simulation,
            &self.distance,
            n_samples,
            true,
        )
    }
}
