/*!
Independent repetitions of a whole inference run, executed in parallel.

Run `i` receives the seed `seed + i`, so a batch is reproducible from a single seed and
no random state is shared between runs.

```rust
use tabac::replicate::replicate;

let seeds = replicate(4, 100, |i, seed| Ok((i, seed))).unwrap();
assert_eq!(seeds, vec![(0, 100), (1, 101), (2, 102), (3, 103)]);
```
*/

use indicatif::ProgressBar;
use rayon::prelude::*;

use crate::core::progress_style;
use crate::error::Result;

/// Executes `run(i, seed + i)` for `i in 0..n_runs` on the rayon thread pool.
///
/// Results come back in run order. If any run fails, one of the errors is returned and
/// the other results are dropped.
pub fn replicate<T, F>(n_runs: usize, seed: u64, run: F) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(usize, u64) -> Result<T> + Sync,
{
    (0..n_runs)
        .into_par_iter()
        .map(|i| run(i, seed.wrapping_add(i as u64)))
        .collect()
}

/// Like [`replicate`], with a progress bar counting finished runs.
pub fn replicate_progress<T, F>(n_runs: usize, seed: u64, run: F) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(usize, u64) -> Result<T> + Sync,
{
    let pb = ProgressBar::new(n_runs as u64);
    pb.set_style(progress_style());
    pb.set_prefix("Runs");
    let results = (0..n_runs)
        .into_par_iter()
        .map(|i| {
            let out = run(i, seed.wrapping_add(i as u64));
            pb.inc(1);
            out
        })
        .collect();
    pb.finish_with_message("Done!");
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EstimatorConfig;
    use crate::core::Simulator;
    use crate::distances::Hausdorff;
    use crate::distributions::ProposalSimulation;
    use crate::error::AbcError;
    use crate::importance::ImportanceSampler;
    use crate::shapes::Sphere;
    use crate::stats::estimate_importance;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn sphere_estimate(seed: u64) -> Result<f64> {
        let sphere = Sphere::default();
        let y = sphere.simulate(40, &[1.0], &mut SmallRng::seed_from_u64(seed))?;
        let simulation = ProposalSimulation::new(sphere, 40, vec![1.0], 0.25)?.set_seed(seed);
        let mut sampler = ImportanceSampler::new(y, simulation, Hausdorff);
        let results = sampler.run(30)?;
        Ok(estimate_importance(&results, &[1.0], &EstimatorConfig::default())?[0])
    }

    #[test]
    fn test_runs_are_reproducible_and_ordered() {
        let a = replicate(6, 42, |_, seed| sphere_estimate(seed)).unwrap();
        let b = replicate_progress(6, 42, |_, seed| sphere_estimate(seed)).unwrap();
        assert_eq!(a.len(), 6);
        assert_eq!(a, b);
        for (i, est) in a.iter().enumerate() {
            assert_eq!(*est, sphere_estimate(42 + i as u64).unwrap());
        }
    }

    #[test]
    fn test_failure_propagates() {
        let out: Result<Vec<u64>> = replicate(8, 0, |i, seed| {
            if i == 5 {
                Err(AbcError::InvalidParameter("run 5".into()))
            } else {
                Ok(seed)
            }
        });
        assert!(matches!(out, Err(AbcError::InvalidParameter(_))));
    }

    #[test]
    fn test_zero_runs() {
        let out = replicate(0, 0, |_, seed| Ok(seed)).unwrap();
        assert!(out.is_empty());
    }
}
