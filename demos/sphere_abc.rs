//! Infers the radius of a noisy 2-sphere with the rejection, importance and MCMC samplers,
//! then writes the importance run to `sphere_importance.csv`.

use tabac::config::EstimatorConfig;
use tabac::core::Simulator;
use tabac::distances::Hausdorff;
use tabac::distributions::ProposalSimulation;
use tabac::importance::ImportanceSampler;
use tabac::io::csv::save_results_csv;
use tabac::mcmc::McmcSampler;
use tabac::rejection::RejectionSampler;
use tabac::shapes::Sphere;
use tabac::stats::{estimate_importance, estimate_mcmc_mean};

use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    const N_POINTS: usize = 200;
    const N_SAMPLES: usize = 500;
    const TRUE_RADIUS: f64 = 1.5;
    const SEED: u64 = 42;

    let sphere = Sphere {
        dim: 2,
        noise: Some(0.05),
    };
    let mut rng = SmallRng::seed_from_u64(SEED);
    let y = sphere.simulate(N_POINTS, &[TRUE_RADIUS], &mut rng)?;
    let anchor = vec![1.0];

    // Rejection: keep the closest fifth of the trials.
    let simulation = ProposalSimulation::new(sphere, N_POINTS, anchor.clone(), 0.5)?.set_seed(SEED);
    let mut rejection = RejectionSampler::new(y.clone(), simulation, Hausdorff);
    let all = rejection.run_progress(N_SAMPLES)?;
    let mut distances: Vec<f64> = all.iter().map(|r| r.distance()).collect();
    distances.sort_by(|a, b| a.total_cmp(b));
    let epsilon = distances[N_SAMPLES / 5];
    let accepted: Vec<f64> = all
        .iter()
        .filter(|r| r.distance() <= epsilon)
        .map(|r| r.theta()[0])
        .collect();
    let rejection_mean = accepted.iter().sum::<f64>() / accepted.len() as f64;
    println!(
        "Rejection: {} of {} trials within {:.3}, mean radius {:.3}",
        accepted.len(),
        N_SAMPLES,
        epsilon,
        rejection_mean
    );

    // Importance.
    let simulation =
        ProposalSimulation::new(sphere, N_POINTS, anchor.clone(), 0.5)?.set_seed(SEED + 1);
    let mut importance = ImportanceSampler::new(y.clone(), simulation, Hausdorff);
    let results = importance.run_progress(N_SAMPLES)?;
    let estimate = estimate_importance(&results, &anchor, &EstimatorConfig::default())?;
    println!("Importance: radius estimate {:.3}", estimate[0]);
    save_results_csv(&results, "sphere_importance.csv")?;

    // MCMC from the anchor.
    let x0 = sphere.simulate(N_POINTS, &anchor, &mut rng)?;
    let mut mcmc = McmcSampler::new(y, sphere, Hausdorff, N_POINTS).set_seed(SEED);
    let chain = mcmc.run_progress(N_SAMPLES, anchor, x0)?;
    let burnin = N_SAMPLES / 5;
    let mean = estimate_mcmc_mean(&chain[burnin..])?;
    println!(
        "MCMC: radius estimate {:.3}, acceptance rate {:.2}",
        mean[0],
        mcmc.stats().acceptance_rate().unwrap_or(0.0)
    );
    println!("True radius: {:.3}", TRUE_RADIUS);

    Ok(())
}
