/*!
Reference simulators: point clouds on spheres and tori, and percolation fields.

Every simulator draws all of its randomness from the random source it is handed, so a
seeded sampler reproduces its data sets exactly.

```rust
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tabac::core::Simulator;
use tabac::shapes::{Percolation, Sphere, Torus};

let mut rng = SmallRng::seed_from_u64(42);
let sphere = Sphere::default().simulate(100, &[1.0], &mut rng).unwrap();
assert_eq!(sphere.dim(), (100, 3));

let torus = Torus::default().simulate(100, &[1.0, 2.0], &mut rng).unwrap();
assert_eq!(torus.dim(), (100, 3));

let field = Percolation::default().simulate(16, &[0.5], &mut rng).unwrap();
assert_eq!(field.len(), 256);
```
*/

use ndarray::{Array1, Array2};
use rand::Rng;
use rand_distr::StandardNormal;
use std::f64::consts::PI;

use crate::core::Simulator;
use crate::error::{AbcError, Result};

fn non_negative(value: f64, name: &str) -> Result<f64> {
    if !(value.is_finite() && value >= 0.0) {
        return Err(AbcError::InvalidParameter(format!(
            "{name} must be finite and non-negative, got {value}"
        )));
    }
    Ok(value)
}

fn single(theta: &[f64]) -> Result<f64> {
    match theta {
        [value] => Ok(*value),
        _ => Err(AbcError::DimensionMismatch {
            expected: 1,
            found: theta.len(),
        }),
    }
}

/// `n` points uniformly distributed on the `dim`-sphere in `dim + 1` dimensions.
///
/// `theta = [radius]`. With `noise`, every coordinate is perturbed by
/// `noise * Normal(0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub dim: usize,
    pub noise: Option<f64>,
}

impl Default for Sphere {
    fn default() -> Self {
        Self {
            dim: 2,
            noise: None,
        }
    }
}

impl Simulator for Sphere {
    type Observation = Array2<f64>;

    fn simulate<R: Rng + ?Sized>(
        &self,
        n: usize,
        theta: &[f64],
        rng: &mut R,
    ) -> Result<Array2<f64>> {
        let r = non_negative(single(theta)?, "sphere radius")?;
        let mut data = Array2::from_shape_simple_fn((n, self.dim + 1), || {
            rng.sample::<f64, _>(StandardNormal)
        });
        for mut row in data.rows_mut() {
            let norm = row.dot(&row).sqrt();
            row.mapv_inplace(|x| r * x / norm);
        }
        if let Some(noise) = self.noise {
            data.mapv_inplace(|x| x + noise * rng.sample::<f64, _>(StandardNormal));
        }
        Ok(data)
    }
}

/// `n` points uniformly distributed on a torus in three dimensions.
///
/// `theta = [r]` or `[r, big_r]`: the radius of the tube and, optionally, the distance
/// from the tube's centre to the torus centre (otherwise [`Torus::big_radius`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Torus {
    pub big_radius: f64,
}

impl Default for Torus {
    fn default() -> Self {
        Self { big_radius: 2.0 }
    }
}

impl Simulator for Torus {
    type Observation = Array2<f64>;

    fn simulate<R: Rng + ?Sized>(
        &self,
        n: usize,
        theta: &[f64],
        rng: &mut R,
    ) -> Result<Array2<f64>> {
        let (r, big_r) = match theta {
            [r] => (*r, self.big_radius),
            [r, big_r] => (*r, *big_r),
            _ => {
                return Err(AbcError::DimensionMismatch {
                    expected: 2,
                    found: theta.len(),
                })
            }
        };
        let r = non_negative(r, "tube radius")?;
        let big_r = non_negative(big_r, "torus radius")?;
        if big_r == 0.0 {
            return Err(AbcError::InvalidParameter(
                "torus radius must be positive".into(),
            ));
        }

        let mut data = Array2::<f64>::zeros((n, 3));
        for mut row in data.rows_mut() {
            // Rejection step for the tube angle; the density envelope is 1 / pi.
            let tube = loop {
                let x = rng.gen_range(0.0..2.0 * PI);
                let y = rng.gen_range(0.0..1.0 / PI);
                if y < (1.0 + (r / big_r) * x.cos()) / (2.0 * PI) {
                    break x;
                }
            };
            let psi = rng.gen_range(0.0..2.0 * PI);
            let a = big_r + r * tube.cos();
            row[0] = a * psi.cos();
            row[1] = a * psi.sin();
            row[2] = r * tube.sin();
        }
        Ok(data)
    }
}

/// Site percolation on an `n x n` grid, flattened row-major.
///
/// `theta = [p]`, the occupation probability (values above 1 are clamped). Occupied sites
/// get a gray value drawn uniformly from `1..gray_level`, empty sites are 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Percolation {
    pub gray_level: u32,
}

impl Default for Percolation {
    fn default() -> Self {
        Self { gray_level: 255 }
    }
}

impl Simulator for Percolation {
    type Observation = Array1<f64>;

    fn simulate<R: Rng + ?Sized>(
        &self,
        n: usize,
        theta: &[f64],
        rng: &mut R,
    ) -> Result<Array1<f64>> {
        let p = non_negative(single(theta)?, "occupation probability")?.min(1.0);
        if self.gray_level < 2 {
            return Err(AbcError::InvalidParameter(format!(
                "gray level must be at least 2, got {}",
                self.gray_level
            )));
        }
        Ok(Array1::from_shape_simple_fn(n * n, || {
            if rng.gen_bool(p) {
                rng.gen_range(1..self.gray_level) as f64
            } else {
                0.0
            }
        }))
    }
}
