//! Monte Carlo simulation framework.
//!
//! # Overview
//!
//! * [`MonteCarloParameters`]: seed, antithetic flag, path and step counts
//! * [`EulerPathGenerator`]: Euler-Maruyama stepping of a process to a
//!   terminal state from a block of standard-normal draws
//! * [`simulate_terminal`]: runs all paths and summarises a terminal
//!   functional
//!
//! # Determinism
//!
//! Base paths are split into chunks of [`CHUNK_SIZE`]. Each chunk receives a
//! seed drawn serially from the caller's generator and owns a generator built
//! from that seed; chunks then run on the rayon pool and are folded back in
//! chunk order. An antithetic partner is always simulated in the same chunk,
//! from the same draws, as its base path. The result therefore depends on the
//! caller's generator state only, never on the number of threads.

use pf_core::{
    errors::{Error, Result},
    Real, Size, Time,
};
use pf_math::{Array, IncrementalStatistics, InverseCumulativeNormalRng};
use pf_processes::StochasticProcess;
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

/// Number of base paths simulated per chunk.
pub const CHUNK_SIZE: Size = 1024;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Monte Carlo configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MonteCarloParameters {
    /// Seed of the random stream; `None` seeds from entropy once.
    pub seed: Option<u64>,
    /// Pair every base path with its negated-draw partner.
    pub antithetic_variates: bool,
    /// Total number of paths `N`.
    pub n_paths: Size,
    /// Number of Euler steps `M`.
    pub n_steps: Size,
}

impl Default for MonteCarloParameters {
    fn default() -> Self {
        Self {
            seed: None,
            antithetic_variates: true,
            n_paths: 10_000,
            n_steps: 100,
        }
    }
}

impl MonteCarloParameters {
    /// Fix the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enable or disable antithetic variates.
    pub fn with_antithetic_variates(mut self, antithetic: bool) -> Self {
        self.antithetic_variates = antithetic;
        self
    }

    /// Set the path count.
    pub fn with_paths(mut self, n_paths: Size) -> Self {
        self.n_paths = n_paths;
        self
    }

    /// Set the step count.
    pub fn with_steps(mut self, n_steps: Size) -> Self {
        self.n_steps = n_steps;
        self
    }

    /// Check path and step counts are non-zero.
    pub fn validate(&self) -> Result<()> {
        if self.n_paths == 0 {
            return Err(Error::InvalidConfiguration(
                "Monte Carlo needs at least one path".into(),
            ));
        }
        if self.n_steps == 0 {
            return Err(Error::InvalidConfiguration(
                "Monte Carlo needs at least one time step".into(),
            ));
        }
        Ok(())
    }

    /// Number of independently drawn paths.
    pub fn base_paths(&self) -> Size {
        if self.antithetic_variates {
            self.n_paths / 2 + self.n_paths % 2
        } else {
            self.n_paths
        }
    }

    /// Number of base paths that get an antithetic partner.
    pub fn antithetic_paths(&self) -> Size {
        if self.antithetic_variates {
            self.n_paths / 2
        } else {
            0
        }
    }
}

// ─── EulerPathGenerator ───────────────────────────────────────────────────────

/// Euler-Maruyama stepping on a uniform grid over `[0, end_time]`.
#[derive(Debug, Clone, Copy)]
pub struct EulerPathGenerator<'a> {
    process: &'a dyn StochasticProcess,
    dt: Time,
    steps: Size,
}

impl<'a> EulerPathGenerator<'a> {
    /// Create a new generator.
    pub fn new(process: &'a dyn StochasticProcess, end_time: Time, steps: Size) -> Result<Self> {
        if !(end_time.is_finite() && end_time >= 0.0) {
            return Err(Error::DegenerateInput(format!(
                "simulation horizon must be non-negative, got {end_time}"
            )));
        }
        if steps == 0 {
            return Err(Error::InvalidConfiguration(
                "Monte Carlo needs at least one time step".into(),
            ));
        }
        Ok(Self {
            process,
            dt: end_time / steps as Real,
            steps,
        })
    }

    /// Number of standard-normal draws one path consumes.
    pub fn dimension(&self) -> Size {
        self.steps * self.process.factors()
    }

    /// Terminal state of the path driven by `sign · normals`.
    ///
    /// `normals` holds [`dimension`](Self::dimension) draws, step-major.
    pub fn terminal_value(&self, normals: &[Real], sign: Real) -> Array {
        let factors = self.process.factors();
        let mut x = self.process.initial_values();
        for (i, block) in normals.chunks_exact(factors).take(self.steps).enumerate() {
            let t = i as Real * self.dt;
            let dw = Array::from_iterator(factors, block.iter().map(|z| sign * z));
            x = self.process.evolve(t, &x, self.dt, &dw);
        }
        x
    }
}

// ─── Simulation ───────────────────────────────────────────────────────────────

/// Result of [`simulate_terminal`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationSummary {
    /// Mean of the functional over all paths.
    pub mean: Real,
    /// Standard error of `mean`, with antithetic pairs averaged first.
    pub error_estimate: Real,
    /// Number of simulated paths.
    pub samples: Size,
}

#[derive(Debug, Default)]
struct ChunkResult {
    sum: Real,
    paths: Size,
    units: IncrementalStatistics,
}

/// Simulate `params.n_paths` paths of `process` to `end_time` and average
/// `functional` of the terminal states.
///
/// Draws one seed per chunk from `rng`. Non-finite terminal states or
/// functional values are an [`Error::Numerical`].
pub fn simulate_terminal<F>(
    process: &dyn StochasticProcess,
    end_time: Time,
    params: &MonteCarloParameters,
    rng: &mut InverseCumulativeNormalRng,
    functional: F,
) -> Result<SimulationSummary>
where
    F: Fn(&Array) -> Real + Sync,
{
    params.validate()?;
    let generator = EulerPathGenerator::new(process, end_time, params.n_steps)?;
    let base_paths = params.base_paths();
    let partnered = params.antithetic_paths();

    let chunks: Vec<(Size, Size, u64)> = (0..base_paths)
        .step_by(CHUNK_SIZE)
        .map(|start| (start, CHUNK_SIZE.min(base_paths - start), rng.next_u64()))
        .collect();
    trace!(base_paths, partnered, chunks = chunks.len(), "simulating");

    let results = chunks
        .par_iter()
        .map(|&(start, len, seed)| {
            simulate_chunk(&generator, start, len, seed, partnered, &functional)
        })
        .collect::<Vec<Result<ChunkResult>>>();

    let mut total = ChunkResult::default();
    for chunk in results {
        let chunk = chunk?;
        total.sum += chunk.sum;
        total.paths += chunk.paths;
        total.units.merge(&chunk.units);
    }

    Ok(SimulationSummary {
        mean: total.sum / total.paths as Real,
        error_estimate: total.units.error_estimate(),
        samples: total.paths,
    })
}

fn simulate_chunk<F>(
    generator: &EulerPathGenerator<'_>,
    start: Size,
    len: Size,
    seed: u64,
    partnered: Size,
    functional: &F,
) -> Result<ChunkResult>
where
    F: Fn(&Array) -> Real + Sync,
{
    let mut rng = InverseCumulativeNormalRng::new(seed);
    let mut normals = vec![0.0; generator.dimension()];
    let mut result = ChunkResult::default();

    let evaluate = |normals: &[Real], sign: Real, path: Size| -> Result<Real> {
        let x = generator.terminal_value(normals, sign);
        let value = if x.iter().all(|v| v.is_finite()) {
            functional(&x)
        } else {
            Real::NAN
        };
        if !value.is_finite() {
            warn!(path, "non-finite Monte Carlo sample");
            return Err(Error::Numerical(format!(
                "path {path} produced a non-finite sample (terminal state {:?})",
                x.as_slice()
            )));
        }
        Ok(value)
    };

    for path in start..start + len {
        rng.fill(&mut normals);
        let base = evaluate(&normals, 1.0, path)?;
        if path < partnered {
            let partner = evaluate(&normals, -1.0, path)?;
            result.sum += base + partner;
            result.paths += 2;
            result.units.add(0.5 * (base + partner));
        } else {
            result.sum += base;
            result.paths += 1;
            result.units.add(base);
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use pf_math::Matrix;
    use pf_processes::StochasticProcess1D;
    use proptest::prelude::*;

    /// dX = μ dt + σ dW
    #[derive(Debug)]
    struct ArithmeticBrownian {
        mu: Real,
        sigma: Real,
    }

    impl StochasticProcess1D for ArithmeticBrownian {
        fn x0(&self) -> Real {
            0.0
        }

        fn drift_1d(&self, _t: Time, _x: Real) -> Real {
            self.mu
        }

        fn diffusion_1d(&self, _t: Time, _x: Real) -> Real {
            self.sigma
        }
    }

    /// Two-factor process whose diffusion blows up
    #[derive(Debug)]
    struct Explosive;

    impl StochasticProcess for Explosive {
        fn size(&self) -> usize {
            1
        }

        fn factors(&self) -> usize {
            2
        }

        fn initial_values(&self) -> Array {
            Array::from_element(1, 1.0)
        }

        fn drift(&self, _t: Time, x: &Array) -> Array {
            x * 1e300
        }

        fn diffusion(&self, _t: Time, _x: &Array) -> Matrix {
            Matrix::zeros(1, 2)
        }
    }

    fn params(n_paths: Size, antithetic: bool) -> MonteCarloParameters {
        MonteCarloParameters::default()
            .with_paths(n_paths)
            .with_steps(4)
            .with_antithetic_variates(antithetic)
    }

    #[test]
    fn antithetic_split() {
        assert_eq!(params(10, true).base_paths(), 5);
        assert_eq!(params(11, true).base_paths(), 6);
        assert_eq!(params(11, true).antithetic_paths(), 5);
        assert_eq!(params(11, false).base_paths(), 11);
        assert_eq!(params(11, false).antithetic_paths(), 0);
    }

    #[test]
    fn path_counts() {
        let process = ArithmeticBrownian { mu: 0.0, sigma: 1.0 };
        let mut rng = InverseCumulativeNormalRng::new(1);
        for (n, antithetic) in [(1, true), (7, true), (2049, true), (2049, false)] {
            let summary =
                simulate_terminal(&process, 1.0, &params(n, antithetic), &mut rng, |x| x[0])
                    .unwrap();
            assert_eq!(summary.samples, n);
        }
    }

    #[test]
    fn antithetic_pairs_cancel_linear_functionals() {
        // With zero drift an even antithetic set has terminal mean exactly 0
        let process = ArithmeticBrownian { mu: 0.0, sigma: 0.3 };
        let mut rng = InverseCumulativeNormalRng::new(9);
        let summary =
            simulate_terminal(&process, 2.0, &params(5000, true), &mut rng, |x| x[0]).unwrap();
        assert_abs_diff_eq!(summary.mean, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(summary.error_estimate, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn terminal_moments() {
        let process = ArithmeticBrownian { mu: 0.5, sigma: 0.2 };
        let mut rng = InverseCumulativeNormalRng::new(42);
        let p = params(40_000, false);
        let mean = simulate_terminal(&process, 2.0, &p, &mut rng, |x| x[0]).unwrap();
        assert_abs_diff_eq!(mean.mean, 1.0, epsilon = 5.0 * mean.error_estimate);
        let second = simulate_terminal(&process, 2.0, &p, &mut rng, |x| (x[0] - 1.0).powi(2))
            .unwrap();
        assert_abs_diff_eq!(second.mean, 0.08, epsilon = 5.0 * second.error_estimate);
    }

    #[test]
    fn same_seed_same_result() {
        let process = ArithmeticBrownian { mu: 0.1, sigma: 0.4 };
        let run = || {
            let mut rng = InverseCumulativeNormalRng::new(2024);
            simulate_terminal(&process, 1.0, &params(5000, true), &mut rng, |x| x[0].exp())
                .unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn stream_advances_between_calls() {
        let process = ArithmeticBrownian { mu: 0.0, sigma: 1.0 };
        let mut rng = InverseCumulativeNormalRng::new(5);
        let p = params(100, false);
        let a = simulate_terminal(&process, 1.0, &p, &mut rng, |x| x[0]).unwrap();
        let b = simulate_terminal(&process, 1.0, &p, &mut rng, |x| x[0]).unwrap();
        assert_ne!(a.mean, b.mean);
    }

    #[test]
    fn zero_horizon_stays_at_initial_value() {
        let process = ArithmeticBrownian { mu: 1.0, sigma: 1.0 };
        let mut rng = InverseCumulativeNormalRng::new(3);
        let summary =
            simulate_terminal(&process, 0.0, &params(10, true), &mut rng, |x| x[0]).unwrap();
        assert_eq!(summary.mean, 0.0);
    }

    #[test]
    fn non_finite_state_is_numerical_error() {
        let mut rng = InverseCumulativeNormalRng::new(3);
        let result = simulate_terminal(&Explosive, 1.0, &params(4, true), &mut rng, |x| x[0]);
        assert!(matches!(result, Err(Error::Numerical(_))), "{result:?}");
    }

    #[test]
    fn invalid_configuration() {
        let process = ArithmeticBrownian { mu: 0.0, sigma: 1.0 };
        let mut rng = InverseCumulativeNormalRng::new(3);
        let zero_paths = params(0, true);
        assert!(matches!(
            simulate_terminal(&process, 1.0, &zero_paths, &mut rng, |x| x[0]),
            Err(Error::InvalidConfiguration(_))
        ));
        let zero_steps = params(10, true).with_steps(0);
        assert!(zero_steps.validate().is_err());
        assert!(matches!(
            simulate_terminal(&process, -1.0, &params(10, true), &mut rng, |x| x[0]),
            Err(Error::DegenerateInput(_))
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn every_requested_path_is_simulated(
            n_paths in 1usize..3 * CHUNK_SIZE,
            antithetic in any::<bool>(),
            seed in any::<u64>(),
        ) {
            let process = ArithmeticBrownian { mu: 0.0, sigma: 1.0 };
            let mut rng = InverseCumulativeNormalRng::new(seed);
            let p = params(n_paths, antithetic).with_steps(1);
            let summary = simulate_terminal(&process, 1.0, &p, &mut rng, |x| x[0]).unwrap();
            prop_assert_eq!(summary.samples, n_paths);
            prop_assert!(summary.mean.is_finite());
        }
    }
}
