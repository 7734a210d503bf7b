//! Random number generators.
//!
//! Mersenne Twister MT19937-64 from `rand_mt`, and a standard-normal generator
//! that feeds its uniforms through the inverse normal CDF. Both are plain
//! values: cloning a generator clones its stream position.

use pf_core::Real;
use rand_mt::Mt19937GenRand64;

use crate::distributions::normal_cdf_inverse;

/// A uniform pseudo-random number generator based on MT19937-64.
#[derive(Clone)]
pub struct MersenneTwisterUniformRng {
    rng: Mt19937GenRand64,
}

impl std::fmt::Debug for MersenneTwisterUniformRng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MersenneTwisterUniformRng").finish_non_exhaustive()
    }
}

impl MersenneTwisterUniformRng {
    /// Create a new generator with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mt19937GenRand64::new(seed),
        }
    }

    /// Create a generator seeded from the thread-local entropy source.
    pub fn from_entropy() -> Self {
        Self::new(rand::random::<u64>())
    }

    /// Generate the next uniform deviate in the open interval `(0, 1)`.
    pub fn next_real(&mut self) -> Real {
        // top 53 bits, shifted off zero by half an ulp
        let bits = self.rng.next_u64() >> 11;
        (bits as Real + 0.5) / (1u64 << 53) as Real
    }

    /// Generate the next raw 64-bit integer.
    pub fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }
}

/// An inverse-cumulative normal random number generator.
#[derive(Debug, Clone)]
pub struct InverseCumulativeNormalRng {
    inner: MersenneTwisterUniformRng,
}

impl InverseCumulativeNormalRng {
    /// Create a new generator backed by a Mersenne Twister with the given
    /// seed.
    pub fn new(seed: u64) -> Self {
        Self {
            inner: MersenneTwisterUniformRng::new(seed),
        }
    }

    /// Create a generator seeded from the thread-local entropy source.
    pub fn from_entropy() -> Self {
        Self {
            inner: MersenneTwisterUniformRng::from_entropy(),
        }
    }

    /// Generate the next standard-normal deviate.
    pub fn next_real(&mut self) -> Real {
        normal_cdf_inverse(self.inner.next_real())
    }

    /// Draw a raw 64-bit integer from the underlying uniform stream.
    ///
    /// Used to derive child seeds for independent sub-streams.
    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// Fill `out` with standard-normal deviates.
    pub fn fill(&mut self, out: &mut [Real]) {
        for z in out.iter_mut() {
            *z = self.next_real();
        }
    }
}
