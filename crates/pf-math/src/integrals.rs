//! Fixed-node quadrature.
//!
//! A rule produces its abscissae and weights on `[a, b]` once; integration is
//! then a weighted sum. Integrands that are expensive to evaluate (Fourier
//! integrands that solve an ODE per node) use [`QuadratureRule::par_integrate`],
//! which evaluates nodes on the rayon pool but always sums them in node order,
//! so the result does not depend on the number of threads.

use pf_core::{
    errors::{Error, Result},
    Real, Size,
};
use rayon::prelude::*;
use tracing::warn;

/// A quadrature rule with a fixed set of nodes.
pub trait QuadratureRule {
    /// The `(abscissa, weight)` pairs of the rule on `[a, b]`.
    fn nodes(&self, a: Real, b: Real) -> Result<Vec<(Real, Real)>>;

    /// Integrate `f` on `[a, b]`.
    ///
    /// A non-finite integrand value at any node is an [`Error::Numerical`].
    fn integrate<F: Fn(Real) -> Real>(&self, f: F, a: Real, b: Real) -> Result<Real> {
        let values = self
            .nodes(a, b)?
            .into_iter()
            .map(|(x, w)| (x, w, f(x)))
            .collect::<Vec<_>>();
        weighted_sum(&values)
    }

    /// Integrate a fallible `f` on `[a, b]`, evaluating nodes in parallel.
    ///
    /// The first error raised by `f` (in node order) is returned.
    fn par_integrate<F>(&self, f: F, a: Real, b: Real) -> Result<Real>
    where
        F: Fn(Real) -> Result<Real> + Sync,
    {
        let values = self
            .nodes(a, b)?
            .into_par_iter()
            .map(|(x, w)| f(x).map(|fx| (x, w, fx)))
            .collect::<Vec<Result<_>>>()
            .into_iter()
            .collect::<Result<Vec<_>>>()?;
        weighted_sum(&values)
    }
}

fn weighted_sum(values: &[(Real, Real, Real)]) -> Result<Real> {
    let mut sum = 0.0;
    for &(x, w, fx) in values {
        if !fx.is_finite() {
            warn!(x, value = fx, "non-finite integrand");
            return Err(Error::Numerical(format!(
                "integrand is not finite at x = {x} ({fx})"
            )));
        }
        sum += w * fx;
    }
    Ok(sum)
}

fn check_interval(a: Real, b: Real) -> Result<()> {
    if !(a.is_finite() && b.is_finite()) {
        return Err(Error::InvalidConfiguration(format!(
            "integration bounds must be finite, got [{a}, {b}]"
        )));
    }
    Ok(())
}

// ── Simpson ───────────────────────────────────────────────────────────────────

/// Composite Simpson's rule over an even number of equal sub-intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimpsonRule {
    intervals: Size,
}

impl SimpsonRule {
    /// Create a rule with `intervals` sub-intervals (even, at least 2).
    pub fn new(intervals: Size) -> Result<Self> {
        if intervals < 2 || intervals % 2 != 0 {
            return Err(Error::InvalidConfiguration(format!(
                "Simpson's rule needs an even number of intervals >= 2, got {intervals}"
            )));
        }
        Ok(Self { intervals })
    }
}

impl QuadratureRule for SimpsonRule {
    fn nodes(&self, a: Real, b: Real) -> Result<Vec<(Real, Real)>> {
        check_interval(a, b)?;
        let n = self.intervals;
        let h = (b - a) / n as Real;
        // h/3 · [f₀ + 4f₁ + 2f₂ + … + 4fₙ₋₁ + fₙ]
        Ok((0..=n)
            .map(|i| {
                let w = if i == 0 || i == n {
                    1.0
                } else if i % 2 == 1 {
                    4.0
                } else {
                    2.0
                };
                (a + i as Real * h, w * h / 3.0)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    #[test]
    fn simpson_exact_for_cubics() {
        let rule = SimpsonRule::new(2).unwrap();
        let v = rule.integrate(|x| x * x * x - 2.0 * x + 1.0, 0.0, 2.0).unwrap();
        assert_abs_diff_eq!(v, 4.0 - 4.0 + 2.0, epsilon = 1e-14);
    }

    #[test]
    fn simpson_sine() {
        let rule = SimpsonRule::new(200).unwrap();
        let v = rule.integrate(|x| x.sin(), 0.0, PI).unwrap();
        assert_abs_diff_eq!(v, 2.0, epsilon = 1e-8);
    }

    #[test]
    fn parallel_matches_serial() {
        let rule = SimpsonRule::new(1000).unwrap();
        let f = |x: Real| (-x * x).exp() * x.cos();
        let serial = rule.integrate(f, 0.0, 5.0).unwrap();
        let parallel = rule.par_integrate(|x| Ok(f(x)), 0.0, 5.0).unwrap();
        assert_eq!(serial, parallel);
    }

    #[test]
    fn weights_sum_to_length() {
        let nodes = SimpsonRule::new(10).unwrap().nodes(-1.0, 2.0).unwrap();
        assert_eq!(nodes.len(), 11);
        let total: Real = nodes.iter().map(|(_, w)| w).sum();
        assert_abs_diff_eq!(total, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn odd_interval_count_rejected() {
        assert!(matches!(
            SimpsonRule::new(3),
            Err(Error::InvalidConfiguration(_))
        ));
        assert!(SimpsonRule::new(0).is_err());
    }

    #[test]
    fn non_finite_integrand_is_numerical_error() {
        let rule = SimpsonRule::new(4).unwrap();
        let result = rule.integrate(|x| 1.0 / x, 0.0, 1.0);
        assert!(matches!(result, Err(Error::Numerical(_))));
    }

    #[test]
    fn integrand_error_propagates() {
        let rule = SimpsonRule::new(8).unwrap();
        let result = rule.par_integrate(
            |x| {
                if x > 0.5 {
                    Err(Error::DegenerateInput("past half".into()))
                } else {
                    Ok(x)
                }
            },
            0.0,
            1.0,
        );
        assert!(matches!(result, Err(Error::DegenerateInput(_))));
    }
}
