use crate::core::actions::ports::point_kernel::PointKernel;
use crate::core::data::render_parameters::EscapeFormula;
use crate::core::data::sample_result::SampleResult;
use crate::core::fractals::errors::{KernelError, ensure_finite};
use num_complex::Complex64;
use std::f64::consts::{LN_2, PI};

#[derive(Debug, Clone, PartialEq)]
pub struct EscapeTimeKernel {
    formula: EscapeFormula,
    seed: Complex64,
    max_iterations: u32,
    escape_threshold: f64,
}

impl EscapeTimeKernel {
    /// `seed` is the starting orbit value for Mandelbrot; the other formulas
    /// start from the sampled point.
    #[must_use]
    pub fn new(formula: EscapeFormula, seed: Complex64, max_iterations: u32, escape_threshold: f64) -> Self {
        Self {
            formula,
            seed,
            max_iterations,
            escape_threshold,
        }
    }

    fn smooth_index(&self, iterations: u32, z: Complex64) -> f64 {
        let n = f64::from(iterations);
        let smooth = n - (z.norm().ln() / self.escape_threshold.ln()).ln() / LN_2;

        if smooth.is_finite() { smooth.max(0.0) } else { n }
    }

    fn escaped(&self, iterations: u32, z: Complex64) -> SampleResult {
        SampleResult::Escaped {
            iterations,
            smooth: self.smooth_index(iterations, z),
        }
    }
}

impl PointKernel for EscapeTimeKernel {
    fn sample(&self, point: Complex64) -> Result<SampleResult, KernelError> {
        ensure_finite(point.re, point.im)?;

        let threshold_sqr = self.escape_threshold * self.escape_threshold;
        let has_escaped = |z: Complex64| {
            let norm_sqr = z.norm_sqr();
            !norm_sqr.is_finite() || norm_sqr > threshold_sqr
        };

        let (mut z, c) = match self.formula {
            EscapeFormula::Mandelbrot => (self.seed, point),
            EscapeFormula::Julia { c } => (point, c),
            EscapeFormula::Phoenix { c1, .. } => (point, c1),
            EscapeFormula::Collatz => (point, Complex64::new(0.0, 0.0)),
        };
        let mut previous = Complex64::new(0.0, 0.0);

        for iteration in 0..self.max_iterations {
            if has_escaped(z) {
                return Ok(self.escaped(iteration, z));
            }

            let next = match self.formula {
                EscapeFormula::Mandelbrot | EscapeFormula::Julia { .. } => z * z + c,
                EscapeFormula::Phoenix { c2, .. } => z * z + c + c2 * previous,
                EscapeFormula::Collatz => {
                    (2.0 + 7.0 * z - (2.0 + 5.0 * z) * (PI * z).cos()) / 4.0
                }
            };
            previous = z;
            z = next;
        }

        Ok(SampleResult::Interior {
            iterations: self.max_iterations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mandelbrot(max_iterations: u32) -> EscapeTimeKernel {
        EscapeTimeKernel::new(EscapeFormula::Mandelbrot, Complex64::new(0.0, 0.0), max_iterations, 2.0)
    }

    #[test]
    fn test_origin_never_escapes() {
        let result = mandelbrot(1000).sample(Complex64::new(0.0, 0.0));

        assert_eq!(result, Ok(SampleResult::Interior { iterations: 1000 }));
    }

    #[test]
    fn test_far_point_escapes_immediately() {
        let result = mandelbrot(100).sample(Complex64::new(3.0, 3.0)).unwrap();

        assert!(matches!(result, SampleResult::Escaped { iterations: 1, .. }));
    }

    #[test]
    fn test_smooth_index_is_finite_and_non_negative() {
        let kernel = mandelbrot(200);

        for re in [-2.1, -1.5, 0.3, 0.5, 1.0, 2.5] {
            if let Ok(SampleResult::Escaped { iterations, smooth }) =
                kernel.sample(Complex64::new(re, 0.7))
            {
                assert!(smooth.is_finite());
                assert!(smooth >= 0.0);
                assert!(smooth <= f64::from(iterations) + 1.0);
            }
        }
    }

    #[test]
    fn test_smooth_index_varies_continuously() {
        let kernel = mandelbrot(200);
        let smooth_at = |re: f64| match kernel.sample(Complex64::new(re, 0.0)).unwrap() {
            SampleResult::Escaped { smooth, .. } => smooth,
            other => panic!("expected escape, got {:?}", other),
        };

        assert!((smooth_at(0.3) - smooth_at(0.3001)).abs() < 0.5);
    }

    #[test]
    fn test_julia_starts_from_point() {
        let kernel = EscapeTimeKernel::new(
            EscapeFormula::Julia {
                c: Complex64::new(0.0, 0.0),
            },
            Complex64::new(0.0, 0.0),
            50,
            2.0,
        );

        // With c = 0 the unit disc is invariant.
        assert_eq!(
            kernel.sample(Complex64::new(0.5, 0.5)),
            Ok(SampleResult::Interior { iterations: 50 })
        );
        assert!(matches!(
            kernel.sample(Complex64::new(1.5, 0.0)),
            Ok(SampleResult::Escaped { .. })
        ));
    }

    #[test]
    fn test_phoenix_without_memory_matches_julia() {
        let without_memory = EscapeTimeKernel::new(
            EscapeFormula::Phoenix {
                c1: Complex64::new(0.3, 0.0),
                c2: Complex64::new(0.0, 0.0),
            },
            Complex64::new(0.0, 0.0),
            100,
            4.0,
        );
        let julia = EscapeTimeKernel::new(
            EscapeFormula::Julia {
                c: Complex64::new(0.3, 0.0),
            },
            Complex64::new(0.0, 0.0),
            100,
            4.0,
        );

        for re in [-1.0, -0.2, 0.4, 0.9] {
            let point = Complex64::new(re, 0.3);
            assert_eq!(without_memory.sample(point), julia.sample(point));
        }
    }

    #[test]
    fn test_phoenix_feeds_back_previous_orbit_value() {
        let kernel = EscapeTimeKernel::new(
            EscapeFormula::Phoenix {
                c1: Complex64::new(0.0, 0.0),
                c2: Complex64::new(1.0, 0.0),
            },
            Complex64::new(0.0, 0.0),
            100,
            2.0,
        );

        // z0 = 1, z-1 = 0: z1 = 1 + 0 = 1, z2 = 1 + 1 = 2, z3 = 4 + 1 = 5.
        // |z2|² = 4 is not past the threshold, so the orbit escapes at step 3.
        assert!(matches!(
            kernel.sample(Complex64::new(1.0, 0.0)),
            Ok(SampleResult::Escaped { iterations: 3, .. })
        ));
    }

    #[test]
    fn test_collatz_fixed_point_is_interior() {
        let kernel = EscapeTimeKernel::new(EscapeFormula::Collatz, Complex64::new(0.0, 0.0), 64, 100.0);

        // f(0) = (2 - 2) / 4 = 0
        assert_eq!(
            kernel.sample(Complex64::new(0.0, 0.0)),
            Ok(SampleResult::Interior { iterations: 64 })
        );
    }

    #[test]
    fn test_collatz_escapes_off_axis() {
        let kernel = EscapeTimeKernel::new(EscapeFormula::Collatz, Complex64::new(0.0, 0.0), 64, 100.0);

        assert!(matches!(
            kernel.sample(Complex64::new(0.5, 2.0)),
            Ok(SampleResult::Escaped { .. })
        ));
    }

    #[test]
    fn test_non_finite_point_is_an_error() {
        let result = mandelbrot(10).sample(Complex64::new(f64::NAN, 0.0));

        assert!(matches!(result, Err(KernelError::NonFinitePoint { .. })));
    }
}
