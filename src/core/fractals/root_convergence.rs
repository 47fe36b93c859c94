use crate::core::actions::ports::point_kernel::PointKernel;
use crate::core::data::render_parameters::RootFormula;
use crate::core::data::sample_result::SampleResult;
use crate::core::fractals::errors::{KernelError, ensure_finite};
use num_complex::Complex64;
use std::f64::consts::TAU;

const DURAND_KERNER_MAX_ROUNDS: usize = 500;
const DURAND_KERNER_TOLERANCE: f64 = 1e-12;
/// Approximations closer than this are one (repeated) root.
const ROOT_CLUSTER_TOLERANCE: f64 = 1e-6;

/// Newton's method on a fixed polynomial, classifying each point by the root
/// its orbit settles on.
#[derive(Debug, Clone, PartialEq)]
pub struct RootConvergenceKernel {
    coefficients: Vec<Complex64>,
    derivative: Vec<Complex64>,
    roots: Vec<Complex64>,
    tolerance: f64,
    max_iterations: u32,
}

impl RootConvergenceKernel {
    #[must_use]
    pub fn new(formula: &RootFormula, tolerance: f64, max_iterations: u32) -> Self {
        let coefficients = formula.coefficients();
        let derivative = derivative_of(&coefficients);
        let roots = match formula {
            RootFormula::RootsOfUnity { degree } => roots_of_unity(*degree),
            RootFormula::Polynomial { .. } => {
                merge_close_roots(durand_kerner(&coefficients), ROOT_CLUSTER_TOLERANCE)
            }
        };

        Self {
            coefficients,
            derivative,
            roots,
            tolerance,
            max_iterations,
        }
    }

    #[must_use]
    pub fn roots(&self) -> &[Complex64] {
        &self.roots
    }

    #[must_use]
    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    fn nearest_root(&self, z: Complex64) -> Option<usize> {
        self.roots
            .iter()
            .enumerate()
            .map(|(index, root)| (index, (root - z).norm_sqr()))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }
}

impl PointKernel for RootConvergenceKernel {
    fn sample(&self, point: Complex64) -> Result<SampleResult, KernelError> {
        ensure_finite(point.re, point.im)?;

        let mut z = point;

        for iteration in 0..self.max_iterations {
            let slope = evaluate(&self.derivative, z);
            if slope.norm_sqr() == 0.0 {
                return Ok(SampleResult::NoRoot);
            }

            let next = z - evaluate(&self.coefficients, z) / slope;
            if !(next.re.is_finite() && next.im.is_finite()) {
                return Ok(SampleResult::NoRoot);
            }

            if (next - z).norm() < self.tolerance {
                return Ok(match self.nearest_root(next) {
                    Some(root) => SampleResult::Converged {
                        root,
                        iterations: iteration + 1,
                    },
                    None => SampleResult::NoRoot,
                });
            }

            z = next;
        }

        Ok(SampleResult::NoRoot)
    }
}

/// Horner evaluation of ascending-power coefficients.
fn evaluate(coefficients: &[Complex64], z: Complex64) -> Complex64 {
    coefficients
        .iter()
        .rev()
        .fold(Complex64::new(0.0, 0.0), |acc, &c| acc * z + c)
}

fn derivative_of(coefficients: &[Complex64]) -> Vec<Complex64> {
    coefficients
        .iter()
        .enumerate()
        .skip(1)
        .map(|(power, &c)| c * power as f64)
        .collect()
}

fn roots_of_unity(degree: u32) -> Vec<Complex64> {
    (0..degree)
        .map(|k| Complex64::from_polar(1.0, TAU * f64::from(k) / f64::from(degree)))
        .collect()
}

/// Simultaneous root approximation for a polynomial of degree one or more.
fn durand_kerner(coefficients: &[Complex64]) -> Vec<Complex64> {
    let Some(&leading) = coefficients.last() else {
        return Vec::new();
    };
    let degree = coefficients.len() - 1;
    if degree == 0 {
        return Vec::new();
    }

    let monic: Vec<Complex64> = coefficients.iter().map(|&c| c / leading).collect();
    let seed = Complex64::new(0.4, 0.9);
    let mut roots: Vec<Complex64> = (0..degree).map(|k| seed.powu(k as u32)).collect();

    for _ in 0..DURAND_KERNER_MAX_ROUNDS {
        let mut largest_step: f64 = 0.0;

        for i in 0..degree {
            let denominator = roots
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .fold(Complex64::new(1.0, 0.0), |acc, (_, &other)| acc * (roots[i] - other));

            if denominator.norm_sqr() == 0.0 {
                continue;
            }

            let step = evaluate(&monic, roots[i]) / denominator;
            roots[i] -= step;
            largest_step = largest_step.max(step.norm());
        }

        if largest_step < DURAND_KERNER_TOLERANCE {
            break;
        }
    }

    roots
}

/// Collapses approximations of a repeated root into their mean, keeping the
/// order in which each distinct root first appears.
fn merge_close_roots(approximations: Vec<Complex64>, tolerance: f64) -> Vec<Complex64> {
    let mut clusters: Vec<(Complex64, usize)> = Vec::with_capacity(approximations.len());

    for root in approximations {
        let existing = clusters
            .iter_mut()
            .find(|(sum, count)| (*sum / *count as f64 - root).norm() < tolerance);

        match existing {
            Some((sum, count)) => {
                *sum += root;
                *count += 1;
            }
            None => clusters.push((root, 1)),
        }
    }

    clusters.into_iter().map(|(sum, count)| sum / count as f64).collect()
}
