use crate::core::data::render_parameters::{FractalKind, FractalKindParams, RenderParameters};
use crate::core::fractals::chaos_game::ChaosGameKernel;
use crate::core::fractals::escape_time::EscapeTimeKernel;
use crate::core::fractals::geometric_recursive::GeometricRecursiveKernel;
use crate::core::fractals::root_convergence::RootConvergenceKernel;

/// Ready-to-run kernel for one render, built from validated parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum FractalKernel {
    EscapeTime(EscapeTimeKernel),
    RootConvergence(RootConvergenceKernel),
    ChaosGame {
        kernel: ChaosGameKernel,
        steps: u64,
        rng_seed: u64,
    },
    GeometricRecursive(GeometricRecursiveKernel),
}

impl FractalKernel {
    #[must_use]
    pub fn from_parameters(params: &RenderParameters) -> Self {
        match &params.fractal {
            FractalKindParams::EscapeTime { formula, seed } => Self::EscapeTime(EscapeTimeKernel::new(
                *formula,
                *seed,
                params.max_iterations,
                params.escape_threshold,
            )),
            FractalKindParams::RootConvergence { formula, tolerance } => Self::RootConvergence(
                RootConvergenceKernel::new(formula, *tolerance, params.max_iterations),
            ),
            FractalKindParams::ChaosGame {
                vertices,
                ratio,
                steps,
                rng_seed,
            } => Self::ChaosGame {
                kernel: ChaosGameKernel::new(*vertices, *ratio),
                steps: *steps,
                rng_seed: *rng_seed,
            },
            FractalKindParams::GeometricRecursive { shape, depth } => {
                Self::GeometricRecursive(GeometricRecursiveKernel::new(*shape, *depth))
            }
        }
    }

    #[must_use]
    pub fn kind(&self) -> FractalKind {
        match self {
            Self::EscapeTime(_) => FractalKind::EscapeTime,
            Self::RootConvergence(_) => FractalKind::RootConvergence,
            Self::ChaosGame { .. } => FractalKind::ChaosGame,
            Self::GeometricRecursive(_) => FractalKind::GeometricRecursive,
        }
    }

    /// Number of distinct roots a converged sample can report.
    #[must_use]
    pub fn root_count(&self) -> usize {
        match self {
            Self::RootConvergence(kernel) => kernel.root_count(),
            _ => 0,
        }
    }
}
