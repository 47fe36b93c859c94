use crate::core::data::palette::PaletteError;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

pub const DEFAULT_CANVAS_WIDTH: usize = 800;
pub const DEFAULT_CANVAS_HEIGHT: usize = 600;
pub const DEFAULT_ZOOM: f64 = 1.0;
pub const DEFAULT_CENTER_X: f64 = -0.5;
pub const DEFAULT_CENTER_Y: f64 = 0.0;
pub const DEFAULT_MAX_ITERATIONS: u32 = 256;
pub const DEFAULT_ESCAPE_THRESHOLD: f64 = 2.0;
pub const DEFAULT_NEWTON_TOLERANCE: f64 = 1e-6;
pub const DEFAULT_CHAOS_STEPS: u64 = 2_000_000;
pub const DEFAULT_GEOMETRIC_DEPTH: u32 = 6;
pub const MAX_GEOMETRIC_DEPTH: u32 = 24;
pub const MAX_POLYNOMIAL_DEGREE: usize = 64;
pub const MAX_POLYGON_VERTICES: u32 = 64;
pub const THUMBNAIL_ITERATION_DIVISOR: u32 = 4;

/// Hardware parallelism, used as the default thread count.
#[must_use]
pub fn recommended_thread_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParameterError {
    ZeroCanvas { width: usize, height: usize },
    InvalidZoom(f64),
    NonFiniteCenter { x: f64, y: f64 },
    ZeroMaxIterations,
    ZeroThreadCount,
    InvalidEscapeThreshold(f64),
    InvalidTolerance(f64),
    NonFiniteConstant { name: &'static str, re: f64, im: f64 },
    PolynomialDegreeTooLow { degree: usize },
    PolynomialDegreeTooHigh { degree: usize, max: usize },
    TooFewVertices(u32),
    TooManyVertices { vertices: u32, max: u32 },
    InvalidRatio(f64),
    ZeroChaosSteps,
    InvalidDepth { depth: u32, max: u32 },
    Palette(PaletteError),
    BufferSizeMismatch {
        expected_width: usize,
        expected_height: usize,
        width: usize,
        height: usize,
    },
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCanvas { width, height } => {
                write!(f, "canvas size must be positive: {}x{}", width, height)
            }
            Self::InvalidZoom(zoom) => write!(f, "zoom must be positive and finite, got {}", zoom),
            Self::NonFiniteCenter { x, y } => {
                write!(f, "view center must be finite, got ({}, {})", x, y)
            }
            Self::ZeroMaxIterations => write!(f, "Maximum iterations must be greater than zero"),
            Self::ZeroThreadCount => write!(f, "thread count must be at least one"),
            Self::InvalidEscapeThreshold(threshold) => {
                write!(f, "escape threshold must be greater than one, got {}", threshold)
            }
            Self::InvalidTolerance(tolerance) => {
                write!(f, "convergence tolerance must be positive, got {}", tolerance)
            }
            Self::NonFiniteConstant { name, re, im } => {
                write!(f, "{} must be finite, got {} + {}i", name, re, im)
            }
            Self::PolynomialDegreeTooLow { degree } => {
                write!(f, "polynomial must have degree one or more, got {}", degree)
            }
            Self::PolynomialDegreeTooHigh { degree, max } => {
                write!(f, "polynomial degree must be at most {}, got {}", max, degree)
            }
            Self::TooFewVertices(vertices) => {
                write!(f, "chaos game polygon needs at least 3 vertices, got {}", vertices)
            }
            Self::TooManyVertices { vertices, max } => {
                write!(f, "chaos game polygon allows at most {} vertices, got {}", max, vertices)
            }
            Self::InvalidRatio(ratio) => {
                write!(f, "chaos game jump ratio must lie in (0, 1), got {}", ratio)
            }
            Self::ZeroChaosSteps => write!(f, "chaos game step budget must be greater than zero"),
            Self::InvalidDepth { depth, max } => {
                write!(f, "recursion depth must be between 1 and {}, got {}", max, depth)
            }
            Self::Palette(err) => write!(f, "invalid palette: {}", err),
            Self::BufferSizeMismatch {
                expected_width,
                expected_height,
                width,
                height,
            } => write!(
                f,
                "pixel buffer is {}x{} but the canvas is {}x{}",
                width, height, expected_width, expected_height
            ),
        }
    }
}

impl Error for ParameterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Palette(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PaletteError> for ParameterError {
    fn from(err: PaletteError) -> Self {
        Self::Palette(err)
    }
}

/// Bare fractal family tag, as stored in session snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FractalKind {
    EscapeTime,
    RootConvergence,
    ChaosGame,
    GeometricRecursive,
}

impl FractalKind {
    pub const ALL: &'static [Self] = &[
        Self::EscapeTime,
        Self::RootConvergence,
        Self::ChaosGame,
        Self::GeometricRecursive,
    ];

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::EscapeTime => "Escape time",
            Self::RootConvergence => "Root convergence",
            Self::ChaosGame => "Chaos game",
            Self::GeometricRecursive => "Geometric recursion",
        }
    }
}

impl fmt::Display for FractalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str((*self).display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EscapeFormula {
    /// `z² + c` with `c` taken from the pixel and `z₀` from the seed.
    Mandelbrot,
    /// `z² + c` with fixed `c` and `z₀` taken from the pixel.
    Julia { c: Complex64 },
    /// `z² + c1 + c2·z_{n-1}` with `z₀` taken from the pixel.
    Phoenix { c1: Complex64, c2: Complex64 },
    /// Complex extension of the Collatz map.
    Collatz,
}

impl EscapeFormula {
    /// Escape radius each family is usually rendered with.
    #[must_use]
    pub const fn default_escape_threshold(self) -> f64 {
        match self {
            Self::Mandelbrot | Self::Julia { .. } => 2.0,
            Self::Phoenix { .. } => 4.0,
            Self::Collatz => 100.0,
        }
    }

    #[must_use]
    pub fn phoenix() -> Self {
        Self::Phoenix {
            c1: Complex64::new(0.566_67, 0.0),
            c2: Complex64::new(-0.5, 0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RootFormula {
    /// `zⁿ − 1`.
    RootsOfUnity { degree: u32 },
    /// Coefficients in ascending powers: `c₀ + c₁z + c₂z² + …`.
    Polynomial { coefficients: Vec<Complex64> },
}

impl RootFormula {
    /// Ascending-power coefficients with trailing zeros trimmed.
    #[must_use]
    pub fn coefficients(&self) -> Vec<Complex64> {
        let mut coefficients = match self {
            Self::RootsOfUnity { degree } => {
                let mut c = vec![Complex64::new(0.0, 0.0); *degree as usize + 1];
                c[0] = Complex64::new(-1.0, 0.0);
                c[*degree as usize] += Complex64::new(1.0, 0.0);
                c
            }
            Self::Polynomial { coefficients } => coefficients.clone(),
        };

        while coefficients.last().is_some_and(|c| c.norm_sqr() == 0.0) {
            coefficients.pop();
        }

        coefficients
    }

    /// Degree after trimming trailing zeros, without building the coefficients.
    #[must_use]
    pub fn degree(&self) -> usize {
        match self {
            Self::RootsOfUnity { degree } => *degree as usize,
            Self::Polynomial { coefficients } => coefficients
                .iter()
                .rposition(|c| c.norm_sqr() != 0.0)
                .unwrap_or(0),
        }
    }
}

fn ensure_finite_constant(name: &'static str, value: Complex64) -> Result<(), ParameterError> {
    if value.re.is_finite() && value.im.is_finite() {
        Ok(())
    } else {
        Err(ParameterError::NonFiniteConstant {
            name,
            re: value.re,
            im: value.im,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometricShape {
    SierpinskiTriangle,
    SierpinskiCarpet,
}

/// Fractal family tag together with the family's own parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FractalKindParams {
    EscapeTime {
        formula: EscapeFormula,
        seed: Complex64,
    },
    RootConvergence {
        formula: RootFormula,
        tolerance: f64,
    },
    ChaosGame {
        vertices: u32,
        ratio: f64,
        steps: u64,
        rng_seed: u64,
    },
    GeometricRecursive {
        shape: GeometricShape,
        depth: u32,
    },
}

impl FractalKindParams {
    #[must_use]
    pub fn kind(&self) -> FractalKind {
        match self {
            Self::EscapeTime { .. } => FractalKind::EscapeTime,
            Self::RootConvergence { .. } => FractalKind::RootConvergence,
            Self::ChaosGame { .. } => FractalKind::ChaosGame,
            Self::GeometricRecursive { .. } => FractalKind::GeometricRecursive,
        }
    }

    #[must_use]
    pub fn mandelbrot() -> Self {
        Self::EscapeTime {
            formula: EscapeFormula::Mandelbrot,
            seed: Complex64::new(0.0, 0.0),
        }
    }

    #[must_use]
    pub fn newton_cubic() -> Self {
        Self::RootConvergence {
            formula: RootFormula::RootsOfUnity { degree: 3 },
            tolerance: DEFAULT_NEWTON_TOLERANCE,
        }
    }

    #[must_use]
    pub fn sierpinski_chaos() -> Self {
        Self::ChaosGame {
            vertices: 3,
            ratio: 0.5,
            steps: DEFAULT_CHAOS_STEPS,
            rng_seed: 0x5eed,
        }
    }

    #[must_use]
    pub fn sierpinski_carpet() -> Self {
        Self::GeometricRecursive {
            shape: GeometricShape::SierpinskiCarpet,
            depth: DEFAULT_GEOMETRIC_DEPTH,
        }
    }

    fn validate(&self) -> Result<(), ParameterError> {
        match self {
            Self::EscapeTime { formula, seed } => {
                ensure_finite_constant("seed", *seed)?;
                match formula {
                    EscapeFormula::Julia { c } => ensure_finite_constant("julia c", *c),
                    EscapeFormula::Phoenix { c1, c2 } => {
                        ensure_finite_constant("phoenix c1", *c1)?;
                        ensure_finite_constant("phoenix c2", *c2)
                    }
                    EscapeFormula::Mandelbrot | EscapeFormula::Collatz => Ok(()),
                }
            }
            Self::RootConvergence { formula, tolerance } => {
                if !(*tolerance > 0.0 && tolerance.is_finite()) {
                    return Err(ParameterError::InvalidTolerance(*tolerance));
                }
                if let RootFormula::Polynomial { coefficients } = formula {
                    for &coefficient in coefficients {
                        ensure_finite_constant("polynomial coefficient", coefficient)?;
                    }
                }
                let degree = formula.degree();
                if degree < 1 {
                    return Err(ParameterError::PolynomialDegreeTooLow { degree });
                }
                if degree > MAX_POLYNOMIAL_DEGREE {
                    return Err(ParameterError::PolynomialDegreeTooHigh {
                        degree,
                        max: MAX_POLYNOMIAL_DEGREE,
                    });
                }
                Ok(())
            }
            Self::ChaosGame {
                vertices,
                ratio,
                steps,
                ..
            } => {
                if *vertices < 3 {
                    return Err(ParameterError::TooFewVertices(*vertices));
                }
                if *vertices > MAX_POLYGON_VERTICES {
                    return Err(ParameterError::TooManyVertices {
                        vertices: *vertices,
                        max: MAX_POLYGON_VERTICES,
                    });
                }
                if !(*ratio > 0.0 && *ratio < 1.0) {
                    return Err(ParameterError::InvalidRatio(*ratio));
                }
                if *steps == 0 {
                    return Err(ParameterError::ZeroChaosSteps);
                }
                Ok(())
            }
            Self::GeometricRecursive { depth, .. } => {
                if *depth == 0 || *depth > MAX_GEOMETRIC_DEPTH {
                    return Err(ParameterError::InvalidDepth {
                        depth: *depth,
                        max: MAX_GEOMETRIC_DEPTH,
                    });
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SupersampleFactor {
    #[default]
    X1,
    X2,
    X4,
}

impl SupersampleFactor {
    #[must_use]
    pub const fn factor(self) -> usize {
        match self {
            Self::X1 => 1,
            Self::X2 => 2,
            Self::X4 => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColourMode {
    Discrete,
    #[default]
    Smooth,
}

/// Everything one render needs, snapshotted at call time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderParameters {
    pub canvas_width: usize,
    pub canvas_height: usize,
    pub zoom: f64,
    pub center_x: f64,
    pub center_y: f64,
    pub max_iterations: u32,
    pub escape_threshold: f64,
    pub fractal: FractalKindParams,
    pub thread_count: usize,
    pub supersample: SupersampleFactor,
    pub colour_mode: ColourMode,
}

impl Default for RenderParameters {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            zoom: DEFAULT_ZOOM,
            center_x: DEFAULT_CENTER_X,
            center_y: DEFAULT_CENTER_Y,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            escape_threshold: DEFAULT_ESCAPE_THRESHOLD,
            fractal: FractalKindParams::mandelbrot(),
            thread_count: recommended_thread_count(),
            supersample: SupersampleFactor::default(),
            colour_mode: ColourMode::default(),
        }
    }
}

impl RenderParameters {
    /// Default view for `fractal`, with that family's usual escape radius.
    #[must_use]
    pub fn for_fractal(fractal: FractalKindParams) -> Self {
        let (center_x, escape_threshold) = match &fractal {
            FractalKindParams::EscapeTime {
                formula: EscapeFormula::Mandelbrot,
                ..
            } => (DEFAULT_CENTER_X, DEFAULT_ESCAPE_THRESHOLD),
            FractalKindParams::EscapeTime { formula, .. } => (0.0, formula.default_escape_threshold()),
            _ => (0.0, DEFAULT_ESCAPE_THRESHOLD),
        };

        Self {
            center_x,
            escape_threshold,
            fractal,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn kind(&self) -> FractalKind {
        self.fractal.kind()
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(ParameterError::ZeroCanvas {
                width: self.canvas_width,
                height: self.canvas_height,
            });
        }

        if !(self.zoom > 0.0 && self.zoom.is_finite()) {
            return Err(ParameterError::InvalidZoom(self.zoom));
        }

        if !(self.center_x.is_finite() && self.center_y.is_finite()) {
            return Err(ParameterError::NonFiniteCenter {
                x: self.center_x,
                y: self.center_y,
            });
        }

        if self.max_iterations == 0 {
            return Err(ParameterError::ZeroMaxIterations);
        }

        if self.thread_count == 0 {
            return Err(ParameterError::ZeroThreadCount);
        }

        if !(self.escape_threshold > 1.0 && self.escape_threshold.is_finite()) {
            return Err(ParameterError::InvalidEscapeThreshold(self.escape_threshold));
        }

        self.fractal.validate()
    }

    /// Same view with a reduced iteration budget, for fast previews.
    #[must_use]
    pub fn thumbnail(&self) -> Self {
        let mut preview = self.clone();
        preview.max_iterations = (self.max_iterations / THUMBNAIL_ITERATION_DIVISOR).max(1);

        if let FractalKindParams::ChaosGame { steps, .. } = &mut preview.fractal {
            *steps = (*steps / u64::from(THUMBNAIL_ITERATION_DIVISOR)).max(1);
        }

        preview
    }
}
