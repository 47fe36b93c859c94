//! Parallel fractal rendering engine.
//!
//! A [`RenderSession`] takes immutable [`RenderParameters`], a [`Palette`] and a
//! caller-owned [`PixelBuffer`], and fills the buffer on a fixed pool of worker
//! threads. Renders can be cancelled, report throttled progress, and always end
//! in exactly one [`RenderOutcome`].

mod core;
mod storage;

pub use crate::core::actions::cancellation::{
    CANCEL_CHECK_INTERVAL_ROWS, CHAOS_CANCEL_CHECK_STEPS, CancelFlag, CancelToken, Cancelled, NeverCancel,
};
pub use crate::core::actions::ports::colour_map::ColourMap;
pub use crate::core::actions::ports::point_kernel::PointKernel;
pub use crate::core::actions::progress::{NoProgress, ProgressReporter};
pub use crate::core::actions::render_chaos_game::split_step_budget;
pub use crate::core::actions::worker_pool::ScheduleError;
pub use crate::core::colour::colour_mapper::PaletteColourMapper;
pub use crate::core::data::colour::Colour;
pub use crate::core::data::density_grid::DensityGrid;
pub use crate::core::data::palette::{DEFAULT_CYCLE_LENGTH, Palette, PaletteError};
pub use crate::core::data::pixel_buffer::{BYTES_PER_PIXEL, PixelBuffer, PixelBufferError};
pub use crate::core::data::render_parameters::{
    ColourMode, DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, DEFAULT_ESCAPE_THRESHOLD, DEFAULT_MAX_ITERATIONS,
    DEFAULT_ZOOM, EscapeFormula, FractalKind, FractalKindParams, GeometricShape, MAX_GEOMETRIC_DEPTH,
    MAX_POLYGON_VERTICES, MAX_POLYNOMIAL_DEGREE, ParameterError, RenderParameters, RootFormula,
    SupersampleFactor, THUMBNAIL_ITERATION_DIVISOR, recommended_thread_count,
};
pub use crate::core::data::sample_result::SampleResult;
pub use crate::core::data::session_snapshot::{SessionSnapshot, SnapshotError};
pub use crate::core::fractals::chaos_game::ChaosGameKernel;
pub use crate::core::fractals::errors::KernelError;
pub use crate::core::fractals::escape_time::EscapeTimeKernel;
pub use crate::core::fractals::geometric_recursive::GeometricRecursiveKernel;
pub use crate::core::fractals::kernel::FractalKernel;
pub use crate::core::fractals::root_convergence::RootConvergenceKernel;
pub use crate::core::session::{RenderError, RenderOutcome, RenderSession};
pub use crate::core::util::coordinate_mapper::{BASE_SCALE, ViewTransform, ViewTransformError};
pub use crate::core::util::plan_row_bands::{BANDS_PER_WORKER, RowBand, plan_row_bands};
pub use crate::storage::write_ppm::{encode_ppm, write_ppm};
