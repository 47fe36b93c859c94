use crate::core::actions::cancellation::{CancelFlag, CancelToken};
use crate::core::actions::progress::ProgressReporter;
use crate::core::actions::render_chaos_game::{ChaosJob, render_chaos_game};
use crate::core::actions::render_row_bands::{BandJob, render_row_bands};
use crate::core::actions::worker_pool::ScheduleError;
use crate::core::colour::colour_mapper::PaletteColourMapper;
use crate::core::data::palette::Palette;
use crate::core::data::pixel_buffer::PixelBuffer;
use crate::core::data::render_parameters::{ParameterError, RenderParameters};
use crate::core::fractals::kernel::FractalKernel;
use crate::core::session::render_outcome::{RenderError, RenderOutcome};
use crate::core::util::coordinate_mapper::ViewTransform;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tracing::{debug, info, info_span, warn};

struct ActiveRender {
    generation: u64,
    stop: CancelFlag,
}

/// Owns the single in-flight render.
///
/// Starting a render while another is running cancels the older one and
/// waits for its workers to drain before any new work begins.
pub struct RenderSession {
    generation: AtomicU64,
    last_completed_generation: AtomicU64,
    active: Mutex<Option<ActiveRender>>,
    drained: Condvar,
}

/// Frees the session slot when a render finishes, however it finishes.
struct ActiveSlot<'a> {
    session: &'a RenderSession,
}

impl Drop for ActiveSlot<'_> {
    fn drop(&mut self) {
        *self.session.lock_active() = None;
        self.session.drained.notify_all();
    }
}

impl Default for RenderSession {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSession {
    #[must_use]
    pub fn new() -> Self {
        Self {
            generation: AtomicU64::new(0),
            last_completed_generation: AtomicU64::new(0),
            active: Mutex::new(None),
            drained: Condvar::new(),
        }
    }

    /// Renders `params` into `buffer`.
    ///
    /// Parameters, palette and buffer size are checked before anything else;
    /// a rejected call leaves the buffer and any in-flight render untouched.
    pub fn render<P, C>(
        &self,
        params: &RenderParameters,
        palette: &Palette,
        buffer: &mut PixelBuffer,
        progress: &P,
        cancel: &C,
    ) -> RenderOutcome
    where
        P: ProgressReporter + ?Sized,
        C: CancelToken + ?Sized,
    {
        if let Err(err) = Self::validate(params, palette, buffer) {
            warn!(error = %err, "rejected render request");
            return RenderOutcome::Failed(RenderError::InvalidParameter(err));
        }

        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let span = info_span!(
            "render",
            generation,
            kind = %params.kind(),
            width = params.canvas_width,
            height = params.canvas_height
        );
        let _entered = span.enter();

        let Some((_slot, stop)) = self.acquire(generation) else {
            debug!("superseded before starting");
            return RenderOutcome::Cancelled;
        };

        // A newer request, an explicit cancel_active() or the caller's token all stop this render.
        let should_stop = || {
            stop.is_cancelled()
                || self.generation.load(Ordering::Acquire) != generation
                || cancel.is_cancelled()
        };

        let start = Instant::now();
        let outcome = RenderOutcome::from(Self::dispatch(params, palette, buffer, progress, &should_stop));
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        match &outcome {
            RenderOutcome::Completed => {
                self.last_completed_generation.store(generation, Ordering::Release);
                info!(elapsed_ms, "render completed");
            }
            RenderOutcome::Cancelled => info!(elapsed_ms, "render cancelled"),
            RenderOutcome::Failed(err) => warn!(elapsed_ms, error = %err, "render failed"),
        }

        outcome
    }

    /// Requests cancellation of the in-flight render, if there is one.
    pub fn cancel_active(&self) {
        if let Some(active) = self.lock_active().as_ref() {
            debug!(generation = active.generation, "cancelling active render");
            active.stop.cancel();
        }
    }

    #[must_use]
    pub fn is_rendering(&self) -> bool {
        self.lock_active().is_some()
    }

    /// Generation of the most recent render that ran to completion, 0 if none.
    #[must_use]
    pub fn last_completed_generation(&self) -> u64 {
        self.last_completed_generation.load(Ordering::Acquire)
    }

    fn validate(params: &RenderParameters, palette: &Palette, buffer: &PixelBuffer) -> Result<(), ParameterError> {
        params.validate()?;
        palette.validate()?;

        if buffer.width() != params.canvas_width || buffer.height() != params.canvas_height {
            return Err(ParameterError::BufferSizeMismatch {
                expected_width: params.canvas_width,
                expected_height: params.canvas_height,
                width: buffer.width(),
                height: buffer.height(),
            });
        }

        Ok(())
    }

    fn lock_active(&self) -> MutexGuard<'_, Option<ActiveRender>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Waits until no render is active, cancelling whichever one is, then
    /// claims the slot. Returns `None` if a newer request arrived meanwhile.
    fn acquire(&self, generation: u64) -> Option<(ActiveSlot<'_>, CancelFlag)> {
        let mut active = self.lock_active();

        while let Some(previous) = active.as_ref() {
            if self.generation.load(Ordering::Acquire) != generation {
                return None;
            }

            warn!(preempted = previous.generation, "preempting in-flight render");
            previous.stop.cancel();
            active = self.drained.wait(active).unwrap_or_else(PoisonError::into_inner);
        }

        if self.generation.load(Ordering::Acquire) != generation {
            return None;
        }

        let stop = CancelFlag::new();
        *active = Some(ActiveRender {
            generation,
            stop: stop.clone(),
        });

        Some((ActiveSlot { session: self }, stop))
    }

    fn dispatch<P, C>(
        params: &RenderParameters,
        palette: &Palette,
        buffer: &mut PixelBuffer,
        progress: &P,
        cancel: &C,
    ) -> Result<(), ScheduleError>
    where
        P: ProgressReporter + ?Sized,
        C: CancelToken + ?Sized,
    {
        let kernel = FractalKernel::from_parameters(params);
        let colour_map =
            PaletteColourMapper::new(palette, params.colour_mode, params.max_iterations, kernel.root_count());
        let transform = ViewTransform::from_parameters(params);
        let band_job = BandJob {
            transform,
            supersample: params.supersample.factor(),
            thread_count: params.thread_count,
        };

        match &kernel {
            FractalKernel::EscapeTime(kernel) => {
                render_row_bands(kernel, &colour_map, band_job, buffer, progress, cancel)
            }
            FractalKernel::RootConvergence(kernel) => {
                render_row_bands(kernel, &colour_map, band_job, buffer, progress, cancel)
            }
            FractalKernel::GeometricRecursive(kernel) => {
                render_row_bands(kernel, &colour_map, band_job, buffer, progress, cancel)
            }
            FractalKernel::ChaosGame {
                kernel,
                steps,
                rng_seed,
            } => {
                let job = ChaosJob {
                    transform,
                    supersample: params.supersample.factor(),
                    thread_count: params.thread_count,
                    steps: *steps,
                    rng_seed: *rng_seed,
                };
                render_chaos_game(kernel, &colour_map, job, buffer, progress, cancel)
            }
        }
    }
}
