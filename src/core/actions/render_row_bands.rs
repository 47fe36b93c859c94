use crate::core::actions::cancellation::{CANCEL_CHECK_INTERVAL_ROWS, CancelToken, Cancelled};
use crate::core::actions::ports::colour_map::ColourMap;
use crate::core::actions::ports::point_kernel::PointKernel;
use crate::core::actions::progress::{ProgressReporter, ProgressTracker};
use crate::core::actions::supersample::supersample_pixel;
use crate::core::actions::worker_pool::{ScheduleError, build_worker_pool, first_stop, panic_message};
use crate::core::data::pixel_buffer::{BYTES_PER_PIXEL, PixelBuffer};
use crate::core::util::coordinate_mapper::ViewTransform;
use crate::core::util::plan_row_bands::{RowBand, plan_row_bands};
use rayon::prelude::*;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Per-render settings shared by every band.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BandJob {
    pub transform: ViewTransform,
    pub supersample: usize,
    pub thread_count: usize,
}

/// Splits `buffer` into `(band, bytes)` pairs, one disjoint slice per band.
pub(crate) fn carve_bands<'a>(
    data: &'a mut [u8],
    bands: &[RowBand],
    stride: usize,
) -> Vec<(RowBand, &'a mut [u8])> {
    let mut remaining = data;
    let mut carved = Vec::with_capacity(bands.len());

    for band in bands {
        // The last row may come without trailing padding.
        let band_bytes = (band.row_count * stride).min(remaining.len());
        let (head, tail) = std::mem::take(&mut remaining).split_at_mut(band_bytes);
        carved.push((*band, head));
        remaining = tail;
    }

    carved
}

/// Fills `buffer` with the coloured output of a per-point kernel.
///
/// Rows are split into bands and the bands run on a dedicated pool of
/// `job.thread_count` threads. Every band checks for cancellation before each
/// scanline. A failing band raises a shared abort flag so its siblings stop
/// early; the first failure is reported once all bands have returned.
pub fn render_row_bands<K, M, P, C>(
    kernel: &K,
    colour_map: &M,
    job: BandJob,
    buffer: &mut PixelBuffer,
    progress: &P,
    cancel: &C,
) -> Result<(), ScheduleError>
where
    K: PointKernel + ?Sized,
    M: ColourMap + ?Sized,
    P: ProgressReporter + ?Sized,
    C: CancelToken + ?Sized,
{
    let width = buffer.width();
    let height = buffer.height();
    let stride = buffer.stride();
    let bands = plan_row_bands(height, job.thread_count);

    debug!(
        bands = bands.len(),
        thread_count = job.thread_count,
        supersample = job.supersample,
        "planned row bands"
    );

    let pool = build_worker_pool(job.thread_count)?;
    let tracker = ProgressTracker::new(height as u64, progress);
    let abort = AtomicBool::new(false);
    let tasks = carve_bands(buffer.data_mut(), &bands, stride);

    let results: Vec<Result<(), ScheduleError>> = pool.install(|| {
        tasks
            .into_par_iter()
            .map(|(band, bytes)| {
                let outcome = catch_unwind(AssertUnwindSafe(|| {
                    render_band(kernel, colour_map, &job, band, bytes, stride, width, &tracker, &abort, cancel)
                }))
                .unwrap_or_else(|payload| Err(ScheduleError::WorkerPanicked(panic_message(payload))));

                if outcome.as_ref().is_err_and(ScheduleError::is_failure) {
                    abort.store(true, Ordering::Release);
                }

                outcome
            })
            .collect()
    });

    first_stop(results).map(|_| ())
}

#[allow(clippy::too_many_arguments)]
fn render_band<K, M, P, C>(
    kernel: &K,
    colour_map: &M,
    job: &BandJob,
    band: RowBand,
    bytes: &mut [u8],
    stride: usize,
    width: usize,
    tracker: &ProgressTracker<'_, P>,
    abort: &AtomicBool,
    cancel: &C,
) -> Result<(), ScheduleError>
where
    K: PointKernel + ?Sized,
    M: ColourMap + ?Sized,
    P: ProgressReporter + ?Sized,
    C: CancelToken + ?Sized,
{
    let row_bytes = width * BYTES_PER_PIXEL;

    for (row_offset, y) in band.rows().enumerate() {
        if row_offset % CANCEL_CHECK_INTERVAL_ROWS == 0
            && (abort.load(Ordering::Acquire) || cancel.is_cancelled())
        {
            return Err(ScheduleError::Cancelled(Cancelled));
        }

        let row_start = row_offset * stride;
        let row = &mut bytes[row_start..row_start + row_bytes];

        for (x, pixel) in row.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
            let colour = supersample_pixel(kernel, colour_map, &job.transform, x, y, job.supersample)?;
            pixel.copy_from_slice(&colour.to_bytes());
        }

        tracker.advance(1);
    }

    Ok(())
}
