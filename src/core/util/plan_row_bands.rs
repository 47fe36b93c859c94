use std::ops::Range;

pub const BANDS_PER_WORKER: usize = 4;

/// Contiguous run of scanlines rendered by one task.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RowBand {
    pub start_row: usize,
    pub row_count: usize,
}

impl RowBand {
    #[must_use]
    pub fn rows(&self) -> Range<usize> {
        self.start_row..self.start_row + self.row_count
    }
}

/// Splits `height` rows into disjoint bands covering every row exactly once.
///
/// Produces `BANDS_PER_WORKER * thread_count` bands, capped at `height`.
/// Leftover rows go one each to the leading bands.
#[must_use]
pub fn plan_row_bands(height: usize, thread_count: usize) -> Vec<RowBand> {
    if height == 0 {
        return Vec::new();
    }

    let band_count = (thread_count.max(1) * BANDS_PER_WORKER).min(height);
    let rows_per_band = height / band_count;
    let remainder = height % band_count;

    let mut bands = Vec::with_capacity(band_count);
    let mut start_row = 0;

    for band_index in 0..band_count {
        let row_count = rows_per_band + usize::from(band_index < remainder);
        bands.push(RowBand {
            start_row,
            row_count,
        });
        start_row += row_count;
    }

    bands
}
