/// Per-cell visitation counts for the chaos game, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DensityGrid {
    width: usize,
    height: usize,
    cells: Vec<u32>,
}

impl DensityGrid {
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0; width * height],
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Increments the cell under `(x, y)`; points off the grid are dropped.
    pub fn plot(&mut self, x: f64, y: f64) {
        if !(x >= 0.0 && y >= 0.0) {
            return;
        }

        let (cx, cy) = (x as usize, y as usize);
        if cx < self.width && cy < self.height {
            let cell = &mut self.cells[cy * self.width + cx];
            *cell = cell.saturating_add(1);
        }
    }

    #[must_use]
    pub fn hits(&self, x: usize, y: usize) -> u32 {
        self.cells[y * self.width + x]
    }

    #[must_use]
    pub fn peak(&self) -> u32 {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    #[must_use]
    pub fn total_hits(&self) -> u64 {
        self.cells.iter().map(|&c| u64::from(c)).sum()
    }

    #[must_use]
    pub fn covered_cells(&self) -> usize {
        self.cells.iter().filter(|&&c| c > 0).count()
    }

    /// Adds another grid of the same dimensions into this one.
    pub fn merge(&mut self, other: &Self) {
        debug_assert_eq!((self.width, self.height), (other.width, other.height));

        for (cell, &add) in self.cells.iter_mut().zip(other.cells.iter()) {
            *cell = cell.saturating_add(add);
        }
    }
}
