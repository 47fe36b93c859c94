/// Classification of a single evaluated point, consumed immediately by the
/// colour mapper.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SampleResult {
    /// Left the escape radius after `iterations` steps; `smooth` is the
    /// continuous iteration index.
    Escaped { iterations: u32, smooth: f64 },
    /// Stayed bounded up to the iteration (or depth) limit.
    Interior { iterations: u32 },
    /// Newton iteration settled on root number `root`.
    Converged { root: usize, iterations: u32 },
    /// Newton iteration did not settle on any root.
    NoRoot,
    /// Chaos game visitation count for a cell, with the grid's peak count.
    Density { hits: u32, peak: u32 },
}
