//! Random draw seam for the simulation
//!
//! Every randomized spawn parameter is drawn through [`UniformRange`] so
//! tests can substitute a scripted source and assert exact trajectories.
//! Production code seeds a `rand_pcg::Pcg32` (see [`super::state::SimState`])
//! and uses the blanket impl below.

use rand::Rng;

/// A source of uniform draws over a half-open range.
pub trait UniformRange {
    /// Draw a value uniformly from `[lo, hi)`. An inverted or empty range
    /// (`hi <= lo`) resolves to `lo` rather than panicking, so degenerate
    /// configuration degrades to a deterministic boundary value.
    fn uniform(&mut self, lo: f32, hi: f32) -> f32;
}

impl<R: Rng> UniformRange for R {
    fn uniform(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo { lo } else { self.random_range(lo..hi) }
    }
}
