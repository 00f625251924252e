//! Uniform-cell spatial hash over placed bubbles.
//!
//! Collision queries during placement and relaxation would otherwise scan every placed bubble;
//! the hash turns them into a lookup over the handful of cells near the query point. Cells are
//! keyed sparsely so empty regions of the viewport cost nothing.

use rustc_hash::FxHashMap;

use crate::place::Body;

/// Extra reach added on both insert and query so a bubble is found even when the query point
/// sits just outside its cell footprint.
pub(crate) const SEARCH_MARGIN: f64 = 4.0;

#[derive(Debug)]
pub(crate) struct SpatialIndex {
    cell_size: f64,
    /// The largest radius any indexed bubble can have; folded into the query reach.
    max_radius: f64,
    gap: f64,
    cells: FxHashMap<(i32, i32), Vec<usize>>,
}

impl SpatialIndex {
    /// Cell size is `2 * max_radius + gap + margin`: one cell comfortably holds the largest
    /// bubble, so an insert touches at most a 2x2 block in the common case.
    pub(crate) fn new(max_radius: f64, gap: f64) -> Self {
        let cell_size = (2.0 * max_radius + gap + SEARCH_MARGIN).max(1.0);
        Self {
            cell_size,
            max_radius,
            gap,
            cells: FxHashMap::default(),
        }
    }

    fn cell_of(&self, v: f64) -> i32 {
        (v / self.cell_size).floor() as i32
    }

    pub(crate) fn insert(&mut self, idx: usize, x: f64, y: f64, radius: f64) {
        let reach = radius + SEARCH_MARGIN;
        let x0 = self.cell_of(x - reach);
        let x1 = self.cell_of(x + reach);
        let y0 = self.cell_of(y - reach);
        let y1 = self.cell_of(y + reach);
        for cx in x0..=x1 {
            for cy in y0..=y1 {
                self.cells.entry((cx, cy)).or_default().push(idx);
            }
        }
    }

    /// Indices of every bubble whose cell footprint lies within
    /// `radius + max_radius + gap + margin` of `(x, y)`. Sorted and deduplicated, so callers
    /// iterate a stable neighbor order.
    pub(crate) fn query(&self, x: f64, y: f64, radius: f64) -> Vec<usize> {
        let reach = radius + self.max_radius + self.gap + SEARCH_MARGIN;
        let x0 = self.cell_of(x - reach);
        let x1 = self.cell_of(x + reach);
        let y0 = self.cell_of(y - reach);
        let y1 = self.cell_of(y + reach);

        let mut out = Vec::new();
        for cx in x0..=x1 {
            for cy in y0..=y1 {
                if let Some(bucket) = self.cells.get(&(cx, cy)) {
                    out.extend_from_slice(bucket);
                }
            }
        }
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Drop every cell and reinsert the given bodies. Called after any pass that moves many
    /// bubbles at once; incremental membership tracking is not worth the bookkeeping at this
    /// problem scale.
    pub(crate) fn rebuild(&mut self, bodies: &[Body]) {
        self.cells.clear();
        for (idx, b) in bodies.iter().enumerate() {
            self.insert(idx, b.x, b.y, b.radius);
        }
    }
}
