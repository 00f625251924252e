//! Candidate position grid.
//!
//! The placement resolver consumes these points in order, so the ordering is part of the
//! engine's stability contract: top-to-bottom, then left-to-right, never
//! distance-from-center (center-out ordering clusters bubbles in the middle of the viewport
//! and makes the field churn on every refresh).

use crate::model::{Point, Viewport};

/// Vertical step between hex-offset rows, as a fraction of the point spacing.
const ROW_STEP: f64 = 0.866;

/// Generate an over-provisioned hex-offset grid covering the viewport inside `edge_padding`.
///
/// Odd rows are shifted by half the spacing so the field reads as organic packing rather than
/// a lattice. The list is explicitly sorted by `(y, x)` even though generation already walks
/// rows top-down; the sort keys the stability guarantee rather than the loop structure.
pub(crate) fn candidate_grid(viewport: Viewport, edge_padding: f64, spacing: f64) -> Vec<Point> {
    let spacing = spacing.max(1.0);
    let x0 = edge_padding;
    let x1 = viewport.width - edge_padding;
    let y0 = edge_padding;
    let y1 = viewport.height - edge_padding;
    if x1 <= x0 || y1 <= y0 {
        return Vec::new();
    }

    let row_step = spacing * ROW_STEP;
    let mut points = Vec::new();
    let mut row = 0usize;
    let mut y = y0;
    while y <= y1 {
        let offset = if row % 2 == 1 { spacing / 2.0 } else { 0.0 };
        let mut x = x0 + offset;
        while x <= x1 {
            points.push(Point { x, y });
            x += spacing;
        }
        row += 1;
        y = y0 + row as f64 * row_step;
    }

    points.sort_by(|a, b| a.y.total_cmp(&b.y).then_with(|| a.x.total_cmp(&b.x)));
    points
}

/// Row-major synthesized points for items that outlive the grid, on a half-spacing lattice.
/// Wraps vertically once the viewport is exhausted; the resolver's collision test rejects
/// revisited positions, so wrapping only costs retries, not correctness.
pub(crate) fn synthesized_point(
    k: usize,
    viewport: Viewport,
    edge_padding: f64,
    spacing: f64,
) -> Point {
    let step = (spacing / 2.0).max(1.0);
    let inner_w = (viewport.width - 2.0 * edge_padding).max(1.0);
    let inner_h = (viewport.height - 2.0 * edge_padding).max(1.0);
    let cols = (inner_w / step).floor().max(1.0) as usize;

    let col = k % cols;
    let row = k / cols;
    Point {
        x: edge_padding + col as f64 * step,
        y: edge_padding + (row as f64 * step) % inner_h,
    }
}
