//! Fixed-size grid fallback for large inputs.
//!
//! Above the large-input threshold the collision-aware pipeline would blow its time budget,
//! so the engine trades visual richness for a hard runtime ceiling: every bubble gets the same
//! radius, placed at the center of a row/column cell. Cells are sized so the fixed-radius
//! circles cannot overlap by construction, which also means no item is ever dropped.

use crate::model::{FieldLayout, Item, PlacedBubble, Viewport};
use crate::options::LayoutOptions;
use crate::rng::{self, XorShift64Star};

/// Share of the half-cell the fixed radius occupies. Leaves room for the jitter amplitude
/// plus a visible gap between neighbors.
const RADIUS_SHARE: f64 = 0.42;

/// Jitter amplitude as a fraction of the cell size. Jitter breaks the lattice look; it is
/// skipped entirely above `jitter_cutoff` because even cheap per-item hashing shows up in
/// profiles at that scale.
const JITTER_SHARE: f64 = 0.08;

pub(crate) fn layout<P: Clone>(
    items: &[Item<P>],
    viewport: Viewport,
    opts: &LayoutOptions,
    jitter: bool,
) -> FieldLayout<P> {
    let n = items.len();
    if n == 0 {
        return FieldLayout::empty();
    }

    let inner_w = (viewport.width - 2.0 * opts.edge_padding).max(1.0);
    let inner_h = (viewport.height - 2.0 * opts.edge_padding).max(1.0);

    // Columns/rows chosen so cells approximate squares at the viewport's aspect ratio.
    let aspect = inner_w / inner_h;
    let cols = ((n as f64 * aspect).sqrt().ceil() as usize).max(1);
    let rows = n.div_ceil(cols);

    let cell_w = inner_w / cols as f64;
    let cell_h = inner_h / rows as f64;
    let cell_min = cell_w.min(cell_h);

    let amplitude = if jitter { cell_min * JITTER_SHARE } else { 0.0 };
    let radius = (cell_min * RADIUS_SHARE - amplitude).max(1.0);

    let mut bubbles = Vec::with_capacity(n);
    for (index, item) in items.iter().enumerate() {
        let col = index % cols;
        let row = index / cols;
        let mut x = opts.edge_padding + (col as f64 + 0.5) * cell_w;
        let mut y = opts.edge_padding + (row as f64 + 0.5) * cell_h;

        if jitter {
            let mut rng = XorShift64Star::new(rng::seed_for(&item.id, opts.seed));
            x += rng.next_in_range(-amplitude, amplitude);
            y += rng.next_in_range(-amplitude, amplitude);
        }

        bubbles.push(PlacedBubble {
            id: item.id.clone(),
            payload: item.payload.clone(),
            x,
            y,
            radius,
            index,
        });
    }

    FieldLayout {
        bubbles,
        skipped: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> Vec<Item<f64>> {
        (0..n).map(|i| Item::new(format!("item-{i}"), i as f64)).collect()
    }

    #[test]
    fn every_item_is_placed_with_identical_radius() {
        let set = items(400);
        let out = layout(&set, Viewport::new(1920.0, 1080.0), &LayoutOptions::default(), true);
        assert_eq!(out.bubbles.len(), 400);
        assert_eq!(out.skipped, 0);
        let r = out.bubbles[0].radius;
        assert!(out.bubbles.iter().all(|b| b.radius == r));
    }

    #[test]
    fn cells_cannot_overlap_by_construction() {
        let set = items(300);
        let out = layout(&set, Viewport::new(1600.0, 900.0), &LayoutOptions::default(), true);
        for (i, a) in out.bubbles.iter().enumerate() {
            for b in out.bubbles.iter().skip(i + 1) {
                let d = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
                assert!(d >= a.radius + b.radius - 1e-9, "bubbles {i} overlap: d={d}");
            }
        }
    }

    #[test]
    fn bubbles_stay_inside_the_padded_viewport() {
        let set = items(500);
        let opts = LayoutOptions::default();
        let vp = Viewport::new(1920.0, 1080.0);
        let out = layout(&set, vp, &opts, true);
        for b in &out.bubbles {
            assert!(b.x - b.radius >= opts.edge_padding - 1e-9);
            assert!(b.x + b.radius <= vp.width - opts.edge_padding + 1e-9);
            assert!(b.y - b.radius >= opts.edge_padding - 1e-9);
            assert!(b.y + b.radius <= vp.height - opts.edge_padding + 1e-9);
        }
    }

    #[test]
    fn jitter_is_reproducible_and_optional() {
        let set = items(260);
        let vp = Viewport::new(1280.0, 800.0);
        let opts = LayoutOptions::default();

        let a = layout(&set, vp, &opts, true);
        let b = layout(&set, vp, &opts, true);
        for (x, y) in a.bubbles.iter().zip(b.bubbles.iter()) {
            assert_eq!(x.x.to_bits(), y.x.to_bits());
            assert_eq!(x.y.to_bits(), y.y.to_bits());
        }

        let plain = layout(&set, vp, &opts, false);
        let cols = plain.bubbles.iter().filter(|b| b.y == plain.bubbles[0].y).count();
        assert!(cols > 1, "first row should hold more than one bubble");
    }
}
