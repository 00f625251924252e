//! Direct overlap resolution.
//!
//! Relaxation distributes bubbles smoothly but is not guaranteed to clear every residual
//! contact within its iteration budget. This pass walks neighbor pairs and pushes overlapping
//! bubbles directly apart. Passes are bounded per tier; whatever overlap survives the budget
//! is accepted and reported to the caller as a count, never as an error. No item is removed
//! here, only repositioned.

use crate::model::Viewport;
use crate::options::LayoutOptions;
use crate::place::{Body, clamp_span};
use crate::sizing::PackedTier;
use crate::spatial::SpatialIndex;

/// Symmetric pushes move each side slightly more than half the overlap so a pair does not
/// land exactly on the threshold and re-trigger next pass.
const PUSH_FACTOR: f64 = 0.55;
const OVERLAP_EPS: f64 = 1e-6;

/// Returns the number of overlapping pairs found in the final pass (zero means the field is
/// clean).
pub(crate) fn resolve_overlaps(
    bodies: &mut [Body],
    viewport: Viewport,
    opts: &LayoutOptions,
    tier: &PackedTier,
    max_radius: f64,
) -> usize {
    if bodies.len() < 2 {
        return 0;
    }

    let mut index = SpatialIndex::new(max_radius, opts.gap);
    let mut found = 0usize;

    for _ in 0..tier.resolve_passes {
        index.rebuild(bodies);
        found = 0;

        for i in 0..bodies.len() {
            let (xi, yi, ri) = (bodies[i].x, bodies[i].y, bodies[i].radius);
            for j in index.query(xi, yi, ri) {
                if j <= i {
                    continue;
                }
                if separate_pair(bodies, i, j, viewport, opts) {
                    found += 1;
                }
            }
        }

        if found == 0 {
            break;
        }
    }

    found
}

/// Push `i` and `j` apart when they truly overlap. Returns whether they did.
fn separate_pair(
    bodies: &mut [Body],
    i: usize,
    j: usize,
    viewport: Viewport,
    opts: &LayoutOptions,
) -> bool {
    let min_dist = bodies[i].radius + bodies[j].radius + opts.gap;
    let Some((ux, uy, dist)) = overlap_axis(&bodies[i], &bodies[j], min_dist, i, j) else {
        return false;
    };

    let push = (min_dist - dist) * PUSH_FACTOR + OVERLAP_EPS;
    shift(&mut bodies[i], -ux * push, -uy * push, viewport, opts);
    shift(&mut bodies[j], ux * push, uy * push, viewport, opts);

    // Clamping can pin one side against the viewport edge and eat its share of the push; move
    // the second bubble alone by the full remainder.
    if let Some((ux, uy, dist)) = overlap_axis(&bodies[i], &bodies[j], min_dist, i, j) {
        let remainder = (min_dist - dist) * 1.1;
        shift(&mut bodies[j], ux * remainder, uy * remainder, viewport, opts);
    }

    true
}

/// Unit vector from `a` to `b` plus their center distance, when the pair sits closer than
/// `min_dist`. Coincident centers get a deterministic index-derived direction.
fn overlap_axis(a: &Body, b: &Body, min_dist: f64, i: usize, j: usize) -> Option<(f64, f64, f64)> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let dist_sq = dx * dx + dy * dy;
    if dist_sq >= (min_dist - OVERLAP_EPS) * (min_dist - OVERLAP_EPS) {
        return None;
    }

    let dist = dist_sq.sqrt();
    if dist > 1e-9 {
        Some((dx / dist, dy / dist, dist))
    } else {
        let angle = (i as f64 * 0.618_034 + j as f64 * 0.414_214) * std::f64::consts::TAU;
        Some((angle.cos(), angle.sin(), 0.0))
    }
}

fn shift(b: &mut Body, dx: f64, dy: f64, viewport: Viewport, opts: &LayoutOptions) {
    b.x = clamp_span(
        b.x + dx,
        opts.edge_padding + b.radius,
        viewport.width - opts.edge_padding - b.radius,
    );
    b.y = clamp_span(
        b.y + dy,
        opts.edge_padding + b.radius,
        viewport.height - opts.edge_padding - b.radius,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sizing;

    fn body(item: usize, x: f64, y: f64, radius: f64) -> Body {
        Body { item, x, y, radius }
    }

    fn pair_distance(a: &Body, b: &Body) -> f64 {
        ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
    }

    #[test]
    fn overlapping_pair_ends_separated() {
        let opts = LayoutOptions::default();
        let mut bodies = vec![
            body(0, 400.0, 300.0, 25.0),
            body(1, 420.0, 300.0, 25.0),
        ];
        let residual = resolve_overlaps(
            &mut bodies,
            Viewport::new(800.0, 600.0),
            &opts,
            sizing::tier_for(2),
            25.0,
        );
        assert_eq!(residual, 0);
        assert!(pair_distance(&bodies[0], &bodies[1]) >= 50.0 + opts.gap - 1e-6);
    }

    #[test]
    fn pinned_bubble_triggers_the_asymmetric_push() {
        let opts = LayoutOptions::default();
        let vp = Viewport::new(800.0, 600.0);
        // Bubble 0 sits hard against the left edge; the symmetric half-push cannot move it
        // further left, so bubble 1 must absorb the remainder.
        let mut bodies = vec![
            body(0, opts.edge_padding + 25.0, 300.0, 25.0),
            body(1, opts.edge_padding + 35.0, 300.0, 25.0),
        ];
        let residual = resolve_overlaps(&mut bodies, vp, &opts, sizing::tier_for(2), 25.0);
        assert_eq!(residual, 0);
        assert!((bodies[0].x - (opts.edge_padding + 25.0)).abs() < 1.0);
        assert!(pair_distance(&bodies[0], &bodies[1]) >= 50.0 + opts.gap - 1e-6);
    }

    #[test]
    fn clean_fields_finish_in_one_pass() {
        let opts = LayoutOptions::default();
        let mut bodies = vec![
            body(0, 100.0, 100.0, 20.0),
            body(1, 300.0, 300.0, 20.0),
        ];
        let residual = resolve_overlaps(
            &mut bodies,
            Viewport::new(800.0, 600.0),
            &opts,
            sizing::tier_for(2),
            20.0,
        );
        assert_eq!(residual, 0);
        assert_eq!(bodies[0].x, 100.0);
        assert_eq!(bodies[1].y, 300.0);
    }

    #[test]
    fn item_count_is_preserved() {
        let opts = LayoutOptions::default();
        let mut bodies: Vec<Body> = (0..12)
            .map(|i| body(i, 200.0 + (i % 4) as f64 * 20.0, 200.0 + (i / 4) as f64 * 20.0, 18.0))
            .collect();
        resolve_overlaps(
            &mut bodies,
            Viewport::new(800.0, 600.0),
            &opts,
            sizing::tier_for(12),
            18.0,
        );
        assert_eq!(bodies.len(), 12);
    }
}
