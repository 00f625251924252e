//! Iterative relaxation.
//!
//! After initial placement the field can still hold near-contacts (clamped candidates,
//! coincident-center nudges). Each iteration accumulates a repulsive displacement for every
//! bubble from its spatial neighbors, adds a boundary correction, applies the sum and clamps.
//! The index is rebuilt after every iteration because potentially every bubble moved.

use crate::model::Viewport;
use crate::options::LayoutOptions;
use crate::place::{Body, clamp_span};
use crate::sizing::PackedTier;
use crate::spatial::SpatialIndex;

/// Fraction of the pairwise overlap each side moves per iteration. Both sides accumulate, so
/// a lone overlapping pair separates in roughly one iteration.
const PUSH_STRENGTH: f64 = 0.55;

/// Displacements below this are treated as settled.
const SETTLED_EPS: f64 = 0.01;

/// Deterministic direction for exactly coincident centers, spread by index so stacked bubbles
/// fan out instead of oscillating along one axis.
fn degenerate_direction(i: usize, j: usize) -> (f64, f64) {
    let angle = (i as f64 * 0.618_034 + j as f64 * 0.414_214) * std::f64::consts::TAU;
    (angle.cos(), angle.sin())
}

pub(crate) fn relax(
    bodies: &mut [Body],
    viewport: Viewport,
    opts: &LayoutOptions,
    tier: &PackedTier,
    max_radius: f64,
) {
    if bodies.len() < 2 {
        return;
    }

    let slack = opts.gap + opts.collision_buffer;
    let mut index = SpatialIndex::new(max_radius, opts.gap);
    let mut disp = vec![(0.0_f64, 0.0_f64); bodies.len()];

    for _ in 0..tier.relax_iterations {
        index.rebuild(bodies);
        disp.iter_mut().for_each(|d| *d = (0.0, 0.0));

        for i in 0..bodies.len() {
            let a = bodies[i];
            for j in index.query(a.x, a.y, a.radius) {
                if j == i {
                    continue;
                }
                let b = bodies[j];
                let required = a.radius + b.radius + slack;
                let dx = a.x - b.x;
                let dy = a.y - b.y;
                let dist_sq = dx * dx + dy * dy;
                if dist_sq >= required * required {
                    continue;
                }

                let dist = dist_sq.sqrt();
                let (ux, uy) = if dist > 1e-9 {
                    (dx / dist, dy / dist)
                } else {
                    degenerate_direction(i, j)
                };
                let overlap = required - dist;
                disp[i].0 += ux * overlap * PUSH_STRENGTH;
                disp[i].1 += uy * overlap * PUSH_STRENGTH;
            }

            // Boundary correction: pull anything that drifted outside straight back to the
            // nearest legal coordinate.
            let lo_x = opts.edge_padding + a.radius;
            let hi_x = viewport.width - opts.edge_padding - a.radius;
            let lo_y = opts.edge_padding + a.radius;
            let hi_y = viewport.height - opts.edge_padding - a.radius;
            if a.x < lo_x {
                disp[i].0 += lo_x - a.x;
            } else if a.x > hi_x {
                disp[i].0 += hi_x - a.x;
            }
            if a.y < lo_y {
                disp[i].1 += lo_y - a.y;
            } else if a.y > hi_y {
                disp[i].1 += hi_y - a.y;
            }
        }

        let mut moved = false;
        for (b, &(dx, dy)) in bodies.iter_mut().zip(disp.iter()) {
            if dx.abs() < SETTLED_EPS && dy.abs() < SETTLED_EPS {
                continue;
            }
            moved = true;
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

        if !moved {
            break;
        }
    }
}
