//! Collision-free initial placement.
//!
//! Items are placed one at a time in input order. Each item takes the next candidate point;
//! when that collides it searches a discretized spiral around the candidate, then a bounded
//! run of seeded pseudo-random samples. An item that survives none of these is dropped rather
//! than drawn on top of a neighbor.

use crate::candidates;
use crate::model::{Point, Viewport};
use crate::options::LayoutOptions;
use crate::rng::{self, XorShift64Star};
use crate::sizing::PackedTier;
use crate::spatial::SpatialIndex;

/// A positioned bubble while the pipeline is still mutating it. `item` indexes the truncated
/// input slice.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Body {
    pub(crate) item: usize,
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) radius: f64,
}

#[derive(Debug)]
pub(crate) struct PlacementOutcome {
    pub(crate) bodies: Vec<Body>,
    pub(crate) skipped: usize,
}

const SPIRAL_ANGLES: usize = 12;
const RANDOM_SAMPLES: usize = 48;
/// Two centers closer than this are treated as numerically identical (grid degeneracy).
const COINCIDENT_EPS_SQ: f64 = 1e-12;

/// Clamp into `[lo, hi]`, degrading to the midpoint when the span is inverted (a bubble wider
/// than the padded viewport).
pub(crate) fn clamp_span(v: f64, lo: f64, hi: f64) -> f64 {
    if lo > hi {
        return (lo + hi) / 2.0;
    }
    v.clamp(lo, hi)
}

pub(crate) fn place_all(
    ids: &[&str],
    radii: &[f64],
    viewport: Viewport,
    opts: &LayoutOptions,
    tier: &PackedTier,
    max_radius: f64,
) -> PlacementOutcome {
    let spacing = max_radius + opts.gap + opts.animation_buffer;
    let grid = candidates::candidate_grid(viewport, opts.edge_padding, spacing);

    let mut index = SpatialIndex::new(max_radius, opts.gap);
    let mut bodies: Vec<Body> = Vec::with_capacity(ids.len());
    let mut skipped = 0usize;
    let mut cursor = 0usize;
    let mut synth = 0usize;

    for (item, (&id, &radius)) in ids.iter().zip(radii.iter()).enumerate() {
        let anchor = if cursor < grid.len() {
            let p = grid[cursor];
            cursor += 1;
            p
        } else {
            let p = candidates::synthesized_point(synth, viewport, opts.edge_padding, spacing);
            synth += 1;
            p
        };

        let placed = try_place(anchor, radius, &bodies, &index, viewport, opts, tier)
            .or_else(|| random_place(id, radius, &bodies, &index, viewport, opts));

        let Some(mut p) = placed else {
            skipped += 1;
            tracing::debug!(id, "no collision-free position found; dropping item");
            continue;
        };

        // Grid degeneracy can hand two items the exact same point; nudge the newcomer by a
        // fraction of its radius so downstream passes have a direction to separate along.
        if bodies
            .iter()
            .any(|b| (b.x - p.x).powi(2) + (b.y - p.y).powi(2) < COINCIDENT_EPS_SQ)
        {
            p.x = clamp_span(
                p.x + radius * 0.13,
                opts.edge_padding + radius,
                viewport.width - opts.edge_padding - radius,
            );
            p.y = clamp_span(
                p.y + radius * 0.07,
                opts.edge_padding + radius,
                viewport.height - opts.edge_padding - radius,
            );
        }

        let idx = bodies.len();
        index.insert(idx, p.x, p.y, radius);
        bodies.push(Body {
            item,
            x: p.x,
            y: p.y,
            radius,
        });
    }

    PlacementOutcome { bodies, skipped }
}

/// Direct candidate, then spiral probes of increasing radius around it.
fn try_place(
    anchor: Point,
    radius: f64,
    bodies: &[Body],
    index: &SpatialIndex,
    viewport: Viewport,
    opts: &LayoutOptions,
    tier: &PackedTier,
) -> Option<Point> {
    let clamped = clamp_point(anchor, radius, viewport, opts);
    if is_clear(clamped, radius, bodies, index, opts) {
        return Some(clamped);
    }

    let ring_step = radius * 0.6 + opts.gap;
    for ring in 1..=tier.spiral_rings {
        let ring_radius = ring as f64 * ring_step;
        // Stagger the start angle per ring so probes do not line up along a single spoke.
        let theta0 = ring as f64 * 0.5;
        for a in 0..SPIRAL_ANGLES {
            let theta = theta0 + a as f64 * (std::f64::consts::TAU / SPIRAL_ANGLES as f64);
            let probe = Point {
                x: anchor.x + ring_radius * theta.cos(),
                y: anchor.y + ring_radius * theta.sin(),
            };
            let probe = clamp_point(probe, radius, viewport, opts);
            if is_clear(probe, radius, bodies, index, opts) {
                return Some(probe);
            }
        }
    }
    None
}

/// Last resort: bounded pseudo-random sampling over the whole padded viewport, seeded from the
/// item id so repeated calls with identical input stay reproducible.
fn random_place(
    id: &str,
    radius: f64,
    bodies: &[Body],
    index: &SpatialIndex,
    viewport: Viewport,
    opts: &LayoutOptions,
) -> Option<Point> {
    let lo_x = opts.edge_padding + radius;
    let hi_x = viewport.width - opts.edge_padding - radius;
    let lo_y = opts.edge_padding + radius;
    let hi_y = viewport.height - opts.edge_padding - radius;

    let mut rng = XorShift64Star::new(rng::seed_for(id, opts.seed));
    for _ in 0..RANDOM_SAMPLES {
        let p = Point {
            x: rng.next_in_range(lo_x, hi_x.max(lo_x)),
            y: rng.next_in_range(lo_y, hi_y.max(lo_y)),
        };
        if is_clear(p, radius, bodies, index, opts) {
            return Some(p);
        }
    }
    None
}

fn clamp_point(p: Point, radius: f64, viewport: Viewport, opts: &LayoutOptions) -> Point {
    Point {
        x: clamp_span(
            p.x,
            opts.edge_padding + radius,
            viewport.width - opts.edge_padding - radius,
        ),
        y: clamp_span(
            p.y,
            opts.edge_padding + radius,
            viewport.height - opts.edge_padding - radius,
        ),
    }
}

fn is_clear(
    p: Point,
    radius: f64,
    bodies: &[Body],
    index: &SpatialIndex,
    opts: &LayoutOptions,
) -> bool {
    let slack = opts.gap + opts.collision_buffer;
    for idx in index.query(p.x, p.y, radius) {
        let b = &bodies[idx];
        let required = radius + b.radius + slack;
        let dx = p.x - b.x;
        let dy = p.y - b.y;
        if dx * dx + dy * dy < required * required {
            return false;
        }
    }
    true
}
