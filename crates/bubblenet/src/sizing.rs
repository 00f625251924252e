//! Weight-to-radius size model.
//!
//! Radii are bounded by a per-call `[min_radius, max_radius]` pair taken from a count-keyed
//! tier table, then scaled by viewport area so total bubble area stays roughly proportional to
//! the available surface regardless of item count. The mapping is a pure function: identical
//! inputs always yield identical radii.

use crate::model::{Item, Viewport, Weighted};

/// Per-count-band parameters for the collision-aware pipeline. Both the radius bounds and the
/// iteration budgets shrink as the item count grows, which is what bounds worst-case running
/// time without external cancellation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PackedTier {
    pub(crate) max_items: usize,
    pub(crate) min_radius: f64,
    pub(crate) max_radius: f64,
    pub(crate) spiral_rings: usize,
    pub(crate) relax_iterations: usize,
    pub(crate) resolve_passes: usize,
}

pub(crate) static TIERS: [PackedTier; 5] = [
    PackedTier {
        max_items: 50,
        min_radius: 22.0,
        max_radius: 68.0,
        spiral_rings: 16,
        relax_iterations: 48,
        resolve_passes: 6,
    },
    PackedTier {
        max_items: 100,
        min_radius: 16.0,
        max_radius: 52.0,
        spiral_rings: 12,
        relax_iterations: 32,
        resolve_passes: 4,
    },
    PackedTier {
        max_items: 150,
        min_radius: 12.0,
        max_radius: 42.0,
        spiral_rings: 9,
        relax_iterations: 20,
        resolve_passes: 3,
    },
    PackedTier {
        max_items: 200,
        min_radius: 10.0,
        max_radius: 34.0,
        spiral_rings: 8,
        relax_iterations: 12,
        resolve_passes: 2,
    },
    PackedTier {
        max_items: usize::MAX,
        min_radius: 8.0,
        max_radius: 26.0,
        spiral_rings: 6,
        relax_iterations: 8,
        resolve_passes: 1,
    },
];

pub(crate) fn tier_for(n: usize) -> &'static PackedTier {
    TIERS
        .iter()
        .find(|t| n <= t.max_items)
        .unwrap_or(&TIERS[TIERS.len() - 1])
}

/// The tier bounds are calibrated against this surface; other viewports scale by the square
/// root of the area ratio, clamped so extreme windows stay usable.
const REFERENCE_AREA: f64 = 1280.0 * 800.0;
const VIEWPORT_SCALE_MIN: f64 = 0.5;
const VIEWPORT_SCALE_MAX: f64 = 1.8;

/// Ceiling on the share of the viewport the largest-possible bubble set may cover. Keeps
/// `n * pi * max_radius^2` below this fraction of `width * height`.
const FILL_FRACTION: f64 = 0.38;
const MIN_RADIUS_FLOOR: f64 = 2.0;

#[derive(Debug, Clone, Copy)]
pub(crate) struct SizeBounds {
    pub(crate) min_radius: f64,
    pub(crate) max_radius: f64,
}

pub(crate) fn bounds_for(tier: &PackedTier, n: usize, viewport: Viewport) -> SizeBounds {
    let scale = (viewport.width * viewport.height / REFERENCE_AREA)
        .sqrt()
        .clamp(VIEWPORT_SCALE_MIN, VIEWPORT_SCALE_MAX);

    let area_cap = (FILL_FRACTION * viewport.width * viewport.height
        / (std::f64::consts::PI * n.max(1) as f64))
        .sqrt();

    let max_radius = (tier.max_radius * scale)
        .min(area_cap)
        .max(MIN_RADIUS_FLOOR);
    let min_radius = (tier.min_radius * scale)
        .min(max_radius)
        .max(MIN_RADIUS_FLOOR.min(max_radius));

    SizeBounds {
        min_radius,
        max_radius,
    }
}

/// Map each item's weight into `[min_radius, max_radius]`.
///
/// Normalization is linear over the positive weights only. Items with zero, missing or
/// non-finite weights sit at the middle of the band, as does everything when all weights are
/// equal (no division by zero).
pub(crate) fn radii<P: Weighted>(items: &[Item<P>], bounds: SizeBounds) -> Vec<f64> {
    let weights: Vec<f64> = items
        .iter()
        .map(|item| {
            let w = item.payload.weight();
            if w.is_finite() && w > 0.0 { w } else { 0.0 }
        })
        .collect();

    let mut min_w = f64::INFINITY;
    let mut max_w = f64::NEG_INFINITY;
    for &w in weights.iter().filter(|&&w| w > 0.0) {
        min_w = min_w.min(w);
        max_w = max_w.max(w);
    }

    let span = max_w - min_w;
    let spread = bounds.max_radius - bounds.min_radius;

    weights
        .iter()
        .map(|&w| {
            let t = if w <= 0.0 || !span.is_finite() || span <= f64::EPSILON {
                0.5
            } else {
                (w - min_w) / span
            };
            bounds.min_radius + t * spread
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(weights: &[f64]) -> Vec<Item<f64>> {
        weights
            .iter()
            .enumerate()
            .map(|(i, &w)| Item::new(format!("item-{i}"), w))
            .collect()
    }

    #[test]
    fn tier_selection_follows_count_thresholds() {
        assert_eq!(tier_for(1).max_items, 50);
        assert_eq!(tier_for(50).max_items, 50);
        assert_eq!(tier_for(51).max_items, 100);
        assert_eq!(tier_for(180).max_items, 200);
        assert_eq!(tier_for(5000).max_items, usize::MAX);
    }

    #[test]
    fn radius_bounds_shrink_as_count_grows() {
        let vp = Viewport::new(1280.0, 800.0);
        let small = bounds_for(tier_for(20), 20, vp);
        let large = bounds_for(tier_for(180), 180, vp);
        assert!(large.max_radius < small.max_radius);
        assert!(large.min_radius <= small.min_radius);
    }

    #[test]
    fn total_max_area_respects_the_fill_fraction() {
        let vp = Viewport::new(800.0, 600.0);
        for n in [10usize, 60, 120, 240] {
            let b = bounds_for(tier_for(n), n, vp);
            let worst_case = n as f64 * std::f64::consts::PI * b.max_radius * b.max_radius;
            // MIN_RADIUS_FLOOR can push tiny viewports past the cap; not reachable here.
            assert!(
                worst_case <= FILL_FRACTION * vp.width * vp.height * 1.001,
                "n={n} worst_case={worst_case}"
            );
        }
    }

    #[test]
    fn heavier_items_never_get_smaller_radii() {
        let set = items(&[5.0, 125.0, 125.0, 4000.0, 0.5]);
        let bounds = bounds_for(tier_for(set.len()), set.len(), Viewport::new(1280.0, 800.0));
        let r = radii(&set, bounds);
        assert!(r[0] > r[4]);
        assert!(r[1] > r[0]);
        assert_eq!(r[1], r[2]);
        assert!(r[3] > r[1]);
        assert!((r[3] - bounds.max_radius).abs() < 1e-9);
    }

    #[test]
    fn equal_and_zero_weights_sit_mid_band() {
        let bounds = SizeBounds {
            min_radius: 10.0,
            max_radius: 30.0,
        };
        let equal = radii(&items(&[7.0, 7.0, 7.0]), bounds);
        assert!(equal.iter().all(|r| (r - 20.0).abs() < 1e-9));

        let zeroes = radii(&items(&[0.0, f64::NAN, -3.0]), bounds);
        assert!(zeroes.iter().all(|r| (r - 20.0).abs() < 1e-9));
    }

    #[test]
    fn size_model_is_pure() {
        let set = items(&[1.0, 10.0, 100.0]);
        let vp = Viewport::new(1440.0, 900.0);
        let bounds = bounds_for(tier_for(set.len()), set.len(), vp);
        assert_eq!(radii(&set, bounds), radii(&set, bounds));
    }
}
