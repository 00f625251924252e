#![forbid(unsafe_code)]

//! Deterministic bubble-field layout for weighted items in a fixed viewport.
//!
//! Given a list of `{id, weight-bearing payload}` items and a viewport, [`layout`] computes
//! non-overlapping circle placements with radii proportional to each item's weight. The
//! computation is synchronous, pure and seeded: identical input yields identical output, so a
//! dashboard refreshing its data does not see markers jump.
//!
//! Runtime is bounded by count-tiered iteration budgets; above a fixed threshold the engine
//! switches outright to a fixed-size grid ([`Strategy`] selection happens once per call), so
//! even thousands of items cannot stall the host.

mod candidates;
mod place;
mod relax;
mod resolve;
mod rng;
mod sizing;
mod spatial;
mod uniform;

pub mod error;
pub mod model;
pub mod options;

pub use error::{Error, Result};
pub use model::{FieldLayout, Item, PlacedBubble, Point, Viewport, Weighted};
pub use options::LayoutOptions;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Item count above which the collision-aware pipeline is abandoned for the uniform grid.
const UNIFORM_THRESHOLD: usize = 250;
/// Above this count even the per-item jitter hashing is skipped.
const JITTER_CUTOFF: usize = 600;

/// The two layout paths. Selected once at the top of [`layout`]; the paths share no state, so
/// each is testable on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    Packed,
    Uniform { jitter: bool },
}

impl Strategy {
    fn select(n: usize) -> Self {
        if n > UNIFORM_THRESHOLD {
            Strategy::Uniform {
                jitter: n <= JITTER_CUTOFF,
            }
        } else {
            Strategy::Packed
        }
    }
}

/// Lay out `items` inside `viewport`.
///
/// Items beyond `opts.max_visible` are truncated before anything else happens. The returned
/// [`FieldLayout`] carries the placements plus the count of items the packed pipeline had to
/// drop (the uniform path never drops).
///
/// Errors only on an invalid viewport; an empty item list is a valid input with an empty
/// result.
pub fn layout<P: Weighted + Clone>(
    items: &[Item<P>],
    viewport: Viewport,
    opts: &LayoutOptions,
) -> Result<FieldLayout<P>> {
    viewport.validate()?;
    if items.is_empty() {
        return Ok(FieldLayout::empty());
    }

    let items = &items[..items.len().min(opts.max_visible)];
    let n = items.len();
    let strategy = Strategy::select(n);
    tracing::debug!(n, ?strategy, "selected layout strategy");

    match strategy {
        Strategy::Uniform { jitter } => Ok(uniform::layout(items, viewport, opts, jitter)),
        Strategy::Packed => Ok(packed(items, viewport, opts)),
    }
}

/// Fail-soft variant: any error becomes an empty field. Callers that need to distinguish
/// "invalid viewport" from "nothing could be laid out" use [`layout`] directly.
pub fn layout_or_empty<P: Weighted + Clone>(
    items: &[Item<P>],
    viewport: Viewport,
    opts: &LayoutOptions,
) -> FieldLayout<P> {
    match layout(items, viewport, opts) {
        Ok(field) => field,
        Err(err) => {
            tracing::debug!(%err, "layout failed; returning empty field");
            FieldLayout::empty()
        }
    }
}

/// The full collision-aware pipeline: sizing, candidate placement, relaxation, verification.
fn packed<P: Weighted + Clone>(
    items: &[Item<P>],
    viewport: Viewport,
    opts: &LayoutOptions,
) -> FieldLayout<P> {
    let n = items.len();
    let tier = sizing::tier_for(n);
    let bounds = sizing::bounds_for(tier, n, viewport);
    let radii = sizing::radii(items, bounds);
    let ids: Vec<&str> = items.iter().map(|item| item.id.as_str()).collect();

    let outcome = place::place_all(&ids, &radii, viewport, opts, tier, bounds.max_radius);
    let mut bodies = outcome.bodies;

    relax::relax(&mut bodies, viewport, opts, tier, bounds.max_radius);
    let residual = resolve::resolve_overlaps(&mut bodies, viewport, opts, tier, bounds.max_radius);
    if residual > 0 {
        tracing::debug!(residual, "overlap resolution budget exhausted");
    }

    let bubbles = bodies
        .iter()
        .enumerate()
        .map(|(index, b)| PlacedBubble {
            id: items[b.item].id.clone(),
            payload: items[b.item].payload.clone(),
            x: b.x,
            y: b.y,
            radius: b.radius,
            index,
        })
        .collect();

    FieldLayout {
        bubbles,
        skipped: outcome.skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_flips_at_the_uniform_threshold() {
        assert_eq!(Strategy::select(UNIFORM_THRESHOLD), Strategy::Packed);
        assert_eq!(
            Strategy::select(UNIFORM_THRESHOLD + 1),
            Strategy::Uniform { jitter: true }
        );
        assert_eq!(
            Strategy::select(JITTER_CUTOFF + 1),
            Strategy::Uniform { jitter: false }
        );
    }

    #[test]
    fn invalid_viewports_error_and_the_soft_wrapper_returns_empty() {
        let items = vec![Item::new("a", 10.0_f64)];
        let opts = LayoutOptions::default();
        assert!(matches!(
            layout(&items, Viewport::new(0.0, 600.0), &opts),
            Err(Error::InvalidViewport { .. })
        ));
        let soft = layout_or_empty(&items, Viewport::new(f64::NAN, 600.0), &opts);
        assert!(soft.bubbles.is_empty());
        assert_eq!(soft.skipped, 0);
    }

    #[test]
    fn max_visible_truncates_before_layout() {
        let items: Vec<Item<f64>> = (0..30)
            .map(|i| Item::new(format!("item-{i}"), i as f64))
            .collect();
        let opts = LayoutOptions {
            max_visible: 12,
            ..Default::default()
        };
        let field = layout(&items, Viewport::new(1280.0, 800.0), &opts).unwrap();
        assert_eq!(field.bubbles.len() + field.skipped, 12);
    }
}
