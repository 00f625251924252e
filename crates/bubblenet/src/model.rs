//! Core item and placement types.
//!
//! These are intentionally lightweight and `Clone`-friendly so callers can hand the engine a
//! fresh item list on every refresh and keep the returned placements for rendering.

use serde::Serialize;

use crate::error::{Error, Result};

/// Read access to the weight attribute that drives bubble sizing.
///
/// Callers implement this for whatever payload type they feed the engine. Weights that are
/// non-finite or negative are treated as absent (the item gets a neutral mid-range radius).
pub trait Weighted {
    fn weight(&self) -> f64;
}

impl Weighted for f64 {
    fn weight(&self) -> f64 {
        *self
    }
}

/// JSON payloads expose their weight through a numeric `"weight"` field. A missing or
/// non-numeric field reads as `0.0`, which the size model maps to a mid-range radius.
impl Weighted for serde_json::Value {
    fn weight(&self) -> f64 {
        self.get("weight").and_then(|v| v.as_f64()).unwrap_or(0.0)
    }
}

/// One input unit: a stable identity plus an opaque, weight-bearing payload.
#[derive(Debug, Clone)]
pub struct Item<P> {
    pub id: String,
    pub payload: P,
}

impl<P> Item<P> {
    pub fn new(id: impl Into<String>, payload: P) -> Self {
        Self {
            id: id.into(),
            payload,
        }
    }
}

/// The fixed target surface, in the caller's coordinate units (top-left origin).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub(crate) fn validate(self) -> Result<()> {
        if !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
        {
            return Err(Error::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A positioned, sized bubble. `index` is the position in the output list, which renderers
/// typically use to stagger entry animations.
#[derive(Debug, Clone, Serialize)]
pub struct PlacedBubble<P> {
    pub id: String,
    pub payload: P,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub index: usize,
}

/// The result of one layout call.
///
/// `skipped` counts items the collision-aware pipeline dropped rather than allowing them to
/// stack on a neighbor. The uniform-grid path never drops items.
#[derive(Debug, Clone, Serialize)]
pub struct FieldLayout<P> {
    pub bubbles: Vec<PlacedBubble<P>>,
    pub skipped: usize,
}

impl<P> FieldLayout<P> {
    pub fn empty() -> Self {
        Self {
            bubbles: Vec::new(),
            skipped: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_payloads_read_the_weight_field() {
        let v: serde_json::Value = serde_json::json!({ "weight": 12.5, "symbol": "BTC" });
        assert_eq!(v.weight(), 12.5);
    }

    #[test]
    fn json_payloads_without_a_numeric_weight_read_zero() {
        let missing: serde_json::Value = serde_json::json!({ "symbol": "BTC" });
        let non_numeric: serde_json::Value = serde_json::json!({ "weight": "heavy" });
        assert_eq!(missing.weight(), 0.0);
        assert_eq!(non_numeric.weight(), 0.0);
    }

    #[test]
    fn degenerate_viewports_are_rejected() {
        assert!(Viewport::new(0.0, 600.0).validate().is_err());
        assert!(Viewport::new(800.0, -1.0).validate().is_err());
        assert!(Viewport::new(f64::NAN, 600.0).validate().is_err());
        assert!(Viewport::new(800.0, 600.0).validate().is_ok());
    }
}
