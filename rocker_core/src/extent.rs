//! Per-layout drag geometry.

use crate::error::{BuildError, Result};

/// Immutable geometry of one rocker layout: where the rest position sits and
/// how far the indicator can travel from it.
///
/// `span` is the distance from center to each edge of the control; the
/// reachable range is the tighter `[center - edge_margin, center + edge_margin]`,
/// which insets the span by the indicator radius when built via
/// [`DragExtent::from_length`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragExtent {
    center: f32,
    span: f32,
    edge_margin: f32,
}

impl DragExtent {
    /// Validate and build. All values must be finite, `span > 0`, and
    /// `0 < edge_margin <= span`. Invalid geometry is rejected, never
    /// adjusted.
    pub fn new(center: f32, span: f32, edge_margin: f32) -> Result<Self> {
        if !center.is_finite() {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "extent center must be finite",
            )));
        }
        if !span.is_finite() || span <= 0.0 {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "extent span must be > 0",
            )));
        }
        if !edge_margin.is_finite() || edge_margin <= 0.0 || edge_margin > span {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "extent edge margin must be in (0, span]",
            )));
        }
        Ok(Self {
            center,
            span,
            edge_margin,
        })
    }

    /// Geometry derived from a layout length: center and span at half the
    /// length, with the reachable range inset by the indicator radius so the
    /// indicator stays fully inside the control.
    pub fn from_length(length: f32, indicator_radius: f32) -> Result<Self> {
        if !length.is_finite() || length <= 0.0 {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "extent length must be > 0",
            )));
        }
        if !indicator_radius.is_finite() || indicator_radius < 0.0 {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "indicator radius must be >= 0",
            )));
        }
        let half = length / 2.0;
        if indicator_radius >= half {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "indicator radius must be smaller than half the length",
            )));
        }
        Self::new(half, half, half - indicator_radius)
    }

    #[inline]
    pub fn center(&self) -> f32 {
        self.center
    }

    #[inline]
    pub fn span(&self) -> f32 {
        self.span
    }

    /// Distance from center to the farthest reachable position on each side.
    #[inline]
    pub fn edge_margin(&self) -> f32 {
        self.edge_margin
    }

    /// Lowest reachable position.
    #[inline]
    pub fn min(&self) -> f32 {
        self.center - self.edge_margin
    }

    /// Highest reachable position.
    #[inline]
    pub fn max(&self) -> f32 {
        self.center + self.edge_margin
    }

    /// Clamp a position to the reachable range.
    #[inline]
    pub fn clamp(&self, position: f32) -> f32 {
        position.clamp(self.min(), self.max())
    }
}

#[cfg(test)]
mod tests {
    use super::DragExtent;

    #[test]
    fn accepts_valid_geometry() {
        let e = DragExtent::new(50.0, 50.0, 40.0).unwrap();
        assert_eq!(e.min(), 10.0);
        assert_eq!(e.max(), 90.0);
    }

    #[test]
    fn rejects_bad_geometry() {
        assert!(DragExtent::new(f32::NAN, 50.0, 40.0).is_err());
        assert!(DragExtent::new(0.0, 0.0, 0.0).is_err());
        assert!(DragExtent::new(0.0, -5.0, 1.0).is_err());
        assert!(DragExtent::new(0.0, 50.0, 0.0).is_err());
        assert!(DragExtent::new(0.0, 50.0, 50.1).is_err());
        assert!(DragExtent::new(0.0, f32::INFINITY, 1.0).is_err());
    }

    #[test]
    fn margin_may_equal_span() {
        let e = DragExtent::new(0.0, 100.0, 100.0).unwrap();
        assert_eq!(e.edge_margin(), 100.0);
    }

    #[test]
    fn from_length_insets_by_radius() {
        let e = DragExtent::from_length(240.0, 20.0).unwrap();
        assert_eq!(e.center(), 120.0);
        assert_eq!(e.span(), 120.0);
        assert_eq!(e.edge_margin(), 100.0);
    }

    #[test]
    fn from_length_rejects_oversized_radius() {
        assert!(DragExtent::from_length(100.0, 50.0).is_err());
        assert!(DragExtent::from_length(100.0, 80.0).is_err());
        assert!(DragExtent::from_length(0.0, 0.0).is_err());
        assert!(DragExtent::from_length(100.0, -1.0).is_err());
    }

    #[test]
    fn clamp_bounds_positions() {
        let e = DragExtent::new(0.0, 100.0, 100.0).unwrap();
        assert_eq!(e.clamp(250.0), 100.0);
        assert_eq!(e.clamp(-250.0), -100.0);
        assert_eq!(e.clamp(42.0), 42.0);
    }
}
