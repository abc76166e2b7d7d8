use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::FrameConfig;
use crate::error::FrameDumpError;

/// Open key/value map carried alongside each point
pub type Metadata = IndexMap<String, Value>;

/// Metadata keys attached to points that were carried between frames
pub mod keys {
    pub const ORIGINAL_X: &str = "original_x";
    pub const ORIGINAL_Y: &str = "original_y";
    pub const ORIGINAL_COLOR: &str = "original_color";
    pub const IS_DUMPED: &str = "is_dumped";
    pub const SOURCE_FRAME: &str = "source_frame";
    /// Render color of a point that has never been dumped
    pub const COLOR: &str = "color";
}

/// Opaque identifier the frame registry uses for a frame
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameId(pub String);

impl FrameId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FrameId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for FrameId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A data point expressed in some frame's domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub metadata: Metadata,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A position in canvas pixel space
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasPoint {
    pub x: f64,
    pub y: f64,
}

impl CanvasPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Pixel size of a frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: f64,
    pub height: f64,
}

impl FrameSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_finite(&self) -> bool {
        self.width.is_finite() && self.height.is_finite()
    }
}

impl Default for FrameSize {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 400.0,
        }
    }
}

/// Rectangular range of data values represented by a frame's axes.
///
/// Both axes always have a positive extent. Constructing a domain whose max
/// does not exceed its min repairs the axis with [`repair_extent`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "DomainBounds")]
pub struct Domain {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

#[derive(Deserialize)]
struct DomainBounds {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl From<DomainBounds> for Domain {
    fn from(b: DomainBounds) -> Self {
        Domain::new(b.x_min, b.x_max, b.y_min, b.y_max)
    }
}

impl Domain {
    /// Fixed domain used for data without negative values
    pub const FIRST_QUADRANT: Domain = Domain {
        x_min: 0.0,
        x_max: 5000.0,
        y_min: 0.0,
        y_max: 5000.0,
    };

    /// Fixed symmetric domain used for data with negative values
    pub const ALL_QUADRANTS: Domain = Domain {
        x_min: -2500.0,
        x_max: 2500.0,
        y_min: -2500.0,
        y_max: 2500.0,
    };

    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        let (x_min, x_max) = repair_axis("x", x_min, x_max);
        let (y_min, y_max) = repair_axis("y", y_min, y_max);
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    pub fn y_min(&self) -> f64 {
        self.y_min
    }

    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    pub fn x_span(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn y_span(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        (self.x_min..=self.x_max).contains(&x) && (self.y_min..=self.y_max).contains(&y)
    }

    /// Pins a value pair to the nearest position inside the domain
    pub fn clamp(&self, x: f64, y: f64) -> (f64, f64) {
        (
            x.clamp(self.x_min, self.x_max),
            y.clamp(self.y_min, self.y_max),
        )
    }
}

impl Default for Domain {
    fn default() -> Self {
        Self::FIRST_QUADRANT
    }
}

fn repair_axis(axis: &str, min: f64, max: f64) -> (f64, f64) {
    let repaired = repair_extent(min, max);
    if repaired != (min, max) {
        log::debug!(
            "repairing degenerate {axis} domain [{min}, {max}] to [{}, {}]",
            repaired.0,
            repaired.1
        );
    }
    repaired
}

/// Repairs an axis extent so that both ends are finite and `max > min`.
///
/// A non-finite `min` becomes 0. A missing or degenerate `max` becomes
/// `min + 1`, or the nearest strictly larger value when `min` is too large for
/// a unit step to register.
pub fn repair_extent(min: f64, max: f64) -> (f64, f64) {
    let min = if min.is_finite() { min } else { 0.0 };
    if max.is_finite() && max > min {
        return (min, max);
    }
    let unit = min + 1.0;
    if unit > min {
        return (min, unit);
    }
    // At least one ulp of `min`
    let delta = min.abs() * f64::EPSILON;
    if (min + delta).is_finite() {
        (min, min + delta)
    } else {
        (min - delta, min)
    }
}

/// Interior pixel rectangle of a frame where data is plotted, relative to the
/// frame's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotRectangle {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotRectangle {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Whether the rectangle is finite with positive area
    pub fn is_valid(&self) -> bool {
        [self.left, self.top, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width > 0.0
            && self.height > 0.0
    }

    /// Copy of the rectangle whose width and height are at least one pixel
    pub fn with_min_extent(self) -> Self {
        Self {
            width: min_extent(self.width),
            height: min_extent(self.height),
            ..self
        }
    }
}

fn min_extent(v: f64) -> f64 {
    if v.is_nan() {
        1.0
    } else {
        v.max(1.0)
    }
}

/// One independently positioned, sized and rotated scatter-plot view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FrameConfig")]
pub struct Frame {
    /// Top-left corner in canvas pixels, before rotation
    pub position: CanvasPoint,
    pub size: FrameSize,
    /// Clockwise rotation in screen space
    pub rotation_degrees: f64,
    pub domain: Domain,
    pub z_order: i32,
    /// Canvas-space pivot overriding the frame center for rotation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_center: Option<CanvasPoint>,
}

impl Frame {
    pub fn new(position: CanvasPoint, size: FrameSize) -> Self {
        Self {
            position,
            size,
            rotation_degrees: 0.0,
            domain: Domain::default(),
            z_order: 0,
            rotation_center: None,
        }
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation_degrees = degrees;
        self
    }

    pub fn with_domain(mut self, domain: Domain) -> Self {
        self.domain = domain;
        self
    }

    pub fn with_z_order(mut self, z_order: i32) -> Self {
        self.z_order = z_order;
        self
    }

    pub fn with_rotation_center(mut self, center: Option<CanvasPoint>) -> Self {
        self.rotation_center = center;
        self
    }

    /// Geometric center in canvas space
    pub fn center(&self) -> CanvasPoint {
        CanvasPoint::new(
            self.position.x + self.size.width / 2.0,
            self.position.y + self.size.height / 2.0,
        )
    }

    /// Rotation pivot relative to the frame's top-left corner
    pub fn local_pivot(&self) -> CanvasPoint {
        match self.rotation_center {
            Some(center) => CanvasPoint::new(center.x - self.position.x, center.y - self.position.y),
            None => CanvasPoint::new(self.size.width / 2.0, self.size.height / 2.0),
        }
    }
}

impl TryFrom<FrameConfig> for Frame {
    type Error = FrameDumpError;

    fn try_from(config: FrameConfig) -> Result<Self, Self::Error> {
        config.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn test_degenerate_domain_is_repaired() {
        let domain = Domain::new(10.0, 10.0, 5.0, 2.0);
        assert_approx_eq!(f64, domain.x_min(), 10.0);
        assert_approx_eq!(f64, domain.x_max(), 11.0);
        assert_approx_eq!(f64, domain.y_min(), 5.0);
        assert_approx_eq!(f64, domain.y_max(), 6.0);
    }

    #[test]
    fn test_non_finite_domain_is_repaired() {
        let domain = Domain::new(f64::NAN, 3.0, 0.0, f64::INFINITY);
        assert_approx_eq!(f64, domain.x_min(), 0.0);
        assert_approx_eq!(f64, domain.x_max(), 3.0);
        assert_approx_eq!(f64, domain.y_max(), 1.0);
    }

    #[test]
    fn test_large_magnitude_domain_is_repaired() {
        let domain = Domain::new(1e17, 1e17, 0.0, 5000.0);
        assert_eq!(domain.x_min(), 1e17);
        assert!(domain.x_max() > domain.x_min());
        assert!(domain.x_span() > 0.0);

        let (min, max) = repair_extent(-1e300, -1e300);
        assert!(max > min);
        let (min, max) = repair_extent(f64::MAX, f64::MAX);
        assert!(max > min && min.is_finite() && max.is_finite());
    }

    #[test]
    fn test_domain_deserialize_repairs() {
        let domain: Domain =
            serde_json::from_str(r#"{"x_min": 0, "x_max": 0, "y_min": 0, "y_max": 100}"#)
                .unwrap();
        assert_eq!(domain, Domain::new(0.0, 1.0, 0.0, 100.0));
    }

    #[test]
    fn test_domain_clamp() {
        let domain = Domain::FIRST_QUADRANT;
        assert_eq!(domain.clamp(-5.0, 7000.0), (0.0, 5000.0));
        assert_eq!(domain.clamp(10.0, 20.0), (10.0, 20.0));
        assert!(domain.contains(5000.0, 0.0));
        assert!(!domain.contains(-0.1, 0.0));
    }

    #[test]
    fn test_plot_rectangle_min_extent() {
        let rect = PlotRectangle::new(10.0, 10.0, 0.0, -4.0).with_min_extent();
        assert_eq!(rect.width, 1.0);
        assert_eq!(rect.height, 1.0);
        assert!(!PlotRectangle::new(0.0, 0.0, 0.0, 10.0).is_valid());
        assert!(!PlotRectangle::new(0.0, f64::NAN, 10.0, 10.0).is_valid());
    }

    #[test]
    fn test_local_pivot() {
        let frame = Frame::new(CanvasPoint::new(100.0, 50.0), FrameSize::new(500.0, 400.0));
        assert_eq!(frame.local_pivot(), CanvasPoint::new(250.0, 200.0));
        assert_eq!(frame.center(), CanvasPoint::new(350.0, 250.0));

        let frame = frame.with_rotation_center(Some(CanvasPoint::new(120.0, 60.0)));
        assert_eq!(frame.local_pivot(), CanvasPoint::new(20.0, 10.0));
    }

    #[test]
    fn test_point_metadata() {
        let point = Point::new(1.0, 2.0).with_metadata(keys::COLOR, "red");
        assert_eq!(point.metadata[keys::COLOR], Value::from("red"));
        assert!(point.is_finite());
        assert!(!Point::new(f64::NAN, 0.0).is_finite());
    }
}
