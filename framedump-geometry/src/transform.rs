//! Carrying points from one frame into another.
//!
//! A point keeps its visual position on the canvas: it is placed inside the
//! source frame's plot rectangle, turned with the source frame, moved into
//! canvas space, then expressed in the target frame's unrotated local space
//! and read back against the target domain.

use framedump_common::types::keys;
use framedump_common::{CanvasPoint, Domain, Frame, FrameId, FrameSize, PlotRectangle, Point};
use geo::Rotate;
use rayon::prelude::*;
use serde_json::Value;

use crate::layout::PlotLayout;
use crate::observer::{NoopObserver, PointTrace, TransformObserver};

/// Resolved geometry of one side of a transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FramePlacement {
    /// Top-left corner in canvas space
    pub position: CanvasPoint,
    /// Clockwise rotation, normalized to `[0, 360)`
    pub rotation_degrees: f64,
    /// Rotation pivot relative to the top-left corner
    pub pivot: CanvasPoint,
    /// Outer size, used to estimate `rect` when a measurement is rejected
    pub size: FrameSize,
    pub rect: PlotRectangle,
    pub domain: Domain,
}

impl FramePlacement {
    /// Resolves a frame's placement, taking the plot rectangle from `measured`
    /// when it is valid and from the `layout` estimate otherwise
    pub fn new(frame: &Frame, layout: &PlotLayout, measured: Option<PlotRectangle>) -> Self {
        Self {
            position: frame.position,
            rotation_degrees: normalize_degrees(frame.rotation_degrees),
            pivot: frame.local_pivot(),
            size: frame.size,
            rect: layout.plot_rectangle(frame.size, measured),
            domain: frame.domain,
        }
    }
}

/// Maps an angle in degrees into `[0, 360)`. Non-finite angles map to 0.
pub fn normalize_degrees(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let normalized = degrees.rem_euclid(360.0);
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

fn rotate_about(p: [f64; 2], pivot: CanvasPoint, degrees: f64) -> [f64; 2] {
    if degrees == 0.0 {
        return p;
    }
    let rotated = geo_types::Point::new(p[0], p[1])
        .rotate_around_point(degrees, geo_types::Point::new(pivot.x, pivot.y));
    [rotated.x(), rotated.y()]
}

/// Converts points expressed in a source frame into the equivalent points of a
/// target frame, preserving where they appear on the canvas.
///
/// Results are clamped into the target domain so no point disappears.
/// Points with non-finite coordinates are dropped.
#[derive(Debug, Clone)]
pub struct PointTransformer {
    source: FramePlacement,
    target: FramePlacement,
    layout: PlotLayout,
    source_id: Option<FrameId>,
    fallback_color: Option<String>,
}

impl PointTransformer {
    /// Creates a transformer using each frame's own domain and the plot
    /// rectangles estimated by `layout`
    pub fn new(source: &Frame, target: &Frame, layout: &PlotLayout) -> Self {
        Self {
            layout: *layout,
            ..Self::from_placements(
                FramePlacement::new(source, layout, None),
                FramePlacement::new(target, layout, None),
            )
        }
    }

    /// Creates a transformer from already resolved placements. Later
    /// measurements are checked against the default layout.
    pub fn from_placements(source: FramePlacement, target: FramePlacement) -> Self {
        Self {
            source,
            target,
            layout: PlotLayout::default(),
            source_id: None,
            fallback_color: None,
        }
    }

    pub fn with_source_domain(mut self, domain: Domain) -> Self {
        self.source.domain = domain;
        self
    }

    pub fn with_target_domain(mut self, domain: Domain) -> Self {
        self.target.domain = domain;
        self
    }

    /// Uses a measured source plot rectangle. A measurement that is not
    /// finite or has no extent falls back to the layout estimate.
    pub fn with_source_measurement(mut self, measured: PlotRectangle) -> Self {
        self.source.rect = self.layout.plot_rectangle(self.source.size, Some(measured));
        self
    }

    pub fn with_target_measurement(mut self, measured: PlotRectangle) -> Self {
        self.target.rect = self.layout.plot_rectangle(self.target.size, Some(measured));
        self
    }

    /// Frame recorded as the origin of every transformed point
    pub fn with_source_id(mut self, id: FrameId) -> Self {
        self.source_id = Some(id);
        self
    }

    /// Color recorded for points that carry no color of their own
    pub fn with_fallback_color(mut self, color: impl Into<String>) -> Self {
        self.fallback_color = Some(color.into());
        self
    }

    pub fn source(&self) -> &FramePlacement {
        &self.source
    }

    pub fn target(&self) -> &FramePlacement {
        &self.target
    }

    /// Maps a single coordinate pair, returning `None` for non-finite input
    pub fn map(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        self.trace(0, x, y).map(|t| (t.output[0], t.output[1]))
    }

    /// Maps a coordinate pair and records every intermediate value
    pub fn trace(&self, index: usize, x: f64, y: f64) -> Option<PointTrace> {
        if !(x.is_finite() && y.is_finite()) {
            return None;
        }
        let source = &self.source;
        let target = &self.target;

        // Screen y grows downward, data y grows upward
        let source_normalized = [
            (x - source.domain.x_min()) / source.domain.x_span(),
            1.0 - (y - source.domain.y_min()) / source.domain.y_span(),
        ];
        let source_local = [
            source.rect.left + source_normalized[0] * source.rect.width,
            source.rect.top + source_normalized[1] * source.rect.height,
        ];
        let source_rotated = rotate_about(source_local, source.pivot, source.rotation_degrees);
        let canvas = [
            source_rotated[0] + source.position.x,
            source_rotated[1] + source.position.y,
        ];

        let target_relative = [canvas[0] - target.position.x, canvas[1] - target.position.y];
        let target_local = rotate_about(
            target_relative,
            target.pivot,
            normalize_degrees(-target.rotation_degrees),
        );
        let target_normalized = [
            (target_local[0] - target.rect.left) / target.rect.width,
            (target_local[1] - target.rect.top) / target.rect.height,
        ];
        let unclamped = [
            target.domain.x_min() + target_normalized[0] * target.domain.x_span(),
            target.domain.y_max() - target_normalized[1] * target.domain.y_span(),
        ];
        if unclamped[0].is_nan() || unclamped[1].is_nan() {
            return None;
        }
        let (out_x, out_y) = target.domain.clamp(unclamped[0], unclamped[1]);

        Some(PointTrace {
            index,
            input: [x, y],
            source_normalized,
            source_local,
            source_rotated,
            canvas,
            target_relative,
            target_local,
            target_normalized,
            unclamped,
            output: [out_x, out_y],
        })
    }

    pub fn transform_point(&self, point: &Point) -> Option<Point> {
        let trace = self.trace(0, point.x, point.y)?;
        Some(self.dumped_point(point, trace.output))
    }

    pub fn transform_points(&self, points: &[Point]) -> Vec<Point> {
        self.transform_points_observed(points, &NoopObserver)
    }

    /// Transforms a batch, reporting each point's trace to `observer`
    pub fn transform_points_observed<O>(&self, points: &[Point], observer: &O) -> Vec<Point>
    where
        O: TransformObserver + ?Sized,
    {
        let mut result = Vec::with_capacity(points.len());
        for (index, point) in points.iter().enumerate() {
            if let Some(trace) = self.trace(index, point.x, point.y) {
                observer.observe(&trace);
                result.push(self.dumped_point(point, trace.output));
            }
        }
        self.log_batch(points.len(), result.len());
        result
    }

    /// Same as [`PointTransformer::transform_points`], split across the rayon
    /// thread pool. Output order matches input order.
    pub fn par_transform_points(&self, points: &[Point]) -> Vec<Point> {
        self.par_transform_points_observed(points, &NoopObserver)
    }

    pub fn par_transform_points_observed<O>(&self, points: &[Point], observer: &O) -> Vec<Point>
    where
        O: TransformObserver + Sync + ?Sized,
    {
        let result: Vec<Point> = points
            .par_iter()
            .enumerate()
            .filter_map(|(index, point)| {
                let trace = self.trace(index, point.x, point.y)?;
                observer.observe(&trace);
                Some(self.dumped_point(point, trace.output))
            })
            .collect();
        self.log_batch(points.len(), result.len());
        result
    }

    fn dumped_point(&self, point: &Point, [x, y]: [f64; 2]) -> Point {
        let mut metadata = point.metadata.clone();
        let color = metadata
            .get(keys::ORIGINAL_COLOR)
            .or_else(|| metadata.get(keys::COLOR))
            .cloned()
            .or_else(|| self.fallback_color.clone().map(Value::from));

        metadata.insert(keys::ORIGINAL_X.to_string(), Value::from(point.x));
        metadata.insert(keys::ORIGINAL_Y.to_string(), Value::from(point.y));
        if let Some(color) = color {
            metadata.insert(keys::ORIGINAL_COLOR.to_string(), color);
        }
        metadata.insert(keys::IS_DUMPED.to_string(), Value::Bool(true));
        if let Some(id) = &self.source_id {
            metadata.insert(keys::SOURCE_FRAME.to_string(), Value::from(id.as_str()));
        }

        Point { x, y, metadata }
    }

    fn log_batch(&self, input_len: usize, output_len: usize) {
        if output_len < input_len {
            log::warn!(
                "dropped {} of {input_len} points with non-finite coordinates",
                input_len - output_len
            );
        }
        log::debug!(
            "transformed {output_len} points (source rotation {}, target rotation {})",
            self.source.rotation_degrees,
            self.target.rotation_degrees
        );
    }
}

/// Transforms `points` from `source_frame` into `target_frame` using explicit
/// domains and the default plot layout.
///
/// `source_id`, when given, is recorded as each point's source frame.
pub fn transform_points(
    points: &[Point],
    source_domain: &Domain,
    target_domain: &Domain,
    source_frame: &Frame,
    target_frame: &Frame,
    source_id: Option<&FrameId>,
) -> Vec<Point> {
    let mut transformer = PointTransformer::new(source_frame, target_frame, &PlotLayout::default())
        .with_source_domain(*source_domain)
        .with_target_domain(*target_domain);
    if let Some(id) = source_id {
        transformer = transformer.with_source_id(id.clone());
    }
    transformer.transform_points(points)
}
