use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use framedump_common::config::FrameConfig;
use framedump_common::{Frame, FrameDumpError, FrameId, PlotRectangle, Point};
use framedump_geometry::PlotLayout;
use indexmap::IndexMap;
use serde::Deserialize;

/// Snapshot of the frame registry and the points each frame holds
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub layout: PlotLayout,
    pub frames: IndexMap<FrameId, FrameConfig>,
    pub points: IndexMap<FrameId, Vec<Point>>,
    /// Render color of each frame's native points
    pub colors: IndexMap<FrameId, String>,
    /// Plot rectangles measured by the UI, replacing the layout estimate
    pub measurements: IndexMap<FrameId, PlotRectangle>,
}

impl SceneConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene file {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse scene file {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self, FrameDumpError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn frame(&self, id: &FrameId) -> Result<Frame, FrameDumpError> {
        self.frames
            .get(id)
            .cloned()
            .ok_or_else(|| FrameDumpError::UnknownFrame(id.clone()))?
            .validate()
    }

    pub fn frames(&self) -> Result<Vec<(FrameId, Frame)>, FrameDumpError> {
        self.frames
            .iter()
            .map(|(id, config)| config.clone().validate().map(|frame| (id.clone(), frame)))
            .collect()
    }

    pub fn points(&self, id: &FrameId) -> &[Point] {
        self.points.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn color(&self, id: &FrameId) -> Option<&str> {
        self.colors.get(id).map(String::as_str)
    }

    pub fn measurement(&self, id: &FrameId) -> Option<PlotRectangle> {
        self.measurements.get(id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = r#"{
        "layout": {"margins": {"left": 60}},
        "frames": {
            "left": {"position": {"x": 0, "y": 0}, "z_order": 0},
            "right": {"position": {"x": 300, "y": 0}, "rotation": 30, "z_order": 1}
        },
        "points": {
            "left": [{"x": 100, "y": 200}, {"x": 300, "y": 400, "metadata": {"color": "red"}}]
        },
        "colors": {"left": "steelblue"},
        "measurements": {"right": {"left": 40, "top": 30, "width": 400, "height": 300}}
    }"#;

    #[test]
    fn test_parse_scene() {
        let scene = SceneConfig::from_json(SCENE).unwrap();
        assert_eq!(scene.layout.margins.left, 60.0);

        let frames = scene.frames().unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].1.rotation_degrees, 30.0);

        let left = FrameId::from("left");
        let right = FrameId::from("right");
        assert_eq!(scene.points(&left).len(), 2);
        assert!(scene.points(&right).is_empty());
        assert_eq!(scene.color(&left), Some("steelblue"));

        assert_eq!(
            scene.measurement(&right),
            Some(PlotRectangle::new(40.0, 30.0, 400.0, 300.0))
        );
        assert_eq!(scene.measurement(&left), None);
        let left_frame = scene.frame(&left).unwrap();
        assert_eq!(scene.layout.plot_rectangle(left_frame.size, None).left, 71.0);
    }

    #[test]
    fn test_unknown_frame() {
        let scene = SceneConfig::from_json(SCENE).unwrap();
        match scene.frame(&FrameId::from("missing")) {
            Err(FrameDumpError::UnknownFrame(id)) => assert_eq!(id.as_str(), "missing"),
            other => panic!("Expected UnknownFrame error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            SceneConfig::from_json("{\"frames\": 3}"),
            Err(FrameDumpError::Json(_))
        ));
    }
}
