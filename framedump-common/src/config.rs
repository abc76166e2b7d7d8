use serde::{Deserialize, Serialize};

use crate::error::FrameDumpError;
use crate::types::{CanvasPoint, Domain, Frame, FrameSize};

/// Loosely typed frame record as supplied by the frame registry.
///
/// Every field may be missing. [`FrameConfig::validate`] is the single place
/// where defaults are filled in and non-finite values are rejected, so the
/// geometry code downstream only ever sees a complete [`Frame`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    pub position: Option<CanvasPoint>,
    pub size: Option<FrameSize>,
    #[serde(alias = "rotation")]
    pub rotation_degrees: Option<f64>,
    pub domain: Option<Domain>,
    pub z_order: Option<i32>,
    pub rotation_center: Option<CanvasPoint>,
}

impl FrameConfig {
    pub fn validate(self) -> Result<Frame, FrameDumpError> {
        let position = self.position.unwrap_or_default();
        if !position.is_finite() {
            return Err(invalid("position", format!("{position:?}")));
        }

        let size = self.size.unwrap_or_default();
        if !size.is_finite() {
            return Err(invalid("size", format!("{size:?}")));
        }

        let rotation_degrees = self.rotation_degrees.unwrap_or(0.0);
        if !rotation_degrees.is_finite() {
            return Err(invalid("rotation_degrees", rotation_degrees.to_string()));
        }

        if let Some(center) = self.rotation_center {
            if !center.is_finite() {
                return Err(invalid("rotation_center", format!("{center:?}")));
            }
        }

        Ok(Frame {
            position,
            size,
            rotation_degrees,
            domain: self.domain.unwrap_or_default(),
            z_order: self.z_order.unwrap_or(0),
            rotation_center: self.rotation_center,
        })
    }
}

fn invalid(field: &'static str, value: String) -> FrameDumpError {
    FrameDumpError::InvalidFrame {
        field,
        message: format!("expected finite values, got {value}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_filled_in() {
        let frame = FrameConfig::default().validate().unwrap();
        assert_eq!(frame.position, CanvasPoint::new(0.0, 0.0));
        assert_eq!(frame.size, FrameSize::new(500.0, 400.0));
        assert_eq!(frame.rotation_degrees, 0.0);
        assert_eq!(frame.domain, Domain::FIRST_QUADRANT);
        assert_eq!(frame.z_order, 0);
        assert!(frame.rotation_center.is_none());
    }

    #[test]
    fn test_non_finite_rotation_rejected() {
        let config = FrameConfig {
            rotation_degrees: Some(f64::NAN),
            ..Default::default()
        };
        match config.validate() {
            Err(FrameDumpError::InvalidFrame { field, .. }) => {
                assert_eq!(field, "rotation_degrees")
            }
            other => panic!("Expected InvalidFrame error, got {other:?}"),
        }
    }

    #[test]
    fn test_frame_deserializes_through_validation() {
        let frame: Frame = serde_json::from_str(
            r#"{
                "position": {"x": 10, "y": 20},
                "rotation": 45,
                "z_order": 3,
                "domain": {"x_min": -2500, "x_max": 2500, "y_min": -2500, "y_max": 2500}
            }"#,
        )
        .unwrap();
        assert_eq!(frame.position, CanvasPoint::new(10.0, 20.0));
        assert_eq!(frame.size, FrameSize::default());
        assert_eq!(frame.rotation_degrees, 45.0);
        assert_eq!(frame.z_order, 3);
        assert_eq!(frame.domain, Domain::ALL_QUADRANTS);
    }
}
