use framedump_common::{FrameSize, PlotRectangle};
use serde::{Deserialize, Serialize};

/// Axis gutters around the plot area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 20.0,
            bottom: 30.0,
            left: 50.0,
        }
    }
}

/// Frame decoration between the frame's outer box and its axis gutters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Chrome {
    /// Container padding, applied on every side
    pub padding: f64,
    /// Border width, applied on every side
    pub border_width: f64,
    /// Height of the header bar above the chart
    pub header_height: f64,
}

impl Default for Chrome {
    fn default() -> Self {
        Self {
            padding: 10.0,
            border_width: 1.0,
            header_height: 30.0,
        }
    }
}

/// Fixed layout constants used to estimate a frame's plot rectangle when no
/// real measurement is available
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotLayout {
    pub margins: Margins,
    pub chrome: Chrome,
}

impl PlotLayout {
    /// Estimates the plot rectangle from the layout constants alone
    pub fn estimate(&self, size: FrameSize) -> PlotRectangle {
        let inset = self.chrome.padding + self.chrome.border_width;
        PlotRectangle {
            left: inset + self.margins.left,
            top: inset + self.chrome.header_height + self.margins.top,
            width: size.width - self.margins.left - self.margins.right - 2.0 * inset,
            height: size.height
                - self.margins.top
                - self.margins.bottom
                - 2.0 * inset
                - self.chrome.header_height,
        }
        .with_min_extent()
    }

    /// Plot rectangle for a frame of the given size.
    ///
    /// A measured rectangle is used when it is finite with positive extent,
    /// otherwise the layout estimate is returned.
    pub fn plot_rectangle(&self, size: FrameSize, measured: Option<PlotRectangle>) -> PlotRectangle {
        match measured {
            Some(rect) if rect.is_valid() => rect.with_min_extent(),
            Some(rect) => {
                log::debug!("ignoring invalid plot measurement {rect:?}");
                self.estimate(size)
            }
            None => self.estimate(size),
        }
    }
}

/// Plot rectangle using the default layout constants
pub fn compute_plot_rectangle(size: FrameSize, measured: Option<PlotRectangle>) -> PlotRectangle {
    PlotLayout::default().plot_rectangle(size, measured)
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn test_default_estimate() {
        let rect = compute_plot_rectangle(FrameSize::new(500.0, 400.0), None);
        assert_approx_eq!(f64, rect.left, 61.0);
        assert_approx_eq!(f64, rect.top, 61.0);
        assert_approx_eq!(f64, rect.width, 408.0);
        assert_approx_eq!(f64, rect.height, 298.0);
    }

    #[test]
    fn test_custom_layout() {
        let layout = PlotLayout {
            margins: Margins {
                top: 0.0,
                right: 0.0,
                bottom: 0.0,
                left: 0.0,
            },
            chrome: Chrome {
                padding: 0.0,
                border_width: 0.0,
                header_height: 0.0,
            },
        };
        let rect = layout.plot_rectangle(FrameSize::new(300.0, 200.0), None);
        assert_eq!(rect, PlotRectangle::new(0.0, 0.0, 300.0, 200.0));
    }

    #[test]
    fn test_tiny_frame_clamped() {
        let rect = compute_plot_rectangle(FrameSize::new(10.0, 0.0), None);
        assert_approx_eq!(f64, rect.width, 1.0);
        assert_approx_eq!(f64, rect.height, 1.0);
    }

    #[test]
    fn test_measurement_used_when_valid() {
        let measured = PlotRectangle::new(40.0, 35.0, 420.0, 310.0);
        let rect = compute_plot_rectangle(FrameSize::new(500.0, 400.0), Some(measured));
        assert_eq!(rect, measured);
    }

    #[test]
    fn test_invalid_measurement_falls_back() {
        let size = FrameSize::new(500.0, 400.0);
        let estimate = compute_plot_rectangle(size, None);
        for measured in [
            PlotRectangle::new(40.0, 35.0, 0.0, 310.0),
            PlotRectangle::new(40.0, 35.0, 420.0, -1.0),
            PlotRectangle::new(f64::NAN, 35.0, 420.0, 310.0),
        ] {
            assert_eq!(compute_plot_rectangle(size, Some(measured)), estimate);
        }
    }

    #[test]
    fn test_layout_deserialize_partial() {
        let layout: PlotLayout =
            serde_json::from_str(r#"{"margins": {"left": 70}, "chrome": {"header_height": 0}}"#)
                .unwrap();
        assert_eq!(layout.margins.left, 70.0);
        assert_eq!(layout.margins.bottom, 30.0);
        assert_eq!(layout.chrome.header_height, 0.0);
        assert_eq!(layout.chrome.padding, 10.0);
    }
}
