use framedump_common::{Domain, Point};
use itertools::{Itertools, MinMaxResult};
use serde::Serialize;
use strum::{Display, VariantNames};

/// Whether a data set needs axes that extend into negative values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, VariantNames)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum QuadrantMode {
    /// Every coordinate is non-negative
    First,
    /// At least one coordinate is negative
    All,
}

impl QuadrantMode {
    /// Plotting domain used for data in this mode.
    ///
    /// The domains are fixed rather than fitted to the data so frames holding
    /// different data sets share a comparable scale when points are dumped
    /// between them.
    pub fn domain(&self) -> Domain {
        match self {
            QuadrantMode::First => Domain::FIRST_QUADRANT,
            QuadrantMode::All => Domain::ALL_QUADRANTS,
        }
    }
}

/// Observed bounds of the finite points in a data set
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DataExtent {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl DataExtent {
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let finite = || points.iter().filter(|p| p.is_finite());
        let (x_min, x_max) = bounds(finite().map(|p| p.x))?;
        let (y_min, y_max) = bounds(finite().map(|p| p.y))?;
        Some(Self {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    pub fn has_negative(&self) -> bool {
        self.x_min < 0.0 || self.y_min < 0.0
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    match values.minmax_by(|a, b| a.total_cmp(b)) {
        MinMaxResult::NoElements => None,
        MinMaxResult::OneElement(v) => Some((v, v)),
        MinMaxResult::MinMax(min, max) => Some((min, max)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DomainClassification {
    pub mode: QuadrantMode,
    pub domain: Domain,
    /// `None` when the input held no finite points
    pub extent: Option<DataExtent>,
}

/// Decide the plotting mode and initial domain for a point set.
///
/// Non-finite points are ignored. An empty set falls back to the first
/// quadrant domain.
pub fn classify_domain(points: &[Point]) -> DomainClassification {
    let extent = DataExtent::from_points(points);
    let mode = match extent {
        Some(extent) if extent.has_negative() => QuadrantMode::All,
        _ => QuadrantMode::First,
    };

    log::debug!(
        "classified {} points as {mode} quadrant mode (extent: {extent:?})",
        points.len()
    );

    DomainClassification {
        mode,
        domain: mode.domain(),
        extent,
    }
}
