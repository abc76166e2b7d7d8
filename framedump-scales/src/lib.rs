pub mod domain;
pub mod ticks;

pub use domain::{classify_domain, DataExtent, DomainClassification, QuadrantMode};
pub use ticks::{axis_ticks, generate_ticks, AxisTicks};
