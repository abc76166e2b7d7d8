pub mod layout;
pub mod observer;
pub mod overlap;
pub mod transform;

pub use layout::{compute_plot_rectangle, Chrome, Margins, PlotLayout};
pub use observer::{LogObserver, NoopObserver, PointTrace, TransformObserver};
pub use overlap::{detect_overlaps, frames_intersect};
pub use transform::{transform_points, FramePlacement, PointTransformer};
