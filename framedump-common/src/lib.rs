pub mod config;
pub mod error;
pub mod types;

pub use error::FrameDumpError;
pub use types::{CanvasPoint, Domain, Frame, FrameId, FrameSize, Metadata, PlotRectangle, Point};
