use thiserror::Error;

use crate::types::FrameId;

#[derive(Error, Debug)]
pub enum FrameDumpError {
    #[error("Unknown frame: `{0}`")]
    UnknownFrame(FrameId),

    #[error("Invalid frame {field}: {message}")]
    InvalidFrame {
        field: &'static str,
        message: String,
    },

    #[error("Error parsing JSON input")]
    Json(#[from] serde_json::Error),
}
