use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictionError {
    #[error("Model file not found: {0:?}")]
    ModelNotFound(PathBuf),
    #[error("Failed to load model: {0}")]
    ModelLoad(String),
    #[error("Model is not available")]
    ModelUnavailable,
    #[error("Error decoding image: {0}")]
    ImageDecode(#[from] image::ImageError),
    #[error("Unsupported image format, expected JPEG or PNG")]
    UnsupportedFormat,
    #[error("Error reading image: {0}")]
    ImageRead(#[from] std::io::Error),
    #[error("Inference failed: {0}")]
    Inference(String),
    #[error("Model returned a score outside [0, 1]: {0}")]
    InvalidScore(f32),
    #[error("Inference task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
