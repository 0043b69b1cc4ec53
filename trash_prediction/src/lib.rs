mod error;
mod model_service;
mod ort_service;
mod preprocessing;
mod state;
mod verdict;

pub mod config;

pub use error::PredictionError;
pub use model_service::ModelService;
pub use ort_service::OrtModelService;
pub use preprocessing::{decode_image, decode_image_with_limits, transform_image, DecodeLimits};
pub use state::{LazyModel, ModelState, UnavailableReason};
pub use verdict::{BinLabel, Verdict, DECISION_THRESHOLD};
