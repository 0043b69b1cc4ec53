use crate::{error::PredictionError, model_service::ModelService};
use std::{
    fmt,
    path::PathBuf,
    sync::{Arc, OnceLock},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnavailableReason {
    Missing(PathBuf),
    Corrupt(String),
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnavailableReason::Missing(path) => write!(f, "model file {:?} was not found", path),
            UnavailableReason::Corrupt(reason) => write!(f, "model could not be loaded: {}", reason),
        }
    }
}

#[derive(Clone)]
pub enum ModelState {
    Available(Arc<dyn ModelService>),
    Unavailable(UnavailableReason),
}

impl ModelState {
    pub fn is_available(&self) -> bool {
        matches!(self, ModelState::Available(_))
    }

    pub fn service(&self) -> Result<Arc<dyn ModelService>, PredictionError> {
        match self {
            ModelState::Available(service) => Ok(service.clone()),
            ModelState::Unavailable(_) => Err(PredictionError::ModelUnavailable),
        }
    }
}

impl From<Result<Arc<dyn ModelService>, PredictionError>> for ModelState {
    fn from(result: Result<Arc<dyn ModelService>, PredictionError>) -> Self {
        match result {
            Ok(service) => ModelState::Available(service),
            Err(PredictionError::ModelNotFound(path)) => {
                ModelState::Unavailable(UnavailableReason::Missing(path))
            }
            Err(e) => ModelState::Unavailable(UnavailableReason::Corrupt(e.to_string())),
        }
    }
}

type ModelInit = Box<dyn Fn() -> Result<Arc<dyn ModelService>, PredictionError> + Send + Sync>;

/// Loads the model on first access and hands out the same handle afterwards.
/// A failed load is cached as well, so a broken artifact is only tried once.
pub struct LazyModel {
    state: OnceLock<ModelState>,
    init: ModelInit,
}

impl LazyModel {
    pub fn new<F>(init: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn ModelService>, PredictionError> + Send + Sync + 'static,
    {
        Self {
            state: OnceLock::new(),
            init: Box::new(init),
        }
    }

    pub fn get(&self) -> &ModelState {
        self.state.get_or_init(|| {
            let state = ModelState::from((self.init)());
            match &state {
                ModelState::Available(_) => tracing::info!("Model loaded"),
                ModelState::Unavailable(reason) => {
                    tracing::error!("Model unavailable, inference disabled: {}", reason)
                }
            }
            state
        })
    }
}
