use crate::{
    config::{InputSpec, ModelConfig, Validatable},
    error::PredictionError,
    model_service::ModelService,
    preprocessing::transform_image,
};
use async_trait::async_trait;
use image::DynamicImage;
use ndarray::{Array, Ix4};
use ort::{
    session::{builder::GraphOptimizationLevel, Session},
    value::TensorRef,
};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

fn sigmoid(x: f32) -> f32 {
    1. / (1. + (-x).exp())
}

#[derive(Clone)]
pub struct OrtModelService {
    sessions: Arc<Vec<Arc<Mutex<Session>>>>,
    counter: Arc<AtomicUsize>,
    output_name: Arc<str>,
    input_spec: InputSpec,
    apply_sigmoid: bool,
}

impl OrtModelService {
    pub fn new(model_config: &ModelConfig) -> Result<Self, PredictionError> {
        let model_path = model_config.get_path();
        if !model_path.exists() {
            return Err(PredictionError::ModelNotFound(model_path));
        }

        ort::init()
            .commit()
            .map_err(|e| PredictionError::ModelLoad(e.to_string()))?;

        let num_instances = model_config.num_instances.max(1);
        let sessions = (0..num_instances)
            .map(|_| {
                let session = Session::builder()?
                    .with_optimization_level(GraphOptimizationLevel::Level3)?
                    .with_intra_threads(model_config.intra_threads)?
                    .commit_from_file(&model_path)?;
                Ok(Arc::new(Mutex::new(session)))
            })
            .collect::<Result<Vec<_>, ort::Error>>()
            .map_err(|e| PredictionError::ModelLoad(e.to_string()))?;

        let output_name = {
            let session = sessions[0]
                .lock()
                .map_err(|e| PredictionError::ModelLoad(format!("session mutex poisoned: {}", e)))?;
            session
                .outputs
                .first()
                .map(|output| output.name.clone())
                .ok_or_else(|| PredictionError::ModelLoad("model declares no outputs".into()))?
        };

        tracing::info!(
            path = %model_path.display(),
            output = %output_name,
            "Created {} ONNX sessions",
            num_instances
        );

        Ok(Self {
            sessions: Arc::new(sessions),
            counter: Arc::new(AtomicUsize::new(0)),
            output_name: output_name.into(),
            input_spec: model_config.input_spec(),
            apply_sigmoid: model_config.apply_sigmoid,
        })
    }

    pub fn run_inference(&self, input: &Array<f32, Ix4>) -> Result<f32, PredictionError> {
        let index = self.counter.fetch_add(1, Ordering::SeqCst) % self.sessions.len();
        let mut session = self.sessions[index]
            .lock()
            .map_err(|e| PredictionError::Inference(format!("session mutex poisoned: {}", e)))?;

        tracing::debug!("Handling request with session {}", index);
        let tensor_ref = TensorRef::from_array_view(input.view())
            .map_err(|e| PredictionError::Inference(format!("failed to build tensor: {}", e)))?;

        let outputs = session
            .run(ort::inputs![tensor_ref])
            .map_err(|e| PredictionError::Inference(e.to_string()))?;

        let (_, data) = outputs[&*self.output_name]
            .try_extract_tensor::<f32>()
            .map_err(|e| PredictionError::Inference(format!("failed to extract tensor: {}", e)))?;

        let score = data
            .first()
            .copied()
            .ok_or_else(|| PredictionError::Inference("model returned an empty tensor".into()))?;

        Ok(if self.apply_sigmoid { sigmoid(score) } else { score })
    }
}

#[async_trait]
impl ModelService for OrtModelService {
    async fn score(&self, image: DynamicImage) -> Result<f32, PredictionError> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || {
            let input = transform_image(&image, &service.input_spec);
            service.run_inference(&input)
        })
        .await?
    }
}
