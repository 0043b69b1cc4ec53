use crate::{
    server::SharedState,
    session::Analysis,
    telemetry::Metrics,
};
use async_trait::async_trait;
use image::{DynamicImage, ImageBuffer, Rgb};
use std::{
    io::Cursor,
    path::PathBuf,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};
use trash_prediction::{LazyModel, ModelService, PredictionError, Verdict};

pub struct MockModelService {
    pub score: f32,
    pub calls: Arc<AtomicUsize>,
}

#[async_trait]
impl ModelService for MockModelService {
    async fn score(&self, image: DynamicImage) -> Result<f32, PredictionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(image.color(), image::ColorType::Rgb8);
        Ok(self.score)
    }
}

pub fn state_with_model(model: LazyModel, model_path: PathBuf) -> SharedState {
    SharedState::new(
        Arc::new(model),
        model_path,
        Arc::new(Metrics::new().unwrap()),
    )
}

pub fn mock_state(score: f32, calls: Arc<AtomicUsize>) -> SharedState {
    state_with_model(
        LazyModel::new(move || {
            Ok(Arc::new(MockModelService {
                score,
                calls: calls.clone(),
            }) as Arc<dyn ModelService>)
        }),
        PathBuf::from("./does_not_exist/model.onnx"),
    )
}

pub fn unavailable_state(model_path: PathBuf) -> SharedState {
    let missing = model_path.clone();
    state_with_model(
        LazyModel::new(move || Err(PredictionError::ModelNotFound(missing.clone()))),
        model_path,
    )
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = ImageBuffer::<Rgb<u8>, Vec<u8>>::from_pixel(width, height, Rgb([120, 80, 40]));
    let mut image_data: Vec<u8> = Vec::new();
    img.write_to(&mut Cursor::new(&mut image_data), image::ImageFormat::Png)
        .unwrap();
    image_data
}

pub fn analysis(file_name: &str, score: f32) -> Analysis {
    Analysis {
        file_name: file_name.to_string(),
        width: 640,
        height: 480,
        verdict: Verdict::from_score(score).unwrap(),
        preview: None,
    }
}
