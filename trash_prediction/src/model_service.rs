use crate::{error::PredictionError, verdict::Verdict};
use async_trait::async_trait;
use image::DynamicImage;

#[async_trait]
pub trait ModelService: Send + Sync + 'static {
    /// Probability that the pictured bin is full.
    async fn score(&self, image: DynamicImage) -> Result<f32, PredictionError>;

    async fn predict(&self, image: DynamicImage) -> Result<Verdict, PredictionError> {
        let raw_score = self.score(image).await?;
        Verdict::from_score(raw_score)
    }
}
