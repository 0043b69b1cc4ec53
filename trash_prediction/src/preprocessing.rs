use crate::{
    config::{InputSpec, TensorLayout},
    error::PredictionError,
};
use image::{imageops::FilterType, DynamicImage, ImageFormat, Limits};
use ndarray::{Array, Ix4};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    pub max_dimension: u32,
    pub max_alloc_bytes: u64,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_dimension: 8192,
            max_alloc_bytes: 256 * 1024 * 1024,
        }
    }
}

impl DecodeLimits {
    fn to_image_limits(self) -> Limits {
        let mut limits = Limits::default();
        limits.max_image_width = Some(self.max_dimension);
        limits.max_image_height = Some(self.max_dimension);
        limits.max_alloc = Some(self.max_alloc_bytes);
        limits
    }
}

/// Decodes JPEG/PNG bytes and drops any alpha channel.
pub fn decode_image(image_data: &[u8]) -> Result<DynamicImage, PredictionError> {
    decode_image_with_limits(image_data, DecodeLimits::default())
}

pub fn decode_image_with_limits(
    image_data: &[u8],
    limits: DecodeLimits,
) -> Result<DynamicImage, PredictionError> {
    let mut image_reader =
        image::ImageReader::new(std::io::Cursor::new(image_data)).with_guessed_format()?;
    if !matches!(
        image_reader.format(),
        Some(ImageFormat::Jpeg | ImageFormat::Png)
    ) {
        return Err(PredictionError::UnsupportedFormat);
    }

    image_reader.limits(limits.to_image_limits());
    let original_img = image_reader.decode()?;

    Ok(DynamicImage::ImageRgb8(original_img.into_rgb8()))
}

pub fn transform_image(image: &DynamicImage, spec: &InputSpec) -> Array<f32, Ix4> {
    let size = spec.size as usize;
    let img = image
        .resize_exact(spec.size, spec.size, FilterType::CatmullRom)
        .into_rgb8();

    let mut input = match spec.layout {
        TensorLayout::Nhwc => Array::zeros((1, size, size, 3)),
        TensorLayout::Nchw => Array::zeros((1, 3, size, size)),
    };
    for (x, y, pixel) in img.enumerate_pixels() {
        let x = x as usize;
        let y = y as usize;
        for (channel, value) in pixel.0.iter().enumerate() {
            let value = spec.normalization.apply(channel, *value);
            match spec.layout {
                TensorLayout::Nhwc => input[[0, y, x, channel]] = value,
                TensorLayout::Nchw => input[[0, channel, y, x]] = value,
            }
        }
    }

    input
}
