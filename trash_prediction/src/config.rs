use serde::Deserialize;
use std::path::PathBuf;

pub trait Validatable {
    fn get_path(&self) -> PathBuf;

    fn validate(&self) -> Result<(), String> {
        if !self.get_path().exists() {
            return Err(format!("Model file not found: {:?}", self.get_path()));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    pub onnx_file: String,
    pub model_dir: PathBuf,
    #[serde(default = "default_model_instances")]
    pub num_instances: usize,
    #[serde(default = "default_intra_threads")]
    pub intra_threads: usize,
    #[serde(default = "default_input_size")]
    pub input_size: u32,
    #[serde(default)]
    pub layout: TensorLayout,
    #[serde(default)]
    pub normalization: Normalization,
    #[serde(default)]
    pub apply_sigmoid: bool,
}

fn default_model_instances() -> usize {
    1
}

fn default_intra_threads() -> usize {
    1
}

fn default_input_size() -> u32 {
    224
}

impl Validatable for ModelConfig {
    fn get_path(&self) -> PathBuf {
        self.model_dir.join(&self.onnx_file)
    }
}

impl ModelConfig {
    pub fn input_spec(&self) -> InputSpec {
        InputSpec {
            size: self.input_size,
            layout: self.layout,
            normalization: self.normalization,
        }
    }
}

/// Memory order of the image tensor fed to the model.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TensorLayout {
    /// `[1, height, width, 3]`, the Keras export convention.
    #[default]
    Nhwc,
    /// `[1, 3, height, width]`.
    Nchw,
}

/// Per-pixel normalization expected by the network family.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Normalization {
    /// EfficientNet rescales inside the graph, so raw 0..=255 values go in.
    #[default]
    EfficientNet,
    Unit,
    Imagenet,
}

const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

impl Normalization {
    pub fn apply(&self, channel: usize, value: u8) -> f32 {
        let value = value as f32;
        match self {
            Normalization::EfficientNet => value,
            Normalization::Unit => value / 255.,
            Normalization::Imagenet => (value / 255. - IMAGENET_MEAN[channel]) / IMAGENET_STD[channel],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputSpec {
    pub size: u32,
    pub layout: TensorLayout,
    pub normalization: Normalization,
}

impl Default for InputSpec {
    fn default() -> Self {
        Self {
            size: default_input_size(),
            layout: TensorLayout::default(),
            normalization: Normalization::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization() {
        assert_eq!(Normalization::EfficientNet.apply(0, 255), 255.0);
        assert_eq!(Normalization::Unit.apply(1, 255), 1.0);
        let red = Normalization::Imagenet.apply(0, 0);
        assert!((red - (-0.485 / 0.229)).abs() < 1e-6);
    }

    #[test]
    fn test_validate_missing_model() {
        let config = ModelConfig {
            onnx_file: "missing.onnx".to_string(),
            model_dir: PathBuf::from("./does_not_exist"),
            num_instances: 1,
            intra_threads: 1,
            input_size: 224,
            layout: TensorLayout::Nhwc,
            normalization: Normalization::EfficientNet,
            apply_sigmoid: false,
        };

        assert_eq!(config.get_path(), PathBuf::from("./does_not_exist/missing.onnx"));
        assert!(config.validate().is_err());
    }
}
