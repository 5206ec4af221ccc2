use std::path::PathBuf;

/// How raw 0-255 channel values are mapped before inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    ZeroToOne,
    /// Keras MobileNetV2 `preprocess_input`.
    MinusOneToOne,
    /// Per-channel ImageNet mean/std, used by the ONNX model zoo exports.
    ImageNet,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub onnx_model_path: PathBuf,
    pub labels_path: PathBuf,
    /// (height, width)
    pub input_shape: (u32, u32),
    pub normalization: Normalization,
    pub apply_softmax: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            onnx_model_path: PathBuf::from("models/mobilenetv2-7.onnx"),
            labels_path: PathBuf::from("models/imagenet_classes.txt"),
            input_shape: (224, 224),
            normalization: Normalization::ImageNet,
            apply_softmax: true,
        }
    }
}
