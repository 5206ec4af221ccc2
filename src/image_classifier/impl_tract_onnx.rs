use crate::image_classifier::interface::{Classification, ImageClassifier};
use crate::image_classifier::labels::load_labels;
use crate::image_classifier::models::model_config::ModelConfig;
use crate::image_classifier::tract::image::resize_image_to_tensor;
use crate::library::logger::interface::Logger;
use image::DynamicImage;
use std::sync::Arc;
use tract_onnx::prelude::*;

const TOP_K: usize = 5;

pub struct ImageClassifierTractOnnx {
    model: SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>,
    labels: Vec<String>,
    config: ModelConfig,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ImageClassifierTractOnnx {
    pub fn new(
        config: ModelConfig,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let logger = logger.with_namespace("image_classifier");
        let (height, width) = config.input_shape;

        logger.info(&format!(
            "Loading model {}",
            config.onnx_model_path.display()
        ))?;

        let model = tract_onnx::onnx()
            .model_for_path(&config.onnx_model_path)?
            .with_input_fact(0, f32::fact([1, 3, height as usize, width as usize]).into())?
            .into_optimized()?
            .into_runnable()?;

        let labels = load_labels(&config.labels_path)?;

        logger.info(&format!("Model ready with {} labels", labels.len()))?;

        Ok(Self {
            model,
            labels,
            config,
            logger,
        })
    }
}

impl ImageClassifier for ImageClassifierTractOnnx {
    fn classify(
        &self,
        image: &DynamicImage,
    ) -> Result<Vec<Classification>, Box<dyn std::error::Error + Send + Sync>> {
        let (height, width) = self.config.input_shape;
        let input = resize_image_to_tensor(image, width, height, self.config.normalization);

        let outputs = self.model.run(tvec!(input.into_tvalue()))?;
        let output = outputs
            .first()
            .ok_or("model produced no outputs")?
            .to_array_view::<f32>()?;

        let scores: Vec<f32> = output.iter().copied().collect();
        let scores = if self.config.apply_softmax {
            softmax(&scores)
        } else {
            scores
        };

        let classifications = rank_scores(&scores, &self.labels, TOP_K);

        if let Some(top) = classifications.first() {
            self.logger
                .info(&format!("Top-1: {} ({:.4})", top.label, top.confidence))?;
        }

        Ok(classifications)
    }
}

pub fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum == 0.0 || !sum.is_finite() {
        return exps;
    }
    exps.iter().map(|e| e / sum).collect()
}

/// Pairs scores with labels and keeps the `top_k` best.
///
/// Models exported with an extra leading background class (1001 outputs for
/// 1000 labels) are shifted by one.
pub fn rank_scores(scores: &[f32], labels: &[String], top_k: usize) -> Vec<Classification> {
    let offset = if scores.len() == labels.len() + 1 { 1 } else { 0 };

    let mut ranked: Vec<(usize, f32)> = scores
        .iter()
        .copied()
        .enumerate()
        .skip(offset)
        .map(|(index, score)| (index - offset, score))
        .collect();

    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(top_k);

    ranked
        .into_iter()
        .map(|(index, confidence)| Classification {
            label: labels
                .get(index)
                .cloned()
                .unwrap_or_else(|| format!("class_{}", index)),
            confidence,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let probabilities = softmax(&[2.0, 1.0, 0.1]);

        let sum: f32 = probabilities.iter().sum();
        assert!((sum - 1.0).abs() < 0.0001);
        assert!(probabilities[0] > probabilities[1]);
        assert!(probabilities[1] > probabilities[2]);
    }

    #[test]
    fn test_rank_scores_orders_by_confidence() {
        let ranked = rank_scores(&[0.1, 0.7, 0.2], &labels(&["deer", "tiger", "lion"]), 5);

        let names: Vec<&str> = ranked.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(names, vec!["tiger", "lion", "deer"]);
        assert_eq!(ranked[0].confidence, 0.7);
    }

    #[test]
    fn test_rank_scores_truncates() {
        let ranked = rank_scores(&[0.1, 0.7, 0.2], &labels(&["deer", "tiger", "lion"]), 1);

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].label, "tiger");
    }

    #[test]
    fn test_rank_scores_skips_background_class() {
        let ranked = rank_scores(&[0.9, 0.05, 0.05], &labels(&["lion", "tiger"]), 5);

        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|c| c.label != "class_0"));
    }

    #[test]
    fn test_rank_scores_unknown_index_gets_placeholder_label() {
        let ranked = rank_scores(&[0.1, 0.2, 0.9], &labels(&["lion"]), 1);

        assert_eq!(ranked[0].label, "class_2");
    }
}
