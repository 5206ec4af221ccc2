use crate::image_classifier::interface::{Classification, ImageClassifier};
use crate::library::logger::interface::Logger;
use image::DynamicImage;
use rand::distr::{Distribution, Uniform};
use std::sync::Arc;

const ANIMALS: [&str; 10] = [
    "lion",
    "tiger",
    "leopard",
    "deer",
    "zebra",
    "African_elephant",
    "brown_bear",
    "red_fox",
    "hare",
    "wild_boar",
];

enum Behavior {
    Random,
    Fixed(Classification),
    Failing(String),
}

pub struct ImageClassifierFake {
    logger: Arc<dyn Logger + Send + Sync>,
    behavior: Behavior,
}

impl ImageClassifierFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("image_classifier").with_namespace("fake"),
            behavior: Behavior::Random,
        }
    }

    #[allow(dead_code)]
    pub fn with_result(logger: Arc<dyn Logger + Send + Sync>, label: &str, confidence: f32) -> Self {
        Self {
            behavior: Behavior::Fixed(Classification {
                label: label.to_string(),
                confidence,
            }),
            ..Self::new(logger)
        }
    }

    #[allow(dead_code)]
    pub fn failing(logger: Arc<dyn Logger + Send + Sync>, message: &str) -> Self {
        Self {
            behavior: Behavior::Failing(message.to_string()),
            ..Self::new(logger)
        }
    }
}

impl ImageClassifier for ImageClassifierFake {
    fn classify(
        &self,
        _image: &DynamicImage,
    ) -> Result<Vec<Classification>, Box<dyn std::error::Error + Send + Sync>> {
        self.logger.info("Classifying image...")?;

        let classification = match &self.behavior {
            Behavior::Fixed(classification) => classification.clone(),
            Behavior::Failing(message) => return Err(message.clone().into()),
            Behavior::Random => {
                let mut rng = rand::rng();
                let index_dist = Uniform::new(0, ANIMALS.len())?;
                let confidence_dist = Uniform::new(0.0f32, 1.0)?;

                Classification {
                    label: ANIMALS[index_dist.sample(&mut rng)].to_string(),
                    confidence: confidence_dist.sample(&mut rng),
                }
            }
        };

        Ok(vec![classification])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::logger::impl_console::LoggerConsole;

    fn logger() -> Arc<dyn Logger + Send + Sync> {
        Arc::new(LoggerConsole::new(chrono::FixedOffset::east_opt(0).unwrap()))
    }

    fn blank() -> DynamicImage {
        DynamicImage::new_rgb8(4, 4)
    }

    #[test]
    fn test_random_label_comes_from_known_animals() {
        let classifier = ImageClassifierFake::new(logger());

        let top = classifier.classify_top_1(&blank()).unwrap();

        assert!(ANIMALS.contains(&top.label.as_str()));
        assert!((0.0..1.0).contains(&top.confidence));
    }

    #[test]
    fn test_fixed_result() {
        let classifier = ImageClassifierFake::with_result(logger(), "tiger", 0.87);

        let top = classifier.classify_top_1(&blank()).unwrap();

        assert_eq!(
            top,
            Classification {
                label: "tiger".to_string(),
                confidence: 0.87
            }
        );
    }

    #[test]
    fn test_failing() {
        let classifier = ImageClassifierFake::failing(logger(), "model exploded");

        let error = classifier.classify_top_1(&blank()).unwrap_err();

        assert_eq!(error.to_string(), "model exploded");
    }
}
