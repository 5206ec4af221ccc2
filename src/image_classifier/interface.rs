use image::DynamicImage;

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: String,
    pub confidence: f32,
}

pub trait ImageClassifier: Send + Sync {
    /// Returns predictions ranked by descending confidence.
    fn classify(
        &self,
        image: &DynamicImage,
    ) -> Result<Vec<Classification>, Box<dyn std::error::Error + Send + Sync>>;

    fn classify_top_1(
        &self,
        image: &DynamicImage,
    ) -> Result<Classification, Box<dyn std::error::Error + Send + Sync>> {
        self.classify(image)?
            .into_iter()
            .next()
            .ok_or_else(|| "classifier returned no predictions".into())
    }
}
