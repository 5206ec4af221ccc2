use crate::image_classifier::models::model_config::ModelConfig;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    /// Device node, or a `stub://` path for the synthetic camera.
    pub device: String,
    pub width: u32,
    pub height: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device: "/dev/video0".to_string(),
            width: 640,
            height: 480,
        }
    }
}

impl CameraConfig {
    pub fn is_stub(&self) -> bool {
        self.device.starts_with("stub://")
    }
}

/// Built once at start-up and shared read-only by both pages.
#[derive(Debug, Clone)]
pub struct Config {
    pub alerts_file: PathBuf,
    pub image_dir: PathBuf,
    pub camera: CameraConfig,
    pub observation_window: Duration,
    pub model: ModelConfig,
    pub thumbnail_width: u32,
    pub logger_timezone: chrono::FixedOffset,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            alerts_file: PathBuf::from("alerts.csv"),
            image_dir: PathBuf::from("captured_images"),
            camera: CameraConfig::default(),
            observation_window: Duration::from_secs(5),
            model: ModelConfig::default(),
            thumbnail_width: 300,
            logger_timezone: local_offset(),
        }
    }
}

fn local_offset() -> chrono::FixedOffset {
    *chrono::Local::now().offset()
}
