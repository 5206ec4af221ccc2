use crate::alert_log::interface::AlertLog;
use crate::capture_page::core::{CaptureError, CapturedFrame, Effect, Event};
use crate::config::Config;
use crate::device_camera::interface::DeviceCamera;
use crate::image_classifier::interface::{Classification, ImageClassifier};
use crate::image_store::ImageStore;
use crate::library::logger::interface::Logger;
use crate::library::shared_image::SharedImage;
use chrono::{Local, NaiveDateTime, Timelike};
use std::path::Path;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub struct RunEffect {
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    device_camera: Arc<dyn DeviceCamera + Send + Sync>,
    image_classifier: Arc<dyn ImageClassifier + Send + Sync>,
    alert_log: Arc<dyn AlertLog + Send + Sync>,
    image_store: ImageStore,
    event_sender: Sender<Event>,
    request_repaint: Arc<dyn Fn() + Send + Sync>,
}

impl RunEffect {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        device_camera: Arc<dyn DeviceCamera + Send + Sync>,
        image_classifier: Arc<dyn ImageClassifier + Send + Sync>,
        alert_log: Arc<dyn AlertLog + Send + Sync>,
        event_sender: Sender<Event>,
        request_repaint: Arc<dyn Fn() + Send + Sync>,
    ) -> Self {
        Self {
            image_store: ImageStore::new(config.image_dir.clone()),
            config,
            logger: logger.with_namespace("run_effect"),
            device_camera,
            image_classifier,
            alert_log,
            event_sender,
            request_repaint,
        }
    }

    pub fn run_effect(&self, effect: Effect) {
        let _ = self.logger.info(&format!("Running effect: {:?}", effect));

        match effect {
            Effect::CaptureFrame => {
                let captured = self.capture_frame();
                self.send(Event::CaptureDone(captured));
            }
            Effect::ClassifyFrame { path } => {
                let classified = self.classify_frame(&path);
                if let Err(error) = &classified {
                    let _ = self.logger.error(&format!("Classification failed: {}", error));
                }
                self.send(Event::ClassifyDone(classified));
            }
            Effect::LogAlert { record } => {
                let logged: Result<(), Box<dyn std::error::Error + Send + Sync>> =
                    self.alert_log.append(record).map_err(|e| {
                        let _ = self.logger.error(&format!("Logging alert failed: {}", e));
                        e.into()
                    });
                self.send(Event::AlertLogged(logged));
            }
        }
    }

    fn send(&self, event: Event) {
        if self.event_sender.send(event).is_ok() {
            (self.request_repaint)();
        }
    }

    /// Holds the camera for the observation window, streaming previews,
    /// then stores one frame. The session is dropped on every return path.
    fn capture_frame(&self) -> Result<CapturedFrame, CaptureError> {
        let mut session = self.device_camera.open().map_err(|e| {
            let _ = self.logger.error(&format!("Opening camera failed: {}", e));
            CaptureError::DeviceUnavailable
        })?;

        let window = self.config.observation_window;
        let started = Instant::now();

        while started.elapsed() < window {
            let frame = session.read_frame().map_err(|e| {
                let _ = self.logger.error(&format!("Preview read failed: {}", e));
                CaptureError::PreviewReadFailed
            })?;

            self.send(Event::PreviewFrame {
                frame: SharedImage::new(&frame),
                remaining_secs: window.saturating_sub(started.elapsed()).as_secs(),
            });
        }

        let frame = session.read_frame().map_err(|e| {
            let _ = self.logger.error(&format!("Capture read failed: {}", e));
            CaptureError::CaptureReadFailed
        })?;
        drop(session);

        let captured_at = now_to_the_second();
        let path = self
            .image_store
            .save(&frame, captured_at)
            .map_err(|e| CaptureError::Storage(e.to_string()))?;

        let _ = self
            .logger
            .info(&format!("Stored frame at {}", path.display()));

        Ok(CapturedFrame {
            path,
            captured_at,
            image: SharedImage::new(&frame),
        })
    }

    fn classify_frame(
        &self,
        path: &Path,
    ) -> Result<Classification, Box<dyn std::error::Error + Send + Sync>> {
        let image = image::open(path)
            .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
        self.image_classifier.classify_top_1(&image)
    }
}

fn now_to_the_second() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}
