use crate::alert_log::alert_record::AlertRecord;
use crate::alert_log::impl_csv::AlertLogCsv;
use crate::alert_log::interface::AlertLog;
use crate::config::Config;
use crate::library::logger::{impl_console::LoggerConsole, interface::Logger};
use crate::monitoring_page::core::View;
use crate::monitoring_page::main::MonitoringPage;
use chrono::{NaiveDate, NaiveDateTime};
use image::{DynamicImage, ImageFormat};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub struct Fixture {
    pub dir: tempfile::TempDir,
    pub config: Config,
    pub logger: Arc<dyn Logger + Send + Sync>,
    pub alert_log: Arc<AlertLogCsv>,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            alerts_file: dir.path().join("alerts.csv"),
            image_dir: dir.path().join("captured_images"),
            thumbnail_width: 32,
            ..Config::default()
        };
        let logger: Arc<dyn Logger + Send + Sync> =
            Arc::new(LoggerConsole::new(config.logger_timezone));
        let alert_log = Arc::new(AlertLogCsv::new(config.alerts_file.clone(), logger.clone()));

        Self {
            dir,
            config,
            logger,
            alert_log,
        }
    }

    /// Writes a real JPEG under the image dir.
    pub fn image(&self, name: &str, width: u32, height: u32) -> PathBuf {
        std::fs::create_dir_all(&self.config.image_dir).unwrap();
        let path = self.config.image_dir.join(name);
        DynamicImage::new_rgb8(width, height)
            .save_with_format(&path, ImageFormat::Jpeg)
            .unwrap();
        path
    }

    pub fn alert(&self, second: u32, animal: &str, confidence: f32) -> AlertRecord {
        let path = self.image(&format!("captured_202403090705{:02}.jpg", second), 64, 48);
        let record = AlertRecord::new(at(second), animal, confidence, &path);
        self.alert_log.append(record.clone()).unwrap();
        record
    }

    pub fn page(&self) -> MonitoringPage {
        MonitoringPage::new(
            self.config.clone(),
            self.logger.clone(),
            self.alert_log.clone(),
            Arc::new(|| {}),
        )
    }
}

pub fn at(second: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 9)
        .unwrap()
        .and_hms_opt(7, 5, second)
        .unwrap()
}

/// Feeds worker events into the page until it shows a table again and
/// nothing more arrives.
pub fn settle(page: &mut MonitoringPage) {
    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        assert!(Instant::now() < deadline, "monitoring page never settled");
        let received = page.wait_for_event(Duration::from_millis(200));
        let view = &page.state().view;
        let done = view.is_rendered() || matches!(view, View::Failed { .. });
        if !received && done {
            return;
        }
    }
}
