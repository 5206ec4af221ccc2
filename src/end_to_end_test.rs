use crate::alert_log::impl_csv::AlertLogCsv;
use crate::alert_log::interface::AlertLog;
use crate::capture_page::main::CapturePage;
use crate::config::Config;
use crate::device_camera::impl_fake::DeviceCameraFake;
use crate::image_classifier::impl_fake::ImageClassifierFake;
use crate::library::logger::{impl_console::LoggerConsole, interface::Logger};
use crate::monitoring_page::core::View;
use crate::monitoring_page::main::MonitoringPage;
use std::sync::Arc;
use std::time::{Duration, Instant};

struct Fixture {
    _dir: tempfile::TempDir,
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    alert_log: Arc<AlertLogCsv>,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            alerts_file: dir.path().join("alerts.csv"),
            image_dir: dir.path().join("captured_images"),
            observation_window: Duration::from_millis(30),
            ..Config::default()
        };
        let logger: Arc<dyn Logger + Send + Sync> =
            Arc::new(LoggerConsole::new(config.logger_timezone));
        let alert_log = Arc::new(AlertLogCsv::new(config.alerts_file.clone(), logger.clone()));

        Self {
            _dir: dir,
            config,
            logger,
            alert_log,
        }
    }

    fn capture(&self, label: &str, confidence: f32) {
        let device_camera = Arc::new(
            DeviceCameraFake::new(self.logger.clone(), 64, 48)
                .with_frame_delay(Duration::from_millis(5)),
        );
        let mut page = CapturePage::new(
            self.config.clone(),
            self.logger.clone(),
            device_camera,
            Arc::new(ImageClassifierFake::with_result(
                self.logger.clone(),
                label,
                confidence,
            )),
            self.alert_log.clone(),
            Arc::new(|| {}),
        );

        page.dispatch(crate::capture_page::core::Event::CaptureClicked);

        let deadline = Instant::now() + Duration::from_secs(10);
        while page.state().is_busy() {
            assert!(Instant::now() < deadline, "capture never finished");
            page.wait_for_event(Duration::from_millis(100));
        }
    }

    fn monitor(&self) -> MonitoringPage {
        let mut page = MonitoringPage::new(
            self.config.clone(),
            self.logger.clone(),
            self.alert_log.clone(),
            Arc::new(|| {}),
        );

        let deadline = Instant::now() + Duration::from_secs(10);
        while !page.state().view.is_rendered() {
            assert!(Instant::now() < deadline, "monitoring never rendered");
            page.wait_for_event(Duration::from_millis(100));
        }
        page
    }
}

#[test]
fn test_tiger_capture_shows_on_monitoring_page() {
    let f = Fixture::new();

    f.capture("tiger", 0.87);

    let contents = std::fs::read_to_string(&f.config.alerts_file).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "Time,Animal,Confidence,Image");
    assert!(lines[1].contains(",tiger,0.87,"));

    let page = f.monitor();
    let View::RenderedWithRows { rows, notices, .. } = &page.state().view else {
        panic!("expected rows, got {:?}", page.state().view);
    };
    assert!(notices.is_empty());
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].animal, "tiger");
    assert_eq!(rows[0].confidence, "0.87");
}

#[test]
fn test_deer_capture_is_not_logged() {
    let f = Fixture::new();
    f.alert_log.initialize().unwrap();
    let before = std::fs::read_to_string(&f.config.alerts_file).unwrap();

    f.capture("deer", 0.95);

    assert_eq!(
        std::fs::read_to_string(&f.config.alerts_file).unwrap(),
        before
    );
    let page = f.monitor();
    assert_eq!(page.state().view, View::RenderedEmpty { notices: vec![] });
}
