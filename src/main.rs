use alert_log::impl_csv::AlertLogCsv;
use alert_log::interface::AlertLog;
use capture_page::main::CapturePage;
use clap::{Args, Parser, Subcommand};
use config::Config;
use device_camera::impl_fake::DeviceCameraFake;
use device_camera::interface::DeviceCamera;
use eframe::egui;
use image_classifier::impl_fake::ImageClassifierFake;
use image_classifier::impl_tract_onnx::ImageClassifierTractOnnx;
use image_classifier::interface::ImageClassifier;
use library::logger::impl_console::LoggerConsole;
use library::logger::interface::Logger;
use monitoring_page::main::MonitoringPage;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

mod alert_log;
mod capture_page;
mod config;
mod deny_list;
mod device_camera;
#[cfg(test)]
mod end_to_end_test;
mod image_classifier;
mod image_store;
mod library;
mod monitoring_page;

#[derive(Parser, Debug)]
#[command(author, version, about = "Webcam dangerous-animal alerts for forest patrols")]
struct Cli {
    /// Alert log shared by both pages.
    #[arg(long, env = "FOREST_ALERT_LOG")]
    alerts_file: Option<PathBuf>,

    #[command(subcommand)]
    page: Page,
}

#[derive(Subcommand, Debug)]
enum Page {
    /// Capture a frame, classify it and log dangerous animals
    Capture(CaptureArgs),
    /// Browse and clear logged alerts
    Monitor,
}

#[derive(Args, Debug)]
struct CaptureArgs {
    /// Where captured frames are stored.
    #[arg(long, env = "FOREST_ALERT_IMAGE_DIR")]
    image_dir: Option<PathBuf>,
    /// V4L2 device node, or `stub://` for a synthetic camera.
    #[arg(long, env = "FOREST_ALERT_CAMERA")]
    camera: Option<String>,
    /// Seconds the camera stays open before the frame is taken. Frames are
    /// named by the second, so at least one.
    #[arg(
        long,
        env = "FOREST_ALERT_COUNTDOWN_SECS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    countdown_secs: Option<u64>,
    #[arg(long, env = "FOREST_ALERT_MODEL")]
    model: Option<PathBuf>,
    #[arg(long, env = "FOREST_ALERT_LABELS")]
    labels: Option<PathBuf>,
    /// Random labels instead of the ONNX model.
    #[arg(long, env = "FOREST_ALERT_FAKE_CLASSIFIER")]
    fake_classifier: bool,
}

impl CaptureArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(image_dir) = &self.image_dir {
            config.image_dir = image_dir.clone();
        }
        if let Some(camera) = &self.camera {
            config.camera.device = camera.clone();
        }
        if let Some(secs) = self.countdown_secs {
            config.observation_window = Duration::from_secs(secs);
        }
        if let Some(model) = &self.model {
            config.model.onnx_model_path = model.clone();
        }
        if let Some(labels) = &self.labels {
            config.model.labels_path = labels.clone();
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    let mut config = Config::default();
    if let Some(alerts_file) = &cli.alerts_file {
        config.alerts_file = alerts_file.clone();
    }
    if let Page::Capture(args) = &cli.page {
        args.apply(&mut config);
    }

    let logger: Arc<dyn Logger + Send + Sync> =
        Arc::new(LoggerConsole::new(config.logger_timezone));

    logger.info(&format!("Starting with {:?}", config))?;

    let alert_log: Arc<dyn AlertLog + Send + Sync> =
        Arc::new(AlertLogCsv::new(config.alerts_file.clone(), logger.clone()));

    match cli.page {
        Page::Capture(args) => {
            let device_camera = build_device_camera(&config, logger.clone())?;

            let image_classifier: Arc<dyn ImageClassifier + Send + Sync> = if args.fake_classifier
            {
                Arc::new(ImageClassifierFake::new(logger.clone()))
            } else {
                Arc::new(ImageClassifierTractOnnx::new(
                    config.model.clone(),
                    logger.clone(),
                )?)
            };

            run_window("Animal Detection", [720.0, 720.0], move |ctx| {
                Box::new(CapturePage::new(
                    config,
                    logger,
                    device_camera,
                    image_classifier,
                    alert_log,
                    repaint(ctx),
                ))
            })
        }
        Page::Monitor => run_window("Animal Detection Monitoring", [900.0, 720.0], move |ctx| {
            Box::new(MonitoringPage::new(config, logger, alert_log, repaint(ctx)))
        }),
    }
}

fn build_device_camera(
    config: &Config,
    logger: Arc<dyn Logger + Send + Sync>,
) -> Result<Arc<dyn DeviceCamera + Send + Sync>, Box<dyn std::error::Error + Send + Sync>> {
    if config.camera.is_stub() {
        return Ok(Arc::new(DeviceCameraFake::new(
            logger,
            config.camera.width,
            config.camera.height,
        )));
    }

    #[cfg(feature = "camera-v4l")]
    {
        Ok(Arc::new(
            device_camera::impl_v4l::DeviceCameraV4l::new(config.camera.clone(), logger),
        ))
    }

    #[cfg(not(feature = "camera-v4l"))]
    {
        Err(format!(
            "camera {} needs the camera-v4l feature; use stub:// for a synthetic camera",
            config.camera.device
        )
        .into())
    }
}

fn repaint(ctx: &egui::Context) -> Arc<dyn Fn() + Send + Sync> {
    let ctx = ctx.clone();
    Arc::new(move || ctx.request_repaint())
}

fn run_window(
    title: &str,
    size: [f32; 2],
    create: impl FnOnce(&egui::Context) -> Box<dyn eframe::App> + 'static,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size(size),
        ..Default::default()
    };

    eframe::run_native(title, options, Box::new(move |cc| create(&cc.egui_ctx)))
        .map_err(|e| e.to_string())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "forest-alert",
            "--alerts-file",
            "/tmp/log.csv",
            "capture",
            "--camera",
            "stub://test",
            "--countdown-secs",
            "2",
        ])
        .unwrap();
        let mut config = Config::default();
        let Page::Capture(args) = &cli.page else {
            panic!("expected capture, got {:?}", cli.page);
        };

        args.apply(&mut config);

        assert_eq!(cli.alerts_file, Some(PathBuf::from("/tmp/log.csv")));
        assert!(config.camera.is_stub());
        assert_eq!(config.observation_window, Duration::from_secs(2));
        assert!(!args.fake_classifier);
    }

    #[test]
    fn test_zero_countdown_is_rejected() {
        let parsed = Cli::try_parse_from(["forest-alert", "capture", "--countdown-secs", "0"]);

        assert!(parsed.is_err());
    }

    #[test]
    fn test_stub_camera_needs_no_device() {
        let logger: Arc<dyn Logger + Send + Sync> =
            Arc::new(LoggerConsole::new(chrono::FixedOffset::east_opt(0).unwrap()));
        let mut config = Config::default();
        config.camera.device = "stub://test".to_string();

        let camera = build_device_camera(&config, logger).unwrap();
        let mut session = camera.open().unwrap();
        let frame = session.read_frame().unwrap();

        assert_eq!((frame.width(), frame.height()), (640, 480));
    }

    #[cfg(not(feature = "camera-v4l"))]
    #[test]
    fn test_real_camera_without_v4l_is_an_error() {
        let logger: Arc<dyn Logger + Send + Sync> =
            Arc::new(LoggerConsole::new(chrono::FixedOffset::east_opt(0).unwrap()));

        let Err(error) = build_device_camera(&Config::default(), logger) else {
            panic!("expected an error for {}", Config::default().camera.device);
        };

        assert!(error.to_string().contains("camera-v4l"));
    }
}
