use crate::device_camera::interface::{CameraSession, DeviceCamera};
use crate::library::logger::interface::Logger;
use image::{DynamicImage, Rgb, RgbImage};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceCameraFakeBehavior {
    Working,
    Unavailable,
    /// Every read after the first `n` fails.
    FailsAfterReads(usize),
}

/// Synthetic camera producing a moving gradient.
pub struct DeviceCameraFake {
    logger: Arc<dyn Logger + Send + Sync>,
    behavior: DeviceCameraFakeBehavior,
    width: u32,
    height: u32,
    frame_delay: Duration,
    open_sessions: Arc<AtomicUsize>,
}

impl DeviceCameraFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>, width: u32, height: u32) -> Self {
        Self {
            logger: logger.with_namespace("camera").with_namespace("fake"),
            behavior: DeviceCameraFakeBehavior::Working,
            width,
            height,
            frame_delay: Duration::from_millis(33),
            open_sessions: Arc::new(AtomicUsize::new(0)),
        }
    }

    #[allow(dead_code)]
    pub fn with_behavior(mut self, behavior: DeviceCameraFakeBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    #[allow(dead_code)]
    pub fn with_frame_delay(mut self, frame_delay: Duration) -> Self {
        self.frame_delay = frame_delay;
        self
    }

    /// Number of sessions that have been opened and not yet released.
    #[allow(dead_code)]
    pub fn open_sessions(&self) -> usize {
        self.open_sessions.load(Ordering::SeqCst)
    }
}

impl DeviceCamera for DeviceCameraFake {
    fn open(&self) -> Result<Box<dyn CameraSession>, Box<dyn std::error::Error + Send + Sync>> {
        if self.behavior == DeviceCameraFakeBehavior::Unavailable {
            self.logger.info("Camera unavailable")?;
            return Err("fake camera is unavailable".into());
        }

        self.open_sessions.fetch_add(1, Ordering::SeqCst);
        self.logger.info("Camera opened")?;

        Ok(Box::new(CameraSessionFake {
            logger: self.logger.clone(),
            fail_after: match self.behavior {
                DeviceCameraFakeBehavior::FailsAfterReads(n) => Some(n),
                _ => None,
            },
            reads: 0,
            width: self.width,
            height: self.height,
            frame_delay: self.frame_delay,
            open_sessions: self.open_sessions.clone(),
        }))
    }
}

struct CameraSessionFake {
    logger: Arc<dyn Logger + Send + Sync>,
    fail_after: Option<usize>,
    reads: usize,
    width: u32,
    height: u32,
    frame_delay: Duration,
    open_sessions: Arc<AtomicUsize>,
}

impl CameraSession for CameraSessionFake {
    fn read_frame(&mut self) -> Result<DynamicImage, Box<dyn std::error::Error + Send + Sync>> {
        if self.fail_after.is_some_and(|n| self.reads >= n) {
            return Err("fake camera read failed".into());
        }

        std::thread::sleep(self.frame_delay);
        self.reads += 1;

        let shift = (self.reads * 8) as u32;
        let image = RgbImage::from_fn(self.width, self.height, |x, y| {
            Rgb([
                ((x + shift) % 256) as u8,
                ((y + shift) % 256) as u8,
                128,
            ])
        });

        Ok(DynamicImage::ImageRgb8(image))
    }
}

impl Drop for CameraSessionFake {
    fn drop(&mut self) {
        self.open_sessions.fetch_sub(1, Ordering::SeqCst);
        let _ = self.logger.info("Camera released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::logger::impl_console::LoggerConsole;

    fn camera() -> DeviceCameraFake {
        let logger = Arc::new(LoggerConsole::new(chrono::FixedOffset::east_opt(0).unwrap()));
        DeviceCameraFake::new(logger, 64, 48).with_frame_delay(Duration::ZERO)
    }

    #[test]
    fn test_session_is_released_on_drop() {
        let camera = camera();

        let mut session = camera.open().unwrap();
        assert_eq!(camera.open_sessions(), 1);

        let frame = session.read_frame().unwrap();
        assert_eq!((frame.width(), frame.height()), (64, 48));

        drop(session);
        assert_eq!(camera.open_sessions(), 0);
    }

    #[test]
    fn test_unavailable_camera_does_not_open() {
        let camera = camera().with_behavior(DeviceCameraFakeBehavior::Unavailable);

        assert!(camera.open().is_err());
        assert_eq!(camera.open_sessions(), 0);
    }

    #[test]
    fn test_reads_fail_after_limit() {
        let camera = camera().with_behavior(DeviceCameraFakeBehavior::FailsAfterReads(1));

        let mut session = camera.open().unwrap();

        assert!(session.read_frame().is_ok());
        assert!(session.read_frame().is_err());
    }
}
