use crate::config::CameraConfig;
use crate::device_camera::interface::{CameraSession, DeviceCamera};
use crate::device_camera::pixel_format::{decode_frame, PixelFormat};
use crate::library::logger::interface::Logger;
use image::DynamicImage;
use std::sync::Arc;
use v4l::buffer::Type;
use v4l::io::traits::CaptureStream;
use v4l::prelude::MmapStream;
use v4l::video::Capture;

const BUFFER_COUNT: u32 = 4;

/// Local V4L2 device such as `/dev/video0`.
pub struct DeviceCameraV4l {
    config: CameraConfig,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl DeviceCameraV4l {
    pub fn new(config: CameraConfig, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            config,
            logger: logger.with_namespace("camera").with_namespace("v4l"),
        }
    }

    fn negotiate_format(
        &self,
        device: &v4l::Device,
    ) -> Result<(PixelFormat, u32, u32), Box<dyn std::error::Error + Send + Sync>> {
        for fourcc in [b"MJPG", b"YUYV", b"RGB3"] {
            let mut format = device.format()?;
            format.width = self.config.width;
            format.height = self.config.height;
            format.fourcc = v4l::FourCC::new(fourcc);

            let format = match device.set_format(&format) {
                Ok(format) => format,
                Err(err) => {
                    self.logger.info(&format!(
                        "Failed to set {} on {}: {}",
                        String::from_utf8_lossy(fourcc),
                        self.config.device,
                        err
                    ))?;
                    continue;
                }
            };

            if let Some(pixel_format) = PixelFormat::from_fourcc(&format.fourcc.repr) {
                return Ok((pixel_format, format.width, format.height));
            }
        }

        Err(format!("{} offers no supported pixel format", self.config.device).into())
    }
}

impl DeviceCamera for DeviceCameraV4l {
    fn open(&self) -> Result<Box<dyn CameraSession>, Box<dyn std::error::Error + Send + Sync>> {
        let device = v4l::Device::with_path(&self.config.device)
            .map_err(|e| format!("open {}: {}", self.config.device, e))?;

        let (pixel_format, width, height) = self.negotiate_format(&device)?;

        let stream = MmapStream::with_buffers(&device, Type::VideoCapture, BUFFER_COUNT)
            .map_err(|e| format!("create buffer stream on {}: {}", self.config.device, e))?;

        self.logger.info(&format!(
            "Opened {} ({}x{} {:?})",
            self.config.device, width, height, pixel_format
        ))?;

        Ok(Box::new(CameraSessionV4l {
            stream,
            _device: device,
            pixel_format,
            width,
            height,
            logger: self.logger.clone(),
        }))
    }
}

struct CameraSessionV4l {
    // Dropped before the device handle.
    stream: MmapStream<'static>,
    _device: v4l::Device,
    pixel_format: PixelFormat,
    width: u32,
    height: u32,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl CameraSession for CameraSessionV4l {
    fn read_frame(&mut self) -> Result<DynamicImage, Box<dyn std::error::Error + Send + Sync>> {
        let (buf, meta) = self.stream.next()?;
        let used = (meta.bytesused as usize).min(buf.len());
        let data = if used == 0 { buf } else { &buf[..used] };

        decode_frame(self.pixel_format, self.width, self.height, data)
    }
}

impl Drop for CameraSessionV4l {
    fn drop(&mut self) {
        let _ = self.logger.info("Camera released");
    }
}
