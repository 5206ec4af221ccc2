use image::DynamicImage;

/// An open camera. The device stays claimed until the session is dropped.
pub trait CameraSession: Send {
    fn read_frame(&mut self) -> Result<DynamicImage, Box<dyn std::error::Error + Send + Sync>>;
}

pub trait DeviceCamera: Send + Sync {
    fn open(&self) -> Result<Box<dyn CameraSession>, Box<dyn std::error::Error + Send + Sync>>;
}
