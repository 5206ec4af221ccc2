use chrono::NaiveDateTime;
use image::{DynamicImage, ImageFormat};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Directory of captured frames, one JPEG per capture.
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `captured_<YYYYMMDDHHMMSS>.jpg`.
    pub fn path_for(&self, captured_at: NaiveDateTime) -> PathBuf {
        self.dir.join(format!(
            "captured_{}.jpg",
            captured_at.format("%Y%m%d%H%M%S")
        ))
    }

    pub fn save(
        &self,
        frame: &DynamicImage,
        captured_at: NaiveDateTime,
    ) -> Result<PathBuf, Box<dyn std::error::Error + Send + Sync>> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| format!("create image dir {}: {}", self.dir.display(), e))?;

        // Names only resolve to the second; an existing frame is never replaced.
        let path = self.path_for(captured_at);
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| format!("create {}: {}", path.display(), e))?;

        let mut writer = BufWriter::new(file);
        DynamicImage::ImageRgb8(frame.to_rgb8()).write_to(&mut writer, ImageFormat::Jpeg)?;
        writer.flush()?;

        Ok(path)
    }
}
