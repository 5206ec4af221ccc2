use image::{DynamicImage, RgbaImage};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Decoded image handed from a worker thread to the UI. The id changes
/// whenever the pixels do, so the UI only re-uploads textures on change.
#[derive(Clone, PartialEq)]
pub struct SharedImage {
    pub id: u64,
    pub image: Arc<RgbaImage>,
}

impl SharedImage {
    pub fn new(image: &DynamicImage) -> Self {
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            image: Arc::new(image.to_rgba8()),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

impl std::fmt::Debug for SharedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SharedImage(#{} {}x{})", self.id, self.width(), self.height())
    }
}
