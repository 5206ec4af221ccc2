use image::{DynamicImage, ImageFormat, RgbImage};

/// Pixel layouts a capture device may hand back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Mjpeg,
    Rgb24,
    Yuyv,
}

impl PixelFormat {
    pub fn from_fourcc(fourcc: &[u8; 4]) -> Option<Self> {
        match fourcc {
            b"MJPG" => Some(PixelFormat::Mjpeg),
            b"RGB3" => Some(PixelFormat::Rgb24),
            b"YUYV" => Some(PixelFormat::Yuyv),
            _ => None,
        }
    }
}

pub fn decode_frame(
    format: PixelFormat,
    width: u32,
    height: u32,
    data: &[u8],
) -> Result<DynamicImage, Box<dyn std::error::Error + Send + Sync>> {
    match format {
        PixelFormat::Mjpeg => Ok(image::load_from_memory_with_format(data, ImageFormat::Jpeg)?),
        PixelFormat::Rgb24 => {
            let expected = (width * height * 3) as usize;
            let data = data.get(..expected).ok_or("short RGB24 frame")?;
            let image = RgbImage::from_raw(width, height, data.to_vec()).ok_or("bad RGB24 frame")?;
            Ok(DynamicImage::ImageRgb8(image))
        }
        PixelFormat::Yuyv => Ok(DynamicImage::ImageRgb8(yuyv_to_rgb(width, height, data)?)),
    }
}

fn clamp(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

fn yuv_to_rgb(y: u8, u: u8, v: u8) -> [u8; 3] {
    let y = y as f32;
    let u = u as f32 - 128.0;
    let v = v as f32 - 128.0;
    [
        clamp(y + 1.402 * v),
        clamp(y - 0.344_136 * u - 0.714_136 * v),
        clamp(y + 1.772 * u),
    ]
}

/// YUYV 4:2:2, two pixels per four bytes.
fn yuyv_to_rgb(
    width: u32,
    height: u32,
    data: &[u8],
) -> Result<RgbImage, Box<dyn std::error::Error + Send + Sync>> {
    let expected = (width * height * 2) as usize;
    if data.len() < expected || width % 2 != 0 {
        return Err("short YUYV frame".into());
    }

    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    for chunk in data[..expected].chunks_exact(4) {
        let (y0, u, y1, v) = (chunk[0], chunk[1], chunk[2], chunk[3]);
        rgb.extend_from_slice(&yuv_to_rgb(y0, u, v));
        rgb.extend_from_slice(&yuv_to_rgb(y1, u, v));
    }

    RgbImage::from_raw(width, height, rgb).ok_or_else(|| "bad YUYV frame".into())
}
