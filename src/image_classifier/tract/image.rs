use crate::image_classifier::models::model_config::Normalization;
use image::{imageops, DynamicImage};
use tract_onnx::prelude::*;

const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

pub fn resize_image(image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    if image.width() == width && image.height() == height {
        return image.clone();
    }
    image.resize_exact(width, height, imageops::FilterType::Triangle)
}

fn normalize(value: u8, channel: usize, normalization: Normalization) -> f32 {
    let value = value as f32;
    match normalization {
        Normalization::ZeroToOne => value / 255.0,
        Normalization::MinusOneToOne => value / 127.5 - 1.0,
        Normalization::ImageNet => (value / 255.0 - IMAGENET_MEAN[channel]) / IMAGENET_STD[channel],
    }
}

/// NCHW, batch of one.
pub fn image_to_tensor(image: &DynamicImage, normalization: Normalization) -> Tensor {
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();

    tract_ndarray::Array4::from_shape_fn(
        (1, 3, height as usize, width as usize),
        |(_, c, y, x)| normalize(rgb.get_pixel(x as u32, y as u32)[c], c, normalization),
    )
    .into_tensor()
}

pub fn resize_image_to_tensor(
    image: &DynamicImage,
    width: u32,
    height: u32,
    normalization: Normalization,
) -> Tensor {
    let resized = resize_image(image, width, height);
    image_to_tensor(&resized, normalization)
}
