// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for the CLIP vision encoder

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use ndarray::Array4;

/// Input resolution of the CLIP ViT-B/32 vision tower
pub const CLIP_INPUT_SIZE: u32 = 224;

/// Mean values for normalization (OpenAI CLIP)
pub const CLIP_MEAN: [f32; 3] = [0.481_454_66, 0.457_827_5, 0.408_210_73];

/// Std values for normalization (OpenAI CLIP)
pub const CLIP_STD: [f32; 3] = [0.268_629_54, 0.261_302_58, 0.275_777_11];

/// Preprocess an image for the CLIP vision encoder
///
/// Steps:
/// 1. Convert to RGB
/// 2. Center crop to the largest square, then resize to CLIP_INPUT_SIZE (bicubic)
/// 3. Normalize: (pixel/255 - mean) / std
/// 4. Convert to NCHW tensor format [1, 3, H, W]
pub fn preprocess_for_clip(image: &DynamicImage) -> Array4<f32> {
    let size = CLIP_INPUT_SIZE;
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    let square = resize_and_center_crop(&rgb, size).to_rgb8();

    let mut tensor = Array4::zeros((1, 3, size as usize, size as usize));

    for (x, y, pixel) in square.enumerate_pixels() {
        for c in 0..3 {
            let normalized = (pixel[c] as f32 / 255.0 - CLIP_MEAN[c]) / CLIP_STD[c];
            tensor[[0, c, y as usize, x as usize]] = normalized;
        }
    }

    tensor
}

/// Crop the center square of the original, then resize it to `target_size`
///
/// Working memory is bounded by the input and target sizes.
pub fn resize_and_center_crop(image: &DynamicImage, target_size: u32) -> DynamicImage {
    let (orig_w, orig_h) = image.dimensions();
    let side = orig_w.min(orig_h).max(1);

    let offset_x = orig_w.saturating_sub(side) / 2;
    let offset_y = orig_h.saturating_sub(side) / 2;

    image
        .crop_imm(offset_x, offset_y, side, side)
        .resize_exact(target_size, target_size, FilterType::CatmullRom)
}
