// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Decode-then-preprocess tests over encoded image bytes

use clip_embed_service::vision::{decode_image_bytes, preprocess_for_clip};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

fn encode(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

#[test]
fn test_png_and_bmp_of_same_pixels_preprocess_identically() {
    // Both are lossless, so the tensors must match exactly
    let img = DynamicImage::ImageRgb8(RgbImage::from_fn(120, 90, |x, y| {
        Rgb([(x * 2) as u8, (y * 2) as u8, 77])
    }));

    let (png, _) = decode_image_bytes(&encode(&img, ImageFormat::Png)).unwrap();
    let (bmp, _) = decode_image_bytes(&encode(&img, ImageFormat::Bmp)).unwrap();

    assert_eq!(preprocess_for_clip(&png), preprocess_for_clip(&bmp));
}

#[test]
fn test_grayscale_input_expands_to_three_channels() {
    let gray = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(40, 40, image::Luma([128])));
    let (decoded, _) = decode_image_bytes(&encode(&gray, ImageFormat::Png)).unwrap();

    let tensor = preprocess_for_clip(&decoded);
    assert_eq!(tensor.shape(), &[1, 3, 224, 224]);
}

#[test]
fn test_gif_first_frame_decodes() {
    let img = DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
        10,
        10,
        image::Rgba([0, 0, 255, 255]),
    ));
    let (decoded, info) = decode_image_bytes(&encode(&img, ImageFormat::Gif)).unwrap();

    assert_eq!(info.format, ImageFormat::Gif);
    assert_eq!((decoded.width(), decoded.height()), (10, 10));
}
