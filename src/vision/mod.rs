// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision processing module
//!
//! This module provides:
//! - Decoding of uploaded image bytes
//! - Preprocessing into the CLIP vision encoder input tensor

pub mod image_utils;
pub mod preprocessing;

pub use image_utils::{decode_image_bytes, format_to_extension, ImageError, ImageInfo};
pub use preprocessing::{preprocess_for_clip, CLIP_INPUT_SIZE};
