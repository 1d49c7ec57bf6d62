// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Image Embedding Module
//!
//! This module provides image embeddings using ONNX Runtime and the
//! CLIP ViT-B/32 vision encoder (512-dimensional output).
//!
//! # Architecture
//! - `clip_model`: ONNX session wrapper for the CLIP vision tower
//! - `model_source`: Resolves the model file (local path or Hugging Face Hub)
//!
//! The HTTP layer only sees the [`ImageEmbedder`] trait, so the model
//! handle is injected through router state.

pub mod clip_model;
pub mod model_source;

pub use clip_model::{finalize_embedding, ClipModelConfig, OnnxClipModel};
pub use model_source::{resolve_model_path, ModelSource};

use image::DynamicImage;

/// Default embedding dimension of CLIP ViT-B/32
pub const CLIP_VIT_B32_DIMENSIONS: usize = 512;

/// Something that turns a decoded image into a fixed-length vector
///
/// Implementations must be safe to share across request handlers.
/// `embed_image` is blocking and is called from the blocking thread pool.
pub trait ImageEmbedder: Send + Sync {
    /// Name reported for the loaded model
    fn model_name(&self) -> &str;

    /// Fixed output dimension
    fn dimension(&self) -> usize;

    /// Generates the embedding for one image
    fn embed_image(&self, image: &DynamicImage) -> anyhow::Result<Vec<f32>>;
}

/// Scales a vector to unit L2 norm (zero vectors are returned unchanged)
pub fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}
