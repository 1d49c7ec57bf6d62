// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ONNX CLIP Vision Model Wrapper
//!
//! This module provides a wrapper around ONNX Runtime for running
//! the image tower of CLIP ViT-B/32.
//!
//! Features:
//! - ONNX model loading from disk
//! - GPU acceleration via CUDA (with automatic CPU fallback)
//! - CLIP preprocessing (shortest-edge resize, center crop, mean/std)
//! - Dimension validation at load time
//! - 512-dimensional output vectors

use anyhow::{anyhow, Context, Result};
use image::DynamicImage;
use ndarray::Array4;
use ort::execution_providers::{CPUExecutionProvider, CUDAExecutionProvider};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

use crate::embeddings::{l2_normalize, ImageEmbedder, CLIP_VIT_B32_DIMENSIONS};
use crate::vision::{preprocess_for_clip, CLIP_INPUT_SIZE};

/// Input tensor name of the exported CLIP vision tower
const INPUT_NAME: &str = "pixel_values";

/// Projected image embedding output of the exported CLIP vision tower
const OUTPUT_NAME: &str = "image_embeds";

/// Configuration for loading the CLIP vision model
#[derive(Debug, Clone)]
pub struct ClipModelConfig {
    /// Model name reported to clients and logs (e.g., "clip-ViT-B-32")
    pub name: String,
    /// Path to the ONNX vision model file
    pub model_path: PathBuf,
    /// Expected embedding dimensions (512 for ViT-B/32)
    pub dimensions: usize,
    /// ONNX Runtime intra-op thread count
    pub intra_threads: usize,
    /// Apply L2 normalization to the output
    pub normalize: bool,
}

impl ClipModelConfig {
    pub fn new(name: impl Into<String>, model_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            model_path: model_path.into(),
            dimensions: CLIP_VIT_B32_DIMENSIONS,
            intra_threads: 4,
            normalize: false,
        }
    }
}

/// ONNX-based CLIP image embedding model
///
/// # Model Details
/// - Input: `pixel_values` f32 tensor [1, 3, 224, 224]
/// - Output: `image_embeds` f32 tensor [1, 512]
/// - Provider: CUDA when available, CPU otherwise
///
/// # Thread Safety
/// The session is wrapped in `Arc<Mutex>`: inference calls from concurrent
/// requests are serialized on the session.
#[derive(Clone)]
pub struct OnnxClipModel {
    /// ONNX Runtime session
    session: Arc<Mutex<Session>>,

    /// Model name (e.g., "clip-ViT-B-32")
    model_name: String,

    /// Output dimension (512 for ViT-B/32)
    dimension: usize,

    /// Whether outputs are L2-normalized
    normalize: bool,
}

impl std::fmt::Debug for OnnxClipModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxClipModel")
            .field("model_name", &self.model_name)
            .field("dimension", &self.dimension)
            .field("normalize", &self.normalize)
            .finish_non_exhaustive()
    }
}

impl OnnxClipModel {
    /// Loads the model on the blocking thread pool
    ///
    /// # Errors
    /// Returns error if:
    /// - Model file not found or invalid
    /// - ONNX Runtime initialization fails
    /// - Model doesn't output `config.dimensions` values
    ///
    /// # Example
    /// ```ignore
    /// let config = ClipModelConfig::new("clip-ViT-B-32", "./models/clip/vision_model.onnx");
    /// let model = OnnxClipModel::new(config).await?;
    /// ```
    pub async fn new(config: ClipModelConfig) -> Result<Self> {
        tokio::task::spawn_blocking(move || Self::load(config))
            .await
            .context("CLIP model loading task panicked")?
    }

    /// Loads the model on the current thread
    pub fn load(config: ClipModelConfig) -> Result<Self> {
        let model_path = config.model_path.as_path();

        if !model_path.exists() {
            anyhow::bail!("ONNX model file not found: {}", model_path.display());
        }
        if config.dimensions == 0 {
            anyhow::bail!("Embedding dimension must be greater than 0");
        }

        info!("🚀 Initializing CLIP vision model from {}", model_path.display());

        // Try CUDA first, fall back to CPU if unavailable
        let cuda_result = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CUDAExecutionProvider::default().build()])
            .context("Failed to set CUDA execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(config.intra_threads)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path);

        let mut session = match cuda_result {
            Ok(s) => {
                info!("✅ CUDA execution provider initialized");
                s
            }
            Err(e) => {
                warn!("⚠️  CUDA execution provider failed: {}", e);
                warn!("   Falling back to CPU execution provider");
                Session::builder()
                    .context("Failed to create session builder")?
                    .with_execution_providers([CPUExecutionProvider::default().build()])
                    .context("Failed to set CPU execution provider")?
                    .with_optimization_level(GraphOptimizationLevel::Level3)
                    .context("Failed to set optimization level")?
                    .with_intra_threads(config.intra_threads)
                    .context("Failed to set intra threads")?
                    .commit_from_file(model_path)
                    .with_context(|| {
                        format!("Failed to load ONNX model from {}", model_path.display())
                    })?
            }
        };

        // Validate output width with a blank image
        let size = CLIP_INPUT_SIZE as usize;
        let blank = Array4::<f32>::zeros((1, 3, size, size));
        let output = run_session(&mut session, blank).context("Model validation inference failed")?;
        if output.len() != config.dimensions {
            anyhow::bail!(
                "Model outputs unexpected dimensions: {} (expected {})",
                output.len(),
                config.dimensions
            );
        }

        info!(
            "✅ CLIP vision model loaded: {} ({} dimensions)",
            config.name, config.dimensions
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            model_name: config.name,
            dimension: config.dimensions,
            normalize: config.normalize,
        })
    }

    /// Runs the model on an already preprocessed [1, 3, 224, 224] tensor
    pub fn embed_tensor(&self, pixel_values: Array4<f32>) -> Result<Vec<f32>> {
        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow!("CLIP session lock poisoned"))?;

        let embedding = run_session(&mut session, pixel_values)?;
        drop(session);

        finalize_embedding(embedding, self.dimension, self.normalize)
    }
}

/// Checks raw model output and applies optional L2 normalisation
///
/// Rejects outputs of the wrong length or containing NaN/Inf.
pub fn finalize_embedding(
    mut embedding: Vec<f32>,
    dimension: usize,
    normalize: bool,
) -> Result<Vec<f32>> {
    if embedding.len() != dimension {
        anyhow::bail!(
            "Unexpected embedding dimension: {} (expected {})",
            embedding.len(),
            dimension
        );
    }
    if embedding.iter().any(|v| !v.is_finite()) {
        anyhow::bail!("Image embedding contains non-finite values");
    }
    if normalize {
        l2_normalize(&mut embedding);
    }

    Ok(embedding)
}

impl ImageEmbedder for OnnxClipModel {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed_image(&self, image: &DynamicImage) -> Result<Vec<f32>> {
        let pixel_values = preprocess_for_clip(image);
        let embedding = self.embed_tensor(pixel_values)?;
        debug!(dims = embedding.len(), "Generated CLIP image embedding");
        Ok(embedding)
    }
}

/// Feeds one tensor through the session and flattens the projected output
fn run_session(session: &mut Session, pixel_values: Array4<f32>) -> Result<Vec<f32>> {
    let outputs = session.run(ort::inputs![
        INPUT_NAME => Value::from_array(pixel_values)?
    ])?;

    let output = outputs
        .get(OUTPUT_NAME)
        .with_context(|| format!("No output '{}' from vision model", OUTPUT_NAME))?;

    // [batch, dim] with batch = 1
    let array = output
        .try_extract_array::<f32>()
        .context("Failed to extract output tensor")?;

    Ok(array.iter().copied().collect())
}
