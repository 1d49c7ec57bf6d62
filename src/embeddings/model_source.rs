// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Model file resolution
//!
//! The CLIP vision model is either read from an explicit local path or
//! fetched once from the Hugging Face Hub into the local cache.

use anyhow::{Context, Result};
use hf_hub::api::sync::ApiBuilder;
use std::path::PathBuf;
use tracing::info;

/// Where the ONNX model file comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// A file already on disk
    Local(PathBuf),
    /// A file inside a Hugging Face Hub model repository
    HuggingFace {
        repo: String,
        file: String,
        cache_dir: Option<PathBuf>,
    },
}

impl std::fmt::Display for ModelSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelSource::Local(path) => write!(f, "{}", path.display()),
            ModelSource::HuggingFace { repo, file, .. } => write!(f, "hf://{}/{}", repo, file),
        }
    }
}

/// Resolves a model source to a path on disk, downloading if needed
///
/// Blocking: the Hub client does synchronous network and file IO.
pub fn resolve_model_path(source: &ModelSource) -> Result<PathBuf> {
    match source {
        ModelSource::Local(path) => {
            if !path.is_file() {
                anyhow::bail!("Model file not found: {}", path.display());
            }
            Ok(path.clone())
        }
        ModelSource::HuggingFace {
            repo,
            file,
            cache_dir,
        } => {
            let mut builder = ApiBuilder::new().with_progress(false);
            if let Some(dir) = cache_dir {
                builder = builder.with_cache_dir(dir.clone());
            }
            let api = builder
                .build()
                .context("Failed to initialize Hugging Face Hub client")?;

            info!("📥 Fetching {} from Hugging Face repo {}", file, repo);
            let path = api
                .model(repo.clone())
                .get(file)
                .with_context(|| format!("Failed to download {} from {}", file, repo))?;
            info!("✅ Model available at {}", path.display());

            Ok(path)
        }
    }
}
