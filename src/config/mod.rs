// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Service configuration
//!
//! Every option can be given as a CLI flag or an environment variable
//! (a `.env` file is loaded by `main` before parsing).

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::embeddings::{ClipModelConfig, ModelSource, CLIP_VIT_B32_DIMENSIONS};

pub const DEFAULT_MODEL_NAME: &str = "clip-ViT-B-32";
pub const DEFAULT_MODEL_REPO: &str = "Xenova/clip-vit-base-patch32";
pub const DEFAULT_MODEL_FILE: &str = "onnx/vision_model.onnx";

/// Image embedding service
#[derive(Parser, Debug, Clone)]
#[command(name = "clip-embed-service")]
#[command(about = "HTTP service returning CLIP embeddings for uploaded images", long_about = None)]
pub struct ServiceConfig {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind
    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Model name reported in logs
    #[arg(long, env = "MODEL_NAME", default_value = DEFAULT_MODEL_NAME)]
    pub model_name: String,

    /// Local ONNX vision model; skips the Hub download when set
    #[arg(long, env = "MODEL_PATH")]
    pub model_path: Option<PathBuf>,

    /// Hugging Face repository holding the ONNX export
    #[arg(long, env = "MODEL_REPO", default_value = DEFAULT_MODEL_REPO)]
    pub model_repo: String,

    /// File inside the repository
    #[arg(long, env = "MODEL_FILE", default_value = DEFAULT_MODEL_FILE)]
    pub model_file: String,

    /// Hub cache directory (defaults to the hf-hub cache)
    #[arg(long, env = "MODEL_CACHE_DIR")]
    pub model_cache_dir: Option<PathBuf>,

    /// Expected embedding dimensions
    #[arg(long, env = "EMBEDDING_DIMENSIONS", default_value_t = CLIP_VIT_B32_DIMENSIONS)]
    pub dimensions: usize,

    /// ONNX Runtime intra-op threads
    #[arg(long, env = "ONNX_INTRA_THREADS", default_value_t = 4)]
    pub intra_threads: usize,

    /// L2-normalize returned vectors
    #[arg(long, env = "NORMALIZE_EMBEDDINGS", default_value_t = false)]
    pub normalize: bool,

    /// Maximum accepted request body in bytes
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = 10 * 1024 * 1024)]
    pub max_upload_bytes: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            model_name: DEFAULT_MODEL_NAME.to_string(),
            model_path: None,
            model_repo: DEFAULT_MODEL_REPO.to_string(),
            model_file: DEFAULT_MODEL_FILE.to_string(),
            model_cache_dir: None,
            dimensions: CLIP_VIT_B32_DIMENSIONS,
            intra_threads: 4,
            normalize: false,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl ServiceConfig {
    /// Rejects values the service cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.dimensions == 0 {
            anyhow::bail!("EMBEDDING_DIMENSIONS must be greater than 0");
        }
        if self.intra_threads == 0 {
            anyhow::bail!("ONNX_INTRA_THREADS must be greater than 0");
        }
        if self.max_upload_bytes == 0 {
            anyhow::bail!("MAX_UPLOAD_BYTES must be greater than 0");
        }
        if self.model_path.is_none() && (self.model_repo.is_empty() || self.model_file.is_empty())
        {
            anyhow::bail!("Either MODEL_PATH or MODEL_REPO and MODEL_FILE must be set");
        }
        if self.host.is_empty() || self.host.contains(char::is_whitespace) {
            anyhow::bail!("HOST must be an IP address or hostname, got {:?}", self.host);
        }
        Ok(())
    }

    /// Resolves `host:port`; hostnames such as `localhost` take the first address
    pub async fn bind_addr(&self) -> Result<SocketAddr> {
        tokio::net::lookup_host((self.host.as_str(), self.port))
            .await
            .with_context(|| format!("Failed to resolve HOST {}", self.host))?
            .next()
            .with_context(|| format!("HOST {} resolved to no addresses", self.host))
    }

    pub fn model_source(&self) -> ModelSource {
        match &self.model_path {
            Some(path) => ModelSource::Local(path.clone()),
            None => ModelSource::HuggingFace {
                repo: self.model_repo.clone(),
                file: self.model_file.clone(),
                cache_dir: self.model_cache_dir.clone(),
            },
        }
    }

    /// Model loading options for an already resolved file
    pub fn clip_model_config(&self, model_path: PathBuf) -> ClipModelConfig {
        ClipModelConfig {
            name: self.model_name.clone(),
            model_path,
            dimensions: self.dimensions,
            intra_threads: self.intra_threads,
            normalize: self.normalize,
        }
    }
}
