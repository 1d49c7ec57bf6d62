// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Parser;
use clip_embed_service::{
    api::{start_server, AppState},
    config::ServiceConfig,
    embeddings::{resolve_model_path, ImageEmbedder, OnnxClipModel},
    version,
};
use std::{env, sync::Arc};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Optional .env file
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let config = ServiceConfig::parse();
    config.validate()?;
    let addr = config.bind_addr().await?;

    info!("🚀 Starting CLIP embedding service {}", version::VERSION);
    info!("📦 Version: {}", version::VERSION_NUMBER);
    info!("📅 Build Date: {}", version::BUILD_DATE);
    info!("✨ Features: {}", version::FEATURES.join(", "));

    // The model is loaded before the listener is bound
    let source = config.model_source();
    info!("🧠 Resolving model {} from {}", config.model_name, source);
    let model_path = tokio::task::spawn_blocking(move || resolve_model_path(&source))
        .await
        .context("Model resolution task panicked")??;

    let model = OnnxClipModel::new(config.clip_model_config(model_path)).await?;
    info!(
        "✅ Model ready: {} ({} dimensions)",
        model.model_name(),
        model.dimension()
    );

    let state = AppState::new(Arc::new(model)).with_max_upload_bytes(config.max_upload_bytes);

    start_server(addr, state).await
}
