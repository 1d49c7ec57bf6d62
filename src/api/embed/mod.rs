// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding API Module
//!
//! This module provides the POST /embed endpoint that turns an uploaded
//! image into a CLIP embedding vector.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::embed_handler;
pub use request::{ImageUpload, FILE_FIELD};
pub use response::{EmbedResponse, EMBED_MESSAGE};
