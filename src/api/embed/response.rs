// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! EmbedResponse type for POST /embed

use serde::{Deserialize, Serialize};

/// Confirmation message returned with every embedding
pub const EMBED_MESSAGE: &str = "Embedding generated";

/// Response body for POST /embed
///
/// # Example
/// ```json
/// {
///   "vector": [0.1, -0.2, ...],
///   "message": "Embedding generated"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbedResponse {
    /// Image embedding (512 values for CLIP ViT-B/32)
    pub vector: Vec<f32>,

    /// Fixed confirmation message
    pub message: String,
}

impl EmbedResponse {
    pub fn new(vector: Vec<f32>) -> Self {
        Self {
            vector,
            message: EMBED_MESSAGE.to_string(),
        }
    }

    pub fn dimension(&self) -> usize {
        self.vector.len()
    }
}
