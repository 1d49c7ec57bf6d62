// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::Json;
use serde::{Deserialize, Serialize};

/// Fixed status message of the health endpoint
pub const HEALTH_MESSAGE: &str = "AI Service Online";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub message: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            message: HEALTH_MESSAGE.to_string(),
        }
    }
}

/// GET / - service liveness
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}
