// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /embed HTTP handler

use axum::{extract::State, Json};
use axum_extra::extract::multipart::MultipartRejection;
use axum_extra::extract::Multipart;
use tracing::{debug, warn};

use crate::api::embed::{EmbedResponse, ImageUpload};
use crate::api::http_server::AppState;
use crate::api::ApiError;
use crate::vision::{decode_image_bytes, format_to_extension};

/// POST /embed handler
///
/// Generates a CLIP embedding for one uploaded image.
///
/// # Request
/// `multipart/form-data` with a `file` field holding the image bytes.
///
/// # Response Body
/// ```json
/// {
///   "vector": [0.1, 0.2, ...],
///   "message": "Embedding generated"
/// }
/// ```
///
/// # Errors
/// - 400 Bad Request: malformed multipart body, empty or undecodable image
/// - 413 Payload Too Large: body exceeds the upload limit
/// - 422 Unprocessable Entity: no `file` field
/// - 500 Internal Server Error: inference failed
pub async fn embed_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<EmbedResponse>, ApiError> {
    let multipart = multipart.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    let upload = ImageUpload::from_multipart(multipart).await?;

    debug!(
        "Image upload received: {} bytes, content type {:?}, file {:?}",
        upload.bytes.len(),
        upload.content_type,
        upload.file_name
    );

    let embedder = state.embedder.clone();
    let vector = tokio::task::spawn_blocking(move || -> Result<Vec<f32>, ApiError> {
        let (image, info) = decode_image_bytes(&upload.bytes)?;
        debug!(
            "Decoded image: {}x{} {}",
            info.width,
            info.height,
            format_to_extension(info.format)
        );

        embedder
            .embed_image(&image)
            .map_err(|e| ApiError::InternalError(format!("Embedding failed: {}", e)))
    })
    .await
    .map_err(|e| ApiError::InternalError(format!("Embedding task failed: {}", e)))?
    .inspect_err(|e| warn!("Embed request failed: {}", e))?;

    let response = EmbedResponse::new(vector);
    debug!("Embedding generated: {} dimensions", response.dimension());

    Ok(Json(response))
}
