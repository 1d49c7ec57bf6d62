// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Multipart upload extraction for POST /embed

use axum::body::Bytes;
use axum::http::StatusCode;
use axum_extra::extract::multipart::MultipartError;
use axum_extra::extract::Multipart;

use crate::api::ApiError;

/// Name of the form field carrying the image
pub const FILE_FIELD: &str = "file";

/// One uploaded image, alive for a single request
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Raw file bytes
    pub bytes: Bytes,
    /// Declared content type, if the client sent one
    pub content_type: Option<String>,
    /// Client-side file name, if any
    pub file_name: Option<String>,
}

impl ImageUpload {
    /// Reads the `file` field from a multipart body
    ///
    /// Fields with other names are skipped. The declared content type is
    /// recorded but not enforced; decoding decides what is an image.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            if field.name() != Some(FILE_FIELD) {
                continue;
            }

            let content_type = field.content_type().map(str::to_string);
            let file_name = field.file_name().map(str::to_string);
            let bytes = field.bytes().await.map_err(multipart_error)?;

            return Ok(Self {
                bytes,
                content_type,
                file_name,
            });
        }

        Err(ApiError::ValidationError {
            field: FILE_FIELD.to_string(),
            message: "file is required".to_string(),
        })
    }
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(e.body_text())
    } else {
        ApiError::InvalidRequest(e.body_text())
    }
}
