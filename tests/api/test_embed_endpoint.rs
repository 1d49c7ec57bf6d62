// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /embed router tests
//!
//! These tests verify that the embed route:
//! - Returns a fixed-length vector and the confirmation message
//! - Is deterministic for identical uploads
//! - Rejects non-image payloads, missing fields and malformed bodies
//! - Reports inference failures as 500
//! - Enforces the upload size limit

use super::common::*;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use clip_embed_service::api::{create_app, AppState};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot`

#[cfg(test)]
mod embed_endpoint_tests {
    use super::*;

    // ========== SUCCESS CASES ==========

    #[tokio::test]
    async fn test_valid_png_returns_vector() {
        let response = test_app()
            .oneshot(upload_request(&gradient_png(64, 48, 7)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["message"], "Embedding generated");

        let vector = json["vector"].as_array().expect("vector should be an array");
        assert_eq!(vector.len(), TEST_DIMENSIONS);
        assert!(vector.iter().all(|v| v.is_number()));
    }

    #[tokio::test]
    async fn test_jpeg_upload_accepted() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(32, 32, Rgb([10, 200, 30])));
        let jpeg = encode_image(&img, ImageFormat::Jpeg);
        let body = multipart_body("file", "photo.jpg", "image/jpeg", &jpeg);

        let response = test_app().oneshot(embed_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_declared_content_type_not_enforced() {
        // Decoding decides what is an image, not the declared type
        let body = multipart_body(
            "file",
            "blob.bin",
            "application/octet-stream",
            &gradient_png(16, 16, 1),
        );

        let response = test_app().oneshot(embed_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_identical_uploads_are_bit_identical() {
        let png = gradient_png(80, 80, 42);

        let first = body_json(test_app().oneshot(upload_request(&png)).await.unwrap()).await;
        let second = body_json(test_app().oneshot(upload_request(&png)).await.unwrap()).await;

        assert_eq!(first["vector"], second["vector"]);
    }

    #[tokio::test]
    async fn test_different_images_same_length() {
        let a = body_json(
            test_app()
                .oneshot(upload_request(&gradient_png(300, 100, 1)))
                .await
                .unwrap(),
        )
        .await;
        let b = body_json(
            test_app()
                .oneshot(upload_request(&gradient_png(50, 200, 99)))
                .await
                .unwrap(),
        )
        .await;

        let a = a["vector"].as_array().unwrap();
        let b = b["vector"].as_array().unwrap();
        assert_eq!(a.len(), b.len());
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_extra_fields_are_ignored() {
        let png = gradient_png(20, 20, 3);
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{b}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nhello\r\n",
                b = BOUNDARY
            )
            .as_bytes(),
        );
        body.extend_from_slice(&multipart_body("file", "a.png", "image/png", &png));

        let response = test_app().oneshot(embed_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    // ========== ERROR CASES ==========

    #[tokio::test]
    async fn test_text_payload_rejected() {
        let body = multipart_body("file", "notes.txt", "text/plain", b"just some text");

        let response = test_app().oneshot(embed_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["error_type"], "invalid_image");
        assert!(json.get("vector").is_none());
    }

    #[tokio::test]
    async fn test_empty_file_rejected() {
        let response = test_app().oneshot(upload_request(&[])).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["error_type"], "invalid_image");
    }

    #[tokio::test]
    async fn test_missing_file_field() {
        let body = multipart_body("image", "a.png", "image/png", &gradient_png(8, 8, 0));

        let response = test_app().oneshot(embed_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let json = body_json(response).await;
        assert_eq!(json["error_type"], "validation_error");
        assert_eq!(json["details"]["field"], "file");
    }

    #[tokio::test]
    async fn test_non_multipart_body_rejected() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/embed")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"file": "nope"}"#))
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["error_type"], "invalid_request");
    }

    #[tokio::test]
    async fn test_inference_failure_is_500() {
        let app = create_app(AppState::new(Arc::new(FailingEmbedder)));

        let response = app
            .oneshot(upload_request(&gradient_png(16, 16, 5)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["error_type"], "internal_error");
    }

    #[tokio::test]
    async fn test_upload_over_limit_rejected() {
        let app = create_app(AppState::new(Arc::new(MeanPoolEmbedder)).with_max_upload_bytes(256));

        let response = app
            .oneshot(upload_request(&vec![0u8; 4096]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_get_not_allowed() {
        let request = Request::builder()
            .method(Method::GET)
            .uri("/embed")
            .body(Body::empty())
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
