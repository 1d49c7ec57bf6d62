// Version information for the CLIP embedding service

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-clip-image-embeddings-2025-11-04";

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Build date
pub const BUILD_DATE: &str = "2025-11-04";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "clip-vit-b-32",
    "multipart-upload",
    "onnx-runtime",
    "cuda-fallback-cpu",
    "hf-hub-download",
];
