//! Error Types
//!
//! This module defines the error types used throughout the scene.
//!
//! # Overview
//!
//! The main error type [`SceneError`] covers the failure modes of a single
//! visual element:
//! - Asset loading and decoding errors (model missing, corrupt glTF)
//! - Missing animation clips inside a loaded model
//! - Offscreen surface / vector runtime creation failures
//! - Configuration parsing errors
//!
//! None of these are fatal. Callers degrade the affected element (skip its
//! texture, skip its animation) and keep the rest of the scene running.
//!
//! ```rust,ignore
//! use lighthouse::errors::{SceneError, Result};
//!
//! fn load_knob() -> Result<()> {
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for the lighthouse scene.
#[derive(Error, Debug)]
pub enum SceneError {
    // ========================================================================
    // Asset Loading Errors
    // ========================================================================
    /// The requested asset was not found.
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// The asset exists but could not be decoded.
    #[error("Failed to load asset '{path}': {reason}")]
    AssetLoad {
        /// Path or URI of the asset
        path: String,
        /// Human readable failure description
        reason: String,
    },

    /// glTF parsing or loading error.
    #[cfg(feature = "gltf")]
    #[error("glTF error: {0}")]
    GltfError(String),

    /// Data URI parsing error.
    #[error("Data URI error: {0}")]
    DataUriError(String),

    /// Base64 decoding error.
    #[error("Base64 decode error: {0}")]
    Base64Error(#[from] base64::DecodeError),

    // ========================================================================
    // Animation Errors
    // ========================================================================
    /// A named clip was requested but the loaded model does not contain it.
    #[error("Animation clip '{clip}' not found in '{model}'")]
    MissingClip {
        /// Requested clip name
        clip: String,
        /// Model the clip was looked up in
        model: String,
    },

    // ========================================================================
    // Surface Errors
    // ========================================================================
    /// The offscreen surface or its animation runtime failed to initialize.
    #[error("Surface creation failed for '{source_id}': {reason}")]
    SurfaceCreation {
        /// Source identifier of the vector animation
        source_id: String,
        /// Human readable failure description
        reason: String,
    },

    // ========================================================================
    // I/O & Config Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Task join error (when a background load fails to complete).
    #[error("Task join error: {0}")]
    TaskJoinError(String),
}

#[cfg(feature = "gltf")]
impl From<gltf::Error> for SceneError {
    fn from(err: gltf::Error) -> Self {
        SceneError::GltfError(err.to_string())
    }
}

impl From<tokio::task::JoinError> for SceneError {
    fn from(err: tokio::task::JoinError) -> Self {
        SceneError::TaskJoinError(err.to_string())
    }
}

/// Alias for `Result<T, SceneError>`.
pub type Result<T> = std::result::Result<T, SceneError>;
