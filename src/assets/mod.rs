//! Asset loading.
//!
//! Models load asynchronously through the [`AssetServer`]; each load has its
//! own [`LoadState`] so a missing or corrupt file only degrades the element
//! that uses it.

pub mod server;
pub mod loaders;
pub mod model;

pub use server::{AssetServer, LoadState, ModelHandle};
pub use model::{ModelAsset, ModelNode};
#[cfg(feature = "gltf")]
pub use loaders::GltfLoader;
