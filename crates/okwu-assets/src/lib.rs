//! Remote audio asset management for pronunciation recordings.

mod client;
pub use client::{AssetError, AssetStore};
