//! Asset references, session-scoped storage, and image decoding.
//!
//! Reference syntax:
//! - `""`: no asset
//! - `blob:<n>`: bytes ingested into an [`AssetStore`] during this session
//! - `http://…` / `https://…`: remote, served from the store's prefetch cache
//! - `file://…` or any other string: a filesystem path

mod decode;
mod store;

pub use decode::DecodedImage;
pub use store::{AssetRef, AssetStore};

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while resolving or decoding an asset.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("empty asset reference")]
    Empty,

    #[error("unknown or revoked blob handle `{0}`")]
    UnknownBlob(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("remote asset `{0}` is not available (cross-origin access disabled or not prefetched)")]
    RemoteUnavailable(String),

    #[error("failed to fetch `{url}`: {reason}")]
    Fetch { url: String, reason: String },

    #[error("failed to decode `{reference}`: {reason}")]
    Decode { reference: String, reason: String },
}
