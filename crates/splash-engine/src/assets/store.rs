use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{AssetError, DecodedImage};

const BLOB_SCHEME: &str = "blob:";

/// Parsed form of an asset reference string.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum AssetRef {
    None,
    Blob(String),
    Remote(String),
    File(PathBuf),
}

impl AssetRef {
    pub fn parse(reference: &str) -> Self {
        let reference = reference.trim();
        if reference.is_empty() {
            AssetRef::None
        } else if reference.starts_with(BLOB_SCHEME) {
            AssetRef::Blob(reference.to_string())
        } else if reference.starts_with("http://") || reference.starts_with("https://") {
            AssetRef::Remote(reference.to_string())
        } else if let Some(path) = reference.strip_prefix("file://") {
            AssetRef::File(PathBuf::from(path))
        } else {
            AssetRef::File(PathBuf::from(reference))
        }
    }
}

/// Session-scoped asset storage.
///
/// User-supplied files are ingested as `blob:` handles that live until they
/// are revoked or the store is dropped. Remote references are only ever read
/// from the prefetch cache: fetching is an explicit, synchronous step the host
/// performs before rasterization.
#[derive(Debug, Default)]
pub struct AssetStore {
    blobs: HashMap<String, Arc<[u8]>>,
    remote_cache: HashMap<String, Arc<[u8]>>,
    next_blob: u64,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `bytes` and returns a fresh `blob:` handle for them.
    pub fn ingest(&mut self, bytes: Vec<u8>) -> String {
        self.next_blob += 1;
        let handle = format!("{BLOB_SCHEME}splash/{}", self.next_blob);
        log::debug!("ingested {} byte(s) as {handle}", bytes.len());
        self.blobs.insert(handle.clone(), Arc::from(bytes));
        handle
    }

    /// Reads a file from disk and ingests it.
    pub fn ingest_file(&mut self, path: &Path) -> Result<String, AssetError> {
        let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.ingest(bytes))
    }

    /// Releases a blob handle. Returns `false` when the handle was unknown.
    pub fn revoke(&mut self, handle: &str) -> bool {
        self.blobs.remove(handle).is_some()
    }

    #[inline]
    pub fn contains_blob(&self, handle: &str) -> bool {
        self.blobs.contains_key(handle)
    }

    /// Stores bytes for a remote URL so later loads can serve it offline.
    pub fn cache_remote(&mut self, url: &str, bytes: Vec<u8>) {
        self.remote_cache.insert(url.to_string(), Arc::from(bytes));
    }

    /// Downloads every remote reference in `references` that is not cached yet.
    ///
    /// Failures are logged and skipped; the affected slots render blank.
    /// Must not be called from inside an async runtime.
    pub fn prefetch<'a>(&mut self, references: impl IntoIterator<Item = &'a str>) {
        for reference in references {
            let AssetRef::Remote(url) = AssetRef::parse(reference) else {
                continue;
            };
            if self.remote_cache.contains_key(&url) {
                continue;
            }
            match fetch_remote(&url) {
                Ok(bytes) => self.cache_remote(&url, bytes),
                Err(e) => log::warn!("{e}"),
            }
        }
    }

    /// Returns the raw bytes behind `reference`.
    pub fn load(&self, reference: &str, allow_remote: bool) -> Result<Arc<[u8]>, AssetError> {
        match AssetRef::parse(reference) {
            AssetRef::None => Err(AssetError::Empty),
            AssetRef::Blob(handle) => self
                .blobs
                .get(&handle)
                .cloned()
                .ok_or(AssetError::UnknownBlob(handle)),
            AssetRef::Remote(url) => {
                if !allow_remote {
                    return Err(AssetError::RemoteUnavailable(url));
                }
                self.remote_cache
                    .get(&url)
                    .cloned()
                    .ok_or(AssetError::RemoteUnavailable(url))
            }
            AssetRef::File(path) => std::fs::read(&path)
                .map(Arc::from)
                .map_err(|source| AssetError::Io { path, source }),
        }
    }

    /// Loads and decodes `reference` into an image.
    pub fn load_image(&self, reference: &str, allow_remote: bool) -> Result<DecodedImage, AssetError> {
        let bytes = self.load(reference, allow_remote)?;
        DecodedImage::decode(reference, &bytes)
    }
}

#[cfg(feature = "remote")]
fn fetch_remote(url: &str) -> Result<Vec<u8>, AssetError> {
    let fetch_err = |e: reqwest::Error| AssetError::Fetch { url: url.to_string(), reason: e.to_string() };
    let response = reqwest::blocking::get(url)
        .map_err(fetch_err)?
        .error_for_status()
        .map_err(fetch_err)?;
    let bytes = response.bytes().map_err(fetch_err)?;
    log::debug!("fetched {} byte(s) from {url}", bytes.len());
    Ok(bytes.to_vec())
}

#[cfg(not(feature = "remote"))]
fn fetch_remote(url: &str) -> Result<Vec<u8>, AssetError> {
    Err(AssetError::Fetch {
        url: url.to_string(),
        reason: "built without the `remote` feature".to_string(),
    })
}
