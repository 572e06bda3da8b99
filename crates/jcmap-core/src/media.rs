//! Image-storage collaborator seam.
//!
//! The core never handles image bytes: it stores opaque URLs and, when
//! an event is removed, asks the external store to release the file by
//! its public id. Upload plumbing lives entirely outside this core.

use crate::error::JcmapResult;

/// Folder prefix under which all app images live on the image host.
const FOLDER_MARKER: &str = "jcmap";

/// External image store, addressed by public id only.
pub trait ImageStorage: Send + Sync {
    /// Request deletion of a stored file. Best-effort from the caller's
    /// perspective — callers log failures and move on.
    fn delete(&self, public_id: &str) -> impl Future<Output = JcmapResult<()>> + Send;
}

/// An [`ImageStorage`] that drops every request. Used in tests and in
/// deployments without an image host configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopImageStorage;

impl ImageStorage for NoopImageStorage {
    async fn delete(&self, _public_id: &str) -> JcmapResult<()> {
        Ok(())
    }
}

/// Extract the public id from a hosted image URL.
///
/// For `https://res.cloudinary.com/name/image/upload/v12345/jcmap/events/abcde.jpg`
/// the public id is `jcmap/events/abcde` — the folder-prefixed path with
/// the extension stripped. URLs without the folder marker fall back to
/// the bare file stem; non-cloudinary URLs yield `None`.
pub fn extract_public_id(url: &str) -> Option<String> {
    if url.is_empty() || !url.contains("cloudinary") {
        return None;
    }

    let parts: Vec<&str> = url.split('/').collect();
    if let Some(folder_index) = parts.iter().position(|p| *p == FOLDER_MARKER) {
        let folder_path = parts[folder_index..].join("/");
        let public_id = folder_path
            .split('.')
            .next()
            .unwrap_or(&folder_path)
            .to_string();
        return Some(public_id);
    }

    parts
        .last()
        .and_then(|last| last.split('.').next())
        .map(|stem| stem.to_string())
}
