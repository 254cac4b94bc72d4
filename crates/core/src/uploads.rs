//! Item image uploads: validation and the on-disk store.
//!
//! Validation looks at the file extension and size only. The bytes are never
//! inspected, so a renamed executable with a `.png` suffix is accepted.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::CoreError;

/// Accepted image extensions (compared lowercase).
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// Default upload size limit (5 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Message shown for a disallowed extension.
pub const INVALID_FORMAT_MESSAGE: &str = "Invalid image format. Allowed: PNG, JPG, JPEG, GIF, WEBP";

/// Return the lowercased extension of `original_name` if it is an allowed
/// image type.
pub fn image_extension(original_name: &str) -> Result<String, CoreError> {
    let ext = original_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .ok_or_else(|| CoreError::InvalidFile(INVALID_FORMAT_MESSAGE.into()))?;

    if ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(CoreError::InvalidFile(INVALID_FORMAT_MESSAGE.into()))
    }
}

/// Reject uploads larger than `max_bytes`.
pub fn check_upload_size(size: usize, max_bytes: usize) -> Result<(), CoreError> {
    if size > max_bytes {
        return Err(CoreError::InvalidFile(oversize_message(max_bytes)));
    }
    Ok(())
}

/// Message shown when an upload exceeds `max_bytes`.
pub fn oversize_message(max_bytes: usize) -> String {
    let mib = max_bytes as f64 / (1024.0 * 1024.0);
    format!("Image is too large. Maximum size is {mib:.0} MB.")
}

/// A stored filename is a bare name: no separators, no parent references,
/// and not hidden.
fn is_bare_filename(filename: &str) -> bool {
    !filename.is_empty()
        && !filename.starts_with('.')
        && !filename.contains(['/', '\\'])
        && !filename.contains("..")
}

/// Filesystem-backed store for item images.
///
/// Files are named `<random hex>.<ext>` and referenced only by that name
/// from `inventory_items.image_filename`.
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
    max_bytes: usize,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            dir: dir.into(),
            max_bytes,
        }
    }

    /// The upload directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The per-file size limit in bytes.
    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Create the upload directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> Result<(), CoreError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| CoreError::Internal(format!("Cannot create upload directory: {e}")))
    }

    /// Validate and store an uploaded image, returning the stored filename.
    pub async fn accept(&self, original_name: &str, data: &[u8]) -> Result<String, CoreError> {
        let ext = image_extension(original_name)?;
        check_upload_size(data.len(), self.max_bytes)?;

        self.ensure_dir().await?;
        let filename = format!("{}.{ext}", Uuid::new_v4().simple());
        let path = self.dir.join(&filename);
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| CoreError::Internal(format!("Cannot write upload: {e}")))?;

        tracing::debug!(filename = %filename, bytes = data.len(), "Stored uploaded image");
        Ok(filename)
    }

    /// Best-effort removal of a stored image. Missing files are ignored.
    pub async fn remove(&self, filename: &str) {
        let Some(path) = self.path_for(filename) else {
            tracing::warn!(filename = %filename, "Refusing to remove non-bare upload filename");
            return;
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => tracing::debug!(filename = %filename, "Removed stored image"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(filename = %filename, error = %e, "Failed to remove stored image"),
        }
    }

    /// Resolve a stored filename to its path inside the upload directory.
    pub fn path_for(&self, filename: &str) -> Option<PathBuf> {
        is_bare_filename(filename).then(|| self.dir.join(filename))
    }
}
