//! Input description: the uploaded file and its declared MIME type.
//!
//! A [`DocumentFile`] is a handle, not a buffer: path-backed files are read
//! only when the preparer needs them, so a missing or unreadable file shows
//! up as a `DocumentRead` failure of that submission rather than earlier.

use crate::error::ResumeLensError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where the document's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    /// A file on disk, read lazily.
    Path(PathBuf),
    /// Bytes already in memory.
    Bytes(Vec<u8>),
}

/// A user-selected resume file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFile {
    pub source: FileSource,
    pub mime_type: String,
}

impl DocumentFile {
    /// Describe a file on disk, inferring the MIME type from its extension.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let mime_type = mime_from_extension(&path).to_string();
        Self {
            source: FileSource::Path(path),
            mime_type,
        }
    }

    /// Describe a file on disk with an explicit MIME type.
    pub fn with_mime(path: impl AsRef<Path>, mime_type: impl Into<String>) -> Self {
        Self {
            source: FileSource::Path(path.as_ref().to_path_buf()),
            mime_type: mime_type.into(),
        }
    }

    /// Wrap in-memory content.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>, mime_type: impl Into<String>) -> Self {
        Self {
            source: FileSource::Bytes(bytes.into()),
            mime_type: mime_type.into(),
        }
    }

    /// Load the file content. Empty content is treated as unreadable.
    pub async fn read(self) -> Result<Vec<u8>, ResumeLensError> {
        let bytes = match self.source {
            FileSource::Bytes(bytes) => bytes,
            FileSource::Path(path) => {
                let bytes = tokio::fs::read(&path)
                    .await
                    .map_err(|source| ResumeLensError::DocumentUnreadable {
                        path: path.clone(),
                        source,
                    })?;
                debug!("Read {} bytes from {}", bytes.len(), path.display());
                bytes
            }
        };

        if bytes.is_empty() {
            return Err(ResumeLensError::EmptyDocument);
        }
        Ok(bytes)
    }
}

/// MIME type for the file types the upload form accepts.
pub fn mime_from_extension(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_from_extension() {
        assert_eq!(mime_from_extension(Path::new("cv.pdf")), "application/pdf");
        assert_eq!(mime_from_extension(Path::new("cv.PDF")), "application/pdf");
        assert_eq!(mime_from_extension(Path::new("scan.jpeg")), "image/jpeg");
        assert_eq!(mime_from_extension(Path::new("scan.JPG")), "image/jpeg");
        assert_eq!(mime_from_extension(Path::new("scan.webp")), "image/webp");
        assert_eq!(mime_from_extension(Path::new("resume")), "application/octet-stream");
    }

    #[tokio::test]
    async fn read_missing_file_is_unreadable() {
        let file = DocumentFile::from_path("/definitely/not/a/real/resume.pdf");
        let err = file.read().await.unwrap_err();
        assert!(matches!(err, ResumeLensError::DocumentUnreadable { .. }));
    }

    #[tokio::test]
    async fn read_empty_bytes_rejected() {
        let file = DocumentFile::from_bytes(Vec::new(), "application/pdf");
        assert!(matches!(
            file.read().await.unwrap_err(),
            ResumeLensError::EmptyDocument
        ));
    }

    #[tokio::test]
    async fn read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.pdf");
        std::fs::write(&path, b"%PDF-1.7 fake").unwrap();

        let file = DocumentFile::from_path(&path);
        assert_eq!(file.mime_type, "application/pdf");
        assert_eq!(file.read().await.unwrap(), b"%PDF-1.7 fake");
    }
}
