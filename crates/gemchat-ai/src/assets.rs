//! File-to-payload conversion for inline attachments.
//!
//! A file becomes an [`InlineAsset`]: its MIME type plus the base64 of its
//! bytes. Images are recognised by magic bytes first and by extension
//! second; anything unrecognised is refused.

use std::path::Path;

use tracing::debug;

use crate::{ChatError, InlineAsset};

const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4E, 0x47];
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];
const GIF_MAGIC: &[u8] = &[0x47, 0x49, 0x46];
const WEBP_MAGIC: &[u8] = b"RIFF";
const BMP_MAGIC: &[u8] = &[0x42, 0x4D];
const PDF_MAGIC: &[u8] = b"%PDF";

/// Detect MIME type from magic bytes.
pub fn detect_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.len() < 4 {
        return None;
    }
    if bytes.starts_with(PNG_MAGIC) {
        Some("image/png")
    } else if bytes.starts_with(JPEG_MAGIC) {
        Some("image/jpeg")
    } else if bytes.starts_with(GIF_MAGIC) {
        Some("image/gif")
    } else if bytes.len() >= 12 && bytes.starts_with(WEBP_MAGIC) && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else if bytes.starts_with(PDF_MAGIC) {
        Some("application/pdf")
    } else if bytes.starts_with(BMP_MAGIC) {
        Some("image/bmp")
    } else {
        None
    }
}

/// Guess MIME type from file extension.
pub fn mime_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "bmp" => "image/bmp",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        _ => return None,
    };
    Some(mime)
}

/// Read a file into an inline asset.
///
/// Fails when the path is not a regular file, is empty or larger than
/// `max_bytes`, cannot be read, or has no recognisable type.
pub async fn read_file(path: &Path, max_bytes: u64) -> Result<InlineAsset, ChatError> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| ChatError::Asset(format!("{}: {e}", path.display())))?;

    if !metadata.is_file() {
        return Err(ChatError::Asset(format!(
            "{} is not a regular file",
            path.display()
        )));
    }
    if metadata.len() == 0 {
        return Err(ChatError::Asset(format!("{} is empty", path.display())));
    }
    if metadata.len() > max_bytes {
        return Err(ChatError::Asset(format!(
            "{} is too large ({} bytes, max {max_bytes})",
            path.display(),
            metadata.len()
        )));
    }

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ChatError::Asset(format!("read error: {e}")))?;
    if bytes.is_empty() {
        return Err(ChatError::Asset(format!("{} is empty", path.display())));
    }

    let mime = detect_mime(&bytes)
        .or_else(|| mime_from_extension(path))
        .ok_or_else(|| {
            ChatError::Asset(format!("{}: unrecognized file type", path.display()))
        })?;

    debug!(path = %path.display(), mime, size = bytes.len(), "attachment loaded");
    Ok(InlineAsset::from_bytes(mime, &bytes))
}

/// Parse a `data:` URL such as a browser file reader produces.
pub fn from_data_url(url: &str) -> Result<InlineAsset, ChatError> {
    InlineAsset::from_data_url(url)
        .ok_or_else(|| ChatError::Asset("not a base64 data URL".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn detects_common_images() {
        assert_eq!(detect_mime(PNG_HEADER), Some("image/png"));
        assert_eq!(detect_mime(&[0xFF, 0xD8, 0xFF, 0xE0]), Some("image/jpeg"));
        assert_eq!(detect_mime(b"GIF89a"), Some("image/gif"));
        assert_eq!(detect_mime(b"RIFF\0\0\0\0WEBPVP8 "), Some("image/webp"));
        assert_eq!(detect_mime(b"%PDF-1.7"), Some("application/pdf"));
        assert_eq!(detect_mime(b"BM\0\0\0\0"), Some("image/bmp"));
    }

    #[test]
    fn short_or_unknown_bytes_are_none() {
        assert_eq!(detect_mime(&[0x89, 0x50]), None);
        assert_eq!(detect_mime(b"hello world"), None);
        assert_eq!(detect_mime(b"RIFF\0\0\0\0WAVE"), None);
    }

    #[test]
    fn extension_lookup_is_case_insensitive() {
        assert_eq!(mime_from_extension(Path::new("a/cat.JPG")), Some("image/jpeg"));
        assert_eq!(mime_from_extension(Path::new("notes.txt")), Some("text/plain"));
        assert_eq!(mime_from_extension(Path::new("archive.zip")), None);
        assert_eq!(mime_from_extension(Path::new("Makefile")), None);
    }

    #[tokio::test]
    async fn reads_png_by_magic_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image.bin");
        std::fs::write(&path, PNG_HEADER).unwrap();

        let asset = read_file(&path, 1024).await.unwrap();
        assert_eq!(asset.mime_type, "image/png");
        assert_eq!(asset.decoded_len(), PNG_HEADER.len());
    }

    #[tokio::test]
    async fn falls_back_to_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.txt");
        std::fs::write(&path, "plain words").unwrap();

        let asset = read_file(&path, 1024).await.unwrap();
        assert_eq!(asset.mime_type, "text/plain");
        assert_eq!(asset.data, "cGxhaW4gd29yZHM=");
    }

    #[tokio::test]
    async fn rejects_oversized_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.png");
        std::fs::write(&path, vec![0u8; 2048]).unwrap();

        let err = read_file(&path, 1024).await.unwrap_err();
        assert!(matches!(err, ChatError::Asset(ref m) if m.contains("too large")));
    }

    #[tokio::test]
    async fn rejects_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.png");
        std::fs::write(&path, b"").unwrap();

        let err = read_file(&path, 1024).await.unwrap_err();
        assert!(matches!(err, ChatError::Asset(ref m) if m.contains("is empty")));
    }

    #[tokio::test]
    async fn rejects_directories_and_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_file(dir.path(), 1024).await.unwrap_err();
        assert!(matches!(err, ChatError::Asset(ref m) if m.contains("not a regular file")));

        let err = read_file(&dir.path().join("missing.png"), 1024)
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Asset(_)));
    }

    #[tokio::test]
    async fn rejects_unknown_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.dat");
        std::fs::write(&path, b"\x00\x01\x02\x03\x04").unwrap();

        let err = read_file(&path, 1024).await.unwrap_err();
        assert!(matches!(err, ChatError::Asset(ref m) if m.contains("unrecognized")));
    }

    #[test]
    fn data_url_errors_are_asset_errors() {
        assert!(from_data_url("data:image/png;base64,iVBORw0KGgo=").is_ok());
        assert!(matches!(
            from_data_url("https://example.com/cat.png"),
            Err(ChatError::Asset(_))
        ));
    }
}
