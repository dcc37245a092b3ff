//! Content-type detection for uploaded files.
//!
//! The service only needs a best-effort `Content-Type` on file parts, so
//! detection looks at magic bytes first, then at the file extension, and
//! finally falls back to `application/octet-stream`.

use std::path::Path;

/// Fallback content type for unrecognized data.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Detect a MIME type from the leading bytes of a file.
pub fn sniff_mime_type(data: &[u8]) -> Option<&'static str> {
    if data.starts_with(PDF_MAGIC) {
        return Some("application/pdf");
    }

    // JPEG: FF D8 FF
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }

    // PNG: 89 50 4E 47 0D 0A 1A 0A
    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Some("image/png");
    }

    if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        return Some("image/gif");
    }

    // TIFF, little- or big-endian
    if data.starts_with(&[0x49, 0x49, 0x2A, 0x00]) || data.starts_with(&[0x4D, 0x4D, 0x00, 0x2A])
    {
        return Some("image/tiff");
    }

    // WEBP: RIFF....WEBP
    if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
        return Some("image/webp");
    }

    // ZIP local file header
    if data.starts_with(b"PK\x03\x04") {
        return Some("application/zip");
    }

    None
}

/// Guess a MIME type from a file name's extension.
pub fn mime_type_from_extension(filename: &str) -> Option<&'static str> {
    let ext = Path::new(filename).extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "pdf" => "application/pdf",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "tif" | "tiff" => "image/tiff",
        "webp" => "image/webp",
        "json" => "application/json",
        "xml" => "application/xml",
        "txt" => "text/plain",
        "zip" => "application/zip",
        _ => return None,
    };
    Some(mime)
}

/// Best-effort content type for a file part.
pub fn content_type(filename: &str, data: &[u8]) -> &'static str {
    sniff_mime_type(data)
        .or_else(|| mime_type_from_extension(filename))
        .unwrap_or(OCTET_STREAM)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_pdf() {
        assert_eq!(sniff_mime_type(b"%PDF-1.7\n%\xE2\xE3"), Some("application/pdf"));
        assert_eq!(sniff_mime_type(b"%PDF"), None);
    }

    #[test]
    fn test_sniff_images() {
        assert_eq!(sniff_mime_type(&[0xFF, 0xD8, 0xFF, 0xE0]), Some("image/jpeg"));
        assert_eq!(
            sniff_mime_type(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00]),
            Some("image/png")
        );
        assert_eq!(sniff_mime_type(b"RIFF\x00\x00\x00\x00WEBPVP8 "), Some("image/webp"));
        assert_eq!(sniff_mime_type(b"RIFF"), None);
    }

    #[test]
    fn test_extension_fallback() {
        assert_eq!(content_type("scan.PDF", b"garbage"), "application/pdf");
        assert_eq!(content_type("notes.txt", b"hello"), "text/plain");
        assert_eq!(content_type("blob", b"hello"), OCTET_STREAM);
        assert_eq!(content_type("mislabelled.txt", b"%PDF-1.4"), "application/pdf");
    }
}
