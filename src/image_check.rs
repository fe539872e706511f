//! # Image Source Checks
//!
//! Classifies image references and verifies that local files exist before
//! a deck is handed to a renderer. Remote URLs are never fetched; data URIs
//! are decoded to make sure the payload is well-formed.

use std::path::{Path, PathBuf};

/// Where an image reference points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource<'a> {
    /// `http://` or `https://`. Not checked.
    Remote(&'a str),
    /// `data:` URI with the payload after the comma.
    DataUri { header: &'a str, payload: &'a str },
    /// Anything else is a filesystem path.
    Local(PathBuf),
}

/// Classify `src`, resolving relative paths against `base_dir`.
pub fn classify<'a>(src: &'a str, base_dir: Option<&Path>) -> ImageSource<'a> {
    let lower = src.get(..8).unwrap_or(src).to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return ImageSource::Remote(src);
    }
    if lower.starts_with("data:") {
        let (header, payload) = src.split_once(',').unwrap_or((src, ""));
        return ImageSource::DataUri { header, payload };
    }
    let path = Path::new(src);
    match base_dir {
        Some(base) if path.is_relative() => ImageSource::Local(base.join(path)),
        _ => ImageSource::Local(path.to_path_buf()),
    }
}

/// Check that `src` can be loaded. The error is a human-readable reason.
pub fn check_image(src: &str, base_dir: Option<&Path>) -> Result<(), String> {
    if src.trim().is_empty() {
        return Err("Image source is empty".to_string());
    }
    match classify(src, base_dir) {
        ImageSource::Remote(_) => Ok(()),
        ImageSource::DataUri { header, payload } => {
            if !src.contains(',') {
                return Err("Invalid data URI: missing comma".to_string());
            }
            if header.to_ascii_lowercase().ends_with(";base64") {
                base64_decode(payload).map(|_| ())
            } else {
                Ok(())
            }
        }
        ImageSource::Local(path) => {
            if path.is_file() {
                Ok(())
            } else {
                Err(format!("Image file '{}' does not exist", path.display()))
            }
        }
    }
}

fn base64_decode(input: &str) -> Result<Vec<u8>, String> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD
        .decode(input.trim())
        .map_err(|e| format!("Base64 decode error: {}", e))
}
