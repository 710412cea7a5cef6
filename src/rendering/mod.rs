//! Rendering layer: a thin canvas over `tiny-skia` plus PNG output.

pub mod canvas;
pub mod paint;
pub mod raster;

use std::fs;
use std::path::Path as FsPath;

use base64::Engine as _;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::{Error, Result};

pub use canvas::{Canvas, Stroke};
pub use paint::{Color, LinearGradient, Paint, RadialGradient};
pub use tiny_skia::{Path, PathBuilder, Point, Rect};

/// A finished artwork held as PNG bytes.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub width: u32,
    pub height: u32,
    pub png_data: Vec<u8>,
}

/// Summary of a saved artwork, printed by `--json`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RenderReport {
    pub path: String,
    pub width: u32,
    pub height: u32,
    pub bytes: usize,
    pub sha256: String,
}

impl Rendered {
    /// Hex SHA-256 of the PNG bytes
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(&self.png_data))
    }

    pub fn data_uri(&self) -> String {
        format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&self.png_data)
        )
    }

    /// Write the PNG to `path`, creating missing parent directories.
    pub fn save(&self, path: impl AsRef<FsPath>) -> Result<RenderReport> {
        let path = path.as_ref();
        let display = path.display().to_string();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| Error::IoError {
                path: parent.display().to_string(),
                source,
            })?;
        }
        fs::write(path, &self.png_data).map_err(|source| Error::IoError {
            path: display.clone(),
            source,
        })?;
        log::debug!("wrote {} bytes to {}", self.png_data.len(), display);
        Ok(self.report(display))
    }

    pub fn report(&self, path: impl Into<String>) -> RenderReport {
        RenderReport {
            path: path.into(),
            width: self.width,
            height: self.height,
            bytes: self.png_data.len(),
            sha256: self.digest(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_uri_has_png_prefix() {
        let r = Rendered { width: 1, height: 1, png_data: vec![1, 2, 3] };
        assert_eq!(r.data_uri(), "data:image/png;base64,AQID");
    }

    #[test]
    fn digest_is_sha256_hex() {
        let r = Rendered { width: 0, height: 0, png_data: Vec::new() };
        assert_eq!(
            r.digest(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
