//! QR code artwork.
//!
//! The symbol is encoded by the `qrcode` crate; this module only rasterises
//! the module matrix. A requested width that fits the symbol plus quiet zone
//! is honoured exactly by using a fractional module scale. Smaller widths fall
//! back to four pixels per module.

use std::path::Path;

use image::RgbaImage;
use qrcode::QrCode;

use crate::rendering::{raster, Color, Rendered};
use crate::{Artwork, EcLevel, Error, QrConfig, Result, MAX_DIMENSION};

/// Pixels per module when the requested width is too small
const FALLBACK_SCALE: u32 = 4;

impl From<EcLevel> for qrcode::EcLevel {
    fn from(level: EcLevel) -> Self {
        match level {
            EcLevel::L => qrcode::EcLevel::L,
            EcLevel::M => qrcode::EcLevel::M,
            EcLevel::Q => qrcode::EcLevel::Q,
            EcLevel::H => qrcode::EcLevel::H,
        }
    }
}

#[derive(Clone)]
pub struct QrCodeArt {
    config: QrConfig,
    code: QrCode,
    dark: Color,
    light: Color,
}

impl QrCodeArt {
    /// Validate the configuration and encode the payload.
    pub fn new(config: QrConfig) -> Result<Self> {
        config.validate()?;
        let dark = Color::parse(&config.dark)?;
        let light = Color::parse(&config.light)?;
        let code =
            QrCode::with_error_correction_level(config.url.as_bytes(), config.error_correction.into())?;
        log::debug!(
            "encoded {} bytes as a {}x{} QR symbol ({:?})",
            config.url.len(),
            code.width(),
            code.width(),
            config.error_correction
        );
        let art = Self { config, code, dark, light };
        let width = art.image_width();
        if width > u64::from(MAX_DIMENSION) {
            return Err(Error::ConfigError(format!(
                "QR image would be {} px wide, over the {} px limit",
                width, MAX_DIMENSION
            )));
        }
        Ok(art)
    }

    /// Number of modules along one side, without the quiet zone
    pub fn modules(&self) -> usize {
        self.code.width()
    }

    /// Whether module `(x, y)` is dark
    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        self.code[(x, y)] == qrcode::Color::Dark
    }

    /// Modules across the image, quiet zone included
    fn total_modules(&self) -> u64 {
        self.modules() as u64 + 2 * u64::from(self.config.margin)
    }

    fn image_width(&self) -> u64 {
        let total = self.total_modules();
        if u64::from(self.config.width) >= total {
            u64::from(self.config.width)
        } else {
            u64::from(FALLBACK_SCALE) * total
        }
    }

    /// Pixels per module and the final image width. A width that fits the
    /// symbol is kept as-is.
    pub fn scale(&self) -> (f64, u32) {
        let total = self.total_modules();
        // `new` bounds the image width, so it fits in u32.
        let width = self.image_width() as u32;
        (width as f64 / total as f64, width)
    }

    fn rasterize(&self) -> RgbaImage {
        let size = self.modules();
        let (scale, width) = self.scale();
        let margin = self.config.margin as f64 * scale;
        let inner_end = width as f64 - margin;
        let colors = self.code.to_colors();
        let (dark, light) = (self.dark.to_rgba8(), self.light.to_rgba8());

        RgbaImage::from_fn(width, width, |x, y| {
            let (fx, fy) = (x as f64, y as f64);
            if fx < margin || fy < margin || fx >= inner_end || fy >= inner_end {
                return light;
            }
            let col = (((fx - margin) / scale).floor() as usize).min(size - 1);
            let row = (((fy - margin) / scale).floor() as usize).min(size - 1);
            match colors[row * size + col] {
                qrcode::Color::Dark => dark,
                qrcode::Color::Light => light,
            }
        })
    }
}

impl Artwork for QrCodeArt {
    fn render(&self) -> Result<Rendered> {
        raster::rasterize(&self.rasterize())
    }

    fn output(&self) -> &Path {
        &self.config.output
    }
}
