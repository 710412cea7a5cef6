//! Easel
//!
//! Two small artwork generators sharing one rendering layer:
//!
//! - **QR codes**: encode a URL and write it as a PNG with configurable
//!   colours, size and quiet zone.
//! - **House scene**: draw a 3D-styled house, tree, road and sun onto a 2D
//!   canvas using a simple perspective projection, or ray-cast a minimalist
//!   house, and write the result as a PNG.
//!
//! # Example
//!
//! ```no_run
//! use easel::{QrConfig, SceneConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = easel::generate_qr(&QrConfig {
//!     url: "https://example.com".to_string(),
//!     output: "qr.png".into(),
//!     ..Default::default()
//! })?;
//! println!("{} bytes", qr.bytes);
//!
//! let scene = easel::render_scene(&SceneConfig {
//!     sky_texture_url: None,
//!     ..Default::default()
//! })?;
//! println!("{}x{}", scene.width, scene.height);
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Error, Result};

pub mod projection;
pub mod qr;
pub mod rendering;
pub mod scene;

// Async-friendly wrapper running the generators on blocking threads
pub mod async_api;
pub use async_api::Studio;

pub use qr::QrCodeArt;
pub use rendering::{RenderReport, Rendered};
pub use scene::SceneArt;

/// URL encoded by default
pub const DEFAULT_QR_URL: &str = "https://forms.gle/UCcSsrNpcUVbDMoW9";

/// Sky texture fetched by the perspective scene by default
pub const DEFAULT_SKY_TEXTURE_URL: &str =
    "https://dl.polyhaven.org/file/ph-assets/HDRIs/extra/Tonemapped%20JPG/golden_gate_hills.jpg";

/// Largest image side accepted from configuration, in pixels
pub const MAX_DIMENSION: u32 = 8192;

/// QR error-correction level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum EcLevel {
    L,
    #[default]
    M,
    Q,
    H,
}

/// Configuration for QR code generation
///
/// Defaults reproduce the fixed form link: black on white, 1024 px wide with
/// a four-module quiet zone and medium error correction.
///
/// # Examples
///
/// ```
/// let cfg = easel::QrConfig::default();
/// assert_eq!(cfg.width, 1024);
/// assert_eq!(cfg.dark, "#000000");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QrConfig {
    /// Text encoded in the symbol
    pub url: String,
    /// Destination PNG path
    pub output: PathBuf,
    /// CSS colour of dark modules
    pub dark: String,
    /// CSS colour of light modules and the quiet zone
    pub light: String,
    /// Image width (and height) in pixels
    pub width: u32,
    /// Quiet zone in modules
    pub margin: u32,
    pub error_correction: EcLevel,
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_QR_URL.to_string(),
            output: PathBuf::from("qrcode_google_form.png"),
            dark: "#000000".to_string(),
            light: "#FFFFFF".to_string(),
            width: 1024,
            margin: 4,
            error_correction: EcLevel::M,
        }
    }
}

impl QrConfig {
    pub fn validate(&self) -> Result<()> {
        if self.url.is_empty() {
            return Err(Error::ConfigError("QR payload must not be empty".to_string()));
        }
        if self.width > MAX_DIMENSION {
            return Err(Error::ConfigError(format!(
                "QR width {} exceeds the {} px limit",
                self.width, MAX_DIMENSION
            )));
        }
        if self.margin > MAX_DIMENSION {
            return Err(Error::ConfigError(format!(
                "QR margin {} exceeds the {} module limit",
                self.margin, MAX_DIMENSION
            )));
        }
        rendering::Color::parse(&self.dark)?;
        rendering::Color::parse(&self.light)?;
        Ok(())
    }
}

/// Which house scene to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SceneStyle {
    /// Painter's-order canvas drawing with a manual perspective projection
    #[default]
    Perspective,
    /// Per-pixel ray casting against a plane and two boxes
    Raytraced,
}

impl SceneStyle {
    /// Canvas size used when none is configured
    pub fn default_size(self) -> (u32, u32) {
        match self {
            SceneStyle::Perspective => (1920, 1080),
            SceneStyle::Raytraced => (800, 800),
        }
    }
}

/// Configuration for scene rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub style: SceneStyle,
    /// Canvas width; `None` picks the style's default
    pub width: Option<u32>,
    /// Canvas height; `None` picks the style's default
    pub height: Option<u32>,
    /// Destination PNG path
    pub output: PathBuf,
    /// Background image for the perspective sky; `None` skips the download
    pub sky_texture_url: Option<String>,
    /// Timeout for the sky download in milliseconds
    pub timeout_ms: u64,
    /// User agent sent with the sky download
    pub user_agent: String,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            style: SceneStyle::Perspective,
            width: None,
            height: None,
            output: PathBuf::from("art/house_3d_final.png"),
            sky_texture_url: Some(DEFAULT_SKY_TEXTURE_URL.to_string()),
            timeout_ms: 30000,
            user_agent: concat!("easel/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl SceneConfig {
    /// Effective canvas size
    pub fn dimensions(&self) -> (u32, u32) {
        let (w, h) = self.style.default_size();
        (self.width.unwrap_or(w), self.height.unwrap_or(h))
    }

    pub fn validate(&self) -> Result<()> {
        let (w, h) = self.dimensions();
        if w == 0 || h == 0 {
            return Err(Error::ConfigError(format!("canvas size {}x{} is empty", w, h)));
        }
        if w > MAX_DIMENSION || h > MAX_DIMENSION {
            return Err(Error::ConfigError(format!(
                "canvas size {}x{} exceeds the {} px limit",
                w, h, MAX_DIMENSION
            )));
        }
        match &self.sky_texture_url {
            Some(sky) => validate_url(sky),
            None => Ok(()),
        }
    }
}

#[cfg(feature = "fetch")]
fn validate_url(s: &str) -> Result<()> {
    url::Url::parse(s)
        .map(|_| ())
        .map_err(|e| Error::ConfigError(format!("invalid sky texture URL '{}': {}", s, e)))
}

// Without `fetch` the URL is never used, so any string is accepted.
#[cfg(not(feature = "fetch"))]
fn validate_url(_s: &str) -> Result<()> {
    Ok(())
}

/// Both generators' settings, loadable from a JSON file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    pub qr: QrConfig,
    pub scene: SceneConfig,
}

impl StudioConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::IoError {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }
}

/// An artwork that can be rendered to PNG bytes and saved
pub trait Artwork {
    /// Render the artwork in memory
    fn render(&self) -> Result<Rendered>;

    /// Where `render_to_file` writes
    fn output(&self) -> &Path;

    /// Render and write to `output`
    fn render_to_file(&self) -> Result<RenderReport> {
        let rendered = self.render()?;
        rendered.save(self.output())
    }
}

/// Encode the configured URL and save it as a PNG.
pub fn generate_qr(config: &QrConfig) -> Result<RenderReport> {
    let report = QrCodeArt::new(config.clone())?.render_to_file()?;
    log::info!("QR Code saved to {}", report.path);
    Ok(report)
}

/// Encode the configured URL as a `data:image/png;base64,...` URI.
pub fn qr_data_uri(config: &QrConfig) -> Result<String> {
    Ok(QrCodeArt::new(config.clone())?.render()?.data_uri())
}

/// Render the configured scene and save it as a PNG.
pub fn render_scene(config: &SceneConfig) -> Result<RenderReport> {
    let report = SceneArt::new(config.clone())?.render_to_file()?;
    log::info!("Masterpiece saved to {}", report.path);
    Ok(report)
}
