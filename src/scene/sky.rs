//! Sky texture download for the perspective scene

use image::RgbaImage;

#[cfg(feature = "fetch")]
use reqwest::blocking::Client;
#[cfg(feature = "fetch")]
use std::time::Duration;

use crate::{Error, Result, SceneConfig};

/// Fetch and decode the configured sky texture.
///
/// `Ok(None)` means no texture is configured.
#[cfg(feature = "fetch")]
pub fn load_sky(config: &SceneConfig) -> Result<Option<RgbaImage>> {
    let url = match &config.sky_texture_url {
        Some(u) => u,
        None => return Ok(None),
    };

    let client = Client::builder()
        .timeout(Duration::from_millis(config.timeout_ms))
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(|e| Error::NetworkError(format!("Failed to build HTTP client: {}", e)))?;

    log::debug!("fetching sky texture from {}", url);
    let res = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(|e| Error::NetworkError(format!("HTTP GET {} failed: {}", url, e)))?;

    let body = res
        .bytes()
        .map_err(|e| Error::NetworkError(format!("Failed to read response body: {}", e)))?;

    let img = image::load_from_memory(&body)?.to_rgba8();
    log::debug!("sky texture is {}x{}", img.width(), img.height());
    Ok(Some(img))
}

#[cfg(not(feature = "fetch"))]
pub fn load_sky(config: &SceneConfig) -> Result<Option<RgbaImage>> {
    match &config.sky_texture_url {
        Some(url) => Err(Error::NetworkError(format!(
            "cannot fetch {}: built without the `fetch` feature",
            url
        ))),
        None => Ok(None),
    }
}
