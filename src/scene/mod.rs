//! House scene artwork

pub mod perspective;
pub mod raytrace;
pub mod sky;

use std::path::Path;

use image::RgbaImage;

use crate::rendering::{raster, Canvas, Rendered};
use crate::{Artwork, Result, SceneConfig, SceneStyle};

pub struct SceneArt {
    config: SceneConfig,
}

impl SceneArt {
    pub fn new(config: SceneConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Render to a bitmap without encoding.
    pub fn render_image(&self) -> Result<RgbaImage> {
        let (width, height) = self.config.dimensions();
        log::debug!("rendering {:?} scene at {}x{}", self.config.style, width, height);
        match self.config.style {
            SceneStyle::Perspective => {
                let sky = self.sky_texture();
                let mut canvas = Canvas::new(width, height)?;
                perspective::paint(&mut canvas, sky.as_ref())?;
                Ok(canvas.into_image())
            }
            SceneStyle::Raytraced => Ok(raytrace::RayTracer::new(width, height).render()),
        }
    }

    /// The downloaded sky, or `None` to draw the flat fallback. A failed
    /// download is logged and otherwise ignored.
    fn sky_texture(&self) -> Option<RgbaImage> {
        match sky::load_sky(&self.config) {
            Ok(sky) => sky,
            Err(e) => {
                log::warn!("sky texture unavailable, using flat sky: {}", e);
                None
            }
        }
    }
}

impl Artwork for SceneArt {
    fn render(&self) -> Result<Rendered> {
        raster::rasterize(&self.render_image()?)
    }

    fn output(&self) -> &Path {
        &self.config.output
    }
}
