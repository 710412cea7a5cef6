//! 2D canvas over a `tiny-skia` pixmap.
//!
//! Fills use the non-zero winding rule, shapes are anti-aliased and every
//! draw composites source-over. The pixmap starts out transparent black.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use tiny_skia::{
    ColorU8, FillRule, FilterQuality, LineCap, LineJoin, Mask, Pattern, Pixmap, SpreadMode, StrokeDash,
    Transform,
};

use super::paint::Paint;
use super::{Path, PathBuilder, Rect};
use crate::{Error, Result};

/// Canvas miter limit; tiny-skia defaults to 4.
const MITER_LIMIT: f32 = 10.0;

/// Stroke parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub paint: Paint,
    pub width: f32,
    /// Alternating dash/gap lengths; empty draws solid lines
    pub dash: Vec<f32>,
}

impl Stroke {
    pub fn solid(paint: impl Into<Paint>, width: f32) -> Self {
        Self { paint: paint.into(), width, dash: Vec::new() }
    }

    pub fn dashed(mut self, dash: &[f32]) -> Self {
        self.dash = dash.to_vec();
        self
    }

    /// Butt caps and miter joins. An odd dash list repeats twice and an
    /// unusable one (negative or all zero) draws a solid line.
    fn to_skia(&self) -> tiny_skia::Stroke {
        let dash = if self.dash.is_empty() {
            None
        } else {
            let mut pattern = self.dash.clone();
            if pattern.len() % 2 == 1 {
                pattern.extend_from_slice(&self.dash);
            }
            StrokeDash::new(pattern, 0.0)
        };
        tiny_skia::Stroke {
            width: self.width,
            miter_limit: MITER_LIMIT,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            dash,
            ..Default::default()
        }
    }
}

pub struct Canvas {
    pixmap: Pixmap,
    clip: Option<Mask>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap = Pixmap::new(width, height)
            .ok_or_else(|| Error::RenderError(format!("cannot allocate a {}x{} canvas", width, height)))?;
        Ok(Self { pixmap, clip: None })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Straight-alpha colour of one pixel; transparent outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        self.pixmap
            .pixel(x, y)
            .map(|p| {
                let c = p.demultiply();
                Rgba([c.red(), c.green(), c.blue(), c.alpha()])
            })
            .unwrap_or(Rgba([0, 0, 0, 0]))
    }

    /// Run `draw` with drawing limited to `clip`, restoring the previous clip
    /// afterwards.
    pub fn with_clip<F: FnOnce(&mut Canvas)>(&mut self, clip: Rect, draw: F) -> Result<()> {
        let mut mask = Mask::new(self.width(), self.height())
            .ok_or_else(|| Error::RenderError("cannot allocate clip mask".to_string()))?;
        mask.fill_path(&PathBuilder::from_rect(clip), FillRule::Winding, false, Transform::identity());
        let saved = self.clip.replace(mask);
        draw(self);
        self.clip = saved;
        Ok(())
    }

    /// Negative sizes draw nothing.
    pub fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, paint: &Paint) {
        let (Some(rect), Some(paint)) = (rect(x, y, w, h), skia_paint(paint)) else {
            return;
        };
        self.pixmap.fill_rect(rect, &paint, Transform::identity(), self.clip.as_ref());
    }

    pub fn fill_path(&mut self, path: &Path, paint: &Paint) {
        if let Some(paint) = skia_paint(paint) {
            self.pixmap
                .fill_path(path, &paint, FillRule::Winding, Transform::identity(), self.clip.as_ref());
        }
    }

    pub fn stroke_path(&mut self, path: &Path, stroke: &Stroke) {
        if stroke.width <= 0.0 {
            return;
        }
        if let Some(paint) = skia_paint(&stroke.paint) {
            self.pixmap
                .stroke_path(path, &paint, &stroke.to_skia(), Transform::identity(), self.clip.as_ref());
        }
    }

    /// Draw `img` scaled into the destination rectangle.
    pub fn draw_image(&mut self, img: &RgbaImage, x: f64, y: f64, w: f64, h: f64) {
        let (dw, dh) = (w.round().max(0.0) as u32, h.round().max(0.0) as u32);
        if dw == 0 || dh == 0 || img.width() == 0 || img.height() == 0 {
            return;
        }
        let scaled = imageops::resize(img, dw, dh, FilterType::Triangle);
        let Some(source) = to_pixmap(&scaled) else {
            return;
        };
        let Some(dest) = rect(x.round(), y.round(), dw as f64, dh as f64) else {
            return;
        };
        let paint = tiny_skia::Paint {
            shader: Pattern::new(
                source.as_ref(),
                SpreadMode::Pad,
                FilterQuality::Nearest,
                1.0,
                Transform::from_translate(dest.x(), dest.y()),
            ),
            anti_alias: false,
            ..Default::default()
        };
        self.pixmap.fill_rect(dest, &paint, Transform::identity(), self.clip.as_ref());
    }

    pub fn into_image(self) -> RgbaImage {
        RgbaImage::from_fn(self.width(), self.height(), |x, y| self.pixel(x, y))
    }
}

fn rect(x: f64, y: f64, w: f64, h: f64) -> Option<Rect> {
    Rect::from_xywh(x as f32, y as f32, w as f32, h as f32)
}

fn skia_paint(paint: &Paint) -> Option<tiny_skia::Paint<'static>> {
    Some(tiny_skia::Paint {
        shader: paint.shader()?,
        anti_alias: true,
        ..Default::default()
    })
}

/// Premultiplied copy of a straight-alpha bitmap.
fn to_pixmap(img: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(img.width(), img.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(img.pixels()) {
        *dst = ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
    }
    Some(pixmap)
}
