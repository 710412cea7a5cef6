//! Colours and fill styles, turned into `tiny-skia` shaders at draw time

use tiny_skia::{GradientStop, Shader, SpreadMode, Transform};

use super::Point;
use crate::{Error, Result};

/// Straight (non-premultiplied) RGBA colour with a fractional alpha
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0.0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a CSS colour: `#rgb`, `#rrggbb`, `rgb(r, g, b)` or `rgba(r, g, b, a)`.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| Error::ConfigError(format!("invalid hex colour '{}'", s)));
        }

        let lower = s.to_ascii_lowercase();
        let (body, want_alpha) = if let Some(rest) = lower.strip_prefix("rgba(") {
            (rest, true)
        } else if let Some(rest) = lower.strip_prefix("rgb(") {
            (rest, false)
        } else {
            return Err(Error::ConfigError(format!("unsupported colour '{}'", s)));
        };

        let body = body
            .strip_suffix(')')
            .ok_or_else(|| Error::ConfigError(format!("unterminated colour '{}'", s)))?;
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        let expected = if want_alpha { 4 } else { 3 };
        if parts.len() != expected {
            return Err(Error::ConfigError(format!(
                "colour '{}' needs {} components, found {}",
                s,
                expected,
                parts.len()
            )));
        }

        let channel = |p: &str| -> Result<u8> {
            let v: f32 = p
                .parse()
                .map_err(|_| Error::ConfigError(format!("bad channel '{}' in '{}'", p, s)))?;
            Ok(v.round().clamp(0.0, 255.0) as u8)
        };
        let a = if want_alpha {
            let v: f32 = parts[3]
                .parse()
                .map_err(|_| Error::ConfigError(format!("bad alpha '{}' in '{}'", parts[3], s)))?;
            v.clamp(0.0, 1.0)
        } else {
            1.0
        };

        Ok(Self {
            r: channel(parts[0])?,
            g: channel(parts[1])?,
            b: channel(parts[2])?,
            a,
        })
    }

    pub fn to_rgba8(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, (self.a * 255.0).round() as u8])
    }

    pub fn to_skia(self) -> tiny_skia::Color {
        let unit = |c: u8| c as f32 / 255.0;
        tiny_skia::Color::from_rgba(unit(self.r), unit(self.g), unit(self.b), self.a.clamp(0.0, 1.0))
            .unwrap_or(tiny_skia::Color::TRANSPARENT)
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    let digit = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok();
    let pair = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        3 => Some(Color::rgb(digit(0)? * 17, digit(1)? * 17, digit(2)? * 17)),
        6 => Some(Color::rgb(pair(0)?, pair(2)?, pair(4)?)),
        _ => None,
    }
}

/// A colour stop at `offset` in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Color,
}

/// Ordered colour stops
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stops(Vec<ColorStop>);

impl Stops {
    pub fn add(&mut self, offset: f32, color: Color) {
        let stop = ColorStop { offset: offset.clamp(0.0, 1.0), color };
        // Equal offsets keep insertion order.
        let idx = self.0.partition_point(|s| s.offset <= stop.offset);
        self.0.insert(idx, stop);
    }

    pub fn as_slice(&self) -> &[ColorStop] {
        &self.0
    }

    fn to_skia(&self, offset: impl Fn(f32) -> f32) -> Vec<GradientStop> {
        self.0
            .iter()
            .map(|s| GradientStop::new(offset(s.offset), s.color.to_skia()))
            .collect()
    }
}

/// Gradient along the line `(x0, y0)` → `(x1, y1)`
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub stops: Stops,
}

impl LinearGradient {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1, stops: Stops::default() }
    }

    pub fn stop(mut self, offset: f32, color: Color) -> Self {
        self.stops.add(offset, color);
        self
    }

    /// `None` for a zero-length gradient line, which paints nothing.
    fn shader(&self) -> Option<Shader<'static>> {
        if self.x0 == self.x1 && self.y0 == self.y1 {
            return None;
        }
        tiny_skia::LinearGradient::new(
            point(self.x0, self.y0),
            point(self.x1, self.y1),
            self.stops.to_skia(|t| t),
            SpreadMode::Pad,
            Transform::identity(),
        )
    }
}

/// Two-circle radial gradient from `(x0, y0, r0)` to `(x1, y1, r1)`
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub x0: f64,
    pub y0: f64,
    pub r0: f64,
    pub x1: f64,
    pub y1: f64,
    pub r1: f64,
    pub stops: Stops,
}

/// A two-circle gradient rewritten around its cone apex.
#[derive(Debug, Clone, Copy, PartialEq)]
struct FocalForm {
    focal: (f64, f64),
    /// Offset of the start circle on the rewritten `[0, 1]` range
    start: f64,
}

impl RadialGradient {
    pub fn new(x0: f64, y0: f64, r0: f64, x1: f64, y1: f64, r1: f64) -> Self {
        Self { x0, y0, r0, x1, y1, r1, stops: Stops::default() }
    }

    pub fn stop(mut self, offset: f32, color: Color) -> Self {
        self.stops.add(offset, color);
        self
    }

    /// The circles `c(t), r(t)` of a growing two-circle gradient all pass
    /// through one cone whose apex has radius 0. Starting the gradient at that
    /// apex gives tiny-skia's focal form with the same circles, reparametrised
    /// as `s = (r0 + t·(r1 − r0)) / r1`.
    fn focal_form(&self) -> Option<FocalForm> {
        let dr = self.r1 - self.r0;
        if self.r0 < 0.0 || dr <= 0.0 {
            return None;
        }
        let k = self.r0 / dr;
        Some(FocalForm {
            focal: (self.x0 - k * (self.x1 - self.x0), self.y0 - k * (self.y1 - self.y0)),
            start: self.r0 / self.r1,
        })
    }

    /// `None` for shrinking or cylindrical gradients, which the scenes never draw.
    fn shader(&self) -> Option<Shader<'static>> {
        let form = self.focal_form()?;
        let span = 1.0 - form.start;
        tiny_skia::RadialGradient::new(
            point(form.focal.0, form.focal.1),
            point(self.x1, self.y1),
            self.r1 as f32,
            self.stops.to_skia(|t| (form.start + t as f64 * span) as f32),
            SpreadMode::Pad,
            Transform::identity(),
        )
    }
}

fn point(x: f64, y: f64) -> Point {
    Point::from_xy(x as f32, y as f32)
}

/// Fill or stroke style
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    Linear(LinearGradient),
    Radial(RadialGradient),
}

impl Paint {
    /// The shader to draw with, or `None` when nothing would be painted.
    pub fn shader(&self) -> Option<Shader<'static>> {
        match self {
            Paint::Solid(c) => Some(Shader::SolidColor(c.to_skia())),
            Paint::Linear(g) => g.shader(),
            Paint::Radial(g) => g.shader(),
        }
    }
}

impl From<Color> for Paint {
    fn from(c: Color) -> Self {
        Paint::Solid(c)
    }
}

impl From<LinearGradient> for Paint {
    fn from(g: LinearGradient) -> Self {
        Paint::Linear(g)
    }
}

impl From<RadialGradient> for Paint {
    fn from(g: RadialGradient) -> Self {
        Paint::Radial(g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_css_colours() {
        assert_eq!(Color::parse("#87CEEB").unwrap(), Color::rgb(0x87, 0xce, 0xeb));
        assert_eq!(Color::parse("#fff").unwrap(), Color::WHITE);
        let c = Color::parse("rgba(255, 220, 180, 0.4)").unwrap();
        assert_eq!((c.r, c.g, c.b), (255, 220, 180));
        assert!((c.a - 0.4).abs() < 1e-6);
        assert_eq!(Color::parse("rgb(1,2,3)").unwrap(), Color::rgb(1, 2, 3));
    }

    #[test]
    fn rejects_garbage_colours() {
        assert!(Color::parse("#12345").is_err());
        assert!(Color::parse("hsl(0, 0%, 0%)").is_err());
        assert!(Color::parse("rgba(1,2,3)").is_err());
        assert!(Color::parse("#gggggg").is_err());
    }

    #[test]
    fn stops_stay_sorted() {
        let g = LinearGradient::new(0.0, 0.0, 0.0, 100.0)
            .stop(1.0, Color::WHITE)
            .stop(0.0, Color::BLACK)
            .stop(1.5, Color::TRANSPARENT);
        let offsets: Vec<f32> = g.stops.as_slice().iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![0.0, 1.0, 1.0]);
        assert_eq!(g.stops.as_slice()[1].color, Color::WHITE);
    }

    #[test]
    fn zero_length_linear_gradient_paints_nothing() {
        let g = LinearGradient::new(5.0, 5.0, 5.0, 5.0).stop(0.0, Color::BLACK);
        assert!(Paint::from(g).shader().is_none());
    }

    #[test]
    fn concentric_gradient_keeps_its_centre() {
        let g = RadialGradient::new(10.0, 20.0, 20.0, 10.0, 20.0, 120.0);
        let form = g.focal_form().unwrap();
        assert_eq!(form.focal, (10.0, 20.0));
        assert!((form.start - 20.0 / 120.0).abs() < 1e-12);
    }

    #[test]
    fn offset_gradient_focus_is_the_cone_apex() {
        // Radius grows by 9 across the (3, 3) centre offset, so it reaches 0 a
        // ninth of that offset behind the inner centre.
        let g = RadialGradient::new(-3.0, -3.0, 1.0, 0.0, 0.0, 10.0);
        let form = g.focal_form().unwrap();
        assert!((form.focal.0 + 3.0 + 1.0 / 3.0).abs() < 1e-12);
        assert!((form.focal.1 + 3.0 + 1.0 / 3.0).abs() < 1e-12);
        assert!((form.start - 0.1).abs() < 1e-12);
    }

    #[test]
    fn shrinking_radial_gradient_is_unsupported() {
        let g = RadialGradient::new(0.0, 0.0, 50.0, 0.0, 0.0, 10.0).stop(0.0, Color::BLACK);
        assert!(g.focal_form().is_none());
        assert!(Paint::from(g).shader().is_none());
    }
}
