//! Painter's-order house scene drawn through a manual perspective projection.
//!
//! Shapes are drawn back to front in a fixed order; there is no depth sorting.

use image::RgbaImage;

use crate::projection::{Camera, Projected};
use crate::rendering::{
    Canvas, Color, LinearGradient, Paint, Path, PathBuilder, Point, RadialGradient, Rect, Stroke,
};
use crate::{Error, Result};

const SKY_FALLBACK: Color = Color::rgb(0x87, 0xce, 0xeb);
const HAZE_TOP: Color = Color::rgba(255, 255, 255, 0.0);
const HAZE_BOTTOM: Color = Color::rgba(255, 220, 180, 0.4);

const GRASS_NEAR_HORIZON: Color = Color::rgb(0x2d, 0x4a, 0x10);
const GRASS_FOREGROUND: Color = Color::rgb(0x1a, 0x2e, 0x05);

const ROAD_HALF_WIDTH: f64 = 250.0;
const ROAD_DEPTH: f64 = 5000.0;
const ROAD: Color = Color::rgb(0x1e, 0x29, 0x3b);
const ROAD_LINE: Color = Color::rgb(0xf8, 0xfa, 0xfc);
const ROAD_LINE_DASH: [f32; 2] = [40.0, 60.0];

/// Screen position of the sun, also used as the shadow light source
const SUN_X: f64 = 1600.0;
const SUN_Y: f64 = 150.0;

const TREE_X: f64 = -450.0;
const TREE_Z: f64 = 600.0;
const TRUNK: Color = Color::rgb(0x45, 0x1a, 0x03);
const LEAF_LIGHT: Color = Color::rgb(0x4a, 0xde, 0x80);
const LEAF_DARK: Color = Color::rgb(0x06, 0x4e, 0x3b);

const HOUSE_X: f64 = 200.0;
const HOUSE_Y: f64 = 0.0;
const HOUSE_Z: f64 = 800.0;
const HOUSE_W: f64 = 450.0;
const HOUSE_H: f64 = 350.0;
const HOUSE_D: f64 = 400.0;
const ROOF_RISE: f64 = 200.0;

const SIDE_WALL: Color = Color::rgb(0xfd, 0xe6, 0x8a);
const FRONT_WALL: Color = Color::rgb(0xfe, 0xf3, 0xc7);
const WALL_EDGE: Color = Color::rgb(0xd9, 0x77, 0x06);
const ROOF_SIDE: Color = Color::rgb(0x7f, 0x1d, 0x1d);
const ROOF_FRONT: Color = Color::rgb(0xb9, 0x1c, 0x1c);
const DOOR: Color = Color::rgb(0x45, 0x1a, 0x03);
const WINDOW: Color = Color::rgb(0xba, 0xe6, 0xfd);
const WINDOW_FRAME: Color = Color::rgb(0x02, 0x84, 0xc7);

/// Draws the scene onto `canvas`; `sky` is the downloaded background, if any.
pub fn paint(canvas: &mut Canvas, sky: Option<&RgbaImage>) -> Result<()> {
    let camera = Camera::for_canvas(canvas.width(), canvas.height());
    let scene = PerspectiveScene {
        camera,
        width: canvas.width() as f64,
        height: canvas.height() as f64,
    };

    scene.sky(canvas, sky)?;
    scene.ground(canvas);
    scene.road(canvas)?;
    scene.tree(canvas)?;
    let corners = scene.house_corners()?;
    scene.house_shadow(canvas, &corners);
    scene.house(canvas, &corners)?;
    scene.sun(canvas);
    Ok(())
}

struct PerspectiveScene {
    camera: Camera,
    width: f64,
    height: f64,
}

impl PerspectiveScene {
    fn at(&self, x: f64, y: f64, z: f64) -> Result<Projected> {
        self.camera
            .project(x, y, z)
            .ok_or_else(|| Error::RenderError(format!("point ({}, {}, {}) is behind the camera", x, y, z)))
    }

    fn horizon(&self) -> f64 {
        self.camera.horizon
    }

    fn sky(&self, canvas: &mut Canvas, sky: Option<&RgbaImage>) -> Result<()> {
        let horizon = self.horizon();
        let Some(img) = sky else {
            canvas.fill_rect(0.0, 0.0, self.width, horizon, &Paint::Solid(SKY_FALLBACK));
            return Ok(());
        };
        let width = self.width;
        let clip = Rect::from_xywh(0.0, 0.0, width as f32, (horizon + 50.0) as f32)
            .ok_or_else(|| Error::RenderError(format!("empty sky clip for horizon {}", horizon)))?;
        canvas.with_clip(clip, |c| {
            c.draw_image(img, 0.0, 0.0, width, horizon + 100.0);
            let haze = LinearGradient::new(0.0, horizon - 200.0, 0.0, horizon)
                .stop(0.0, HAZE_TOP)
                .stop(1.0, HAZE_BOTTOM);
            c.fill_rect(0.0, 0.0, width, horizon, &haze.into());
        })
    }

    fn ground(&self, canvas: &mut Canvas) {
        let horizon = self.horizon();
        let grass = LinearGradient::new(0.0, horizon, 0.0, self.height)
            .stop(0.0, GRASS_NEAR_HORIZON)
            .stop(1.0, GRASS_FOREGROUND);
        canvas.fill_rect(0.0, horizon, self.width, self.height - horizon, &grass.into());
    }

    fn road(&self, canvas: &mut Canvas) -> Result<()> {
        let corners = [
            self.at(-ROAD_HALF_WIDTH, 0.0, 0.0)?.point(),
            self.at(ROAD_HALF_WIDTH, 0.0, 0.0)?.point(),
            self.at(ROAD_HALF_WIDTH * 5.0, 0.0, ROAD_DEPTH)?.point(),
            self.at(-ROAD_HALF_WIDTH * 5.0, 0.0, ROAD_DEPTH)?.point(),
        ];
        if let Some(road) = polygon(&corners) {
            canvas.fill_path(&road, &Paint::Solid(ROAD));
        }

        let (near, far) = (self.at(0.0, 0.0, 0.0)?, self.at(0.0, 0.0, ROAD_DEPTH)?);
        if let Some(line) = polyline(&[near.point(), far.point()]) {
            canvas.stroke_path(&line, &Stroke::solid(ROAD_LINE, 5.0).dashed(&ROAD_LINE_DASH));
        }
        Ok(())
    }

    /// Box corners: 0-3 front face, 4-7 back face, each bottom-left,
    /// bottom-right, top-right, top-left.
    fn house_corners(&self) -> Result<[Projected; 8]> {
        let (x0, x1) = (HOUSE_X, HOUSE_X + HOUSE_W);
        let (y0, y1) = (HOUSE_Y, HOUSE_Y + HOUSE_H);
        let (z0, z1) = (HOUSE_Z, HOUSE_Z + HOUSE_D);
        Ok([
            self.at(x0, y0, z0)?,
            self.at(x1, y0, z0)?,
            self.at(x1, y1, z0)?,
            self.at(x0, y1, z0)?,
            self.at(x0, y0, z1)?,
            self.at(x1, y0, z1)?,
            self.at(x1, y1, z1)?,
            self.at(x0, y1, z1)?,
        ])
    }

    /// Pushes the footprint away from the sun and flattens it onto a line
    /// just below the horizon.
    fn house_shadow(&self, canvas: &mut Canvas, p: &[Projected; 8]) {
        let ground_y = self.horizon() + 20.0;
        let footprint: Vec<Point> = [p[0], p[1], p[5], p[4]]
            .iter()
            .map(|q| Point::from_xy((q.x + (q.x - SUN_X) * (q.y / SUN_Y + 0.5)) as f32, ground_y as f32))
            .collect();
        if let Some(shadow) = polygon(&footprint) {
            canvas.fill_path(&shadow, &Paint::Solid(Color::rgba(0, 0, 0, 0.45)));
        }
    }

    fn tree(&self, canvas: &mut Canvas) -> Result<()> {
        let base = self.at(TREE_X, 0.0, TREE_Z)?;

        let (rx, ry) = (150.0 * base.scale, 40.0 * base.scale);
        let (cx, cy) = (base.x + 150.0, base.y + 10.0);
        let shadow = Rect::from_xywh((cx - rx) as f32, (cy - ry) as f32, (2.0 * rx) as f32, (2.0 * ry) as f32)
            .and_then(PathBuilder::from_oval);
        if let Some(shadow) = shadow {
            canvas.fill_path(&shadow, &Paint::Solid(Color::rgba(0, 0, 0, 0.35)));
        }

        let (trunk_w, trunk_h) = (40.0 * base.scale, 200.0 * base.scale);
        canvas.fill_rect(base.x - trunk_w / 2.0, base.y - trunk_h, trunk_w, trunk_h, &Paint::Solid(TRUNK));

        for (x, y, z, r) in [
            (TREE_X, 250.0, TREE_Z, 120.0),
            (TREE_X - 70.0, 180.0, TREE_Z + 50.0, 90.0),
            (TREE_X + 70.0, 180.0, TREE_Z - 50.0, 90.0),
            (TREE_X, 350.0, TREE_Z, 80.0),
        ] {
            self.leaf(canvas, x, y, z, r)?;
        }
        Ok(())
    }

    /// A shaded sphere lit from the upper left.
    fn leaf(&self, canvas: &mut Canvas, x: f64, y: f64, z: f64, r: f64) -> Result<()> {
        let p = self.at(x, y, z)?;
        let rad = r * p.scale;
        let shade = RadialGradient::new(p.x - rad * 0.3, p.y - rad * 0.3, rad * 0.1, p.x, p.y, rad)
            .stop(0.0, LEAF_LIGHT)
            .stop(1.0, LEAF_DARK);
        if let Some(sphere) = PathBuilder::from_circle(p.x as f32, p.y as f32, rad as f32) {
            canvas.fill_path(&sphere, &shade.into());
        }
        Ok(())
    }

    fn house(&self, canvas: &mut Canvas, p: &[Projected; 8]) -> Result<()> {
        let edge = Stroke::solid(WALL_EDGE, 1.0);

        if let Some(side) = polygon(&[p[1].point(), p[5].point(), p[6].point(), p[2].point()]) {
            canvas.fill_path(&side, &Paint::Solid(SIDE_WALL));
        }

        if let Some(front) = polyline(&[p[0].point(), p[1].point(), p[2].point(), p[3].point()]) {
            canvas.fill_path(&front, &Paint::Solid(FRONT_WALL));
            canvas.stroke_path(&front, &edge);
        }

        let peak = self.at(HOUSE_X + HOUSE_W / 2.0, HOUSE_H + ROOF_RISE, HOUSE_Z + HOUSE_D / 2.0)?;
        if let Some(roof_side) = polyline(&[p[2].point(), p[6].point(), peak.point()]) {
            canvas.fill_path(&roof_side, &Paint::Solid(ROOF_SIDE));
        }
        if let Some(roof_front) = polyline(&[p[3].point(), p[2].point(), peak.point()]) {
            canvas.fill_path(&roof_front, &Paint::Solid(ROOF_FRONT));
            canvas.stroke_path(&roof_front, &edge);
        }

        let (door_x, door_w, door_h) = (HOUSE_X + 185.0, 80.0, 150.0);
        if let Some(door) = polyline(&self.front_quad(door_x, 0.0, door_w, door_h)?) {
            canvas.fill_path(&door, &Paint::Solid(DOOR));
        }

        let frame = Stroke::solid(WINDOW_FRAME, 1.0);
        for x in [HOUSE_X + 50.0, HOUSE_X + 330.0] {
            if let Some(window) = polyline(&self.front_quad(x, 150.0, 70.0, 70.0)?) {
                canvas.fill_path(&window, &Paint::Solid(WINDOW));
                canvas.stroke_path(&window, &frame);
            }
        }
        Ok(())
    }

    /// Corners of a rectangle on the house front plane, starting bottom-left.
    fn front_quad(&self, x: f64, y: f64, w: f64, h: f64) -> Result<[Point; 4]> {
        Ok([
            self.at(x, y, HOUSE_Z)?.point(),
            self.at(x + w, y, HOUSE_Z)?.point(),
            self.at(x + w, y + h, HOUSE_Z)?.point(),
            self.at(x, y + h, HOUSE_Z)?.point(),
        ])
    }

    fn sun(&self, canvas: &mut Canvas) {
        let glow = RadialGradient::new(SUN_X, SUN_Y, 20.0, SUN_X, SUN_Y, 150.0)
            .stop(0.0, Color::rgba(255, 255, 200, 1.0))
            .stop(0.2, Color::rgba(255, 255, 0, 0.6))
            .stop(1.0, Color::rgba(255, 255, 255, 0.0));
        canvas.fill_rect(0.0, 0.0, self.width, self.height, &glow.into());
    }
}

fn polygon(points: &[Point]) -> Option<Path> {
    trace(points, true)
}

/// Unclosed polyline: fills close it implicitly, strokes leave the last edge out.
fn polyline(points: &[Point]) -> Option<Path> {
    trace(points, false)
}

fn trace(points: &[Point], close: bool) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x, first.y);
    for p in rest {
        pb.line_to(p.x, p.y);
    }
    if close {
        pb.close();
    }
    pb.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn render(width: u32, height: u32, sky: Option<&RgbaImage>) -> Canvas {
        let mut canvas = Canvas::new(width, height).unwrap();
        paint(&mut canvas, sky).unwrap();
        canvas
    }

    fn assert_near(actual: Rgba<u8>, expected: [u8; 3], tolerance: u8) {
        for c in 0..3 {
            assert!(
                actual[c].abs_diff(expected[c]) <= tolerance,
                "{:?} is not within {} of {:?}",
                actual,
                tolerance,
                expected
            );
        }
        assert_eq!(actual[3], 255);
    }

    #[test]
    fn fallback_sky_is_flat_blue() {
        let c = render(1920, 1080, None);
        assert_eq!(c.pixel(0, 0), Rgba([0x87, 0xce, 0xeb, 255]));
        assert_eq!(c.pixel(100, 600), Rgba([0x87, 0xce, 0xeb, 255]));
    }

    #[test]
    fn every_pixel_is_opaque() {
        let c = render(1920, 1080, None);
        assert!(c.into_image().pixels().all(|p| p[3] == 255));
    }

    #[test]
    fn house_lands_where_projected() {
        let c = render(1920, 1080, None);
        let cam = Camera::for_canvas(1920, 1080);

        // Front wall between the door and the left window.
        let wall = cam.project(HOUSE_X + 20.0, 100.0, HOUSE_Z).unwrap();
        assert_eq!(c.pixel(wall.x as u32, wall.y as u32), Rgba([0xfe, 0xf3, 0xc7, 255]));

        let door = cam.project(HOUSE_X + 225.0, 60.0, HOUSE_Z).unwrap();
        assert_eq!(c.pixel(door.x as u32, door.y as u32), Rgba([0x45, 0x1a, 0x03, 255]));

        let window = cam.project(HOUSE_X + 85.0, 185.0, HOUSE_Z).unwrap();
        assert_eq!(c.pixel(window.x as u32, window.y as u32), Rgba([0xba, 0xe6, 0xfd, 255]));
    }

    #[test]
    fn ground_darkens_towards_the_bottom() {
        let c = render(1920, 1080, None);
        assert_near(c.pixel(960, 1079), [0x1a, 0x2e, 0x05], 2);
        assert_near(c.pixel(960, 703), [0x2d, 0x4a, 0x10], 2);
    }

    #[test]
    fn sun_glow_brightens_the_sky() {
        let c = render(1920, 1080, None);
        assert_near(c.pixel(SUN_X as u32, SUN_Y as u32), [255, 255, 200], 2);
    }

    #[test]
    fn sky_texture_replaces_fallback() {
        let sky = RgbaImage::from_pixel(4, 4, Rgba([200, 30, 30, 255]));
        let c = render(1920, 1080, Some(&sky));
        // Above the haze band the texture shows through unchanged.
        assert_near(c.pixel(0, 0), [200, 30, 30], 1);
    }
}
