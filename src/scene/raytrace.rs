//! Ray-cast minimalist house: a checkered ground plane, a white box and a
//! flat roof slab, lit by one directional light.

use image::{Rgba, RgbaImage};
use nalgebra::Vector3;

type Vec3 = Vector3<f64>;

const SKY: [u8; 3] = [135, 206, 235];
const GRASS_EVEN: [u8; 3] = [100, 200, 100];
const GRASS_ODD: [u8; 3] = [80, 180, 80];
const WALL: [u8; 3] = [240, 240, 240];
const ROOF: [u8; 3] = [60, 60, 70];

/// Roof tops face the light; a fixed brightness keeps them readable.
const ROOF_BRIGHTNESS: f64 = 0.9;
/// Lower bound on Lambert shading so faces turned away stay visible
const AMBIENT: f64 = 0.3;
const SATURATION: f32 = 1.2;

const EPSILON: f64 = 1e-6;
const FACE_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, Copy)]
struct Ray {
    origin: Vec3,
    dir: Vec3,
}

impl Ray {
    fn at(&self, t: f64) -> Vec3 {
        self.origin + self.dir * t
    }
}

#[derive(Debug, Clone, Copy)]
struct Aabb {
    min: Vec3,
    max: Vec3,
}

impl Aabb {
    fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        Self { min: Vec3::from(min), max: Vec3::from(max) }
    }

    /// Slab test; returns the entry distance, which is negative when the
    /// origin is inside the box.
    fn intersect(&self, ray: &Ray) -> Option<f64> {
        let (mut t_near, mut t_far) = (f64::NEG_INFINITY, f64::INFINITY);
        for i in 0..3 {
            if ray.dir[i].abs() < EPSILON {
                if ray.origin[i] < self.min[i] || ray.origin[i] > self.max[i] {
                    return None;
                }
            } else {
                let t1 = (self.min[i] - ray.origin[i]) / ray.dir[i];
                let t2 = (self.max[i] - ray.origin[i]) / ray.dir[i];
                t_near = t_near.max(t1.min(t2));
                t_far = t_far.min(t1.max(t2));
            }
        }
        if t_near > t_far || t_far < 0.0 {
            return None;
        }
        Some(t_near)
    }

    /// Outward normal of the face containing `p`.
    fn normal_at(&self, p: &Vec3) -> Vec3 {
        if (p.x - self.max.x).abs() < FACE_TOLERANCE {
            Vec3::x()
        } else if (p.x - self.min.x).abs() < FACE_TOLERANCE {
            -Vec3::x()
        } else if (p.y - self.max.y).abs() < FACE_TOLERANCE {
            Vec3::y()
        } else if (p.y - self.min.y).abs() < FACE_TOLERANCE {
            -Vec3::y()
        } else if (p.z - self.max.z).abs() < FACE_TOLERANCE {
            Vec3::z()
        } else {
            -Vec3::z()
        }
    }
}

/// Distance along `ray` to the plane through `point` with normal `normal`.
fn intersect_plane(ray: &Ray, point: &Vec3, normal: &Vec3) -> Option<f64> {
    let denom = ray.dir.dot(normal);
    if denom.abs() <= EPSILON {
        return None;
    }
    let t = (point - ray.origin).dot(normal) / denom;
    (t >= 0.0).then_some(t)
}

fn shade(color: [u8; 3], factor: f64) -> [u8; 3] {
    color.map(|c| (c as f64 * factor) as u8)
}

pub struct RayTracer {
    width: u32,
    height: u32,
    camera: Vec3,
    light: Vec3,
    house: Aabb,
    roof: Aabb,
}

impl RayTracer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            camera: Vec3::new(4.0, 4.0, 10.0),
            light: Vec3::new(0.5, 1.0, 0.2).normalize(),
            house: Aabb::new([-1.0, 0.0, -1.0], [1.0, 2.0, 1.0]),
            roof: Aabb::new([-1.2, 2.0, -1.2], [1.2, 2.3, 1.2]),
        }
    }

    fn primary_ray(&self, px: u32, py: u32) -> Ray {
        let (hw, hh) = (self.width as f64 / 2.0, self.height as f64 / 2.0);
        let u = (px as f64 - hw) / hw;
        let v = (hh - py as f64) / hh;
        Ray { origin: self.camera, dir: Vec3::new(u, v, -1.0).normalize() }
    }

    /// Colour seen along `ray`; `None` lets the sky show.
    fn trace(&self, ray: &Ray) -> Option<[u8; 3]> {
        let mut nearest = f64::INFINITY;
        let mut hit = None;

        if let Some(t) = intersect_plane(ray, &Vec3::zeros(), &Vec3::y()) {
            if t > 0.0 && t < nearest {
                nearest = t;
                let p = ray.at(t);
                let cell = p.x.trunc() as i64 + p.z.trunc() as i64;
                hit = Some(if cell.rem_euclid(2) == 0 { GRASS_EVEN } else { GRASS_ODD });
            }
        }

        if let Some(t) = self.house.intersect(ray) {
            if t != 0.0 && t < nearest {
                nearest = t;
                let n = self.house.normal_at(&ray.at(t));
                hit = Some(shade(WALL, n.dot(&self.light).max(AMBIENT)));
            }
        }

        if let Some(t) = self.roof.intersect(ray) {
            if t != 0.0 && t < nearest {
                hit = Some(shade(ROOF, ROOF_BRIGHTNESS));
            }
        }

        hit
    }

    pub fn render(&self) -> RgbaImage {
        let mut img = RgbaImage::from_fn(self.width, self.height, |px, py| {
            let [r, g, b] = self.trace(&self.primary_ray(px, py)).unwrap_or(SKY);
            Rgba([r, g, b, 255])
        });
        enhance_saturation(&mut img, SATURATION);
        img
    }
}

/// Push each pixel away from its grey level by `factor`.
///
/// The grey level is ITU-R 601 luma in 16-bit fixed point, rounded. Blending
/// happens in single precision and truncates, clamped to `0..=255`.
pub fn enhance_saturation(img: &mut RgbaImage, factor: f32) {
    for p in img.pixels_mut() {
        let luma = luma(p[0], p[1], p[2]) as f32;
        for c in 0..3 {
            let v = luma + factor * (p[c] as f32 - luma);
            p[c] = v as u8;
        }
    }
}

fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn house() -> Aabb {
        RayTracer::new(8, 8).house
    }

    #[test]
    fn slab_test_hits_box_in_front() {
        let ray = Ray { origin: Vec3::new(0.0, 1.0, 10.0), dir: -Vec3::z() };
        let t = house().intersect(&ray).unwrap();
        assert!((t - 9.0).abs() < 1e-9);
        assert_eq!(house().normal_at(&ray.at(t)), Vec3::z());
    }

    #[test]
    fn slab_test_misses_box_behind() {
        let ray = Ray { origin: Vec3::new(0.0, 1.0, 10.0), dir: Vec3::z() };
        assert!(house().intersect(&ray).is_none());
        let parallel = Ray { origin: Vec3::new(5.0, 1.0, 10.0), dir: -Vec3::z() };
        assert!(house().intersect(&parallel).is_none());
    }

    #[test]
    fn plane_is_hit_only_ahead() {
        let down = Ray { origin: Vec3::new(0.0, 4.0, 0.0), dir: -Vec3::y() };
        assert_eq!(intersect_plane(&down, &Vec3::zeros(), &Vec3::y()), Some(4.0));
        let up = Ray { origin: Vec3::new(0.0, 4.0, 0.0), dir: Vec3::y() };
        assert_eq!(intersect_plane(&up, &Vec3::zeros(), &Vec3::y()), None);
    }

    #[test]
    fn upward_rays_see_sky() {
        let rt = RayTracer::new(80, 80);
        let ray = rt.primary_ray(0, 0);
        assert!(ray.dir.y > 0.0);
        assert_eq!(rt.trace(&ray), None);
    }

    #[test]
    fn faces_away_from_light_use_ambient_floor() {
        let rt = RayTracer::new(80, 80);
        // -z face: n·l is negative, so the ambient floor applies.
        let ray = Ray { origin: Vec3::new(0.0, 1.0, -10.0), dir: Vec3::z() };
        assert_eq!(rt.trace(&ray), Some(shade(WALL, AMBIENT)));
    }

    #[test]
    fn saturation_keeps_greys() {
        let mut img = RgbaImage::from_pixel(1, 1, Rgba([90, 90, 90, 255]));
        enhance_saturation(&mut img, 1.2);
        assert_eq!(*img.get_pixel(0, 0), Rgba([90, 90, 90, 255]));

        let mut img = RgbaImage::from_pixel(1, 1, Rgba([100, 200, 100, 255]));
        enhance_saturation(&mut img, 1.2);
        let p = img.get_pixel(0, 0);
        assert!(p[1] > 200 && p[0] < 100);
    }

    #[test]
    fn saturation_truncates_after_blending() {
        // Luma 188; green lands on 209.6 and truncates.
        let mut img = RgbaImage::from_pixel(1, 1, Rgba([135, 206, 235, 255]));
        enhance_saturation(&mut img, SATURATION);
        assert_eq!(*img.get_pixel(0, 0), Rgba([124, 209, 244, 255]));

        // 55 - 1.2 lands on 53.8 for red and green.
        assert_eq!(luma(54, 54, 63), 55);
        let mut img = RgbaImage::from_pixel(1, 1, Rgba([54, 54, 63, 255]));
        enhance_saturation(&mut img, SATURATION);
        assert_eq!(*img.get_pixel(0, 0), Rgba([53, 53, 64, 255]));
    }

    #[test]
    fn render_has_requested_size() {
        let img = RayTracer::new(64, 48).render();
        assert_eq!(img.dimensions(), (64, 48));
        // Top-left looks up into the sky (after the saturation boost).
        assert_eq!(img.get_pixel(0, 0)[3], 255);
    }
}
