//! Pinhole perspective used by the perspective scene.
//!
//! The camera sits on the z axis looking towards +z. World `y` grows upwards
//! while screen `y` grows downwards from the horizon line.

use crate::rendering::Point;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub camera_z: f64,
    pub focal_length: f64,
    /// Screen x of the optical axis
    pub center_x: f64,
    /// Screen y of the horizon
    pub horizon: f64,
}

/// A projected point plus the perspective scale at its depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

impl Projected {
    pub fn point(&self) -> Point {
        Point::from_xy(self.x as f32, self.y as f32)
    }
}

impl Camera {
    pub const CAMERA_Z: f64 = -800.0;
    pub const FOCAL_LENGTH: f64 = 1000.0;
    pub const HORIZON_RATIO: f64 = 0.65;

    /// Default camera for a canvas of the given size.
    pub fn for_canvas(width: u32, height: u32) -> Self {
        Self {
            camera_z: Self::CAMERA_Z,
            focal_length: Self::FOCAL_LENGTH,
            center_x: width as f64 / 2.0,
            horizon: height as f64 * Self::HORIZON_RATIO,
        }
    }

    /// `None` for points on or behind the camera plane.
    pub fn project(&self, x: f64, y: f64, z: f64) -> Option<Projected> {
        let depth = z - self.camera_z;
        if depth <= 0.0 {
            return None;
        }
        let scale = self.focal_length / depth;
        Some(Projected {
            x: self.center_x + x * scale,
            y: self.horizon - y * scale,
            scale,
        })
    }
}
