/// Perspective projection from camera space to pixel coordinates
use crate::transform::{Vec2, Vec3};

/// Pixel dimensions of the render target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Project a camera-space point to screen space.
///
/// Divides x and y by z, multiplies by `scale`, and maps the result so the
/// origin lands at the viewport center with screen Y growing downward.
///
/// There is no near-plane clipping: a point with `v.z <= 0` still goes through
/// the same formula and comes out mirrored or non-finite. Callers keep geometry
/// in front of the camera.
pub fn project_perspective(v: Vec3, scale: f32, width: f32, height: f32) -> Vec2 {
    let inv_z = 1.0 / v.z;
    let sx = v.x * inv_z * scale;
    let sy = v.y * inv_z * scale;

    Vec2::new(
        width * 0.5 + sx * width * 0.5,
        height * 0.5 - sy * height * 0.5,
    )
}
