/// Vector math and per-session camera state
use nalgebra::{Vector2, Vector3};

/// World-space point or direction
pub type Vec3 = Vector3<f32>;
/// Screen-space point
pub type Vec2 = Vector2<f32>;

/// Zoom bounds enforced by [`CameraState::zoom_by`] and [`CameraState::tick`]
pub const MIN_ZOOM: f32 = 0.3;
pub const MAX_ZOOM: f32 = 3.0;

/// Yaw added per tick while auto-rotation is on
pub const AUTO_ROTATE_STEP: f32 = 0.01;

/// Unit vector in the direction of `v`, or the zero vector when `|v| == 0`.
pub fn normalize(v: Vec3) -> Vec3 {
    let len = v.norm();
    if len == 0.0 {
        return Vec3::zeros();
    }
    v / len
}

/// Rotate about the Y axis by `yaw`, then about the post-yaw X axis by `pitch`.
pub fn rotate_xy(v: Vec3, yaw: f32, pitch: f32) -> Vec3 {
    let (sy, cy) = yaw.sin_cos();
    let (sx, cx) = pitch.sin_cos();

    let x1 = v.x * cy + v.z * sy;
    let z1 = -v.x * sy + v.z * cy;

    Vec3::new(x1, v.y * cx - z1 * sx, v.y * sx + z1 * cx)
}

pub fn translate(v: Vec3, offset: Vec3) -> Vec3 {
    v + offset
}

/// Camera parameters the host forwards to the renderer every frame (angles in radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub yaw: f32,
    pub pitch: f32,
    pub zoom: f32,
    pub show_edges: bool,
    pub auto_rotate: bool,
}

impl CameraState {
    pub fn new(yaw: f32, pitch: f32, zoom: f32) -> Self {
        Self {
            yaw,
            pitch,
            zoom,
            show_edges: false,
            auto_rotate: false,
        }
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, d_yaw: f32, d_pitch: f32) {
        self.yaw += d_yaw;
        self.pitch += d_pitch;
    }

    pub fn zoom_by(&mut self, delta: f32) {
        self.zoom = (self.zoom + delta).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn toggle_edges(&mut self) {
        self.show_edges = !self.show_edges;
    }

    pub fn toggle_auto_rotate(&mut self) {
        self.auto_rotate = !self.auto_rotate;
    }

    /// Advance one host frame: spin if auto-rotating and keep zoom in range.
    pub fn tick(&mut self) {
        if self.auto_rotate {
            self.yaw += AUTO_ROTATE_STEP;
        }
        self.zoom = self.zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new(0.5, 0.3, 1.2)
    }
}
