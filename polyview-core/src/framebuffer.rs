/// Per-frame color and depth buffers
use crate::projection::Viewport;

/// 8-bit RGB pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert a `[0, 1]` diffuse color, truncating each channel.
    pub fn from_diffuse(diffuse: [f32; 3]) -> Self {
        Self::new(
            (diffuse[0] * 255.0) as u8,
            (diffuse[1] * 255.0) as u8,
            (diffuse[2] * 255.0) as u8,
        )
    }

    /// Uniformly scale every channel by `k`, clamped to `[0, 1]`.
    pub fn shade(self, k: f32) -> Self {
        let k = k.clamp(0.0, 1.0);
        Self::new(
            (self.r as f32 * k) as u8,
            (self.g as f32 * k) as u8,
            (self.b as f32 * k) as u8,
        )
    }
}

/// Row-major RGB pixels
#[derive(Debug, Clone, PartialEq)]
pub struct ColorBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl ColorBuffer {
    pub fn new(viewport: Viewport, fill: Rgb) -> Self {
        Self {
            width: viewport.width as usize,
            height: viewport.height as usize,
            pixels: vec![fill; viewport.pixel_count()],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    pub fn set(&mut self, x: usize, y: usize, color: Rgb) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }

    /// Bresenham line; pixels outside the buffer are dropped.
    pub fn draw_line(&mut self, from: (i32, i32), to: (i32, i32), color: Rgb) {
        let (mut x0, mut y0) = from;
        let (x1, y1) = to;
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            if x0 >= 0 && y0 >= 0 {
                self.set(x0 as usize, y0 as usize, color);
            }
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }
}

/// Nearest depth seen per pixel, starting at +inf
#[derive(Debug, Clone, PartialEq)]
pub struct DepthBuffer {
    width: usize,
    height: usize,
    depths: Vec<f32>,
}

impl DepthBuffer {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            width: viewport.width as usize,
            height: viewport.height as usize,
            depths: vec![f32::INFINITY; viewport.pixel_count()],
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.depths[y * self.width + x])
    }

    /// Record `depth` if it is strictly nearer than what is stored.
    /// Pixels outside the buffer never pass.
    pub fn test_and_set(&mut self, x: usize, y: usize, depth: f32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let slot = &mut self.depths[y * self.width + x];
        if depth < *slot {
            *slot = depth;
            true
        } else {
            false
        }
    }

    pub fn depths(&self) -> &[f32] {
        &self.depths
    }
}
