/// Fixed-function software rasterizer
///
/// Every call to [`Renderer::render`] rebuilds the per-triangle working set
/// from the mesh: rotate, translate, project, flat-shade, sort back to front,
/// then scan-convert with a per-pixel depth test. Nothing is cached between
/// frames.
use log::trace;

use crate::framebuffer::{ColorBuffer, DepthBuffer, Rgb};
use crate::geometry::Mesh;
use crate::projection::{project_perspective, Viewport};
use crate::transform::{normalize, rotate_xy, translate, CameraState, Vec2, Vec3};

/// Fixed-function constants of the pipeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    /// Direction towards the light; normalized before use
    pub light_dir: Vec3,
    /// Added to every rotated vertex to place the model in front of the camera
    pub camera_offset: Vec3,
    pub ambient: f32,
    pub diffuse: f32,
    pub background: Rgb,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            light_dir: Vec3::new(0.4, 0.7, -0.6),
            camera_offset: Vec3::new(0.0, 0.0, 4.0),
            ambient: 0.3,
            diffuse: 0.7,
            background: Rgb::BLACK,
        }
    }
}

/// One mesh face after the transform and shading stage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformedTriangle {
    pub world: [Vec3; 3],
    pub screen: [Vec2; 3],
    pub intensity: f32,
    pub color: Rgb,
}

impl TransformedTriangle {
    pub fn average_depth(&self) -> f32 {
        (self.world[0].z + self.world[1].z + self.world[2].z) / 3.0
    }

    /// Flat color written for every covered pixel
    pub fn shaded_color(&self) -> Rgb {
        self.color.shade(self.intensity)
    }
}

/// A wireframe line in screen space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeSegment {
    pub from: Vec2,
    pub to: Vec2,
}

/// Output of one render call
#[derive(Debug, Clone)]
pub struct Frame {
    pub color: ColorBuffer,
    pub depth: DepthBuffer,
    /// Three segments per triangle in paint order; empty when edges are off
    pub edges: Vec<EdgeSegment>,
}

impl Frame {
    /// Draw every edge segment over the color buffer, ignoring depth.
    pub fn overlay_edges(&mut self, color: Rgb) {
        let width = self.color.width() as f32;
        let height = self.color.height() as f32;
        for edge in &self.edges {
            if let Some((from, to)) = clip_segment(edge.from, edge.to, width, height) {
                self.color.draw_line(
                    (from.x.round() as i32, from.y.round() as i32),
                    (to.x.round() as i32, to.y.round() as i32),
                    color,
                );
            }
        }
    }
}

pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render `mesh` as seen by `camera`. Returns `None`, drawing nothing,
    /// when there is no mesh or the viewport has no pixels.
    pub fn render(&self, mesh: Option<&Mesh>, camera: &CameraState, viewport: Viewport) -> Option<Frame> {
        let mesh = mesh?;
        if viewport.is_empty() {
            return None;
        }

        let mut triangles = self.transform_mesh(mesh, camera, viewport);
        sort_by_depth(&mut triangles);

        let mut color = ColorBuffer::new(viewport, self.config.background);
        let mut depth = DepthBuffer::new(viewport);
        let written: usize = triangles
            .iter()
            .map(|triangle| rasterize_triangle(triangle, &mut color, &mut depth))
            .sum();

        let edges = if camera.show_edges {
            edge_segments(&triangles)
        } else {
            Vec::new()
        };

        trace!(
            "Rendered {} triangles, {} pixel writes, {} edges",
            triangles.len(),
            written,
            edges.len()
        );
        Some(Frame { color, depth, edges })
    }

    /// Transform, project and shade every face, in mesh order.
    ///
    /// Faces whose indices fall outside the vertex list are skipped.
    pub fn transform_mesh(&self, mesh: &Mesh, camera: &CameraState, viewport: Viewport) -> Vec<TransformedTriangle> {
        let vertices = mesh.vertices();
        let width = viewport.width as f32;
        let height = viewport.height as f32;

        mesh.faces()
            .iter()
            .enumerate()
            .filter_map(|(i, face)| {
                let corners = [
                    *vertices.get(face.a)?,
                    *vertices.get(face.b)?,
                    *vertices.get(face.c)?,
                ];
                let world = corners.map(|v| {
                    translate(rotate_xy(v, camera.yaw, camera.pitch), self.config.camera_offset)
                });
                let screen = world.map(|w| project_perspective(w, camera.zoom, width, height));

                Some(TransformedTriangle {
                    world,
                    screen,
                    intensity: self.intensity(&world),
                    color: mesh.face_color(i),
                })
            })
            .collect()
    }

    /// Flat Lambert term over the ambient floor; no back-face culling.
    pub fn intensity(&self, world: &[Vec3; 3]) -> f32 {
        let normal = normalize((world[1] - world[0]).cross(&(world[2] - world[0])));
        let light = normalize(self.config.light_dir);
        let lambert = normal.dot(&light).clamp(0.0, 1.0);
        self.config.ambient + self.config.diffuse * lambert
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

/// Stable sort, farthest average depth first.
pub fn sort_by_depth(triangles: &mut [TransformedTriangle]) {
    triangles.sort_by(|a, b| b.average_depth().total_cmp(&a.average_depth()));
}

/// Twice the signed screen-space area; zero for colinear points.
fn barycentric_denominator(p: &[Vec2; 3]) -> f32 {
    (p[1].y - p[2].y) * (p[0].x - p[2].x) + (p[2].x - p[1].x) * (p[0].y - p[2].y)
}

fn barycentric(p: &[Vec2; 3], denom: f32, px: f32, py: f32) -> (f32, f32, f32) {
    let w0 = ((p[1].y - p[2].y) * (px - p[2].x) + (p[2].x - p[1].x) * (py - p[2].y)) / denom;
    let w1 = ((p[2].y - p[0].y) * (px - p[2].x) + (p[0].x - p[2].x) * (py - p[2].y)) / denom;
    (w0, w1, 1.0 - w0 - w1)
}

/// Scan-convert one triangle into the buffers. Returns the number of
/// pixels that passed the depth test.
///
/// Zero-area projections, and projections with non-finite coordinates
/// (a vertex on the camera plane), write nothing.
pub fn rasterize_triangle(triangle: &TransformedTriangle, color: &mut ColorBuffer, depth: &mut DepthBuffer) -> usize {
    let p = &triangle.screen;
    if color.width() == 0 || color.height() == 0 {
        return 0;
    }
    if !p.iter().all(|v| v.x.is_finite() && v.y.is_finite()) {
        return 0;
    }

    let denom = barycentric_denominator(p);
    if denom == 0.0 {
        return 0;
    }

    // Bounding box, clipped to the viewport
    let min_x = p[0].x.min(p[1].x).min(p[2].x).floor().max(0.0);
    let max_x = p[0].x.max(p[1].x).max(p[2].x).ceil().min((color.width() - 1) as f32);
    let min_y = p[0].y.min(p[1].y).min(p[2].y).floor().max(0.0);
    let max_y = p[0].y.max(p[1].y).max(p[2].y).ceil().min((color.height() - 1) as f32);
    if min_x > max_x || min_y > max_y {
        return 0;
    }

    let shaded = triangle.shaded_color();
    let [z0, z1, z2] = triangle.world.map(|w| w.z);
    let mut written = 0;

    for y in min_y as usize..=max_y as usize {
        for x in min_x as usize..=max_x as usize {
            let (w0, w1, w2) = barycentric(p, denom, x as f32 + 0.5, y as f32 + 0.5);
            if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                continue;
            }

            let z = w0 * z0 + w1 * z1 + w2 * z2;
            if depth.test_and_set(x, y, z) {
                color.set(x, y, shaded);
                written += 1;
            }
        }
    }

    written
}

/// Three screen-space edges per triangle, in the given order.
pub fn edge_segments(triangles: &[TransformedTriangle]) -> Vec<EdgeSegment> {
    triangles
        .iter()
        .flat_map(|t| {
            let [a, b, c] = t.screen;
            [
                EdgeSegment { from: a, to: b },
                EdgeSegment { from: b, to: c },
                EdgeSegment { from: c, to: a },
            ]
        })
        .collect()
}

/// Liang-Barsky clip of a segment against `[0, width-1] x [0, height-1]`.
fn clip_segment(from: Vec2, to: Vec2, width: f32, height: f32) -> Option<(Vec2, Vec2)> {
    if !from.iter().chain(to.iter()).all(|c| c.is_finite()) {
        return None;
    }

    let d = to - from;
    let mut t0 = 0.0_f32;
    let mut t1 = 1.0_f32;
    let bounds = [
        (-d.x, from.x),
        (d.x, width - 1.0 - from.x),
        (-d.y, from.y),
        (d.y, height - 1.0 - from.y),
    ];

    for (p, q) in bounds {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else if r < t0 {
            return None;
        } else {
            t1 = t1.min(r);
        }
    }

    Some((from + d * t0, from + d * t1))
}
