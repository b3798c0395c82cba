/// polyview core - mesh loading and fixed-function software rendering
///
/// This library holds everything with real rendering semantics: OBJ/MTL
/// parsing, mesh normalization, vector math, and the rasterization pipeline
/// that turns a mesh plus camera state into a color buffer.

pub mod error;
pub mod framebuffer;
pub mod geometry;
pub mod mtl;
pub mod obj;
pub mod projection;
pub mod raster;
pub mod transform;

// Re-export commonly used types
pub use error::{LoadError, LoadResult};
pub use framebuffer::{ColorBuffer, DepthBuffer, Rgb};
pub use geometry::{Face, Material, Mesh};
pub use projection::{project_perspective, Viewport};
pub use raster::{EdgeSegment, Frame, RenderConfig, Renderer, TransformedTriangle};
pub use transform::{normalize, rotate_xy, translate, CameraState, Vec2, Vec3};
