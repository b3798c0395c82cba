/// Mesh store: indexed triangles, materials and the file loaders that fill them
use log::{debug, info, warn};
use std::fs;
use std::path::Path;

use crate::error::{LoadError, LoadResult};
use crate::framebuffer::Rgb;
use crate::mtl::parse_mtl;
use crate::obj::{parse_obj, ObjGeometry};
use crate::transform::Vec3;

/// A triangle referencing three vertices and, optionally, a material
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub a: usize,
    pub b: usize,
    pub c: usize,
    pub material: Option<usize>,
}

impl Face {
    pub fn new(a: usize, b: usize, c: usize, material: Option<usize>) -> Self {
        Self { a, b, c, material }
    }

    pub fn indices(&self) -> [usize; 3] {
        [self.a, self.b, self.c]
    }
}

/// A named diffuse color
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub diffuse: [f32; 3],
}

impl Material {
    pub fn new(name: impl Into<String>, diffuse: [f32; 3]) -> Self {
        Self {
            name: name.into(),
            diffuse,
        }
    }
}

/// An indexed triangle mesh with an optional material table
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    vertices: Vec<Vec3>,
    faces: Vec<Face>,
    materials: Vec<Material>,
    has_material: bool,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a mesh from in-memory data. No normalization is applied;
    /// material data counts as present whenever `materials` is non-empty.
    pub fn from_parts(vertices: Vec<Vec3>, faces: Vec<Face>, materials: Vec<Material>) -> Self {
        let has_material = !materials.is_empty();
        Self {
            vertices,
            faces,
            materials,
            has_material,
        }
    }

    /// Load a geometry file, reading its material file first when given.
    ///
    /// A material file that is missing or carries no colors is reported and
    /// otherwise ignored: every face then renders white.
    pub fn load(obj_path: impl AsRef<Path>, mtl_path: Option<&Path>) -> LoadResult<Self> {
        let mut mesh = Self::new();

        match mtl_path {
            Some(path) => match mesh.load_materials(path) {
                Ok(true) => {}
                Ok(false) => warn!(
                    "{} has no diffuse colors, rendering in white",
                    path.display()
                ),
                Err(e) => warn!("{e}, rendering in white"),
            },
            None => info!("No material file, rendering in white"),
        }

        mesh.load_geometry(obj_path)?;
        Ok(mesh)
    }

    /// Replace the material table from an MTL file.
    ///
    /// Returns whether the file carried usable material data. Face material
    /// indices are resolved at geometry load time, so materials should be
    /// loaded first.
    pub fn load_materials(&mut self, path: impl AsRef<Path>) -> LoadResult<bool> {
        let path = path.as_ref();
        let source = read_source(path)?;
        let library = parse_mtl(&source);

        self.has_material = library.has_material_data();
        self.materials = library.materials;
        info!(
            "Loaded {} materials from {}",
            self.materials.len(),
            path.display()
        );
        Ok(self.has_material)
    }

    /// Replace vertices and faces from an OBJ file and normalize them.
    pub fn load_geometry(&mut self, path: impl AsRef<Path>) -> LoadResult<()> {
        let path = path.as_ref();
        let source = read_source(path)?;
        let geometry = parse_obj(&source, &self.materials);
        self.replace_geometry(geometry, path)
    }

    fn replace_geometry(&mut self, mut geometry: ObjGeometry, path: &Path) -> LoadResult<()> {
        let vertex_count = geometry.vertices.len();
        let parsed = geometry.faces.len();
        geometry
            .faces
            .retain(|face| face.indices().iter().all(|&i| i < vertex_count));
        if geometry.faces.len() < parsed {
            warn!(
                "Dropped {} faces referencing missing vertices in {}",
                parsed - geometry.faces.len(),
                path.display()
            );
        }

        if geometry.vertices.is_empty() || geometry.faces.is_empty() {
            return Err(LoadError::EmptyGeometry {
                path: path.to_path_buf(),
                vertices: geometry.vertices.len(),
                faces: geometry.faces.len(),
            });
        }

        self.vertices = geometry.vertices;
        self.faces = geometry.faces;
        normalize_vertices(&mut self.vertices);
        info!(
            "Loaded {} vertices and {} triangles from {}",
            self.vertices.len(),
            self.faces.len(),
            path.display()
        );
        Ok(())
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn has_material(&self) -> bool {
        self.has_material
    }

    /// Base color of a face: its material's diffuse color, or white when
    /// there is nothing valid to resolve.
    pub fn face_color(&self, face_index: usize) -> Rgb {
        if !self.has_material {
            return Rgb::WHITE;
        }
        self.faces
            .get(face_index)
            .and_then(|face| face.material)
            .and_then(|material| self.materials.get(material))
            .map(|material| Rgb::from_diffuse(material.diffuse))
            .unwrap_or(Rgb::WHITE)
    }

    /// Create a cube centered at the origin, two triangles per side
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let vertices = vec![
            Vec3::new(-h, -h, -h),
            Vec3::new(h, -h, -h),
            Vec3::new(h, h, -h),
            Vec3::new(-h, h, -h),
            Vec3::new(-h, -h, h),
            Vec3::new(h, -h, h),
            Vec3::new(h, h, h),
            Vec3::new(-h, h, h),
        ];
        let quads = [
            [4, 5, 6, 7], // front
            [1, 0, 3, 2], // back
            [3, 7, 6, 2], // top
            [0, 1, 5, 4], // bottom
            [5, 1, 2, 6], // right
            [0, 4, 7, 3], // left
        ];
        let faces = quads
            .iter()
            .flat_map(|q| [Face::new(q[0], q[1], q[2], None), Face::new(q[0], q[2], q[3], None)])
            .collect();

        Self::from_parts(vertices, faces, Vec::new())
    }
}

fn read_source(path: &Path) -> LoadResult<String> {
    let bytes = fs::read(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Component-wise (min, max) over all vertices
pub fn bounding_box(vertices: &[Vec3]) -> Option<(Vec3, Vec3)> {
    let first = *vertices.first()?;
    Some(
        vertices
            .iter()
            .fold((first, first), |(min, max), v| (min.inf(v), max.sup(v))),
    )
}

/// Center on the origin and scale so the longest axis spans exactly 2.
///
/// Empty or degenerate (zero-extent) vertex sets are left untouched.
pub fn normalize_vertices(vertices: &mut [Vec3]) {
    let Some((min, max)) = bounding_box(vertices) else {
        return;
    };
    let center = (min + max) * 0.5;
    let extent = (max - min).max();
    if extent <= 0.0 {
        return;
    }

    let scale = 2.0 / extent;
    for v in vertices.iter_mut() {
        *v = (*v - center) * scale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_geometry(faces: Vec<Face>) -> ObjGeometry {
        ObjGeometry {
            vertices: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(4.0, 0.0, 0.0),
                Vec3::new(0.0, 2.0, 1.0),
            ],
            faces,
        }
    }

    #[test]
    fn test_normalization_spans_two_and_centers() {
        let mut vertices = vec![
            Vec3::new(10.0, 5.0, -3.0),
            Vec3::new(14.0, 6.0, -1.0),
            Vec3::new(12.0, 7.0, -2.0),
        ];
        normalize_vertices(&mut vertices);

        let (min, max) = bounding_box(&vertices).unwrap();
        assert!(((max - min).max() - 2.0).abs() < 1e-6);
        assert!((min + max).norm() < 1e-6);
        // Shorter axes keep their proportion
        assert!(((max.y - min.y) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalization_degenerate_is_noop() {
        let mut vertices = vec![Vec3::new(1.0, 2.0, 3.0); 4];
        normalize_vertices(&mut vertices);
        assert!(vertices.iter().all(|v| *v == Vec3::new(1.0, 2.0, 3.0)));

        let mut empty: Vec<Vec3> = Vec::new();
        normalize_vertices(&mut empty);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_replace_geometry_normalizes_once() {
        let mut mesh = Mesh::new();
        mesh.replace_geometry(triangle_geometry(vec![Face::new(0, 1, 2, None)]), Path::new("t.obj"))
            .unwrap();

        let first = mesh.vertices().to_vec();
        let second = mesh.vertices().to_vec();
        assert_eq!(first, second);
        assert_eq!(first[1], Vec3::new(1.0, -0.5, -0.25));
    }

    #[test]
    fn test_empty_faces_fail_without_mutation() {
        let mut mesh = Mesh::cube(2.0);
        let before = mesh.vertices().to_vec();

        let err = mesh
            .replace_geometry(triangle_geometry(Vec::new()), Path::new("t.obj"))
            .unwrap_err();
        assert!(matches!(err, LoadError::EmptyGeometry { vertices: 3, faces: 0, .. }));
        assert_eq!(mesh.vertices(), before.as_slice());
        assert_eq!(mesh.faces().len(), 12);
    }

    #[test]
    fn test_out_of_range_faces_are_dropped() {
        let mut mesh = Mesh::new();
        let faces = vec![Face::new(0, 1, 2, None), Face::new(0, 1, 9, None)];
        mesh.replace_geometry(triangle_geometry(faces), Path::new("t.obj")).unwrap();
        assert_eq!(mesh.faces(), &[Face::new(0, 1, 2, None)]);

        let err = mesh
            .replace_geometry(triangle_geometry(vec![Face::new(3, 4, 5, None)]), Path::new("t.obj"))
            .unwrap_err();
        assert!(matches!(err, LoadError::EmptyGeometry { faces: 0, .. }));
    }

    #[test]
    fn test_missing_file_leaves_mesh_untouched() {
        let mut mesh = Mesh::cube(2.0);
        let err = mesh.load_geometry("/nonexistent/polyview/model.obj").unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
        assert_eq!(mesh.faces().len(), 12);

        let err = mesh.load_materials("/nonexistent/polyview/model.mtl").unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
        assert!(!mesh.has_material());
    }

    #[test]
    fn test_face_color_resolution() {
        let vertices = vec![Vec3::zeros(); 3];
        let faces = vec![
            Face::new(0, 1, 2, Some(0)),
            Face::new(0, 1, 2, None),
            Face::new(0, 1, 2, Some(7)),
        ];
        let materials = vec![Material::new("Bark", [1.0, 0.5, 0.0])];
        let mesh = Mesh::from_parts(vertices.clone(), faces.clone(), materials);

        assert_eq!(mesh.face_color(0), Rgb::new(255, 127, 0));
        assert_eq!(mesh.face_color(1), Rgb::WHITE);
        assert_eq!(mesh.face_color(2), Rgb::WHITE);
        assert_eq!(mesh.face_color(99), Rgb::WHITE);

        let plain = Mesh::from_parts(vertices, faces, Vec::new());
        assert!(!plain.has_material());
        assert_eq!(plain.face_color(0), Rgb::WHITE);
    }

    #[test]
    fn test_cube() {
        let cube = Mesh::cube(2.0);
        assert_eq!(cube.vertices().len(), 8);
        assert_eq!(cube.faces().len(), 12);
        let (min, max) = bounding_box(cube.vertices()).unwrap();
        assert_eq!(min, Vec3::new(-1.0, -1.0, -1.0));
        assert_eq!(max, Vec3::new(1.0, 1.0, 1.0));
    }
}
