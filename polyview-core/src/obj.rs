/// Wavefront OBJ geometry parser
///
/// Only `v`, `f` and `usemtl` lines are understood; everything else is
/// ignored. Malformed lines and tokens are skipped rather than failing the
/// whole file.
use log::debug;
use nom::{
    character::complete::{i64 as signed_integer, multispace0},
    number::complete::float,
    sequence::preceded,
    IResult,
};

use crate::geometry::{Face, Material};
use crate::transform::Vec3;

/// Vertex and face lists produced by [`parse_obj`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjGeometry {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<Face>,
}

/// Three whitespace-separated floats; anything after the third is left unparsed.
pub(crate) fn vector3(input: &str) -> IResult<&str, (f32, f32, f32)> {
    let (input, x) = preceded(multispace0, float)(input)?;
    let (input, y) = preceded(multispace0, float)(input)?;
    let (input, z) = preceded(multispace0, float)(input)?;
    Ok((input, (x, y, z)))
}

/// Leading integer of a face token, read from the text before the first `/`.
fn leading_integer(token: &str) -> Option<i64> {
    let head = token.split_once('/').map_or(token, |(head, _)| head);
    if head.is_empty() {
        return None;
    }
    let (_, index) = signed_integer::<_, nom::error::Error<&str>>(head).ok()?;
    Some(index)
}

fn zero_based(index: i64) -> Option<usize> {
    usize::try_from(index.checked_sub(1)?).ok()
}

/// Resolve a face token such as `12/3/4` to a 0-based vertex index.
///
/// Only the text before the first `/` matters. Tokens without a leading
/// integer, and indices that would fall below zero, yield `None`.
pub fn parse_index(token: &str) -> Option<usize> {
    zero_based(leading_integer(token)?)
}

/// 0-based indices of a face line's tokens.
///
/// Tokens without a leading integer are skipped. Any index below 1 rejects
/// the whole face.
pub fn face_indices(tokens: &str) -> Option<Vec<usize>> {
    tokens
        .split_whitespace()
        .filter_map(leading_integer)
        .map(zero_based)
        .collect()
}

/// Split an n-gon into n-2 triangles sharing its first index.
pub fn fan_triangulate(indices: &[usize], material: Option<usize>) -> Vec<Face> {
    if indices.len() < 3 {
        return Vec::new();
    }
    indices[1..]
        .windows(2)
        .map(|pair| Face::new(indices[0], pair[0], pair[1], material))
        .collect()
}

/// Accumulator threaded through the line fold.
struct ObjState<'a> {
    materials: &'a [Material],
    current_material: Option<usize>,
    geometry: ObjGeometry,
}

impl<'a> ObjState<'a> {
    fn new(materials: &'a [Material]) -> Self {
        Self {
            materials,
            current_material: None,
            geometry: ObjGeometry::default(),
        }
    }

    fn line(mut self, (number, line): (usize, &str)) -> Self {
        if line.len() < 2 {
            return self;
        }

        if let Some(rest) = line.strip_prefix("v ") {
            match vector3(rest) {
                Ok((_, (x, y, z))) => self.geometry.vertices.push(Vec3::new(x, y, z)),
                Err(_) => debug!("line {}: skipping malformed vertex", number + 1),
            }
        } else if let Some(rest) = line.strip_prefix("f ") {
            match face_indices(rest) {
                Some(indices) => {
                    if indices.len() < 3 {
                        debug!("line {}: face has fewer than 3 usable indices", number + 1);
                    }
                    self.geometry
                        .faces
                        .extend(fan_triangulate(&indices, self.current_material));
                }
                None => debug!("line {}: skipping face with an index below 1", number + 1),
            }
        } else if line.starts_with("usemtl") {
            let name = line.split_whitespace().nth(1).unwrap_or("");
            self.current_material = self.materials.iter().position(|m| m.name == name);
            if self.current_material.is_none() {
                debug!("line {}: unknown material {:?}", number + 1, name);
            }
        }

        self
    }
}

/// Parse OBJ text, resolving `usemtl` names against `materials`.
pub fn parse_obj(input: &str, materials: &[Material]) -> ObjGeometry {
    input
        .lines()
        .enumerate()
        .fold(ObjState::new(materials), ObjState::line)
        .geometry
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn material(name: &str) -> Material {
        Material::new(name, [0.5, 0.5, 0.5])
    }

    #[rstest]
    #[case("12/3/4", Some(11))]
    #[case("7", Some(6))]
    #[case("1//2", Some(0))]
    #[case("3abc", Some(2))]
    #[case("/5", None)]
    #[case("abc", None)]
    #[case("0", None)]
    #[case("-1", None)]
    fn test_parse_index(#[case] token: &str, #[case] expected: Option<usize>) {
        assert_eq!(parse_index(token), expected);
    }

    #[rstest]
    #[case("1 2 3", Some(vec![0, 1, 2]))]
    #[case("1/1 x 2//2 /9 3", Some(vec![0, 1, 2]))]
    #[case("0 1 2 3", None)]
    #[case("1 2 -1 3", None)]
    fn test_face_indices(#[case] tokens: &str, #[case] expected: Option<Vec<usize>>) {
        assert_eq!(face_indices(tokens), expected);
    }

    #[test]
    fn test_face_with_index_below_one_adds_nothing() {
        let source = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 0 1 2 3\nf 1 2 -1 3\nf 1 2 3\n";
        let geometry = parse_obj(source, &[]);
        // Only the last face survives, unshifted
        assert_eq!(geometry.faces, vec![Face::new(0, 1, 2, None)]);
    }

    #[test]
    fn test_fan_triangulation_of_pentagon() {
        let geometry = parse_obj("f 1 2 3 4 5\n", &[]);
        let triangles: Vec<_> = geometry.faces.iter().map(|f| (f.a, f.b, f.c)).collect();
        assert_eq!(triangles, vec![(0, 1, 2), (0, 2, 3), (0, 3, 4)]);
    }

    #[test]
    fn test_short_face_adds_nothing() {
        let geometry = parse_obj("f 1 2\nf 1 / 2\n", &[]);
        assert!(geometry.faces.is_empty());
    }

    #[test]
    fn test_vertices_and_faces() {
        let source = "# a triangle\nv 0 0 0\nv 1.5 0 0\nv 0 -2 0.25\nvn 0 0 1\nf 1/1/1 2/2/1 3/3/1\n";
        let geometry = parse_obj(source, &[]);
        assert_eq!(geometry.vertices.len(), 3);
        assert_eq!(geometry.vertices[2], Vec3::new(0.0, -2.0, 0.25));
        assert_eq!(geometry.faces, vec![Face::new(0, 1, 2, None)]);
    }

    #[test]
    fn test_malformed_vertex_is_skipped() {
        let geometry = parse_obj("v 1 2\nv 1 2 3\nv x y z\n", &[]);
        assert_eq!(geometry.vertices, vec![Vec3::new(1.0, 2.0, 3.0)]);
    }

    #[test]
    fn test_usemtl_resolves_by_name() {
        let materials = [material("Leaves"), material("Bark")];
        let source = "f 1 2 3\nusemtl Bark\nf 1 2 3\nusemtl Missing\nf 1 2 3\nusemtl Leaves\nf 1 2 3\n";
        let geometry = parse_obj(source, &materials);
        let assigned: Vec<_> = geometry.faces.iter().map(|f| f.material).collect();
        assert_eq!(assigned, vec![None, Some(1), None, Some(0)]);
    }

    #[test]
    fn test_duplicate_material_names_take_first() {
        let materials = [material("Bark"), material("Bark")];
        let geometry = parse_obj("usemtl Bark\nf 1 2 3\n", &materials);
        assert_eq!(geometry.faces[0].material, Some(0));
    }

    #[test]
    fn test_usemtl_without_name() {
        let materials = [material("")];
        let geometry = parse_obj("usemtl\nf 1 2 3\n", &materials);
        assert_eq!(geometry.faces[0].material, Some(0));
    }

    #[test]
    fn test_crlf_line_endings() {
        let geometry = parse_obj("v 0 0 0\r\nv 1 0 0\r\nv 0 1 0\r\nf 1 2 3\r\n", &[]);
        assert_eq!(geometry.vertices.len(), 3);
        assert_eq!(geometry.faces.len(), 1);
    }
}
