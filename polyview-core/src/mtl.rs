/// Wavefront MTL material parser (`newmtl` and `Kd` only)
use log::debug;

use crate::geometry::Material;
use crate::obj::vector3;

/// Materials parsed from one MTL source
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialLibrary {
    pub materials: Vec<Material>,
    /// At least one `Kd` line parsed inside a material record
    pub found_color: bool,
}

impl MaterialLibrary {
    pub fn has_material_data(&self) -> bool {
        self.found_color && !self.materials.is_empty()
    }
}

#[derive(Default)]
struct MtlState {
    library: MaterialLibrary,
    open: Option<Material>,
}

impl MtlState {
    fn line(mut self, (number, line): (usize, &str)) -> Self {
        if line.starts_with("newmtl") {
            self.flush();
            let name = line.split_whitespace().nth(1).unwrap_or("");
            self.open = Some(Material::new(name, [1.0, 1.0, 1.0]));
        } else if line.len() > 2 && line.starts_with("Kd") {
            if let Some(material) = self.open.as_mut() {
                match vector3(&line[2..]) {
                    Ok((_, (r, g, b))) => {
                        material.diffuse = [r, g, b];
                        self.library.found_color = true;
                    }
                    Err(_) => debug!("line {}: skipping malformed Kd", number + 1),
                }
            }
        }
        self
    }

    fn flush(&mut self) {
        if let Some(material) = self.open.take() {
            self.library.materials.push(material);
        }
    }

    fn finish(mut self) -> MaterialLibrary {
        self.flush();
        self.library
    }
}

/// Parse MTL text into a material table.
pub fn parse_mtl(input: &str) -> MaterialLibrary {
    input
        .lines()
        .enumerate()
        .fold(MtlState::default(), MtlState::line)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_materials() {
        let source = "# tree\nnewmtl Bark\nNs 10\nKd 0.4 0.25 0.1\n\nnewmtl Leaves\nKd 0.1 0.6 0.2\n";
        let library = parse_mtl(source);
        assert!(library.has_material_data());
        assert_eq!(library.materials.len(), 2);
        assert_eq!(library.materials[0].name, "Bark");
        assert_eq!(library.materials[0].diffuse, [0.4, 0.25, 0.1]);
        assert_eq!(library.materials[1].name, "Leaves");
        assert_eq!(library.materials[1].diffuse, [0.1, 0.6, 0.2]);
    }

    #[test]
    fn test_material_without_color_keeps_white() {
        let library = parse_mtl("newmtl Plain\nnewmtl Red\nKd 1 0 0\n");
        assert_eq!(library.materials[0].diffuse, [1.0, 1.0, 1.0]);
        assert_eq!(library.materials[1].diffuse, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_kd_outside_record_is_ignored() {
        let library = parse_mtl("Kd 1 0 0\n");
        assert!(library.materials.is_empty());
        assert!(!library.found_color);
        assert!(!library.has_material_data());
    }

    #[test]
    fn test_records_without_colors_are_not_material_data() {
        let library = parse_mtl("newmtl A\nnewmtl B\nKd oops\n");
        assert_eq!(library.materials.len(), 2);
        assert!(!library.has_material_data());
    }

    #[test]
    fn test_last_kd_wins() {
        let library = parse_mtl("newmtl A\nKd 1 0 0\nKd 0 0 1\n");
        assert_eq!(library.materials[0].diffuse, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_mtl(""), MaterialLibrary::default());
    }
}
