/// Wavefront OBJ loader for pre-triangulated meshes with vertex normals
use nom::{
    character::complete::{char, i64 as index, space0, space1},
    combinator::{all_consuming, opt},
    number::complete::float,
    sequence::{preceded, tuple},
    IResult,
};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use nalgebra::Vector3;

use crate::error::{Error, Result};
use crate::geometry::{Mesh, Triangle, VertexAttributes};

/// One `p/t/n` group of a face record, indices as written in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceRef {
    pub position: i64,
    pub texture: Option<i64>,
    pub normal: Option<i64>,
}

/// Resolve a 1-based or negative (relative to the end) OBJ index against a
/// list holding `count` entries. Returns the 1-based index, or `None` when
/// it falls outside the list.
pub fn resolve_index(raw: i64, count: usize) -> Option<usize> {
    let count = count as i64;
    let resolved = if raw < 0 { count + raw + 1 } else { raw };
    if resolved >= 1 && resolved <= count {
        Some(resolved as usize)
    } else {
        None
    }
}

fn parse_vector3(input: &str) -> IResult<&str, Vector3<f32>> {
    let (input, (_, x, _, y, _, z)) = tuple((space0, float, space1, float, space1, float))(input)?;
    Ok((input, Vector3::new(x, y, z)))
}

fn parse_face_ref(input: &str) -> IResult<&str, FaceRef> {
    let (input, position) = index(input)?;
    let (input, texture) = opt(preceded(char('/'), opt(index)))(input)?;
    let (input, normal) = match texture {
        Some(_) => opt(preceded(char('/'), index))(input)?,
        None => (input, None),
    };
    Ok((
        input,
        FaceRef {
            position,
            texture: texture.flatten(),
            normal,
        },
    ))
}

/// Incremental loader: positions and normals accumulate as lines are fed,
/// faces are assembled into triangles immediately.
#[derive(Debug, Default)]
pub struct MeshLoader {
    positions: Vec<Vector3<f32>>,
    normals: Vec<Vector3<f32>>,
    mesh: Mesh,
}

impl MeshLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a mesh from an OBJ file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Mesh> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::FileNotFound {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loading mesh '{}'", path.display());

        let mesh = Self::from_reader(BufReader::new(file))?;
        log::info!("Loaded {} triangles from '{}'", mesh.len(), path.display());
        Ok(mesh)
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Mesh> {
        let mut loader = Self::new();
        for (i, line) in reader.lines().enumerate() {
            loader.feed_line(i + 1, &line?)?;
        }
        Ok(loader.finish())
    }

    pub fn parse_str(source: &str) -> Result<Mesh> {
        Self::from_reader(source.as_bytes())
    }

    /// Process a single line of OBJ text; `line_no` is 1-based and only used in errors.
    pub fn feed_line(&mut self, line_no: usize, line: &str) -> Result<()> {
        let line = line.trim();
        let (keyword, rest) = match line.split_once(|c: char| c.is_whitespace()) {
            Some((keyword, rest)) => (keyword, rest),
            None => (line, ""),
        };

        match keyword {
            "v" => {
                let position = Self::record_vector(line_no, rest)?;
                self.positions.push(position);
            }
            "vn" => {
                let normal = Self::record_vector(line_no, rest)?;
                self.normals.push(normal);
            }
            "f" => {
                let triangle = self.face(line_no, rest)?;
                self.mesh.add_triangle(triangle);
            }
            _ => {}
        }
        Ok(())
    }

    pub fn finish(self) -> Mesh {
        self.mesh
    }

    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    pub fn normal_count(&self) -> usize {
        self.normals.len()
    }

    fn record_vector(line_no: usize, rest: &str) -> Result<Vector3<f32>> {
        parse_vector3(rest)
            .map(|(_, v)| v)
            .map_err(|e| Error::MalformedRecord {
                line: line_no,
                reason: format!("expected three numbers: {:?}", e),
            })
    }

    fn face(&self, line_no: usize, rest: &str) -> Result<Triangle> {
        let malformed = |reason: String| Error::MalformedFace { line: line_no, reason };

        let tokens: Vec<&str> = rest.split_whitespace().collect();
        if tokens.len() != 3 {
            return Err(malformed(format!(
                "expected 3 vertex references, found {}",
                tokens.len()
            )));
        }

        let mut vertices = [VertexAttributes::new(Vector3::zeros(), Vector3::z()); 3];
        for (vertex, token) in vertices.iter_mut().zip(tokens) {
            let (_, face_ref) = all_consuming(parse_face_ref)(token)
                .map_err(|_| malformed(format!("invalid vertex reference '{}'", token)))?;

            let p = resolve_index(face_ref.position, self.positions.len())
                .ok_or_else(|| malformed(format!("position index {} out of range", face_ref.position)))?;
            let raw_normal = face_ref
                .normal
                .ok_or_else(|| malformed(format!("vertex reference '{}' has no normal", token)))?;
            let n = resolve_index(raw_normal, self.normals.len())
                .ok_or_else(|| malformed(format!("normal index {} out of range", raw_normal)))?;

            *vertex = VertexAttributes::new(self.positions[p - 1], self.normals[n - 1]);
        }

        Ok(Triangle::new(vertices[0], vertices[1], vertices[2]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TRIANGLE: &str = "\
# single triangle
v 0 0 -5
v 1 0 -5
v 0 1 -5
vt 0.5 0.5
vn 0 0 2
f 1/1/1 2/1/1 3/1/1
";

    #[test]
    fn test_resolve_relative_index() {
        assert_eq!(resolve_index(-1, 5), Some(5));
        assert_eq!(resolve_index(-5, 5), Some(1));
        assert_eq!(resolve_index(3, 5), Some(3));
        assert_eq!(resolve_index(0, 5), None);
        assert_eq!(resolve_index(6, 5), None);
        assert_eq!(resolve_index(-6, 5), None);
    }

    #[test]
    fn test_parse_face_refs() {
        let full = parse_face_ref("3/2/1").unwrap().1;
        assert_eq!(full, FaceRef { position: 3, texture: Some(2), normal: Some(1) });

        let no_texture = parse_face_ref("4//-2").unwrap().1;
        assert_eq!(no_texture, FaceRef { position: 4, texture: None, normal: Some(-2) });

        let bare = parse_face_ref("-1").unwrap().1;
        assert_eq!(bare, FaceRef { position: -1, texture: None, normal: None });
    }

    #[test]
    fn test_parse_single_triangle() {
        let mesh = MeshLoader::parse_str(TRIANGLE).unwrap();
        assert_eq!(mesh.len(), 1);

        let t = &mesh.triangles[0];
        assert_relative_eq!(t.vertices[1].position.x, 1.0);
        assert_relative_eq!(t.vertices[2].position.z, -5.0);
        assert_eq!(t.vertices[0].position.w, 1.0);
    }

    #[test]
    fn test_normals_are_unit_length() {
        let source = "\
v 0 0 0
v 1 0 0
v 0 1 0
vn 3 4 0
vn 0 0 7
vn 1 1 1
f 1//1 2//2 3//3
";
        let mesh = MeshLoader::parse_str(source).unwrap();
        for v in mesh.vertices() {
            assert!((v.normal.norm() - 1.0).abs() < 1e-5);
            assert_eq!(v.normal.w, 0.0);
        }
    }

    #[test]
    fn test_negative_indices_are_relative_to_parsed_so_far() {
        let source = "\
v 1 0 0
v 2 0 0
v 3 0 0
v 4 0 0
v 5 0 0
vn 0 0 1
f -1//-1 -2//-1 -3//-1
v 6 0 0
f -1//1 1//1 2//1
";
        let mesh = MeshLoader::parse_str(source).unwrap();
        assert_eq!(mesh.len(), 2);
        assert_relative_eq!(mesh.triangles[0].vertices[0].position.x, 5.0);
        assert_relative_eq!(mesh.triangles[0].vertices[2].position.x, 3.0);
        assert_relative_eq!(mesh.triangles[1].vertices[0].position.x, 6.0);
    }

    #[test]
    fn test_unknown_lines_are_ignored() {
        let source = "o thing\ng group\nusemtl red\ns off\n\n".to_string() + TRIANGLE;
        let mesh = MeshLoader::parse_str(&source).unwrap();
        assert_eq!(mesh.len(), 1);
    }

    #[test]
    fn test_quad_face_is_rejected() {
        let source = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1 4//1\n";
        match MeshLoader::parse_str(source) {
            Err(Error::MalformedFace { line, .. }) => assert_eq!(line, 6),
            other => panic!("expected MalformedFace, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_index_is_rejected() {
        let source = "v 0 0 0\nvn 0 0 1\nf 1//1 2//1 3//1\n";
        assert!(matches!(
            MeshLoader::parse_str(source),
            Err(Error::MalformedFace { line: 3, .. })
        ));
    }

    #[test]
    fn test_missing_normal_is_rejected() {
        let source = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        assert!(matches!(
            MeshLoader::parse_str(source),
            Err(Error::MalformedFace { .. })
        ));
    }

    #[test]
    fn test_malformed_vertex_record() {
        assert!(matches!(
            MeshLoader::parse_str("v 1.0 abc 2.0\n"),
            Err(Error::MalformedRecord { line: 1, .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join("rast3d-definitely-missing.obj");
        match MeshLoader::load(&path) {
            Err(Error::FileNotFound { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected FileNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_load_from_disk() {
        let path = std::env::temp_dir().join(format!("rast3d-load-{}.obj", std::process::id()));
        std::fs::write(&path, TRIANGLE).unwrap();
        let mesh = MeshLoader::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(mesh.len(), 1);
    }
}
