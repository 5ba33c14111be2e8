/// Mesh assembly: normal synthesis and index-keyed vertex welding
use std::path::Path;

use hashbrown::HashMap;
use nalgebra::Vector3;
use tracing::debug;

use crate::error::{Attribute, Error, MeshError};
use crate::geometry::{Mesh, Vertex};
use crate::linalg::vec3;
use crate::obj::{self, FaceCorner, RawGeometry, RawTriangle};

/// Identity of an output vertex. Two corners weld only when all three
/// resolved indices agree; float values are never compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexKey {
    pub position: usize,
    pub texcoord: Option<usize>,
    pub normal: usize,
}

/// Map a 1-based or negative OBJ index onto `0..len`.
pub fn resolve_index(index: i64, len: usize) -> Option<usize> {
    let resolved = if index < 0 {
        len as i64 + index
    } else {
        index - 1
    };
    (0..len as i64).contains(&resolved).then_some(resolved as usize)
}

fn resolve(line: usize, attribute: Attribute, index: i64, len: usize) -> Result<usize, MeshError> {
    resolve_index(index, len).ok_or(MeshError::IndexOutOfRange {
        line,
        attribute,
        index,
        len,
    })
}

fn resolve_positions(triangle: &RawTriangle, len: usize) -> Result<[usize; 3], MeshError> {
    let mut out = [0; 3];
    for (slot, corner) in out.iter_mut().zip(&triangle.corners) {
        *slot = resolve(triangle.line, Attribute::Position, corner.position, len)?;
    }
    Ok(out)
}

/// Compute smooth per-position normals from face normals.
///
/// Every position must be referenced by at least one non-degenerate face.
pub fn synthesize_normals(
    positions: &[Vector3<f32>],
    triangles: &[RawTriangle],
) -> Result<Vec<Vector3<f32>>, MeshError> {
    let mut accum = vec![Vector3::zeros(); positions.len()];
    let mut referenced = vec![false; positions.len()];

    for triangle in triangles {
        let [i0, i1, i2] = resolve_positions(triangle, positions.len())?;
        let (p0, p1, p2) = (positions[i0], positions[i1], positions[i2]);

        let face = vec3::cross(&(p1 - p0), &(p2 - p0))
            .and_then(|n| vec3::normalize(&n))
            .map_err(|source| MeshError::DegenerateFace {
                line: triangle.line,
                source,
            })?;

        for i in [i0, i1, i2] {
            accum[i] = vec3::add(&accum[i], &face).map_err(|source| MeshError::DegenerateFace {
                line: triangle.line,
                source,
            })?;
            referenced[i] = true;
        }
    }

    if let Some(index) = referenced.iter().position(|used| !used) {
        return Err(MeshError::UnreferencedPosition { index });
    }

    accum
        .iter()
        .enumerate()
        .map(|(index, n)| vec3::normalize(n).map_err(|source| MeshError::ZeroNormal { index, source }))
        .collect()
}

/// Weld raw geometry into an interleaved vertex buffer and index buffer.
///
/// Corners without an explicit normal use their position index as the
/// normal index. Synthesized normals are indexed by position, so this always
/// holds when the source had no `vn` records.
pub fn build_mesh(raw: &RawGeometry) -> Result<Mesh, MeshError> {
    if raw.positions.is_empty() || raw.triangles.is_empty() {
        return Err(MeshError::Empty {
            positions: raw.positions.len(),
            triangles: raw.triangles.len(),
        });
    }

    let synthesized;
    let normals: &[Vector3<f32>] = if raw.normals.is_empty() {
        synthesized = synthesize_normals(&raw.positions, &raw.triangles)?;
        &synthesized
    } else {
        &raw.normals
    };

    let mut vertices = Vec::new();
    let mut indices = Vec::with_capacity(raw.triangles.len() * 3);
    let mut welded: HashMap<VertexKey, u32> = HashMap::new();

    for triangle in &raw.triangles {
        for corner in &triangle.corners {
            let key = vertex_key(triangle.line, corner, raw, normals.len())?;

            let index = match welded.get(&key) {
                Some(&index) => index,
                None => {
                    let texcoord = key.texcoord.map_or([0.0, 0.0], |t| raw.texcoords[t]);
                    vertices.push(Vertex::new(raw.positions[key.position], normals[key.normal], texcoord));

                    let index = (vertices.len() - 1) as u32;
                    welded.insert(key, index);
                    index
                }
            };
            indices.push(index);
        }
    }

    debug!(
        positions = raw.positions.len(),
        triangles = raw.triangles.len(),
        vertices = vertices.len(),
        synthesized_normals = raw.normals.is_empty(),
        "built mesh"
    );

    Ok(Mesh {
        vertices,
        indices,
        center: raw.bounds.center(),
        radius: raw.bounds.radius(),
    })
}

fn vertex_key(line: usize, corner: &FaceCorner, raw: &RawGeometry, normal_count: usize) -> Result<VertexKey, MeshError> {
    let position = resolve(line, Attribute::Position, corner.position, raw.positions.len())?;

    let texcoord = match corner.texcoord {
        0 => None,
        t => Some(resolve(line, Attribute::Texcoord, t, raw.texcoords.len())?),
    };

    let normal = match corner.normal {
        0 => {
            if position >= normal_count {
                return Err(MeshError::IndexOutOfRange {
                    line,
                    attribute: Attribute::Normal,
                    index: corner.position,
                    len: normal_count,
                });
            }
            position
        }
        n => resolve(line, Attribute::Normal, n, normal_count)?,
    };

    Ok(VertexKey {
        position,
        texcoord,
        normal,
    })
}

impl Mesh {
    /// Parse and build a mesh from OBJ text.
    pub fn from_obj_str(source: &str) -> Result<Self, MeshError> {
        let raw = obj::parse_obj(source)?;
        build_mesh(&raw)
    }

    /// Read and build a mesh from an OBJ file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_obj_str(&source)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, LinalgError};

    const QUAD: &str = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";

    #[test]
    fn test_resolve_index() {
        assert_eq!(resolve_index(1, 3), Some(0));
        assert_eq!(resolve_index(3, 3), Some(2));
        assert_eq!(resolve_index(-1, 3), Some(2));
        assert_eq!(resolve_index(-3, 3), Some(0));
        assert_eq!(resolve_index(4, 3), None);
        assert_eq!(resolve_index(-4, 3), None);
        assert_eq!(resolve_index(0, 3), None);
    }

    #[test]
    fn test_quad_synthesized_normals() {
        let mesh = Mesh::from_obj_str(QUAD).unwrap();

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
        for vertex in &mesh.vertices {
            assert_eq!(vertex.normal, [0.0, 0.0, 1.0]);
            assert_eq!(vertex.texcoord, [0.0, 0.0]);
        }
        assert_eq!(mesh.center, Vector3::new(0.5, 0.5, 0.0));
        assert!((mesh.radius - 2f32.sqrt() / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_smooth_normals_average_faces() {
        // Two faces meeting at a right angle along the x axis
        let mesh = Mesh::from_obj_str(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 0 0 1\nf 1 2 3\nf 1 4 2\n",
        )
        .unwrap();

        let shared = mesh.vertices[0].normal;
        let expected = 1.0 / 2f32.sqrt();
        assert!((shared[1] - expected).abs() < 1e-6);
        assert!((shared[2] - expected).abs() < 1e-6);
    }

    #[test]
    fn test_negative_indices() {
        let relative = Mesh::from_obj_str("v 0 0 0\nv 1 0 0\nv 1 1 0\nf -3 -2 -1\n").unwrap();
        let absolute = Mesh::from_obj_str("v 0 0 0\nv 1 0 0\nv 1 1 0\nf 1 2 3\n").unwrap();
        assert_eq!(relative, absolute);
    }

    #[test]
    fn test_texcoords_split_vertices() {
        let err = Mesh::from_obj_str(
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nvt 0 0\nvt 1 0\nvt 1 1\nvt 0.5 0.5\n\
             f 1/1 2/2 3/3\nf 1/4 3/3 2/2\n",
        )
        .unwrap_err();
        // Second face flips winding so normals cancel on every position
        assert!(matches!(err, MeshError::ZeroNormal { index: 0, .. }));

        let mesh = Mesh::from_obj_str(
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nvn 0 0 1\nvt 0 0\nvt 1 0\nvt 1 1\nvt 0.5 0.5\n\
             f 1/1/1 2/2/1 3/3/1\nf 1/4/1 2/2/1 3/3/1\n",
        )
        .unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 3, 1, 2]);
        assert_eq!(mesh.vertices[3].texcoord, [0.5, 0.5]);
    }

    #[test]
    fn test_missing_normal_falls_back_to_position_index() {
        let mesh = Mesh::from_obj_str(
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nvn 1 0 0\nvn 0 1 0\nvn 0 0 1\nf 1 2 3//1\n",
        )
        .unwrap();

        assert_eq!(mesh.vertices[0].normal, [1.0, 0.0, 0.0]);
        assert_eq!(mesh.vertices[1].normal, [0.0, 1.0, 0.0]);
        assert_eq!(mesh.vertices[2].normal, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_fallback_normal_out_of_range() {
        let err = Mesh::from_obj_str("v 0 0 0\nv 1 0 0\nv 1 1 0\nvn 0 0 1\nf 1 2 3\n").unwrap_err();
        assert!(matches!(
            err,
            MeshError::IndexOutOfRange {
                attribute: Attribute::Normal,
                ..
            }
        ));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_index_out_of_range() {
        let err = Mesh::from_obj_str("v 0 0 0\nv 1 0 0\nv 1 1 0\nf 1 2 9\n").unwrap_err();
        assert!(matches!(
            err,
            MeshError::IndexOutOfRange {
                line: 4,
                attribute: Attribute::Position,
                index: 9,
                len: 3,
            }
        ));

        let err = Mesh::from_obj_str("v 0 0 0\nv 1 0 0\nv 1 1 0\nvt 0 0\nf 1/2 2/1 3/1\n").unwrap_err();
        assert!(matches!(
            err,
            MeshError::IndexOutOfRange {
                attribute: Attribute::Texcoord,
                ..
            }
        ));
    }

    #[test]
    fn test_degenerate_triangle_is_domain_error() {
        let err = Mesh::from_obj_str("v 0 0 0\nv 0 0 0\nv 0 0 0\nf 1 2 3\n").unwrap_err();
        assert!(matches!(
            err,
            MeshError::DegenerateFace {
                line: 4,
                source: LinalgError::Domain { .. },
            }
        ));
        assert_eq!(err.kind(), ErrorKind::Domain);
    }

    #[test]
    fn test_unreferenced_position_rejected() {
        let err = Mesh::from_obj_str("v 0 0 0\nv 1 0 0\nv 1 1 0\nv 5 5 5\nf 1 2 3\n").unwrap_err();
        assert_eq!(err, MeshError::UnreferencedPosition { index: 3 });
    }

    #[test]
    fn test_unreferenced_position_allowed_with_explicit_normals() {
        let mesh = Mesh::from_obj_str("v 0 0 0\nv 1 0 0\nv 1 1 0\nv 5 5 5\nvn 0 0 1\nf 1//1 2//1 3//1\n").unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        // Bounds still cover every parsed position
        assert_eq!(mesh.center, Vector3::new(2.5, 2.5, 2.5));
    }

    #[test]
    fn test_empty_mesh() {
        assert_eq!(
            Mesh::from_obj_str("").unwrap_err(),
            MeshError::Empty {
                positions: 0,
                triangles: 0
            }
        );
        assert_eq!(
            Mesh::from_obj_str("v 0 0 0\nv 1 0 0\n").unwrap_err(),
            MeshError::Empty {
                positions: 2,
                triangles: 0
            }
        );
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = Mesh::load("/definitely/not/here.obj").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
