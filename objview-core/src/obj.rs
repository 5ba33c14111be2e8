/// Wavefront OBJ text parser
///
/// Collects positions, texcoords, normals and fan-triangulated faces into a
/// [`RawGeometry`]. Indices are kept exactly as written (1-based, negative
/// for relative-to-end, 0 for "absent") and resolved later by the builder.
use nalgebra::Vector3;
use nom::{
    character::complete::{char, i64},
    combinator::{all_consuming, opt},
    number::complete::float,
    sequence::{preceded, tuple},
    IResult,
};
use tracing::debug;

use crate::error::MeshError;
use crate::geometry::BoundingBox;

/// One `p[/t][/n]` face corner, as written in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceCorner {
    pub position: i64,
    /// 0 when absent.
    pub texcoord: i64,
    /// 0 when absent.
    pub normal: i64,
}

/// A triangle emitted by fan triangulation, tagged with its source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawTriangle {
    pub corners: [FaceCorner; 3],
    pub line: usize,
}

/// Parsed but not yet welded geometry
#[derive(Debug, Clone, Default)]
pub struct RawGeometry {
    pub positions: Vec<Vector3<f32>>,
    pub texcoords: Vec<[f32; 2]>,
    pub normals: Vec<Vector3<f32>>,
    pub triangles: Vec<RawTriangle>,
    pub bounds: BoundingBox,
}

/// Parse OBJ text. Unknown record kinds are skipped; malformed numbers in
/// `v`, `vt`, `vn` and `f` records are errors.
pub fn parse_obj(input: &str) -> Result<RawGeometry, MeshError> {
    let mut geometry = RawGeometry::default();
    let mut skipped = 0usize;

    for (i, line) in input.lines().enumerate() {
        let line_no = i + 1;
        let mut tokens = line.split_whitespace();
        let Some(kind) = tokens.next() else {
            continue;
        };

        match kind {
            "v" => {
                let [x, y, z] = parse_floats::<3>(line_no, "v", &mut tokens)?;
                let position = Vector3::new(x, y, z);
                geometry.bounds.include(&position);
                geometry.positions.push(position);
            }
            "vt" => {
                let uv = parse_floats::<2>(line_no, "vt", &mut tokens)?;
                geometry.texcoords.push(uv);
            }
            "vn" => {
                let [x, y, z] = parse_floats::<3>(line_no, "vn", &mut tokens)?;
                geometry.normals.push(Vector3::new(x, y, z));
            }
            "f" => {
                let corners = tokens
                    .map(|token| parse_corner(line_no, token))
                    .collect::<Result<Vec<_>, _>>()?;
                triangulate(line_no, &corners, &mut geometry.triangles)?;
            }
            _ => skipped += 1,
        }
    }

    debug!(
        positions = geometry.positions.len(),
        texcoords = geometry.texcoords.len(),
        normals = geometry.normals.len(),
        triangles = geometry.triangles.len(),
        skipped,
        "parsed OBJ source"
    );

    Ok(geometry)
}

/// Split a polygon into a fan around its first corner.
fn triangulate(line: usize, corners: &[FaceCorner], out: &mut Vec<RawTriangle>) -> Result<(), MeshError> {
    if corners.len() < 3 {
        return Err(MeshError::Parse {
            line,
            message: format!("face needs at least 3 corners, got {}", corners.len()),
        });
    }

    for i in 2..corners.len() {
        out.push(RawTriangle {
            corners: [corners[0], corners[i - 1], corners[i]],
            line,
        });
    }
    Ok(())
}

/// Read the first `N` tokens as finite floats. Extra tokens (such as the
/// optional `w` component) are ignored.
fn parse_floats<'a, const N: usize>(
    line: usize,
    record: &str,
    tokens: &mut impl Iterator<Item = &'a str>,
) -> Result<[f32; N], MeshError> {
    let mut out = [0.0; N];
    for (i, slot) in out.iter_mut().enumerate() {
        let token = tokens.next().ok_or_else(|| MeshError::Parse {
            line,
            message: format!("`{record}` record needs {N} components, got {i}"),
        })?;

        let value = match all_consuming(float::<&str, nom::error::Error<&str>>)(token) {
            Ok((_, value)) => value,
            Err(_) => {
                return Err(MeshError::Parse {
                    line,
                    message: format!("`{record}` component {i} is not a number: {token:?}"),
                })
            }
        };

        if !value.is_finite() {
            return Err(MeshError::Parse {
                line,
                message: format!("`{record}` component {i} is not finite: {token:?}"),
            });
        }
        *slot = value;
    }
    Ok(out)
}

fn corner(input: &str) -> IResult<&str, (i64, Option<Option<i64>>, Option<Option<i64>>)> {
    tuple((
        i64,
        opt(preceded(char('/'), opt(i64))),
        opt(preceded(char('/'), opt(i64))),
    ))(input)
}

fn parse_corner(line: usize, token: &str) -> Result<FaceCorner, MeshError> {
    let (_, (position, texcoord, normal)) = all_consuming(corner)(token).map_err(|_| MeshError::Parse {
        line,
        message: format!("malformed face corner {token:?}"),
    })?;

    if position == 0 {
        return Err(MeshError::Parse {
            line,
            message: format!("face corner {token:?} has no position index"),
        });
    }

    Ok(FaceCorner {
        position,
        texcoord: texcoord.flatten().unwrap_or(0),
        normal: normal.flatten().unwrap_or(0),
    })
}
