/// Wavefront OBJ reader for the subset the pipeline consumes
///
/// Supported records: `v`, `vt` and `f` (triangles or convex polygons, with
/// or without texture indices). Normals, grouping and material records are
/// skipped.
/// Face indices are 1-based in the file and 0-based in the returned mesh.
use log::info;
use nom::{
    bytes::complete::take_till1,
    character::complete::{char, digit1, space1},
    combinator::{map_res, opt},
    multi::many1,
    number::complete::float,
    sequence::{preceded, tuple},
    IResult,
};
use nalgebra::{Point3, Vector2};

use crate::error::MeshError;
use crate::geometry::{white, Mesh, Triangle};

/// One face corner as written in the file (1-based)
#[derive(Debug, Clone, Copy, PartialEq)]
struct Corner {
    position: u32,
    texcoord: Option<u32>,
}

/// Parse OBJ text into a validated mesh
pub fn parse_obj(input: &str) -> Result<Mesh, MeshError> {
    let mut points = Vec::new();
    let mut texcoords = Vec::new();
    let mut triangles = Vec::new();

    for (n, raw) in input.lines().enumerate() {
        let line = n + 1;
        let text = raw.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        let (rest, keyword) =
            keyword(text).map_err(|_| MeshError::Parse { line, record: "line" })?;

        match keyword {
            "o" | "s" | "l" | "g" | "vn" | "mtllib" | "usemtl" => {}
            "v" => points.push(record(line, "v", position, rest)?),
            "vt" => texcoords.push(record(line, "vt", texcoord, rest)?),
            "f" => {
                let corners = record(line, "f", face, rest)?;
                push_face(line, &corners, &mut triangles)?;
            }
            other => {
                return Err(MeshError::UnknownRecord {
                    line,
                    keyword: other.to_string(),
                })
            }
        }
    }

    let mesh = Mesh::new(points, texcoords, triangles)?;
    info!(
        "loaded OBJ mesh: {} points, {} texcoords, {} triangles",
        mesh.points().len(),
        mesh.texcoords().len(),
        mesh.triangles().len()
    );
    Ok(mesh)
}

/// Run a record parser over the remainder of a line; trailing text is an error
fn record<'a, T>(
    line: usize,
    name: &'static str,
    parser: fn(&'a str) -> IResult<&'a str, T>,
    input: &'a str,
) -> Result<T, MeshError> {
    match parser(input) {
        Ok((rest, value)) if rest.trim().is_empty() => Ok(value),
        _ => Err(MeshError::Parse { line, record: name }),
    }
}

fn push_face(
    line: usize,
    corners: &[Corner],
    triangles: &mut Vec<Triangle>,
) -> Result<(), MeshError> {
    if corners.len() < 3 {
        return Err(MeshError::Parse { line, record: "f" });
    }

    let mut positions = Vec::with_capacity(corners.len());
    let mut textures = Vec::with_capacity(corners.len());
    for corner in corners {
        positions.push(zero_based(line, corner.position)?);
        if let Some(t) = corner.texcoord {
            textures.push(zero_based(line, t)?);
        }
    }

    let textured = match textures.len() {
        0 => false,
        n if n == corners.len() => true,
        // Some corners have texture indices and some don't
        _ => return Err(MeshError::Parse { line, record: "f" }),
    };

    // Fan out polygons from the first corner
    for i in 2..positions.len() {
        let p = [positions[0], positions[i - 1], positions[i]];
        let triangle = if textured {
            Triangle::textured(p, [textures[0], textures[i - 1], textures[i]])
        } else {
            Triangle::flat(p, white())
        };
        triangles.push(triangle);
    }

    Ok(())
}

fn zero_based(line: usize, index: u32) -> Result<u32, MeshError> {
    index.checked_sub(1).ok_or(MeshError::ZeroIndex { line })
}

fn keyword(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c.is_whitespace())(input)
}

fn position(input: &str) -> IResult<&str, Point3<f32>> {
    let (input, (x, y, z)) = tuple((field, field, field))(input)?;
    // Optional homogeneous weight
    let (input, _) = opt(field)(input)?;
    Ok((input, Point3::new(x, y, z)))
}

fn texcoord(input: &str) -> IResult<&str, Vector2<f32>> {
    let (input, (s, t)) = tuple((field, field))(input)?;
    // Optional depth component for 3D textures
    let (input, _) = opt(field)(input)?;
    Ok((input, Vector2::new(s, t)))
}

fn face(input: &str) -> IResult<&str, Vec<Corner>> {
    many1(preceded(space1, corner))(input)
}

/// `v`, `v/vt`, `v/vt/vn` or `v//vn`
fn corner(input: &str) -> IResult<&str, Corner> {
    let (input, position) = index(input)?;
    let (input, texcoord) = opt(preceded(char('/'), opt(index)))(input)?;
    let (input, _normal) = opt(preceded(char('/'), index))(input)?;
    Ok((
        input,
        Corner {
            position,
            texcoord: texcoord.flatten(),
        },
    ))
}

fn index(input: &str) -> IResult<&str, u32> {
    map_res(digit1, |digits: &str| digits.parse::<u32>())(input)
}

fn field(input: &str) -> IResult<&str, f32> {
    preceded(space1, float)(input)
}
