/// Immutable indexed triangle meshes
use nalgebra::{Point3, Vector2, Vector3, Vector4};

use crate::error::{IndexKind, MeshError};

/// Straight (non-premultiplied) RGBA color, each channel in `[0, 1]`
pub type Rgba = Vector4<f32>;

/// Opaque white, the color carried by textured triangles
pub fn white() -> Rgba {
    Vector4::new(1.0, 1.0, 1.0, 1.0)
}

/// How a triangle is colored
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Surface {
    /// Indices into the mesh's texture coordinates, parallel to the position indices
    Textured([u32; 3]),
    /// One color for the whole triangle
    Flat(Rgba),
}

/// A triangle face: three position indices plus its surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub positions: [u32; 3],
    pub surface: Surface,
}

impl Triangle {
    pub fn textured(positions: [u32; 3], texcoords: [u32; 3]) -> Self {
        Self {
            positions,
            surface: Surface::Textured(texcoords),
        }
    }

    pub fn flat(positions: [u32; 3], color: Rgba) -> Self {
        Self {
            positions,
            surface: Surface::Flat(color),
        }
    }
}

/// A static triangle mesh. Indices are validated on construction, so every
/// index in `triangles` is in range for the stream it points into.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    points: Vec<Point3<f32>>,
    texcoords: Vec<Vector2<f32>>,
    triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new(
        points: Vec<Point3<f32>>,
        texcoords: Vec<Vector2<f32>>,
        triangles: Vec<Triangle>,
    ) -> Result<Self, MeshError> {
        for (t, triangle) in triangles.iter().enumerate() {
            check_indices(t, IndexKind::Position, &triangle.positions, points.len())?;
            if let Surface::Textured(texture) = &triangle.surface {
                check_indices(t, IndexKind::Texcoord, texture, texcoords.len())?;
            }
        }

        Ok(Self {
            points,
            texcoords,
            triangles,
        })
    }

    pub fn points(&self) -> &[Point3<f32>] {
        &self.points
    }

    pub fn texcoords(&self) -> &[Vector2<f32>] {
        &self.texcoords
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// True when at least one triangle samples a texture
    pub fn is_textured(&self) -> bool {
        self.triangles
            .iter()
            .any(|t| matches!(t.surface, Surface::Textured(_)))
    }

    /// Axis-aligned bounds of the points, or `None` for an empty mesh
    pub fn bounds(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let first = *self.points.first()?;
        Some(self.points.iter().fold((first, first), |(lo, hi), p| {
            (lo.inf(p), hi.sup(p))
        }))
    }

    /// Replace every triangle's surface with a flat color chosen by `palette`,
    /// called with the triangle index.
    pub fn with_flat_colors<F: FnMut(usize) -> Rgba>(mut self, mut palette: F) -> Self {
        for (i, triangle) in self.triangles.iter_mut().enumerate() {
            triangle.surface = Surface::Flat(palette(i));
        }
        self
    }

    /// Swap the winding of every triangle. Meshes authored with
    /// counter-clockwise front faces (the OBJ convention) need this before
    /// they face the camera on a y-down target.
    pub fn with_reversed_winding(mut self) -> Self {
        for triangle in &mut self.triangles {
            triangle.positions.swap(1, 2);
            if let Surface::Textured(texture) = &mut triangle.surface {
                texture.swap(1, 2);
            }
        }
        self
    }

    /// Unit normal of a triangle from its local-space positions, following the
    /// right-hand rule on its winding. `None` for a zero-area triangle.
    pub fn face_normal(&self, triangle: usize) -> Option<Vector3<f32>> {
        let [a, b, c] = self.triangles[triangle].positions;
        let v0 = self.points[a as usize];
        let v1 = self.points[b as usize];
        let v2 = self.points[c as usize];

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1.cross(&edge2).try_normalize(f32::EPSILON)
    }

    /// Create a flat-colored cube centered on the origin. Faces wind
    /// clockwise when seen from outside, so they are front-facing.
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let points = vec![
            Point3::new(-h, -h, -h),
            Point3::new(h, -h, -h),
            Point3::new(h, h, -h),
            Point3::new(-h, h, -h),
            Point3::new(-h, -h, h),
            Point3::new(h, -h, h),
            Point3::new(h, h, h),
            Point3::new(-h, h, h),
        ];

        let faces: [([u32; 3], [u32; 3], Rgba); 6] = [
            // Front
            ([4, 5, 6], [4, 6, 7], Vector4::new(0.9, 0.2, 0.2, 1.0)),
            // Back
            ([0, 3, 2], [0, 2, 1], Vector4::new(0.2, 0.9, 0.2, 1.0)),
            // Top
            ([3, 7, 6], [3, 6, 2], Vector4::new(0.2, 0.2, 0.9, 1.0)),
            // Bottom
            ([0, 1, 5], [0, 5, 4], Vector4::new(0.9, 0.9, 0.2, 1.0)),
            // Right
            ([1, 2, 6], [1, 6, 5], Vector4::new(0.2, 0.9, 0.9, 1.0)),
            // Left
            ([0, 4, 7], [0, 7, 3], Vector4::new(0.9, 0.2, 0.9, 1.0)),
        ];

        let mut triangles = Vec::with_capacity(12);
        for (first, second, color) in faces {
            triangles.push(Triangle::flat(first, color));
            triangles.push(Triangle::flat(second, color));
        }

        // Listed counter-clockwise from outside
        Self {
            points,
            texcoords: Vec::new(),
            triangles,
        }
        .with_reversed_winding()
    }
}

fn check_indices(
    triangle: usize,
    kind: IndexKind,
    indices: &[u32; 3],
    len: usize,
) -> Result<(), MeshError> {
    match indices.iter().find(|&&i| i as usize >= len) {
        Some(&index) => Err(MeshError::IndexOutOfRange {
            triangle,
            kind,
            index,
            len,
        }),
        None => Ok(()),
    }
}
