/// Clip-space vertices and barycentric attribute interpolation
///
/// Vertices synthesized by the clipper get their attributes from the original
/// triangle. Weights are computed against the pre-divide clip-space `xyz`
/// positions and applied before the perspective divide; interpolating after
/// the divide would not be perspective correct.
use nalgebra::{Vector2, Vector3, Vector4};

use crate::geometry::Rgba;

/// A vertex in homogeneous clip space with its interpolated attributes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipVertex {
    pub position: Vector4<f32>,
    pub texcoord: Vector2<f32>,
    pub color: Rgba,
}

impl ClipVertex {
    pub fn new(position: Vector4<f32>, texcoord: Vector2<f32>, color: Rgba) -> Self {
        Self {
            position,
            texcoord,
            color,
        }
    }
}

/// Barycentric coordinates `(u, v, w)` of `p` with respect to the triangle
/// `(a, b, c)`, projected onto the triangle's plane.
///
/// Returns `None` when the triangle is degenerate (collinear or coincident
/// corners), since no weights exist.
pub fn barycentric(
    a: &Vector3<f32>,
    b: &Vector3<f32>,
    c: &Vector3<f32>,
    p: &Vector3<f32>,
) -> Option<Vector3<f32>> {
    let v0 = b - a;
    let v1 = c - a;
    let v2 = p - a;

    let d00 = v0.dot(&v0);
    let d01 = v0.dot(&v1);
    let d11 = v1.dot(&v1);
    let d20 = v2.dot(&v0);
    let d21 = v2.dot(&v1);

    let denom = d00 * d11 - d01 * d01;
    if denom == 0.0 || !denom.is_finite() {
        return None;
    }

    let v = (d11 * d20 - d01 * d21) / denom;
    let w = (d00 * d21 - d01 * d20) / denom;
    let u = 1.0 - v - w;

    Some(Vector3::new(u, v, w))
}

/// Blend three vertices as `u*a + v*b + w*c` over every attribute
pub fn interpolate(tri: &[ClipVertex; 3], weights: &Vector3<f32>) -> ClipVertex {
    let (u, v, w) = (weights.x, weights.y, weights.z);
    ClipVertex {
        position: tri[0].position * u + tri[1].position * v + tri[2].position * w,
        texcoord: tri[0].texcoord * u + tri[1].texcoord * v + tri[2].texcoord * w,
        color: tri[0].color * u + tri[1].color * v + tri[2].color * w,
    }
}

/// Rebuild a full vertex for a clip-generated position on `tri`
pub fn vertex_at(tri: &[ClipVertex; 3], point: &Vector4<f32>) -> Option<ClipVertex> {
    let weights = barycentric(
        &tri[0].position.xyz(),
        &tri[1].position.xyz(),
        &tri[2].position.xyz(),
        &point.xyz(),
    )?;
    Some(interpolate(tri, &weights))
}
