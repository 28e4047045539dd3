/// Perspective divide, back-face culling and viewport mapping
use nalgebra::{Vector2, Vector3};

use crate::geometry::Rgba;
use crate::interpolate::ClipVertex;
use crate::projection::Context;

/// A vertex after the viewport transform: pixel `x, y` and depth `z` in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenVertex {
    pub position: Vector3<f32>,
    pub texcoord: Vector2<f32>,
    pub color: Rgba,
}

/// A front-facing triangle ready for sorting and assembly
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenTriangle {
    pub vertices: [ScreenVertex; 3],
    /// Mean of the three mapped depths
    pub depth: f32,
}

impl ScreenTriangle {
    pub fn new(vertices: [ScreenVertex; 3]) -> Self {
        let depth = vertices.iter().map(|v| v.position.z).sum::<f32>() / 3.0;
        Self { vertices, depth }
    }
}

/// Twice the signed area of `(a, b, c)` in the XY plane. Positive means
/// clockwise on a y-down target, which the pipeline treats as front-facing.
pub fn signed_area(a: &Vector3<f32>, b: &Vector3<f32>, c: &Vector3<f32>) -> f32 {
    (b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)
}

/// Divide, cull and map one clip-space triangle.
///
/// Back-facing and degenerate triangles return `None`: a signed area that is
/// zero, negative or NaN (from a degenerate clip) never reaches the screen.
pub fn project_triangle(ctx: &Context, tri: &[ClipVertex; 3]) -> Option<ScreenTriangle> {
    let ndc = [
        ctx.clip_to_ndc(&tri[0].position),
        ctx.clip_to_ndc(&tri[1].position),
        ctx.clip_to_ndc(&tri[2].position),
    ];

    let area = signed_area(&ndc[0], &ndc[1], &ndc[2]);
    if !(area > 0.0) {
        return None;
    }

    Some(ScreenTriangle::new(map_to_screen(ctx, tri, &ndc)))
}

/// Viewport-map a triangle without culling it
pub fn map_to_screen(
    ctx: &Context,
    tri: &[ClipVertex; 3],
    ndc: &[Vector3<f32>; 3],
) -> [ScreenVertex; 3] {
    let map = |i: usize| ScreenVertex {
        position: ctx.ndc_to_screen(&ndc[i]),
        texcoord: tri[i].texcoord,
        color: tri[i].color,
    };
    [map(0), map(1), map(2)]
}
