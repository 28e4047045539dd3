/// Homogeneous frustum clipping (Sutherland–Hodgman)
///
/// Triangles are clipped in clip space, before the perspective divide, against
/// the canonical volume `-w <= x, y, z <= w`. The clipped polygon is fanned
/// back into triangles from its first vertex.
use log::trace;
use nalgebra::Vector4;

use crate::interpolate::{vertex_at, ClipVertex};

/// Fast rejection test: true when `v` lies outside the canonical volume on
/// any axis. Triangles whose three vertices all pass skip clipping.
pub fn is_outside_frustum(v: &Vector4<f32>) -> bool {
    let (x, y, z, w) = (v.x, v.y, v.z, v.w);
    x < -w || x > w || y < -w || y > w || z < -w || z > w
}

/// A clip plane in homogeneous space, given by a point on it and a normal
/// pointing into the kept half-space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub origin: Vector4<f32>,
    pub normal: Vector4<f32>,
}

impl Plane {
    pub fn new(origin: Vector4<f32>, normal: Vector4<f32>) -> Self {
        Self { origin, normal }
    }

    /// True when `v` is strictly in front of the plane
    pub fn is_inside(&self, v: &Vector4<f32>) -> bool {
        (v - self.origin).dot(&self.normal) > 0.0
    }

    /// Point where the segment `a -> b` meets the plane. Only meaningful when
    /// the segment crosses it.
    pub fn intersection(&self, a: &Vector4<f32>, b: &Vector4<f32>) -> Vector4<f32> {
        let u = b - a;
        let w = a - self.origin;
        let d = self.normal.dot(&u);
        let n = -self.normal.dot(&w);
        a + u * (n / d)
    }
}

/// The six planes of the canonical volume, in clipping order:
/// right, left, bottom, top, far, near.
pub fn frustum_planes() -> [Plane; 6] {
    [
        Plane::new(Vector4::new(1.0, 0.0, 0.0, 1.0), Vector4::new(-1.0, 0.0, 0.0, 1.0)),
        Plane::new(Vector4::new(-1.0, 0.0, 0.0, 1.0), Vector4::new(1.0, 0.0, 0.0, 1.0)),
        Plane::new(Vector4::new(0.0, 1.0, 0.0, 1.0), Vector4::new(0.0, -1.0, 0.0, 1.0)),
        Plane::new(Vector4::new(0.0, -1.0, 0.0, 1.0), Vector4::new(0.0, 1.0, 0.0, 1.0)),
        Plane::new(Vector4::new(0.0, 0.0, 1.0, 1.0), Vector4::new(0.0, 0.0, -1.0, 1.0)),
        Plane::new(Vector4::new(0.0, 0.0, -1.0, 1.0), Vector4::new(0.0, 0.0, 1.0, 1.0)),
    ]
}

/// Index triples fanning an `n`-gon from vertex 0
pub fn fan_triangles(n: usize) -> impl Iterator<Item = [usize; 3]> {
    (2..n.max(2)).map(|i| [0, i - 1, i])
}

/// Polygon clipper with reusable scratch buffers
#[derive(Debug, Clone)]
pub struct Clipper {
    planes: [Plane; 6],
    input: Vec<Vector4<f32>>,
    output: Vec<Vector4<f32>>,
    vertices: Vec<ClipVertex>,
}

impl Clipper {
    pub fn new() -> Self {
        Self::with_planes(frustum_planes())
    }

    pub fn with_planes(planes: [Plane; 6]) -> Self {
        Self {
            planes,
            // A triangle gains at most one vertex per plane
            input: Vec::with_capacity(9),
            output: Vec::with_capacity(9),
            vertices: Vec::with_capacity(9),
        }
    }

    /// Clip the triangle `(a, b, c)` and return the resulting polygon: empty
    /// when nothing survives, otherwise at least three points.
    pub fn clip(
        &mut self,
        a: &Vector4<f32>,
        b: &Vector4<f32>,
        c: &Vector4<f32>,
    ) -> &[Vector4<f32>] {
        self.run(a, b, c);
        &self.output
    }

    /// Clip `tri`, rebuild attributes for every polygon vertex and append the
    /// fanned triangles to `out`. Returns the number of triangles appended,
    /// or `None` when the triangle is degenerate and was dropped.
    pub fn clip_triangle(
        &mut self,
        tri: &[ClipVertex; 3],
        out: &mut Vec<[ClipVertex; 3]>,
    ) -> Option<usize> {
        self.run(&tri[0].position, &tri[1].position, &tri[2].position);

        self.vertices.clear();
        for point in &self.output {
            match vertex_at(tri, point) {
                Some(vertex) => self.vertices.push(vertex),
                None => {
                    trace!("dropping clipped triangle with degenerate clip-space corners");
                    return None;
                }
            }
        }

        let before = out.len();
        for [i, j, k] in fan_triangles(self.vertices.len()) {
            out.push([self.vertices[i], self.vertices[j], self.vertices[k]]);
        }
        Some(out.len() - before)
    }

    fn run(&mut self, a: &Vector4<f32>, b: &Vector4<f32>, c: &Vector4<f32>) {
        self.output.clear();
        self.output.extend_from_slice(&[*a, *b, *c]);

        for plane in &self.planes {
            std::mem::swap(&mut self.input, &mut self.output);
            self.output.clear();
            if self.input.is_empty() {
                return;
            }

            let mut s = self.input[self.input.len() - 1];
            for &e in &self.input {
                if plane.is_inside(&e) {
                    if !plane.is_inside(&s) {
                        self.output.push(plane.intersection(&s, &e));
                    }
                    self.output.push(e);
                } else if plane.is_inside(&s) {
                    self.output.push(plane.intersection(&s, &e));
                }
                s = e;
            }
        }
    }
}

impl Default for Clipper {
    fn default() -> Self {
        Self::new()
    }
}
