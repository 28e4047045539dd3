/// Flat vertex and index buffers for the external triangle rasterizer
use bytemuck::{Pod, Zeroable};

use crate::screen::{ScreenTriangle, ScreenVertex};

/// Pixel dimensions of the bound texture. Texture coordinates in `[0, 1]` are
/// scaled by this into source pixels. Untextured draws use a 1x1 white texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureSize {
    pub width: u32,
    pub height: u32,
}

impl TextureSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for TextureSize {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

/// One output vertex: destination pixel, source texel and a color multiplier
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct DrawVertex {
    pub dst_x: f32,
    pub dst_y: f32,
    pub src_x: f32,
    pub src_y: f32,
    pub color_r: f32,
    pub color_g: f32,
    pub color_b: f32,
    pub color_a: f32,
}

impl DrawVertex {
    fn from_screen(vertex: &ScreenVertex, texture: TextureSize) -> Self {
        Self {
            dst_x: vertex.position.x,
            dst_y: vertex.position.y,
            src_x: vertex.texcoord.x * texture.width as f32,
            src_y: vertex.texcoord.y * texture.height as f32,
            color_r: vertex.color.x,
            color_g: vertex.color.y,
            color_b: vertex.color.z,
            color_a: vertex.color.w,
        }
    }
}

/// Vertex and index arrays for one frame. Each triangle owns three vertices
/// and three consecutive indices; nothing is shared between triangles.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub vertices: Vec<DrawVertex>,
    pub indices: Vec<u32>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(triangles: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(triangles * 3),
            indices: Vec::with_capacity(triangles * 3),
        }
    }

    pub fn push_triangle(&mut self, triangle: &ScreenTriangle, texture: TextureSize) {
        let first = self.indices.len() as u32;
        self.vertices.extend(
            triangle
                .vertices
                .iter()
                .map(|v| DrawVertex::from_screen(v, texture)),
        );
        self.indices.extend_from_slice(&[first, first + 1, first + 2]);
    }

    /// Append every triangle in draw order
    pub fn assemble(&mut self, triangles: &[ScreenTriangle], texture: TextureSize) {
        self.vertices.reserve(triangles.len() * 3);
        self.indices.reserve(triangles.len() * 3);
        for triangle in triangles {
            self.push_triangle(triangle, texture);
        }
    }

    /// Drop the contents, keeping the allocations for the next frame
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Vertex array as raw bytes, for uploading to a graphics API
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}
