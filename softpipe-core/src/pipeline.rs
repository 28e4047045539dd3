/// One frame of the geometry pipeline
///
/// Mesh -> clip space -> (clip + interpolate) -> cull/map -> sort -> draw list.
/// The `Pipeline` owns every working buffer and reuses their allocations
/// from frame to frame.
use log::{debug, trace};
use nalgebra::{Vector2, Vector4};

use crate::clip::{is_outside_frustum, Clipper};
use crate::draw_list::{DrawList, TextureSize};
use crate::geometry::{white, Mesh, Surface};
use crate::interpolate::ClipVertex;
use crate::projection::Context;
use crate::screen::{project_triangle, ScreenTriangle};
use crate::sort::sort_back_to_front;
use crate::transform::to_clip_space;

/// Counters for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Triangles in the source mesh
    pub mesh_triangles: usize,
    /// Source triangles that went through the clipper
    pub clipped: usize,
    /// Candidate triangles discarded as back-facing or degenerate
    pub culled: usize,
    /// Triangles written to the draw list
    pub drawn: usize,
}

/// Reusable per-frame working state
#[derive(Debug, Default)]
pub struct Pipeline {
    clip_points: Vec<Vector4<f32>>,
    clipper: Clipper,
    clipped: Vec<[ClipVertex; 3]>,
    screen_triangles: Vec<ScreenTriangle>,
    draw_list: DrawList,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the pipeline and leave the result in the draw list.
    ///
    /// Every working buffer is cleared first, so results never leak between
    /// frames.
    pub fn draw(&mut self, mesh: &Mesh, ctx: &Context, texture: TextureSize) -> FrameStats {
        self.draw_list.clear();
        self.screen_triangles.clear();

        let mut stats = FrameStats {
            mesh_triangles: mesh.triangles().len(),
            ..FrameStats::default()
        };

        to_clip_space(mesh.points(), &ctx.projection_view(), &mut self.clip_points);

        for triangle in mesh.triangles() {
            let tri = self.clip_vertices(mesh, triangle.positions, &triangle.surface);

            if tri.iter().any(|v| is_outside_frustum(&v.position)) {
                stats.clipped += 1;
                self.clipped.clear();
                if self.clipper.clip_triangle(&tri, &mut self.clipped).is_none() {
                    stats.culled += 1;
                    continue;
                }
                for piece in &self.clipped {
                    match project_triangle(ctx, piece) {
                        Some(screen) => self.screen_triangles.push(screen),
                        None => stats.culled += 1,
                    }
                }
            } else {
                match project_triangle(ctx, &tri) {
                    Some(screen) => self.screen_triangles.push(screen),
                    None => stats.culled += 1,
                }
            }
        }

        sort_back_to_front(&mut self.screen_triangles);
        self.draw_list.assemble(&self.screen_triangles, texture);
        stats.drawn = self.draw_list.triangle_count();

        debug!(
            "frame: {} mesh triangles, {} clipped, {} culled, {} drawn",
            stats.mesh_triangles, stats.clipped, stats.culled, stats.drawn
        );
        stats
    }

    /// Draw a frame, hand the buffers to `submit` and clear them afterwards
    pub fn render_frame<F>(
        &mut self,
        mesh: &Mesh,
        ctx: &Context,
        texture: TextureSize,
        submit: F,
    ) -> FrameStats
    where
        F: FnOnce(&DrawList),
    {
        let stats = self.draw(mesh, ctx, texture);
        submit(&self.draw_list);
        self.draw_list.clear();
        trace!("draw list cleared, capacity {}", self.draw_list.vertices.capacity());
        stats
    }

    /// The draw list produced by the last call to `draw`
    pub fn draw_list(&self) -> &DrawList {
        &self.draw_list
    }

    /// Sorted screen triangles from the last call to `draw`
    pub fn screen_triangles(&self) -> &[ScreenTriangle] {
        &self.screen_triangles
    }

    fn clip_vertices(
        &self,
        mesh: &Mesh,
        positions: [u32; 3],
        surface: &Surface,
    ) -> [ClipVertex; 3] {
        let corner = |i: usize| {
            let position = self.clip_points[positions[i] as usize];
            match surface {
                Surface::Textured(texcoords) => ClipVertex::new(
                    position,
                    mesh.texcoords()[texcoords[i] as usize],
                    white(),
                ),
                Surface::Flat(color) => ClipVertex::new(position, Vector2::zeros(), *color),
            }
        };
        [corner(0), corner(1), corner(2)]
    }
}
