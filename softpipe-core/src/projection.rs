/// Per-frame projection context and viewport mapping
use nalgebra::{Matrix4, Point3, Vector3, Vector4};

use crate::camera::CameraState;
use crate::config::ProjectionConfig;

/// Pixel rectangle the pipeline maps normalized device coordinates onto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub half_width: u32,
    pub half_height: u32,
}

impl Viewport {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            half_width: width / 2,
            half_height: height / 2,
        }
    }

    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f32 / self.height as f32
    }
}

/// Mirror of the Y axis. Pixel rows grow downward, so projections are
/// followed by this to put NDC `+y` (world up) at row 0.
pub fn y_down() -> Matrix4<f32> {
    Matrix4::new_nonuniform_scaling(&Vector3::new(1.0, -1.0, 1.0))
}

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// Matrices and viewport for one frame. Built complete by its constructors;
/// a frame never sees a half-initialized context.
#[derive(Debug, Clone)]
pub struct Context {
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
    pub near: f32,
    pub far: f32,
    pub viewport: Viewport,
}

impl Context {
    /// Context with explicit matrices, used when the caller owns the camera math
    pub fn new(view: Matrix4<f32>, projection: Matrix4<f32>, viewport: Viewport) -> Self {
        Self {
            view,
            projection,
            // Canonical clip range until a projection is set
            near: -1.0,
            far: 1.0,
            viewport,
        }
    }

    /// Build the context for a frame rendered into a `width` x `height` target.
    /// Uses the camera's view matrix when it has one and the configured
    /// default look-at otherwise.
    pub fn for_frame(
        config: &ProjectionConfig,
        camera: &CameraState,
        width: u32,
        height: u32,
    ) -> Self {
        let viewport = Viewport::new(0, 0, width, height);
        let mut ctx = Self::new(Matrix4::identity(), Matrix4::identity(), viewport);
        let aspect = viewport.aspect() * config.pixel_aspect;

        match config.mode {
            ProjectionMode::Perspective => {
                ctx.set_perspective(config.fov_y, aspect, config.near, config.far)
            }
            ProjectionMode::Orthographic => {
                let half_height = config.ortho_half_height;
                let half_width = half_height * aspect;
                ctx.set_orthographic(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    config.near,
                    config.far,
                )
            }
        }

        match camera.view_matrix() {
            Some(view) => ctx.view = view,
            None => ctx.look_at(&config.default_eye, &config.default_target, &config.up),
        }

        ctx
    }

    pub fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.viewport = Viewport::new(x, y, width, height);
    }

    pub fn set_perspective(&mut self, fov_y: f32, aspect: f32, near: f32, far: f32) {
        self.projection = y_down() * Matrix4::new_perspective(aspect, fov_y, near, far);
        self.near = near;
        self.far = far;
    }

    pub fn set_orthographic(
        &mut self,
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) {
        self.projection =
            y_down() * Matrix4::new_orthographic(left, right, bottom, top, near, far);
        self.near = near;
        self.far = far;
    }

    pub fn look_at(&mut self, eye: &Point3<f32>, target: &Point3<f32>, up: &Vector3<f32>) {
        self.view = Matrix4::look_at_rh(eye, target, up);
    }

    /// Combined `projection * view` matrix taking world space to clip space
    pub fn projection_view(&self) -> Matrix4<f32> {
        self.projection * self.view
    }

    /// Perspective divide
    pub fn clip_to_ndc(&self, clip: &Vector4<f32>) -> Vector3<f32> {
        let inv_w = 1.0 / clip.w;
        Vector3::new(clip.x * inv_w, clip.y * inv_w, clip.z * inv_w)
    }

    /// Map NDC to pixels; depth is remapped from `[-1, 1]` to `[0, 1]`
    pub fn ndc_to_screen(&self, ndc: &Vector3<f32>) -> Vector3<f32> {
        let hw = self.viewport.half_width as f32;
        let hh = self.viewport.half_height as f32;
        Vector3::new(hw * ndc.x + hw, hh * ndc.y + hh, 0.5 * ndc.z + 0.5)
    }
}
