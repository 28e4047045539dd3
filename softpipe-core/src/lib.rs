/// softpipe core library - CPU geometry pipeline for a hardware rasterizer
///
/// Takes a static triangle mesh and a camera and produces, once per frame, a
/// flat vertex/index list in pixel space: vertices are transformed to clip
/// space, clipped against the view volume, back-face culled, mapped to the
/// viewport and sorted back to front.

pub mod camera;
pub mod clip;
pub mod config;
pub mod draw_list;
pub mod error;
pub mod geometry;
pub mod interpolate;
pub mod obj;
pub mod pipeline;
pub mod projection;
pub mod screen;
pub mod sort;
pub mod transform;

// Re-export commonly used types
pub use camera::{CameraState, DirectionKeys, DragState, InputSnapshot};
pub use config::{CameraConfig, ProjectionConfig, RenderConfig};
pub use draw_list::{DrawList, DrawVertex, TextureSize};
pub use error::MeshError;
pub use geometry::{Mesh, Rgba, Surface, Triangle};
pub use pipeline::{FrameStats, Pipeline};
pub use projection::{Context, ProjectionMode, Viewport};
