//! CPU triangle rasterizer in Rust
//!
//! [Documentation](https://docs.rs/softraster/)
//!
//! ### Example:
//!
//! See `demos/cubes.rs`, which renders a few colored cubes into a PPM image.
//!
//! ### Current Features:
//!
//! * Triangle pipeline with user-defined vertex and pixel shaders.
//! * Up to four attributes per vertex, interpolated perspective-correctly.
//! * Near plane clipping, so geometry crossing the camera plane still renders.
//! * Top-left fill rule on a sub-pixel grid, so meshes have no cracks and no double-drawn pixels.
//! * Early depth testing, hidden fragments are never shaded.
//! * Up to four color targets at once.
//! * 4x MSAA with per-sample or per-pixel shading and an explicit resolve.
//! * Parallel mesh drawing on a thread pool, pixel-identical to the serial path.
//! * Built-in compatibility with the `image` crate, using the `image_compat` cargo feature.
//!
//! ### Conventions
//!
//! Screen space has its origin at the bottom-left, with `y` pointing up like normalized device
//! coordinates. Row `0` of every buffer is therefore the bottom row of the image.
//! NDC depth in `[-1, 1]` maps to `[0, 1]`, and fragments pass the depth test if they are strictly nearer.

//#![deny(missing_docs)]

#[macro_use]
extern crate log;

pub mod error;
pub mod interpolate;
pub mod attributes;
pub mod geometry;
pub mod mesh;
pub mod pixels;
pub mod framebuffer;
pub mod uniforms;
pub mod shader;
pub mod stats;
pub mod pipeline;
pub mod context;
pub mod parallel;

#[cfg(feature = "image_compat")]
pub mod image_compat;

/// Maximum number of color targets bound at once
pub const MAX_MRT_COUNT: usize = 4;

/// Samples per pixel of multi-sampled buffers
pub const MSAA_SAMPLES: usize = 4;

/// Screen-space vertex positions are snapped to `1 / SUBPIXEL_STEPS` of a pixel
pub const SUBPIXEL_STEPS: u32 = 256;

/// Depth of the far plane, which depth buffers are cleared to
pub const FAR_DEPTH: f32 = 1.0;

pub use attributes::{VertexAttributes, MAX_ATTRIBUTES_COUNT};
pub use context::RenderContext;
pub use error::{RenderError, RenderResult};
pub use framebuffer::RenderTargets;
pub use geometry::{ClipVertex, FaceWinding, Rectangle};
pub use interpolate::Interpolate;
pub use mesh::{Mesh, Vertex};
pub use parallel::{ParallelRenderer, DEFAULT_BAND_HEIGHT};
pub use pipeline::MsaaShading;
pub use pixels::{Buffer2D, PixelFormat};
pub use shader::{FragmentInput, FragmentOutput, MaterialColorPixelShader, PassThroughPixelShader,
                 PassThroughVertexShader, PixelShader, ShadedVertex, SolidColor, VertexShader};
pub use stats::RenderStats;
pub use uniforms::Uniforms;
