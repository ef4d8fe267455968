//! The triangle pipeline, from vertex shading to color merge.
//!
//! Drawing happens in three stages:
//!
//! 1. The vertex stage shades each vertex and clips the triangle against the near plane.
//! 2. Triangle setup projects the clipped triangles onto the screen, culls them and finds their bounds.
//! 3. Traversal visits every pixel in those bounds, then depth tests, shades and merges covered samples.
//!
//! The first two stages produce [`Triangle`](stages/rasterization/triangle/struct.Triangle.html)s
//! that can be rasterized into any band of the render targets, which is how
//! [`ParallelRenderer`](../parallel/struct.ParallelRenderer.html) splits the work.

use smallvec::SmallVec;

use crate::error::RenderResult;
use crate::geometry::{triangulate_fan, ClipVertex, Dimensions};
use crate::mesh::{Mesh, Vertex};
use crate::shader::{PixelShader, VertexShader};
use crate::stats::RenderStats;
use crate::uniforms::Uniforms;
use crate::context::RenderContext;

pub mod stages;

pub use self::stages::{MsaaShading, Rejection, Triangle};

use self::stages::{rasterize_triangle, vertex};

/// Everything a draw reads, borrowed from the context
#[derive(Clone, Copy)]
pub struct DrawState<'a> {
    pub uniforms: &'a Uniforms,
    pub vertex_shader: &'a dyn VertexShader,
    pub pixel_shader: &'a dyn PixelShader,
    pub msaa_shading: MsaaShading,
    pub dimensions: Dimensions,
}

/// Triangles left after clipping a single submitted triangle, at most two
pub type PreparedTriangles = SmallVec<[Triangle; 2]>;

/// Clips and sets up a shaded triangle, counting whatever gets thrown away
pub fn prepare_triangle(state: &DrawState, shaded: [ClipVertex; 3], stats: &mut RenderStats) -> PreparedTriangles {
    let mut prepared = PreparedTriangles::new();

    let polygon = vertex::clip_triangle(shaded);

    if polygon.is_empty() {
        trace!("Triangle is entirely behind the near plane");
        stats.triangles_clipped += 1;
    }

    for (a, b, c) in triangulate_fan(&polygon) {
        match Triangle::setup(a, b, c, state.uniforms, state.dimensions) {
            Ok(triangle) => {
                stats.triangles_rasterized += 1;
                prepared.push(triangle);
            }
            Err(rejection) => {
                trace!("Triangle discarded during setup: {:?}", rejection);

                match rejection {
                    Rejection::Invalid | Rejection::Offscreen => stats.triangles_clipped += 1,
                    Rejection::Degenerate => stats.triangles_degenerate += 1,
                    Rejection::Culled => stats.triangles_culled += 1,
                }
            }
        }
    }

    prepared
}

impl RenderContext {
    /// Draws a single triangle into the bound render targets.
    ///
    /// Fails if no render target or shaders are bound, or if the vertices
    /// carry different numbers of attributes, before or after vertex shading.
    /// Triangles that end up invisible are skipped without error.
    pub fn draw_triangle(&mut self, a: &Vertex, b: &Vertex, c: &Vertex) -> RenderResult<()> {
        let (state, targets, stats) = self.draw_parts()?;

        stats.triangles_submitted += 1;

        let shaded = vertex::shade_triangle(state.vertex_shader, state.uniforms, a, b, c)?;

        let mut band = targets.draw_band_mut();

        for triangle in prepare_triangle(&state, shaded, stats) {
            rasterize_triangle(&triangle, &mut band, &state, stats);
        }

        Ok(())
    }

    /// Draws every triangle of a mesh in order, on the calling thread.
    ///
    /// The mesh indices and attribute counts are validated before anything is drawn.
    pub fn draw_mesh(&mut self, mesh: &Mesh) -> RenderResult<()> {
        mesh.validate()?;
        vertex::check_mesh_attributes(mesh)?;

        for (a, b, c) in mesh.triangles() {
            self.draw_triangle(a, b, c)?;
        }

        Ok(())
    }
}
