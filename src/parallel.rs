//! Multi-threaded mesh drawing

use parking_lot::Mutex;
use scoped_threadpool::Pool;

use crate::context::RenderContext;
use crate::error::RenderResult;
use crate::geometry::ClipVertex;
use crate::mesh::Mesh;
use crate::pipeline::stages::{rasterize_triangle, vertex};
use crate::pipeline::{prepare_triangle, Triangle};
use crate::stats::RenderStats;

/// Number of pixel rows in each band, unless changed with `set_band_height`
pub const DEFAULT_BAND_HEIGHT: u32 = 32;

/// Draws meshes on a thread pool, producing exactly the same image as `RenderContext::draw_mesh`.
///
/// Vertices are shaded in parallel chunks, then triangles are clipped and set up in submission
/// order. Finally the render targets are split into horizontal bands of rows, and each band is
/// owned by a single thread that rasterizes every triangle into it in submission order.
pub struct ParallelRenderer {
    pool: Pool,
    band_height: u32,
}

impl Default for ParallelRenderer {
    fn default() -> ParallelRenderer {
        ParallelRenderer::new()
    }
}

impl ParallelRenderer {
    /// Creates a renderer with one thread per logical CPU
    pub fn new() -> ParallelRenderer {
        ParallelRenderer::with_threads(num_cpus::get() as u32)
    }

    /// Creates a renderer with the given number of threads, at least one
    pub fn with_threads(threads: u32) -> ParallelRenderer {
        ParallelRenderer {
            pool: Pool::new(threads.max(1)),
            band_height: DEFAULT_BAND_HEIGHT,
        }
    }

    #[inline]
    pub fn thread_count(&self) -> u32 { self.pool.thread_count() }

    #[inline]
    pub fn band_height(&self) -> u32 { self.band_height }

    /// Sets the number of rows rasterized by each thread at a time, at least one
    pub fn set_band_height(&mut self, rows: u32) {
        self.band_height = rows.max(1);
    }

    /// Draws every triangle of `mesh` into the render targets bound to `context`.
    ///
    /// Fails for the same reasons as `RenderContext::draw_mesh`, before anything is drawn.
    pub fn draw_mesh(&mut self, context: &mut RenderContext, mesh: &Mesh) -> RenderResult<()> {
        mesh.validate()?;

        let ParallelRenderer { ref mut pool, band_height } = *self;

        let (state, targets, stats) = context.draw_parts()?;

        vertex::check_mesh_attributes(mesh)?;

        let thread_count = pool.thread_count() as usize;
        let chunk_size = (mesh.vertices.len() + thread_count - 1) / thread_count;

        let mut chunks: Vec<Vec<ClipVertex>> = vec![Vec::new(); thread_count];

        if chunk_size > 0 {
            pool.scoped(|scope| {
                for (input, output) in mesh.vertices.chunks(chunk_size).zip(chunks.iter_mut()) {
                    scope.execute(move || {
                        *output = input.iter().map(|vertex| state.vertex_shader.shade(vertex, state.uniforms)).collect();
                    });
                }
            });
        }

        let shaded: Vec<ClipVertex> = chunks.into_iter().flatten().collect();

        let mut triangles: Vec<Triangle> = Vec::with_capacity(mesh.num_triangles());

        for [a, b, c] in mesh.triangle_indices() {
            stats.triangles_submitted += 1;

            let triangle = [shaded[a].clone(), shaded[b].clone(), shaded[c].clone()];

            vertex::check_shaded(&triangle)?;

            triangles.extend(prepare_triangle(&state, triangle, stats));
        }

        let bands = targets.draw_bands_mut(band_height);

        debug!("Rasterizing {} triangles over {} bands of {} rows", triangles.len(), bands.len(), band_height);

        let merged = Mutex::new(RenderStats::default());

        pool.scoped(|scope| {
            for mut band in bands {
                let triangles = &triangles;
                let merged = &merged;

                scope.execute(move || {
                    let mut local = RenderStats::default();
                    let rows = band.row_range();

                    for triangle in triangles {
                        let (first, end) = triangle.rows();

                        if first < rows.end && end > rows.start {
                            rasterize_triangle(triangle, &mut band, &state, &mut local);
                        }
                    }

                    merged.lock().merge(&local);
                });
            }
        });

        stats.merge(&merged.into_inner());

        Ok(())
    }
}
