//! The render context, owning all state a draw depends on

use std::any::Any;
use std::sync::Arc;

use nalgebra::{Matrix4, Vector3, Vector4};

use crate::error::{RenderError, RenderResult};
use crate::framebuffer::{RenderTargets, TargetBand};
use crate::geometry::{ndc_to_screen, Coordinate, FaceWinding, HasDimensions, Rectangle};
use crate::pipeline::{DrawState, MsaaShading};
use crate::pixels::Buffer2D;
use crate::shader::{FragmentOutput, PixelShader, VertexShader};
use crate::stats::RenderStats;
use crate::uniforms::Uniforms;
use crate::MSAA_SAMPLES;

/// Owns the transforms, viewport, render targets, shaders and material used by draws.
///
/// A context starts without render targets or shaders, both of which must be bound
/// before drawing. Configuration takes `&mut self`, so it can never overlap with a draw.
///
/// Screen space has its origin at the bottom-left corner with `y` growing upwards,
/// and row `0` of every buffer is the bottom row of the image.
#[derive(Default)]
pub struct RenderContext {
    uniforms: Uniforms,
    targets: Option<RenderTargets>,
    shaders: Option<(Arc<dyn VertexShader>, Arc<dyn PixelShader>)>,
    msaa_shading: MsaaShading,
    stats: RenderStats,
}

impl RenderContext {
    pub fn new() -> RenderContext {
        RenderContext::default()
    }

    /// (Re)allocates the render targets, with `color_count` color buffers and optional 4x MSAA storage.
    ///
    /// The viewport is reset to cover the whole target.
    pub fn set_render_target(&mut self, width: u32, height: u32, color_count: usize, enable_msaa: bool) -> RenderResult<()> {
        self.targets = Some(RenderTargets::new(width, height, color_count, enable_msaa)?);
        self.uniforms.viewport = Rectangle::from_origin_size(0, 0, width, height);

        Ok(())
    }

    /// Resets every color buffer to `color` and every depth buffer to the far plane
    pub fn clear_render_target(&mut self, color: Vector4<f32>) -> RenderResult<()> {
        self.targets_mut()?.clear(color);

        Ok(())
    }

    /// Sets the pixel rectangle normalized device coordinates are mapped onto
    pub fn set_viewport(&mut self, x: u32, y: u32, width: u32, height: u32) {
        self.uniforms.viewport = Rectangle::from_origin_size(x, y, width, height);
    }

    #[inline]
    pub fn viewport_rectangle(&self) -> &Rectangle { &self.uniforms.viewport }

    /// Sets the winding of triangles to discard, or `None` to draw both sides
    pub fn set_cull_face_mode(&mut self, cull_face: Option<FaceWinding>) {
        self.uniforms.cull_face = cull_face;
    }

    /// Sets the model-view matrix, updating every matrix derived from it
    pub fn set_model_view_matrix(&mut self, model_view: Matrix4<f32>) {
        self.uniforms.set_model_view(model_view);
    }

    /// Sets the projection matrix, updating every matrix derived from it
    pub fn set_projection_matrix(&mut self, projection: Matrix4<f32>) {
        self.uniforms.set_projection(projection);
    }

    /// Binds a material for shaders to read through `Uniforms::material`
    pub fn set_material<M: Any + Send + Sync>(&mut self, material: Arc<M>) {
        self.uniforms.material = Some(material);
    }

    pub fn clear_material(&mut self) {
        self.uniforms.material = None;
    }

    /// Binds the vertex and pixel shader pair used by draws
    pub fn set_shader(&mut self, vertex_shader: Arc<dyn VertexShader>, pixel_shader: Arc<dyn PixelShader>) {
        self.shaders = Some((vertex_shader, pixel_shader));
    }

    /// Selects how often multi-sampled pixels are shaded
    pub fn set_msaa_shading(&mut self, shading: MsaaShading) {
        self.msaa_shading = shading;
    }

    #[inline]
    pub fn uniforms(&self) -> &Uniforms { &self.uniforms }

    #[inline]
    pub fn stats(&self) -> &RenderStats { &self.stats }

    pub fn reset_stats(&mut self) {
        self.stats = RenderStats::default();
    }

    /// Maps normalized device coordinates to a screen position, with depth in `[0, 1]` as `z`
    #[inline]
    pub fn ndc_to_screen_position(&self, ndc: Vector3<f32>) -> Vector3<f32> {
        ndc_to_screen(ndc, &self.uniforms.viewport)
    }

    fn targets(&self) -> RenderResult<&RenderTargets> {
        self.targets.as_ref().ok_or(RenderError::NoRenderTarget)
    }

    fn targets_mut(&mut self) -> RenderResult<&mut RenderTargets> {
        self.targets.as_mut().ok_or(RenderError::NoRenderTarget)
    }

    /// Single-sample color buffer `index`, resolved if MSAA was used and `resolve_msaa_buffer` called
    pub fn color_buffer(&self, index: usize) -> RenderResult<&Buffer2D> {
        self.targets()?.color(index)
    }

    /// Single-sample depth buffer
    pub fn depth_buffer(&self) -> RenderResult<&Buffer2D> {
        Ok(self.targets()?.depth())
    }

    fn band_at(&mut self, x: u32, y: u32, msaa: bool) -> RenderResult<TargetBand<'_>> {
        let targets = self.targets_mut()?;

        if !targets.in_bounds(Coordinate::new(x, y)) {
            return Err(RenderError::InvalidPixelCoordinate);
        }

        if msaa { targets.msaa_band_mut() } else { Ok(targets.single_band_mut()) }
    }

    /// Replaces the stored single-sample depth at `(x, y)` if `depth` is nearer, returning whether it was.
    pub fn depth_test_and_override(&mut self, x: u32, y: u32, depth: f32) -> RenderResult<bool> {
        Ok(self.band_at(x, y, false)?.depth_test_and_override(x, y, 0, depth))
    }

    /// Like `depth_test_and_override`, for a single sample of the MSAA depth buffer
    pub fn depth_test_and_override_msaa(&mut self, x: u32, y: u32, depth: f32, sample: u32) -> RenderResult<bool> {
        check_sample(sample)?;

        Ok(self.band_at(x, y, true)?.depth_test_and_override(x, y, sample, depth))
    }

    /// Writes each color of `output` into the matching single-sample color buffer
    pub fn output_and_merge_color(&mut self, x: u32, y: u32, output: &FragmentOutput) -> RenderResult<()> {
        self.band_at(x, y, false)?.output_and_merge_color(x, y, output, 1);

        Ok(())
    }

    /// Writes each color of `output` into the samples of the MSAA color buffers selected by `mask`
    pub fn output_and_merge_color_msaa(&mut self, x: u32, y: u32, output: &FragmentOutput, mask: u32) -> RenderResult<()> {
        self.band_at(x, y, true)?.output_and_merge_color(x, y, output, mask);

        Ok(())
    }

    /// Averages the MSAA samples into the single-sample buffers. Does nothing without MSAA.
    pub fn resolve_msaa_buffer(&mut self) -> RenderResult<()> {
        self.targets_mut()?.resolve();

        Ok(())
    }

    /// Splits the context into what a draw reads and what it writes
    pub(crate) fn draw_parts(&mut self) -> RenderResult<(DrawState<'_>, &mut RenderTargets, &mut RenderStats)> {
        let RenderContext { ref uniforms, ref mut targets, ref shaders, msaa_shading, ref mut stats } = *self;

        let targets = targets.as_mut().ok_or(RenderError::NoRenderTarget)?;

        let (vertex_shader, pixel_shader) = match *shaders {
            Some((ref vertex_shader, ref pixel_shader)) => (&**vertex_shader, &**pixel_shader),
            None => return Err(RenderError::NoShader),
        };

        let state = DrawState {
            uniforms,
            vertex_shader,
            pixel_shader,
            msaa_shading,
            dimensions: targets.dimensions(),
        };

        Ok((state, targets, stats))
    }
}

#[inline]
fn check_sample(sample: u32) -> RenderResult<()> {
    if (sample as usize) < MSAA_SAMPLES {
        Ok(())
    } else {
        Err(RenderError::InvalidSampleIndex(sample, MSAA_SAMPLES as u32))
    }
}

#[cfg(test)]
mod test {
    use nalgebra::{Vector3, Vector4};

    use crate::shader::FragmentOutput;

    use super::*;

    #[test]
    fn test_target_required() {
        let mut context = RenderContext::new();

        assert_eq!(context.clear_render_target(Vector4::zeros()).unwrap_err(), RenderError::NoRenderTarget);
        assert_eq!(context.depth_test_and_override(0, 0, 0.5).unwrap_err(), RenderError::NoRenderTarget);
        assert!(context.color_buffer(0).is_err());
    }

    #[test]
    fn test_set_render_target_resets_viewport() {
        let mut context = RenderContext::new();

        context.set_viewport(5, 5, 10, 10);
        context.set_render_target(64, 32, 1, false).unwrap();

        assert_eq!(context.viewport_rectangle(), &Rectangle::from_origin_size(0, 0, 64, 32));
        assert_eq!(context.ndc_to_screen_position(Vector3::new(0.0, 0.0, 0.0)), Vector3::new(32.0, 16.0, 0.5));
    }

    #[test]
    fn test_context_primitives() {
        let mut context = RenderContext::new();
        context.set_render_target(4, 4, 1, false).unwrap();

        assert!(context.depth_test_and_override(1, 2, 0.5).unwrap());
        assert!(!context.depth_test_and_override(1, 2, 0.6).unwrap());
        assert_eq!(context.depth_test_and_override(4, 0, 0.1).unwrap_err(), RenderError::InvalidPixelCoordinate);

        let blue = Vector4::new(0.0, 0.0, 1.0, 1.0);
        context.output_and_merge_color(1, 2, &FragmentOutput::single(blue)).unwrap();

        assert_eq!(context.color_buffer(0).unwrap().read(1, 2).unwrap(), blue);
        assert_eq!(context.depth_buffer().unwrap().read(1, 2).unwrap().x, 0.5);

        assert_eq!(context.depth_test_and_override_msaa(1, 2, 0.5, 0).unwrap_err(), RenderError::MsaaDisabled);
    }

    #[test]
    fn test_msaa_primitives() {
        let mut context = RenderContext::new();
        context.set_render_target(2, 2, 1, true).unwrap();

        assert!(context.depth_test_and_override_msaa(0, 0, 0.5, 3).unwrap());
        assert_eq!(context.depth_test_and_override_msaa(0, 0, 0.5, 4).unwrap_err(), RenderError::InvalidSampleIndex(4, 4));

        // the single-sample depth buffer is untouched until resolved
        assert_eq!(context.depth_buffer().unwrap().read(0, 0).unwrap().x, crate::FAR_DEPTH);

        context.resolve_msaa_buffer().unwrap();

        assert_eq!(context.depth_buffer().unwrap().read(0, 0).unwrap().x, 0.5);
    }

    #[test]
    fn test_draw_requires_shaders() {
        let mut context = RenderContext::new();
        let vertex = crate::mesh::Vertex::default();

        assert_eq!(context.draw_triangle(&vertex, &vertex, &vertex).unwrap_err(), RenderError::NoRenderTarget);

        context.set_render_target(2, 2, 1, false).unwrap();

        assert_eq!(context.draw_triangle(&vertex, &vertex, &vertex).unwrap_err(), RenderError::NoShader);
    }
}
