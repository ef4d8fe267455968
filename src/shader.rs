//! Programmable vertex and pixel shader stages

use std::ops::Index;

use nalgebra::{Vector3, Vector4};
use smallvec::SmallVec;

use crate::attributes::VertexAttributes;
use crate::error::{RenderError, RenderResult};
use crate::geometry::ClipVertex;
use crate::mesh::Vertex;
use crate::uniforms::Uniforms;
use crate::MAX_MRT_COUNT;

/// Output of the vertex shader, a clip-space position and the attributes to interpolate
pub type ShadedVertex = ClipVertex;

/// Interpolated attributes of a single fragment, as given to the pixel shader
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentInput {
    pub attributes: VertexAttributes,
}

/// Colors written by the pixel shader, output `i` going to color target `i`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FragmentOutput {
    colors: SmallVec<[Vector4<f32>; MAX_MRT_COUNT]>,
}

impl FragmentOutput {
    #[inline]
    pub fn new() -> FragmentOutput {
        FragmentOutput { colors: SmallVec::new() }
    }

    /// Output with a single color, for the first target
    #[inline]
    pub fn single(color: Vector4<f32>) -> FragmentOutput {
        let mut colors = SmallVec::new();
        colors.push(color);

        FragmentOutput { colors }
    }

    /// Appends the color for the next target
    pub fn push(&mut self, color: Vector4<f32>) -> RenderResult<()> {
        if self.colors.len() == MAX_MRT_COUNT {
            return Err(RenderError::ColorOutputOverflow(MAX_MRT_COUNT));
        }

        self.colors.push(color);

        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize { self.colors.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.colors.is_empty() }

    #[inline]
    pub fn iter(&self) -> ::std::slice::Iter<'_, Vector4<f32>> { self.colors.iter() }
}

impl Index<usize> for FragmentOutput {
    type Output = Vector4<f32>;

    #[inline]
    fn index(&self, index: usize) -> &Vector4<f32> { &self.colors[index] }
}

/// Transforms a single object-space vertex into clip-space.
///
/// Invoked once per vertex, possibly from several threads at once.
pub trait VertexShader: Send + Sync {
    fn shade(&self, vertex: &Vertex, uniforms: &Uniforms) -> ShadedVertex;
}

/// Computes the colors of a single fragment that passed the depth test
pub trait PixelShader: Send + Sync {
    fn shade(&self, fragment: &FragmentInput, uniforms: &Uniforms) -> FragmentOutput;
}

/// Transforms positions by the model-view-projection matrix and passes the attributes through unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughVertexShader;

impl VertexShader for PassThroughVertexShader {
    fn shade(&self, vertex: &Vertex, uniforms: &Uniforms) -> ShadedVertex {
        ClipVertex::new(uniforms.model_view_projection() * vertex.position.to_homogeneous(),
                        vertex.attributes.clone())
    }
}

/// Writes the first attribute as an opaque color, or black if there are no attributes
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughPixelShader;

impl PixelShader for PassThroughPixelShader {
    fn shade(&self, fragment: &FragmentInput, _: &Uniforms) -> FragmentOutput {
        let color = fragment.attributes.get(0).cloned().unwrap_or_else(Vector3::zeros);

        FragmentOutput::single(color.push(1.0))
    }
}

/// Material consisting of a single color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidColor(pub Vector4<f32>);

/// Writes the color of the bound [`SolidColor`](struct.SolidColor.html) material,
/// falling back to the first attribute like `PassThroughPixelShader` if there is none.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialColorPixelShader;

impl PixelShader for MaterialColorPixelShader {
    fn shade(&self, fragment: &FragmentInput, uniforms: &Uniforms) -> FragmentOutput {
        match uniforms.material::<SolidColor>() {
            Some(&SolidColor(color)) => FragmentOutput::single(color),
            None => PassThroughPixelShader.shade(fragment, uniforms),
        }
    }
}
