use nalgebra::Vector3;

use crate::attributes::VertexAttributes;

/// Defines a vertex and attributes in screen-space, which is what triangle setup works with.
///
/// Clip-space vertices are transformed to screen-space after the vertex shader
/// stage but before the fragment shader stage.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenVertex {
    /// Screen-space pixel position in `x` and `y`, with the depth in `[0, 1]` as `z`.
    ///
    /// Similar to `gl_FragCoord`
    pub position: Vector3<f32>,
    /// Reciprocal of the clip-space `w`, used to undo the perspective division when interpolating.
    pub inv_w: f32,
    /// Attributes as produced by the vertex shader
    pub attributes: VertexAttributes,
}
