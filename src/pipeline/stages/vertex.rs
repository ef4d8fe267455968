//! Vertex shading and near plane clipping

use crate::attributes::VertexAttributes;
use crate::error::{RenderError, RenderResult};
use crate::geometry::{ClipVertex, ClippedPolygon, NearPlane};
use crate::mesh::{Mesh, Vertex};
use crate::shader::VertexShader;
use crate::uniforms::Uniforms;

/// Fails unless the three attribute lists are the same length
#[inline]
pub fn check_attribute_counts(a: &VertexAttributes, b: &VertexAttributes, c: &VertexAttributes) -> RenderResult<()> {
    if a.len() == b.len() && b.len() == c.len() {
        Ok(())
    } else {
        Err(RenderError::AttributeCountMismatch(a.len(), b.len(), c.len()))
    }
}

/// Checks the attribute counts of every triangle of a mesh with validated indices
pub fn check_mesh_attributes(mesh: &Mesh) -> RenderResult<()> {
    let vertices = &mesh.vertices;

    for [a, b, c] in mesh.triangle_indices() {
        check_attribute_counts(&vertices[a].attributes, &vertices[b].attributes, &vertices[c].attributes)?;
    }

    Ok(())
}

/// Runs the vertex shader on each vertex of a triangle.
///
/// Attribute counts are checked both before and after shading.
pub fn shade_triangle(shader: &dyn VertexShader, uniforms: &Uniforms, a: &Vertex, b: &Vertex, c: &Vertex) -> RenderResult<[ClipVertex; 3]> {
    check_attribute_counts(&a.attributes, &b.attributes, &c.attributes)?;

    let shaded = [shader.shade(a, uniforms), shader.shade(b, uniforms), shader.shade(c, uniforms)];

    check_shaded(&shaded)?;

    Ok(shaded)
}

/// Checks the attribute counts of already shaded vertices
#[inline]
pub fn check_shaded(shaded: &[ClipVertex; 3]) -> RenderResult<()> {
    check_attribute_counts(&shaded[0].attributes, &shaded[1].attributes, &shaded[2].attributes)
}

/// Clips a shaded triangle against the near plane
#[inline]
pub fn clip_triangle(shaded: [ClipVertex; 3]) -> ClippedPolygon {
    let [a, b, c] = shaded;

    NearPlane.clip_triangle(a, b, c)
}

#[cfg(test)]
mod test {
    use nalgebra::{Point3, Vector3, Vector4};

    use crate::shader::PassThroughVertexShader;

    use super::*;

    #[test]
    fn test_mismatched_attributes_are_rejected() {
        let uniforms = Uniforms::default();

        let a = Vertex::with_attribute(Point3::origin(), Vector3::zeros());
        let b = Vertex::with_attribute(Point3::origin(), Vector3::zeros());
        let c = Vertex::default();

        assert_eq!(shade_triangle(&PassThroughVertexShader, &uniforms, &a, &b, &c).unwrap_err(),
                   RenderError::AttributeCountMismatch(1, 1, 0));
    }

    struct DroppingShader;

    impl VertexShader for DroppingShader {
        fn shade(&self, vertex: &Vertex, _: &Uniforms) -> ClipVertex {
            let attributes = if vertex.position.x > 0.0 { VertexAttributes::new() } else { vertex.attributes.clone() };

            ClipVertex::new(vertex.position.to_homogeneous(), attributes)
        }
    }

    #[test]
    fn test_shaded_attributes_are_checked() {
        let uniforms = Uniforms::default();

        let a = Vertex::with_attribute(Point3::new(1.0, 0.0, 0.0), Vector3::zeros());
        let b = Vertex::with_attribute(Point3::origin(), Vector3::zeros());

        assert_eq!(shade_triangle(&DroppingShader, &uniforms, &a, &b, &b).unwrap_err(),
                   RenderError::AttributeCountMismatch(0, 1, 1));
    }

    #[test]
    fn test_clip_keeps_visible_triangle() {
        let vertex = |x: f32| ClipVertex::new(Vector4::new(x, 0.0, 0.0, 1.0), VertexAttributes::new());

        assert_eq!(clip_triangle([vertex(0.0), vertex(1.0), vertex(2.0)]).len(), 3);
    }
}
