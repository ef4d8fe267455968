//! Near plane clipping

use nalgebra::base::coordinates::XYZW;
use smallvec::SmallVec;

use crate::interpolate::Interpolate;

use super::ClipVertex;

/// Polygon left after clipping a triangle against a single plane, holding 0, 3 or 4 vertices
pub type ClippedPolygon = SmallVec<[ClipVertex; 4]>;

/// The near clipping plane, `z >= -w` in clip space.
///
/// This is the only plane geometry is clipped against. Everything outside the other
/// five planes is rejected per pixel by the viewport bounds and the depth range instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NearPlane;

impl NearPlane {
    /// Signed distance-like value, non-negative on the visible side
    #[inline]
    fn distance(self, v: &ClipVertex) -> f32 {
        let XYZW { z, w, .. } = *v.position;
        z + w
    }

    /// Check if the clipping plane has the given clip-space point inside of it
    #[inline]
    pub fn has_inside(self, v: &ClipVertex) -> bool {
        self.distance(v) >= 0.0
    }

    /// Find the intersection of a line and the clipping plane
    #[inline]
    pub fn intersect(self, v1: &ClipVertex, v2: &ClipVertex) -> ClipVertex {
        let a = self.distance(v1);
        let b = self.distance(v2);

        let t = a / (a - b);

        Interpolate::linear_interpolate(t, v1, v2)
    }

    /// Clips a triangle against the plane (Sutherland-Hodgman), preserving the winding order.
    ///
    /// The result is empty when the whole triangle is behind the plane, the triangle itself
    /// when it is entirely in front of it, or a triangle or quad otherwise.
    pub fn clip_triangle(self, a: ClipVertex, b: ClipVertex, c: ClipVertex) -> ClippedPolygon {
        let inside = [self.has_inside(&a), self.has_inside(&b), self.has_inside(&c)];

        let mut polygon = ClippedPolygon::new();

        match inside {
            [true, true, true] => {
                polygon.push(a);
                polygon.push(b);
                polygon.push(c);
            }
            [false, false, false] => {}
            _ => {
                let vertices = [a, b, c];

                for i in 0..3 {
                    let j = (i + 1) % 3;

                    let (current, next) = (&vertices[i], &vertices[j]);

                    if inside[i] {
                        polygon.push(current.clone());
                    }

                    if inside[i] != inside[j] {
                        polygon.push(self.intersect(current, next));
                    }
                }
            }
        }

        polygon
    }
}

/// Splits a convex polygon into a fan of triangles sharing the first vertex
pub fn triangulate_fan(polygon: &[ClipVertex]) -> impl Iterator<Item=(&ClipVertex, &ClipVertex, &ClipVertex)> {
    let count = if polygon.len() >= 3 { polygon.len() - 2 } else { 0 };

    (0..count).map(move |i| (&polygon[0], &polygon[i + 1], &polygon[i + 2]))
}

#[cfg(test)]
mod test {
    use nalgebra::{Vector3, Vector4};

    use crate::attributes::VertexAttributes;

    use super::*;

    fn vertex(z: f32, w: f32, attribute: f32) -> ClipVertex {
        ClipVertex::new(Vector4::new(0.0, 0.0, z, w),
                        VertexAttributes::from_slice(&[Vector3::new(attribute, 0.0, 0.0)]).unwrap())
    }

    #[test]
    fn test_fully_inside_is_untouched() {
        let polygon = NearPlane.clip_triangle(vertex(0.0, 1.0, 0.0), vertex(0.5, 1.0, 1.0), vertex(0.2, 1.0, 2.0));

        assert_eq!(polygon.len(), 3);
        assert_eq!(triangulate_fan(&polygon).count(), 1);
    }

    #[test]
    fn test_fully_behind_is_discarded() {
        let polygon = NearPlane.clip_triangle(vertex(-2.0, 1.0, 0.0), vertex(-3.0, 1.0, 1.0), vertex(-1.5, 1.0, 2.0));

        assert!(polygon.is_empty());
        assert_eq!(triangulate_fan(&polygon).count(), 0);
    }

    #[test]
    fn test_one_vertex_behind_produces_quad() {
        let polygon = NearPlane.clip_triangle(vertex(0.0, 1.0, 0.0), vertex(0.0, 1.0, 1.0), vertex(-3.0, 1.0, 2.0));

        assert_eq!(polygon.len(), 4);
        assert_eq!(triangulate_fan(&polygon).count(), 2);

        for v in &polygon {
            assert!(NearPlane.has_inside(v));
        }
    }

    #[test]
    fn test_two_vertices_behind_produces_triangle() {
        let polygon = NearPlane.clip_triangle(vertex(0.0, 1.0, 0.0), vertex(-3.0, 1.0, 4.0), vertex(-3.0, 1.0, 4.0));

        assert_eq!(polygon.len(), 3);

        // The intersection lies a third of the way along the first clipped edge, on the plane
        assert!((polygon[1].position.z + 1.0).abs() < 1e-6);
        assert!((polygon[1].attributes[0].x - 4.0 / 3.0).abs() < 1e-6);
    }
}
