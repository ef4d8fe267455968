use nalgebra::{Vector3, Vector4};
use nalgebra::base::coordinates::XYZW;

use crate::attributes::VertexAttributes;
use crate::interpolate::Interpolate;

use super::{Rectangle, ScreenVertex};

/// Defines a vertex and attributes in clip-space, which is produced by the vertex shader stage.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipVertex {
    /// Clip-space vertex position. This isn't very useful to the user unless normalized.
    pub position: Vector4<f32>,
    /// Per-vertex attributes carried to the pixel shader, possibly transformed by the vertex shader
    /// (such as normals moved into view-space for lighting).
    pub attributes: VertexAttributes,
}

impl Interpolate for ClipVertex {
    #[inline]
    fn barycentric_interpolate(u: f32, x1: &Self, v: f32, x2: &Self, w: f32, x3: &Self) -> Self {
        ClipVertex {
            position: Interpolate::barycentric_interpolate(u, &x1.position, v, &x2.position, w, &x3.position),
            attributes: Interpolate::barycentric_interpolate(u, &x1.attributes, v, &x2.attributes, w, &x3.attributes),
        }
    }

    #[inline]
    fn linear_interpolate(t: f32, x1: &Self, x2: &Self) -> Self {
        ClipVertex {
            position: Interpolate::linear_interpolate(t, &x1.position, &x2.position),
            attributes: Interpolate::linear_interpolate(t, &x1.attributes, &x2.attributes),
        }
    }
}

impl ClipVertex {
    /// Creates a new `ClipVertex` from the given clip-space position and attributes
    #[inline(always)]
    pub fn new(position: Vector4<f32>, attributes: VertexAttributes) -> ClipVertex {
        ClipVertex { position, attributes }
    }

    /// Normalizes the clip-space vertex coordinates to screen-space using the given viewport.
    ///
    /// The reciprocal of `w` is kept for perspective-correct interpolation.
    /// This assumes a viewport in the shape of:
    ///
    /// ```text
    ///  y-----------------x,y
    ///  |                  |
    ///  |                  |
    ///  |                  |
    ///  |                  |
    ///  |                  |
    /// 0,0-----------------x
    /// ```
    ///
    /// where the y-axis points up, the same as in normalized device coordinates.
    pub fn normalize(self, viewport: &Rectangle) -> ScreenVertex {
        let XYZW { x, y, z, w } = *self.position;

        let inv_w = 1.0 / w;

        ScreenVertex {
            position: ndc_to_screen(Vector3::new(x * inv_w, y * inv_w, z * inv_w), viewport),
            inv_w,
            attributes: self.attributes,
        }
    }
}

/// Maps normalized device coordinates onto the viewport.
///
/// `x` and `y` in `[-1, 1]` cover the viewport rectangle, and depth in `[-1, 1]` maps onto `[0, 1]`.
#[inline]
pub fn ndc_to_screen(ndc: Vector3<f32>, viewport: &Rectangle) -> Vector3<f32> {
    Vector3::new(
        viewport.min.x + (ndc.x + 1.0) * 0.5 * viewport.width(),
        viewport.min.y + (ndc.y + 1.0) * 0.5 * viewport.height(),
        (ndc.z + 1.0) * 0.5,
    )
}

#[cfg(test)]
mod test {
    use nalgebra::{Vector3, Vector4};

    use super::*;

    #[test]
    fn test_ndc_corners_map_to_viewport() {
        let viewport = Rectangle::from_origin_size(10, 20, 100, 50);

        assert_eq!(ndc_to_screen(Vector3::new(-1.0, -1.0, -1.0), &viewport), Vector3::new(10.0, 20.0, 0.0));
        assert_eq!(ndc_to_screen(Vector3::new(1.0, 1.0, 1.0), &viewport), Vector3::new(110.0, 70.0, 1.0));
        assert_eq!(ndc_to_screen(Vector3::new(0.0, 0.0, 0.0), &viewport), Vector3::new(60.0, 45.0, 0.5));
    }

    #[test]
    fn test_normalize_divides_by_w() {
        let viewport = Rectangle::from_origin_size(0, 0, 2, 2);
        let vertex = ClipVertex::new(Vector4::new(2.0, -2.0, 0.0, 2.0), VertexAttributes::new());

        let screen = vertex.normalize(&viewport);

        assert_eq!(screen.position, Vector3::new(2.0, 0.0, 0.5));
        assert_eq!(screen.inv_w, 0.5);
    }
}
