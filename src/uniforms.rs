//! Read-only state shared with the shader stages

use std::any::Any;
use std::sync::Arc;

use nalgebra::{Matrix3, Matrix4};

use crate::geometry::{FaceWinding, Rectangle};

/// Everything a shader may read during a draw.
///
/// The derived matrices are always consistent with `model_view` and `projection`,
/// since the only way to change either is through the `RenderContext` setters.
#[derive(Clone)]
pub struct Uniforms {
    pub(crate) model_view: Matrix4<f32>,
    pub(crate) model_view_inverse: Matrix4<f32>,
    pub(crate) normal_matrix: Matrix3<f32>,
    pub(crate) projection: Matrix4<f32>,
    pub(crate) projection_inverse: Matrix4<f32>,
    pub(crate) model_view_projection: Matrix4<f32>,
    pub(crate) model_view_projection_inverse: Matrix4<f32>,
    pub(crate) viewport: Rectangle,
    pub(crate) cull_face: Option<FaceWinding>,
    pub(crate) material: Option<Arc<dyn Any + Send + Sync>>,
}

impl Default for Uniforms {
    fn default() -> Uniforms {
        Uniforms {
            model_view: Matrix4::identity(),
            model_view_inverse: Matrix4::identity(),
            normal_matrix: Matrix3::identity(),
            projection: Matrix4::identity(),
            projection_inverse: Matrix4::identity(),
            model_view_projection: Matrix4::identity(),
            model_view_projection_inverse: Matrix4::identity(),
            viewport: Rectangle::default(),
            cull_face: Some(FaceWinding::Clockwise),
            material: None,
        }
    }
}

impl Uniforms {
    #[inline]
    pub fn model_view(&self) -> &Matrix4<f32> { &self.model_view }

    #[inline]
    pub fn model_view_inverse(&self) -> &Matrix4<f32> { &self.model_view_inverse }

    /// Inverse-transpose of the upper 3x3 block of the model-view matrix, for transforming normals
    #[inline]
    pub fn normal_matrix(&self) -> &Matrix3<f32> { &self.normal_matrix }

    #[inline]
    pub fn projection(&self) -> &Matrix4<f32> { &self.projection }

    #[inline]
    pub fn projection_inverse(&self) -> &Matrix4<f32> { &self.projection_inverse }

    /// `projection * model_view`
    #[inline]
    pub fn model_view_projection(&self) -> &Matrix4<f32> { &self.model_view_projection }

    #[inline]
    pub fn model_view_projection_inverse(&self) -> &Matrix4<f32> { &self.model_view_projection_inverse }

    #[inline]
    pub fn viewport(&self) -> &Rectangle { &self.viewport }

    /// Winding that gets discarded, if any
    #[inline]
    pub fn cull_face(&self) -> Option<FaceWinding> { self.cull_face }

    /// The bound material, if it is a `T`
    pub fn material<T: Any>(&self) -> Option<&T> {
        self.material.as_ref().and_then(|material| material.downcast_ref::<T>())
    }

    pub(crate) fn set_model_view(&mut self, model_view: Matrix4<f32>) {
        self.model_view = model_view;
        self.model_view_inverse = inverse_or_zero(&model_view, "model-view");

        let upper = model_view.fixed_view::<3, 3>(0, 0).into_owned();

        self.normal_matrix = match upper.try_inverse() {
            Some(inverse) => inverse.transpose(),
            None => {
                warn!("Singular model-view rotation block, normal matrix is zeroed");
                Matrix3::zeros()
            }
        };

        self.update_model_view_projection();
    }

    pub(crate) fn set_projection(&mut self, projection: Matrix4<f32>) {
        self.projection = projection;
        self.projection_inverse = inverse_or_zero(&projection, "projection");

        self.update_model_view_projection();
    }

    fn update_model_view_projection(&mut self) {
        self.model_view_projection = self.projection * self.model_view;
        self.model_view_projection_inverse = inverse_or_zero(&self.model_view_projection, "model-view-projection");
    }
}

fn inverse_or_zero(matrix: &Matrix4<f32>, name: &str) -> Matrix4<f32> {
    matrix.try_inverse().unwrap_or_else(|| {
        warn!("Singular {} matrix, its inverse is zeroed", name);
        Matrix4::zeros()
    })
}

#[cfg(test)]
mod test {
    use nalgebra::{Matrix4, Vector3};

    use super::*;

    #[test]
    fn test_derived_matrices_follow_updates() {
        let mut uniforms = Uniforms::default();

        let translation = Matrix4::new_translation(&Vector3::new(1.0, 2.0, 3.0));
        let scale = Matrix4::new_scaling(2.0);

        uniforms.set_model_view(translation);
        uniforms.set_projection(scale);

        assert_eq!(uniforms.model_view_projection(), &(scale * translation));
        assert!((uniforms.model_view_inverse() * translation - Matrix4::identity()).abs().max() < 1e-6);
        assert_eq!(uniforms.normal_matrix(), &Matrix3::identity());
    }

    #[test]
    fn test_singular_matrix_gives_zero_inverse() {
        let mut uniforms = Uniforms::default();

        uniforms.set_projection(Matrix4::zeros());

        assert_eq!(uniforms.projection_inverse(), &Matrix4::zeros());
        assert_eq!(uniforms.model_view_projection_inverse(), &Matrix4::zeros());
    }

    #[test]
    fn test_material_downcast() {
        let mut uniforms = Uniforms::default();

        assert!(uniforms.material::<f32>().is_none());

        uniforms.material = Some(Arc::new(0.5f32));

        assert_eq!(uniforms.material::<f32>(), Some(&0.5));
        assert!(uniforms.material::<u32>().is_none());
    }
}
