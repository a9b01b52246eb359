//! Object-to-world transforms and the per-object uniform block.

use cgmath::{InnerSpace, Matrix4, Rad, SquareMatrix, Vector3, Zero};

use crate::camera::OPENGL_TO_WGPU_MATRIX;

/// Order in which translation, rotation and scale are multiplied.
///
/// Matrices apply right to left, so `TranslateRotateScale` scales first,
/// then rotates about the object's origin, then places it in the world.
/// `RotateTranslateScale` rotates the already translated object about the
/// world origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Composition {
    #[default]
    TranslateRotateScale,
    RotateTranslateScale,
}

/// Scale, axis-angle rotation and translation of a scene object.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelTransform {
    pub scale: Vector3<f32>,
    pub axis: Vector3<f32>,
    pub angle: Rad<f32>,
    pub translation: Vector3<f32>,
    pub composition: Composition,
}

impl ModelTransform {
    pub fn new() -> Self {
        Self {
            scale: Vector3::new(1.0, 1.0, 1.0),
            axis: Vector3::unit_y(),
            angle: Rad(0.0),
            translation: Vector3::zero(),
            composition: Composition::default(),
        }
    }

    pub fn scale(mut self, x: f32, y: f32, z: f32) -> Self {
        self.scale = Vector3::new(x, y, z);
        self
    }

    /// Rotate by `angle` around `axis`. The axis does not need to be unit length.
    pub fn rotate<A: Into<Rad<f32>>>(mut self, angle: A, axis: [f32; 3]) -> Self {
        self.angle = angle.into();
        self.axis = axis.into();
        self
    }

    pub fn translate(mut self, x: f32, y: f32, z: f32) -> Self {
        self.translation = Vector3::new(x, y, z);
        self
    }

    pub fn composed(mut self, composition: Composition) -> Self {
        self.composition = composition;
        self
    }

    /// The same transform forced into `T * R * S` order.
    pub fn normalized(&self) -> Self {
        Self {
            composition: Composition::TranslateRotateScale,
            ..self.clone()
        }
    }

    pub fn rotation_matrix(&self) -> Matrix4<f32> {
        if self.angle.0 == 0.0 || self.axis.magnitude2() == 0.0 {
            return Matrix4::identity();
        }
        Matrix4::from_axis_angle(self.axis.normalize(), self.angle)
    }

    pub fn to_matrix(&self) -> Matrix4<f32> {
        let translation = Matrix4::from_translation(self.translation);
        let rotation = self.rotation_matrix();
        let scale = Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z);
        match self.composition {
            Composition::TranslateRotateScale => translation * rotation * scale,
            Composition::RotateTranslateScale => rotation * translation * scale,
        }
    }
}

impl Default for ModelTransform {
    fn default() -> Self {
        Self::new()
    }
}

/**
 * The uniform block every draw call reads: `model`, `view` and `projection`
 * in that order, column-major like the shader expects.
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformUniform {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
}

impl TransformUniform {
    /// `projection` is expected in OpenGL clip conventions and is converted
    /// to wgpu's depth range here.
    pub fn new(model: Matrix4<f32>, view: Matrix4<f32>, projection: Matrix4<f32>) -> Self {
        Self {
            model: model.into(),
            view: view.into(),
            projection: (OPENGL_TO_WGPU_MATRIX * projection).into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Deg, Vector4};

    const EPS: f32 = 1e-5;

    fn apply(m: Matrix4<f32>, p: [f32; 3]) -> Vector3<f32> {
        (m * Vector4::new(p[0], p[1], p[2], 1.0)).truncate()
    }

    #[test]
    fn zero_angle_is_identity_rotation() {
        let transform = ModelTransform::new().rotate(Rad(0.0), [0.0, 1.0, 0.2]);
        assert_eq!(transform.rotation_matrix(), Matrix4::identity());
    }

    #[test]
    fn trs_scales_then_translates() {
        let transform = ModelTransform::new()
            .scale(1.0, 1.2, 1.0)
            .translate(0.0, -1.0, 0.0);
        let p = apply(transform.to_matrix(), [1.0, 1.0, -1.0]);
        assert!((p - Vector3::new(1.0, 0.2, -1.0)).magnitude() < EPS);
    }

    #[test]
    fn composition_orders_differ_when_rotated() {
        let trs = ModelTransform::new()
            .rotate(Deg(90.0), [0.0, 0.0, 1.0])
            .translate(1.0, 0.0, 0.0);
        let rts = trs.clone().composed(Composition::RotateTranslateScale);

        // T*R*S: rotate the origin in place, then move it to (1, 0, 0).
        let a = apply(trs.to_matrix(), [0.0, 0.0, 0.0]);
        assert!((a - Vector3::new(1.0, 0.0, 0.0)).magnitude() < EPS);
        // R*T*S: the translation itself gets rotated onto +Y.
        let b = apply(rts.to_matrix(), [0.0, 0.0, 0.0]);
        assert!((b - Vector3::new(0.0, 1.0, 0.0)).magnitude() < EPS);

        assert_eq!(rts.normalized().to_matrix(), trs.to_matrix());
    }

    #[test]
    fn axis_is_normalized() {
        let long = ModelTransform::new().rotate(Rad(1.0), [0.0, 7.0, 0.0]);
        let unit = ModelTransform::new().rotate(Rad(1.0), [0.0, 1.0, 0.0]);
        let diff = long.rotation_matrix() - unit.rotation_matrix();
        let cols: [[f32; 4]; 4] = diff.into();
        assert!(cols.iter().flatten().all(|v| v.abs() < EPS));
    }

    #[test]
    fn uniform_block_is_three_matrices() {
        assert_eq!(std::mem::size_of::<TransformUniform>(), 3 * 64);
        let uniform = TransformUniform::new(
            Matrix4::identity(),
            Matrix4::identity(),
            Matrix4::identity(),
        );
        let identity: [[f32; 4]; 4] = Matrix4::<f32>::identity().into();
        let correction: [[f32; 4]; 4] = OPENGL_TO_WGPU_MATRIX.into();
        assert_eq!(uniform.model, identity);
        assert_eq!(uniform.projection, correction);
    }
}
