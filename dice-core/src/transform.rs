/// Model-view matrices for the dice: base translation plus three nested
/// pivot rotations
use nalgebra::{Matrix4, Point3, Unit, Vector3};

/// Pivot of the pedestal-local rotation, the pedestal's own center
pub const PEDESTAL_PIVOT: Point3<f32> = Point3::new(0.0, 0.0, -10.0);

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Create a translation matrix
    pub fn translation_matrix(offset: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new_translation(offset)
    }

    /// Rotation about an axis through the local origin
    pub fn rotation_matrix(axis: &Unit<Vector3<f32>>, angle: f32) -> Matrix4<f32> {
        Matrix4::from_axis_angle(axis, angle)
    }

    /// Rotation about an axis through `pivot`: move the pivot to the origin,
    /// rotate, move it back
    pub fn pivot_rotation(pivot: &Vector3<f32>, axis: &Unit<Vector3<f32>>, angle: f32) -> Matrix4<f32> {
        Self::translation_matrix(pivot) * Self::rotation_matrix(axis, angle) * Self::translation_matrix(&-pivot)
    }

    /// Right-multiply `matrix` by a rotation about the world-space `pivot`
    ///
    /// `origin` is the translation `matrix` started from; the pivot is moved
    /// into that local frame before rotating.
    pub fn rotate_around(
        matrix: &Matrix4<f32>,
        origin: &Vector3<f32>,
        pivot: &Point3<f32>,
        axis: &Unit<Vector3<f32>>,
        angle: f32,
    ) -> Matrix4<f32> {
        let local_pivot = pivot.coords - origin;
        matrix * Self::pivot_rotation(&local_pivot, axis, angle)
    }

    /// Translation column of an affine matrix
    pub fn translation_of(matrix: &Matrix4<f32>) -> Vector3<f32> {
        Vector3::new(matrix[(0, 3)], matrix[(1, 3)], matrix[(2, 3)])
    }
}

/// Builds a cube's model-view matrix from its base position and the three
/// accumulated angles
///
/// Steps, each right-multiplying: translate to the base position, rotate
/// about the world pivot by `angles[2]`, rotate about the pedestal pivot by
/// `angles[1]`, spin about the cube's own origin by `angles[0]`. The world
/// rotation therefore wraps the pedestal rotation, which wraps the spin.
#[derive(Debug, Clone, Copy)]
pub struct TransformComposer {
    pub world_pivot: Point3<f32>,
    pub pedestal_pivot: Point3<f32>,
    pub axis: Unit<Vector3<f32>>,
}

impl TransformComposer {
    pub fn new(world_pivot: Point3<f32>, pedestal_pivot: Point3<f32>, axis: Unit<Vector3<f32>>) -> Self {
        Self {
            world_pivot,
            pedestal_pivot,
            axis,
        }
    }

    pub fn compose(&self, base_position: &Vector3<f32>, angles: &[f32; 3]) -> Matrix4<f32> {
        let matrix = Transform::translation_matrix(base_position);
        let matrix = Transform::rotate_around(&matrix, base_position, &self.world_pivot, &self.axis, angles[2]);
        let matrix = Transform::rotate_around(&matrix, base_position, &self.pedestal_pivot, &self.axis, angles[1]);
        matrix * Transform::rotation_matrix(&self.axis, angles[0])
    }
}

impl Default for TransformComposer {
    fn default() -> Self {
        Self::new(Point3::origin(), PEDESTAL_PIVOT, Vector3::y_axis())
    }
}

/// [`TransformComposer::compose`] with the default pivots and vertical axis
pub fn compose_model_view(base_position: &Vector3<f32>, angles: &[f32; 3]) -> Matrix4<f32> {
    TransformComposer::default().compose(base_position, angles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn close(a: &Vector3<f32>, b: &Vector3<f32>) -> bool {
        (a - b).norm() < 1e-5
    }

    #[test]
    fn test_zero_angles_is_pure_translation() {
        let base = Vector3::new(-1.9, -0.1, -10.0);
        let matrix = compose_model_view(&base, &[0.0, 0.0, 0.0]);
        assert!((matrix - Matrix4::new_translation(&base)).norm() < 1e-6);
    }

    #[test]
    fn test_world_pivot_matches_direct_rotation() {
        let base = Vector3::new(1.8, -0.2, -10.0);
        let angle = 0.7_f32;
        let matrix = compose_model_view(&base, &[0.0, 0.0, angle]);
        let moved = matrix.transform_point(&Point3::origin()).coords;

        let (sin, cos) = angle.sin_cos();
        let expected = Vector3::new(
            cos * base.x + sin * base.z,
            base.y,
            -sin * base.x + cos * base.z,
        );
        assert!(close(&moved, &expected));
    }

    #[test]
    fn test_pedestal_pivot_keeps_center_cube_in_place() {
        let base = Vector3::new(0.0, 0.0, -10.0);
        let matrix = compose_model_view(&base, &[0.0, 1.2, 0.0]);
        assert!(close(&Transform::translation_of(&matrix), &base));
    }

    #[test]
    fn test_pedestal_pivot_swings_side_cube() {
        let base = Vector3::new(-1.9, -0.1, -10.0);
        let matrix = compose_model_view(&base, &[0.0, FRAC_PI_2, 0.0]);
        // A quarter turn about +Y carries -X onto +Z around the pedestal center
        let expected = Vector3::new(0.0, -0.1, -10.0 + 1.9);
        assert!(close(&Transform::translation_of(&matrix), &expected));
    }

    #[test]
    fn test_self_spin_keeps_translation() {
        let base = Vector3::new(1.8, -0.2, -10.0);
        for angle in [0.1_f32, 1.0, 3.0, -2.5] {
            let matrix = compose_model_view(&base, &[angle, 0.0, 0.0]);
            assert!(close(&Transform::translation_of(&matrix), &base));
        }
    }

    #[test]
    fn test_world_wraps_pedestal_wraps_spin() {
        let base = Vector3::new(-1.9, -0.1, -10.0);
        let axis = Vector3::y_axis();
        let angles = [0.3_f32, 0.5, 0.9];
        let expected = Transform::rotation_matrix(&axis, angles[2])
            * Transform::pivot_rotation(&PEDESTAL_PIVOT.coords, &axis, angles[1])
            * Transform::translation_matrix(&base)
            * Transform::rotation_matrix(&axis, angles[0]);
        let matrix = compose_model_view(&base, &angles);
        assert!((matrix - expected).norm() < 1e-5);
    }

    #[test]
    fn test_custom_axis() {
        let composer = TransformComposer::new(Point3::origin(), PEDESTAL_PIVOT, Vector3::x_axis());
        let base = Vector3::new(0.0, 0.0, -10.0);
        let matrix = composer.compose(&base, &[0.0, 0.0, FRAC_PI_2]);
        // A quarter turn about +X carries -Z onto +Y
        assert!(close(&Transform::translation_of(&matrix), &Vector3::new(0.0, 10.0, 0.0)));
    }
}
