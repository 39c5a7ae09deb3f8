use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Spatial transform: position, pitch/yaw/roll rotation, scale.
///
/// The raw vectors are the only stored state. Matrices and basis vectors are
/// recomputed from them on every call, so a getter can never observe a stale
/// matrix.
///
/// Rotation is stored as Euler angles in radians: `x` = pitch, `y` = yaw,
/// `z` = roll. They are applied roll first, then pitch, then yaw. Angles are
/// accumulated as-is; nothing wraps them into `[-PI, PI]`.
///
/// The world matrix is `Scale * Rotation * Translation` in row-vector
/// convention. glam is column-vector, so the returned [`Mat4`] is `T * R * S`
/// and its column-major storage matches the row-major layout of the
/// row-vector matrix element for element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    position: Vec3,
    rotation: Vec3,
    scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Identity pose: position 0, rotation 0, scale 1.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Pitch, yaw, roll in radians.
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn set_rotation(&mut self, pitch_yaw_roll: Vec3) {
        self.rotation = pitch_yaw_roll;
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
    }

    /// Offset the position along the world axes.
    pub fn move_absolute(&mut self, offset: Vec3) {
        self.position += offset;
    }

    /// Offset the position along this transform's own right/up/forward axes.
    pub fn move_relative(&mut self, offset: Vec3) {
        self.position += self.orientation() * offset;
    }

    /// Add to the pitch/yaw/roll accumulator.
    pub fn rotate(&mut self, pitch_yaw_roll: Vec3) {
        self.rotation += pitch_yaw_roll;
    }

    /// Multiply the current scale component-wise.
    pub fn scale_by(&mut self, factor: Vec3) {
        self.scale *= factor;
    }

    /// The rotation as a quaternion (roll, then pitch, then yaw).
    pub fn orientation(&self) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            self.rotation.y,
            self.rotation.x,
            self.rotation.z,
        )
    }

    /// Local space to world space.
    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.orientation(), self.position)
    }

    /// `inverse(transpose(world))`, for transforming normals under
    /// non-uniform scale.
    pub fn world_inverse_transpose_matrix(&self) -> Mat4 {
        self.world_matrix().transpose().inverse()
    }

    /// Local +Z rotated into world space.
    pub fn forward(&self) -> Vec3 {
        self.orientation() * Vec3::Z
    }

    /// Local +X rotated into world space.
    pub fn right(&self) -> Vec3 {
        self.orientation() * Vec3::X
    }

    /// Local +Y rotated into world space.
    pub fn up(&self) -> Vec3 {
        self.orientation() * Vec3::Y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Rows = [[f32; 4]; 4];

    const EPS: f32 = 1e-5;

    fn mul(a: Rows, b: Rows) -> Rows {
        let mut out = [[0.0; 4]; 4];
        for r in 0..4 {
            for c in 0..4 {
                out[r][c] = (0..4).map(|k| a[r][k] * b[k][c]).sum();
            }
        }
        out
    }

    /// Row-vector `Scale * RotationRollPitchYaw * Translation`, built from raw
    /// floats without going through glam.
    fn reference_world(p: Vec3, r: Vec3, s: Vec3) -> Rows {
        let (sp, cp) = r.x.sin_cos();
        let (sy, cy) = r.y.sin_cos();
        let (sr, cr) = r.z.sin_cos();

        let scale = [
            [s.x, 0.0, 0.0, 0.0],
            [0.0, s.y, 0.0, 0.0],
            [0.0, 0.0, s.z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ];
        let roll = [
            [cr, sr, 0.0, 0.0],
            [-sr, cr, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ];
        let pitch = [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, cp, sp, 0.0],
            [0.0, -sp, cp, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ];
        let yaw = [
            [cy, 0.0, -sy, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [sy, 0.0, cy, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ];
        let translation = [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [p.x, p.y, p.z, 1.0],
        ];

        let rotation = mul(mul(roll, pitch), yaw);
        mul(mul(scale, rotation), translation)
    }

    fn assert_matches_reference(t: &Transform) {
        let expected = reference_world(t.position(), t.rotation(), t.scale());
        let actual = t.world_matrix().to_cols_array_2d();
        for r in 0..4 {
            for c in 0..4 {
                assert!(
                    (expected[r][c] - actual[r][c]).abs() < EPS,
                    "element [{r}][{c}]: expected {}, got {}",
                    expected[r][c],
                    actual[r][c]
                );
            }
        }
    }

    #[test]
    fn default_is_identity() {
        let t = Transform::new();
        assert_eq!(t.position(), Vec3::ZERO);
        assert_eq!(t.rotation(), Vec3::ZERO);
        assert_eq!(t.scale(), Vec3::ONE);
        assert_eq!(t.world_matrix(), Mat4::IDENTITY);
        assert_eq!(t.world_inverse_transpose_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn world_matrix_matches_row_vector_srt() {
        let poses = [
            (Vec3::ZERO, Vec3::ZERO, Vec3::ONE),
            (Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO, Vec3::ONE),
            (Vec3::ZERO, Vec3::new(0.3, 0.0, 0.0), Vec3::ONE),
            (Vec3::ZERO, Vec3::new(0.0, 1.1, 0.0), Vec3::ONE),
            (Vec3::ZERO, Vec3::new(0.0, 0.0, -0.7), Vec3::ONE),
            (
                Vec3::new(-4.0, 0.5, 9.0),
                Vec3::new(0.4, -1.2, 2.5),
                Vec3::new(2.0, 0.5, 3.0),
            ),
            (
                Vec3::new(0.25, -3.0, 1.0),
                Vec3::new(-2.0, 0.9, 0.1),
                Vec3::new(1.0, 1.0, 0.25),
            ),
        ];

        for (p, r, s) in poses {
            let mut t = Transform::new();
            t.set_position(p);
            t.set_rotation(r);
            t.set_scale(s);
            assert_matches_reference(&t);
        }
    }

    #[test]
    fn world_matrix_is_idempotent() {
        let mut t = Transform::from_position(Vec3::new(1.0, -2.0, 0.5));
        t.rotate(Vec3::new(0.2, 0.4, 0.6));
        t.scale_by(Vec3::new(1.5, 1.0, 0.5));
        assert_eq!(t.world_matrix(), t.world_matrix());
        assert_eq!(
            t.world_inverse_transpose_matrix(),
            t.world_inverse_transpose_matrix()
        );
    }

    #[test]
    fn inverse_transpose_undoes_transposed_world() {
        let mut t = Transform::from_position(Vec3::new(3.0, 1.0, -2.0));
        t.set_rotation(Vec3::new(0.5, -0.25, 1.0));
        t.set_scale(Vec3::new(2.0, 0.5, 4.0));
        let product = t.world_matrix().transpose() * t.world_inverse_transpose_matrix();
        assert!(product.abs_diff_eq(Mat4::IDENTITY, 1e-4));
    }

    #[test]
    fn move_absolute_uses_world_axes() {
        let mut t = Transform::new();
        t.set_rotation(Vec3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0));
        t.move_absolute(Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(t.position(), Vec3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn move_relative_follows_facing() {
        let mut t = Transform::new();
        // Yaw a quarter turn: local forward now points down world +X.
        t.set_rotation(Vec3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0));
        t.move_relative(Vec3::new(0.0, 0.0, 1.0));
        assert!(t.position().abs_diff_eq(Vec3::X, EPS));
    }

    #[test]
    fn move_relative_round_trips_with_move_absolute() {
        let start = Vec3::new(4.0, -1.0, 2.5);
        let mut t = Transform::from_position(start);
        t.set_rotation(Vec3::new(0.7, -1.3, 0.2));

        let local = Vec3::new(1.5, -0.5, 3.0);
        let world_delta = t.orientation() * local;
        t.move_relative(local);
        t.move_absolute(-world_delta);

        assert!(t.position().abs_diff_eq(start, EPS));
    }

    #[test]
    fn rotate_accumulates_without_wrapping() {
        let mut t = Transform::new();
        for _ in 0..10 {
            t.rotate(Vec3::new(0.0, 1.0, 0.0));
        }
        assert!((t.rotation().y - 10.0).abs() < EPS);
    }

    #[test]
    fn scale_compounds() {
        let mut t = Transform::new();
        t.scale_by(Vec3::splat(2.0));
        t.scale_by(Vec3::splat(2.0));
        assert_eq!(t.scale(), Vec3::splat(4.0));
    }

    #[test]
    fn setters_overwrite() {
        let mut t = Transform::new();
        t.scale_by(Vec3::splat(3.0));
        t.set_scale(Vec3::splat(2.0));
        assert_eq!(t.scale(), Vec3::splat(2.0));

        t.move_absolute(Vec3::ONE);
        t.set_position(Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(t.position(), Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn basis_vectors_at_identity() {
        let t = Transform::new();
        assert_eq!(t.forward(), Vec3::Z);
        assert_eq!(t.right(), Vec3::X);
        assert_eq!(t.up(), Vec3::Y);
    }

    #[test]
    fn positive_pitch_tilts_forward_down() {
        let mut t = Transform::new();
        t.rotate(Vec3::new(std::f32::consts::FRAC_PI_4, 0.0, 0.0));
        let f = t.forward();
        assert!(f.y < 0.0);
        assert!(f.z > 0.0);
        assert!((f.length() - 1.0).abs() < EPS);
    }

    #[test]
    fn basis_stays_orthonormal() {
        let mut t = Transform::new();
        t.set_rotation(Vec3::new(0.3, 2.1, -0.8));
        let (f, r, u) = (t.forward(), t.right(), t.up());
        assert!(f.dot(r).abs() < EPS);
        assert!(f.dot(u).abs() < EPS);
        assert!(r.dot(u).abs() < EPS);
        assert!(r.cross(u).abs_diff_eq(f, EPS));
    }
}
