// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rigid transforms (rotation followed by translation).
//!
//! Spaces own a [`Transform`] mapping local coordinates into the building
//! frame. Re-expressing the vertices of a surface of space `B` in the local
//! frame of space `A` is `a.inverse() * b`.

use std::ops::Mul;

use nalgebra::{Isometry3, Matrix4, Point3, Rotation3, Translation3, Unit, UnitQuaternion, Vector3};

use crate::polygon::newell_normal;

/// A rigid 3D coordinate transform.
///
/// `a * b` applies `b` first, then `a`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    iso: Isometry3<f64>,
}

impl Transform {
    /// The identity transform.
    pub fn identity() -> Self {
        Self {
            iso: Isometry3::identity(),
        }
    }

    /// Pure translation.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            iso: Isometry3::translation(dx, dy, dz),
        }
    }

    /// Rotation about an axis through the origin. `angle` is in radians.
    ///
    /// A degenerate (zero-length) axis yields the identity.
    pub fn from_axis_angle(axis: &Vector3<f64>, angle: f64) -> Self {
        let unit_axis = match Unit::try_new(*axis, 1e-15) {
            Some(a) => a,
            None => return Self::identity(),
        };
        Self {
            iso: Isometry3::from_parts(
                Translation3::identity(),
                UnitQuaternion::from_axis_angle(&unit_axis, angle),
            ),
        }
    }

    /// Counter-clockwise rotation about the vertical axis, in radians.
    pub fn rotation_z(angle: f64) -> Self {
        Self::from_axis_angle(&Vector3::z(), angle)
    }

    /// Rotation followed by translation.
    pub fn from_parts(rotation: UnitQuaternion<f64>, translation: Vector3<f64>) -> Self {
        Self {
            iso: Isometry3::from_parts(Translation3::from(translation), rotation),
        }
    }

    /// Frame attached to a planar polygon.
    ///
    /// The returned transform maps face coordinates to the polygon's frame:
    /// its origin is the first vertex and its z-axis is the outward normal, so
    /// `inverse()` flattens the polygon onto `z = 0` with counter-clockwise
    /// winding. Walls get a horizontal x-axis. Returns `None` for polygons
    /// without a defined normal.
    pub fn align_face(vertices: &[Point3<f64>]) -> Option<Self> {
        let normal = newell_normal(vertices)?;

        let x_axis = if normal.z.abs() < 0.9 {
            Vector3::z().cross(&normal).normalize()
        } else {
            Vector3::y().cross(&normal).normalize()
        };
        let y_axis = normal.cross(&x_axis).normalize();

        let rotation = Rotation3::from_basis_unchecked(&[x_axis, y_axis, normal]);
        Some(Self::from_parts(
            UnitQuaternion::from_rotation_matrix(&rotation),
            vertices[0].coords,
        ))
    }

    /// The inverse transform. Rigid transforms are always invertible.
    pub fn inverse(&self) -> Self {
        Self {
            iso: self.iso.inverse(),
        }
    }

    pub fn apply_point(&self, point: &Point3<f64>) -> Point3<f64> {
        self.iso.transform_point(point)
    }

    /// Transforms a point list.
    pub fn apply(&self, points: &[Point3<f64>]) -> Vec<Point3<f64>> {
        points.iter().map(|p| self.iso.transform_point(p)).collect()
    }

    /// Homogeneous 4x4 matrix form.
    pub fn to_matrix(&self) -> Matrix4<f64> {
        self.iso.to_homogeneous()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul for Transform {
    type Output = Transform;

    fn mul(self, rhs: Transform) -> Transform {
        Transform {
            iso: self.iso * rhs.iso,
        }
    }
}

impl Mul<&Transform> for &Transform {
    type Output = Transform;

    fn mul(self, rhs: &Transform) -> Transform {
        Transform {
            iso: self.iso * rhs.iso,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn translation_moves_points() {
        let t = Transform::translation(10.0, 20.0, 30.0);
        let p = t.apply_point(&Point3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(p.x, 11.0);
        assert_relative_eq!(p.y, 22.0);
        assert_relative_eq!(p.z, 33.0);
    }

    #[test]
    fn rotate_90_degrees_around_z() {
        let t = Transform::rotation_z(FRAC_PI_2);
        let p = t.apply_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-10);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-10);
        assert_relative_eq!(p.z, 0.0, epsilon = 1e-10);
    }

    #[test]
    fn composition_applies_right_operand_first() {
        let rotate = Transform::rotation_z(FRAC_PI_2);
        let shift = Transform::translation(5.0, 0.0, 0.0);

        // Shift then rotate: (1,0,0) -> (6,0,0) -> (0,6,0)
        let p = (rotate * shift).apply_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-10);
        assert_relative_eq!(p.y, 6.0, epsilon = 1e-10);

        // Rotate then shift: (1,0,0) -> (0,1,0) -> (5,1,0)
        let q = (shift * rotate).apply_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(q.x, 5.0, epsilon = 1e-10);
        assert_relative_eq!(q.y, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn inverse_round_trips() {
        let t = Transform::translation(1.0, -2.0, 0.5) * Transform::rotation_z(0.3);
        let p = Point3::new(4.0, 5.0, 6.0);
        let back = t.inverse().apply_point(&t.apply_point(&p));
        assert_relative_eq!(back, p, epsilon = 1e-12);
    }

    #[test]
    fn degenerate_axis_is_identity() {
        let t = Transform::from_axis_angle(&Vector3::zeros(), 1.0);
        assert_eq!(t, Transform::identity());
    }

    #[test]
    fn align_face_flattens_wall() {
        // Wall at x = 3 facing +x
        let wall = vec![
            Point3::new(3.0, 0.0, 3.0),
            Point3::new(3.0, 0.0, 0.0),
            Point3::new(3.0, 3.0, 0.0),
            Point3::new(3.0, 3.0, 3.0),
        ];
        let face = Transform::align_face(&wall).unwrap();
        let flat = face.inverse().apply(&wall);

        for p in &flat {
            assert_relative_eq!(p.z, 0.0, epsilon = 1e-10);
        }
        // Normal of the flattened polygon points up
        let n = newell_normal(&flat).unwrap();
        assert_relative_eq!(n.z, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn align_face_rejects_degenerate() {
        let line = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        assert!(Transform::align_face(&line).is_none());
    }

    #[test]
    fn matrix_matches_point_application() {
        let t = Transform::translation(1.0, 2.0, 3.0) * Transform::rotation_z(0.7);
        let p = Point3::new(-1.0, 0.5, 2.0);
        let via_matrix = t.to_matrix().transform_point(&p);
        assert_relative_eq!(via_matrix, t.apply_point(&p), epsilon = 1e-12);
    }
}
