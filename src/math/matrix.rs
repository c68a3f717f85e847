//! Transform constructors over `glam`'s f64 4x4 matrices.
//!
//! Composition convention: the stack top is the left operand and the new
//! transform is the right operand (`top = top * m`), so drawing commands see
//! every transform issued since the frame's base identity, outermost first.

use glam::{DMat4, DVec3};

use crate::script::command::Axis;

pub fn identity() -> DMat4 {
    DMat4::IDENTITY
}

pub fn translation(delta: DVec3) -> DMat4 {
    DMat4::from_translation(delta)
}

pub fn scaling(factors: DVec3) -> DMat4 {
    DMat4::from_scale(factors)
}

/// Rotation about one axis. `degrees` is converted to radians internally.
pub fn rotation(axis: Axis, degrees: f64) -> DMat4 {
    let theta = degrees.to_radians();
    match axis {
        Axis::X => DMat4::from_rotation_x(theta),
        Axis::Y => DMat4::from_rotation_y(theta),
        Axis::Z => DMat4::from_rotation_z(theta),
    }
}

pub fn compose(top: DMat4, m: DMat4) -> DMat4 {
    top * m
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn rotation_converts_degrees() {
        let m = rotation(Axis::Z, 90.0);
        let p = m.transform_point3(DVec3::new(1.0, 0.0, 0.0));
        assert!(p.abs_diff_eq(DVec3::new(0.0, 1.0, 0.0), EPS));
    }

    #[test]
    fn zero_degree_rotation_is_identity() {
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            assert!(rotation(axis, 0.0).abs_diff_eq(identity(), EPS));
        }
    }

    #[test]
    fn compose_applies_rightmost_transform_first() {
        // Translate then scale: the point is scaled before it is moved.
        let m = compose(translation(DVec3::new(10.0, 0.0, 0.0)), scaling(DVec3::splat(2.0)));
        let p = m.transform_point3(DVec3::new(1.0, 1.0, 1.0));
        assert!(p.abs_diff_eq(DVec3::new(12.0, 2.0, 2.0), EPS));
    }
}
