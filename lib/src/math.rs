//! Math utilities.

use std::f64::consts;

use nalgebra::{Rotation2, Vector2};

/// Rotate a 2D vector counterclockwise by `theta` radians.
pub fn rotate(v: Vector2<f64>, theta: f64) -> Vector2<f64> {
    Rotation2::new(theta) * v
}

/// Wrap an angle into `[0, 2π)`.
pub fn wrap_radians(theta: f64) -> f64 {
    theta.rem_euclid(consts::TAU)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotate_quarter_turn() {
        let v = rotate(Vector2::new(1.0, 0.0), consts::FRAC_PI_2);
        assert!(v.x.abs() < 1e-15);
        assert!((v.y - 1.0).abs() < 1e-15);
    }

    #[test]
    fn rotate_preserves_length() {
        let v = Vector2::new(3.0, -4.0);
        for theta in [0.0, 0.7, 2.0, -1.3, 11.0] {
            assert!((rotate(v, theta).norm() - 5.0).abs() < 1e-12);
        }
    }

    #[test]
    fn wrap_negative_angles() {
        assert!((wrap_radians(-consts::FRAC_PI_2) - 1.5 * consts::PI).abs() < 1e-12);
        assert!(wrap_radians(consts::TAU) < 1e-15);
        assert!((wrap_radians(5.0 * consts::TAU + 1.0) - 1.0).abs() < 1e-12);
    }
}
