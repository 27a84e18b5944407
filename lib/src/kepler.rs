//! Two-dimensional Kepler orbit propagation.

use libm::{atan2, cos, sin, sqrt};

/// Newton-Raphson step count for [`ma_to_ea`].
pub const NEWTON_STEPS: usize = 7;

/// Solve Kepler's equation `E - e*sin(E) = M` for the eccentric anomaly (`rad`).
///
/// Runs exactly [`NEWTON_STEPS`] Newton-Raphson iterations from the seed
/// `E0 = M + e*sin(M)`, with no convergence check. Total for any finite
/// input; callers keep `e` in `[0, 1)`.
pub fn ma_to_ea(ma: f64, e: f64) -> f64 {
    let mut ea = ma + e * sin(ma);
    for _ in 0..NEWTON_STEPS {
        ea -= (ea - e * sin(ea) - ma) / (1.0 - e * cos(ea));
    }
    ea
}

/// Convert eccentric anomaly (`rad`) to true anomaly (`rad`).
pub fn ea_to_ta(ea: f64, e: f64) -> f64 {
    2.0 * atan2(
        sqrt(1.0 + e) * sin(ea / 2.0),
        sqrt(1.0 - e) * cos(ea / 2.0),
    )
}

/// True anomaly (`rad`) and orbital radius (`km`) at mean anomaly `ma`,
/// for eccentricity `e` and semi-major axis `a` (`km`).
pub fn ta_and_radius(ma: f64, e: f64, a: f64) -> (f64, f64) {
    let ea = ma_to_ea(ma, e);
    (ea_to_ta(ea, e), a * (1.0 - e * cos(ea)))
}

#[cfg(test)]
mod tests {
    use std::f64::consts;

    use super::*;
    use crate::math::wrap_radians;

    #[test]
    fn kepler_residual_vanishes() {
        for e in [0.0, 0.1, 0.3, 0.5, 0.7, 0.9] {
            for i in 0..16 {
                let ma = f64::from(i) * consts::TAU / 16.0 - consts::PI;
                let ea = ma_to_ea(ma, e);
                assert!(
                    (ea - e * sin(ea) - ma).abs() < 1e-9,
                    "residual too large at e={e}, ma={ma}"
                );
            }
        }
    }

    #[test]
    fn circular_orbit_is_identity() {
        for i in 0..12 {
            let ma = f64::from(i) * consts::TAU / 12.0;
            let (ta, r) = ta_and_radius(ma, 0.0, 384_400.0);
            assert!((ma_to_ea(ma, 0.0) - ma).abs() < 1e-15);
            assert!((wrap_radians(ta) - wrap_radians(ma)).abs() < 1e-12);
            assert!((r - 384_400.0).abs() < 1e-6);
        }
    }

    #[test]
    fn near_circular_radius_stays_inside_the_apsis_envelope() {
        let a = 42_164.0;
        let e = 1e-6;
        for ma in [0.0, 0.4, 1.234, 2.9, 4.5, 6.1] {
            let (ta, r) = ta_and_radius(ma, e, a);
            assert!((wrap_radians(ta) - wrap_radians(ma)).abs() < 2.0 * e);
            assert!(r >= a * (1.0 - e) - 1e-9);
            assert!(r <= a * (1.0 + e) + 1e-9);
        }
    }

    #[test]
    fn apsis_radii() {
        let (ta, r_pe) = ta_and_radius(0.0, 0.3, 10_000.0);
        assert!(ta.abs() < 1e-12);
        assert!((r_pe - 7_000.0).abs() < 1e-6);

        let (_, r_ap) = ta_and_radius(consts::PI, 0.3, 10_000.0);
        assert!((r_ap - 13_000.0).abs() < 1e-6);
    }

    #[test]
    fn true_anomaly_leads_mean_anomaly_before_apoapsis() {
        for ma in [0.1, 0.5, 1.0, 2.0] {
            let (ta, _) = ta_and_radius(ma, 0.5, 1.0);
            assert!(ta > ma && ta < consts::PI);
        }
    }
}
