//! Equilibrium points of the circular restricted three-body problem.

use std::fmt;

use color_eyre::eyre::{self, bail};
use libm::{fabs, sqrt};
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Margin keeping bisection brackets clear of the singularities at the
/// two primaries.
const BRACKET_EPS: f64 = 1e-6;
/// Bisection iteration cap.
const MAX_BISECTIONS: usize = 250;
/// Bracket width at which bisection stops.
const TOLERANCE: f64 = 1e-14;

/// One of the five libration points of a two-body system.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LibrationPoint {
    L1,
    L2,
    L3,
    L4,
    L5,
}

impl fmt::Display for LibrationPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::L1 => write!(f, "L1"),
            Self::L2 => write!(f, "L2"),
            Self::L3 => write!(f, "L3"),
            Self::L4 => write!(f, "L4"),
            Self::L5 => write!(f, "L5"),
        }
    }
}

/// Net axial acceleration in the rotating barycentric frame at `x`, for a
/// secondary-to-total mass ratio `mu`. The collinear points are its roots.
fn axis_balance(x: f64, mu: f64) -> f64 {
    let d1 = x + mu;
    let d2 = x - (1.0 - mu);
    let r1 = fabs(d1);
    let r2 = fabs(d2);
    x - (1.0 - mu) * d1 / (r1 * r1 * r1) - mu * d2 / (r2 * r2 * r2)
}

fn bisect(mu: f64, mut lo: f64, mut hi: f64, point: LibrationPoint) -> eyre::Result<f64> {
    let mut f_lo = axis_balance(lo, mu);
    let f_hi = axis_balance(hi, mu);
    if f_lo * f_hi > 0.0 {
        bail!("no sign change in {point} bracket [{lo}, {hi}] for mass ratio {mu}");
    }
    for _ in 0..MAX_BISECTIONS {
        if hi - lo < TOLERANCE {
            break;
        }
        let mid = 0.5 * (lo + hi);
        let f_mid = axis_balance(mid, mu);
        if fabs(f_mid) < TOLERANCE {
            return Ok(mid);
        }
        if f_lo * f_mid < 0.0 {
            hi = mid;
        } else {
            lo = mid;
            f_lo = f_mid;
        }
    }
    Ok(0.5 * (lo + hi))
}

/// Normalized planar offset of `point` from the primary, for a system with
/// secondary-to-total mass ratio `mu`.
///
/// Distances are in units of the primary-secondary separation, in the
/// rotating frame with the secondary on the `+x` axis. Scale by the actual
/// separation and rotate by the secondary's position angle to recover world
/// coordinates.
///
/// The triangular points come from the closed form; the collinear points are
/// bisected out of [`axis_balance`]. Fails when a collinear bracket does not
/// straddle a root, which happens for degenerate mass ratios.
pub fn libration_offset(mu: f64, point: LibrationPoint) -> eyre::Result<Vector2<f64>> {
    let x_primary = -mu;
    let x_secondary = 1.0 - mu;
    let bary = match point {
        LibrationPoint::L4 => Vector2::new(0.5 - mu, sqrt(3.0) / 2.0),
        LibrationPoint::L5 => Vector2::new(0.5 - mu, -sqrt(3.0) / 2.0),
        LibrationPoint::L1 => Vector2::new(
            bisect(mu, x_primary + BRACKET_EPS, x_secondary - BRACKET_EPS, point)?,
            0.0,
        ),
        LibrationPoint::L2 => Vector2::new(bisect(mu, x_secondary + BRACKET_EPS, 2.0, point)?, 0.0),
        LibrationPoint::L3 => Vector2::new(bisect(mu, -2.0, x_primary - BRACKET_EPS, point)?, 0.0),
    };
    // Shift out of the barycentric frame so the primary sits at the origin.
    Ok(Vector2::new(bary.x + mu, bary.y))
}
