//! Definitions of celestial bodies and the static system description.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::libration::LibrationPoint;

/// A celestial or infrastructure body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Name of this body, unique within the system.
    pub name: Arc<str>,
    /// Mass (`kg`). Only required for bodies anchoring a Lagrange pair.
    #[serde(default)]
    pub mass_kg: Option<f64>,
    /// How this body is positioned, if it is positioned at all.
    #[serde(default)]
    pub orbit: Option<OrbitSpec>,
    /// Rendering attributes, passed through untouched.
    #[serde(default)]
    pub render: RenderHints,
}

/// Positioning rule for a body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrbitSpec {
    /// Name of the body this orbit is relative to; the world origin if
    /// absent.
    #[serde(default)]
    pub parent: Option<Arc<str>>,
    pub model: OrbitModel,
}

/// The supported positioning models.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum OrbitModel {
    /// Constant offset from the parent (`km`).
    #[serde(rename = "fixed")]
    Fixed { x_km: f64, y_km: f64 },
    /// Planar elliptical orbit around the parent.
    #[serde(rename = "keplerian_2d")]
    Keplerian2D {
        /// Semi-major axis (`km`).
        a_km: f64,
        /// Eccentricity, in `[0, 1)`.
        e: f64,
        /// Orbital period (`sec`).
        period_s: f64,
        /// Simulated time at which the mean anomaly equals `m0` (`sec`).
        #[serde(default)]
        epoch_s: f64,
        /// Mean anomaly at the epoch (`rad`).
        #[serde(default)]
        m0: f64,
    },
    /// Annular shell around the parent, drawn as a ring. The body itself
    /// anchors to the ring's `+x` side.
    #[serde(rename = "ring_marker")]
    RingMarker {
        /// Ring radius (`km`).
        radius_km: f64,
        /// Display label for the shell.
        label: Arc<str>,
    },
}

/// A body positioned from two already-resolved bodies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DerivedNode {
    /// Name the computed position is recorded under.
    pub body: Arc<str>,
    pub model: DerivedModel,
    /// Rendering attributes, passed through untouched.
    #[serde(default)]
    pub render: RenderHints,
}

/// The supported derivation models.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DerivedModel {
    /// A libration point of the `primary`/`secondary` pair.
    #[serde(rename = "lagrange_cr3bp")]
    LagrangeCr3bp {
        primary: Arc<str>,
        secondary: Arc<str>,
        point: LibrationPoint,
    },
}

/// Rendering attributes the engine carries but never reads.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderHints {
    /// Fill color as a `#rrggbb` string.
    #[serde(default)]
    pub color: Option<Arc<str>>,
    /// Draw radius (`px`).
    #[serde(default)]
    pub radius: Option<f64>,
    /// Display label; the body name if absent.
    #[serde(default)]
    pub label: Option<Arc<str>>,
}

/// The full static system description, loaded once per session.
///
/// Body declaration order is preserved; it is the order the engine walks
/// during pass resolution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolarSystem {
    pub bodies: Vec<Body>,
    #[serde(default)]
    pub derived: Vec<DerivedNode>,
    /// Scale factor echoed to the rendering layer, never interpreted here.
    #[serde(default = "default_scale")]
    pub km_to_px: f64,
    /// Multiplier applied to epoch-relative time in the keplerian rule.
    #[serde(default = "default_scale")]
    pub time_scale: f64,
}

impl Default for SolarSystem {
    fn default() -> Self {
        Self {
            bodies: Vec::new(),
            derived: Vec::new(),
            km_to_px: 1.0,
            time_scale: 1.0,
        }
    }
}

fn default_scale() -> f64 {
    1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orbit_models_round_trip_through_ron() {
        let body = Body {
            name: "Moon".into(),
            mass_kg: Some(7.342e22),
            orbit: Some(OrbitSpec {
                parent: Some("Earth".into()),
                model: OrbitModel::Keplerian2D {
                    a_km: 384_400.0,
                    e: 0.0549,
                    period_s: 2_360_591.0,
                    epoch_s: 0.0,
                    m0: 1.2,
                },
            }),
            render: RenderHints::default(),
        };
        let text = ron::to_string(&body).unwrap();
        assert!(text.contains("keplerian_2d"));
        assert_eq!(ron::from_str::<Body>(&text).unwrap(), body);
    }

    #[test]
    fn defaults_fill_in_for_sparse_configs() {
        let system: SolarSystem = ron::from_str(
            r#"(bodies: [(name: "Sol", orbit: Some((model: fixed(x_km: 0.0, y_km: 0.0))))])"#,
        )
        .unwrap();
        assert!((system.km_to_px - 1.0).abs() < f64::EPSILON);
        assert!((system.time_scale - 1.0).abs() < f64::EPSILON);
        assert!(system.derived.is_empty());
        assert_eq!(system.bodies[0].mass_kg, None);
        assert_eq!(system.bodies[0].orbit.as_ref().unwrap().parent, None);
    }

    #[test]
    fn unknown_point_labels_are_rejected() {
        let text = r#"(
            bodies: [],
            derived: [(
                body: "bogus",
                model: lagrange_cr3bp(primary: "A", secondary: "B", point: L9),
            )],
        )"#;
        assert!(ron::from_str::<SolarSystem>(text).is_err());
    }
}
