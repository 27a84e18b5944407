//! Multi-pass resolution of body positions at a simulated instant.

use std::{collections::HashMap, f64::consts, sync::Arc};

use color_eyre::eyre::{self, bail};
use libm::{atan2, cos, sin};
use nalgebra::Vector2;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{
    bodies::{DerivedModel, OrbitModel, SolarSystem},
    kepler,
    libration::{self, LibrationPoint},
    math,
};

/// Number of resolution passes per snapshot, bounding the supported
/// parent-chain depth. Bodies deeper than this stay unresolved for the tick.
pub const RESOLUTION_PASSES: usize = 6;

/// An annular shell to draw, produced by `ring_marker` orbits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    /// World position of the ring center (`km`).
    pub center: Vector2<f64>,
    /// Ring radius (`km`).
    pub radius_km: f64,
    pub label: Arc<str>,
}

/// Everything the rendering layer needs for one simulated instant.
///
/// A snapshot fully replaces its predecessor; bodies whose dependency chain
/// did not resolve this tick are simply absent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PositionSnapshot {
    /// World positions by body name (`km`).
    pub positions: HashMap<Arc<str>, Vector2<f64>>,
    /// Ring shells by body name.
    pub rings: HashMap<Arc<str>, Ring>,
    /// Scale factor echoed from the system description.
    pub km_to_px: f64,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct LibrationKey {
    primary: Arc<str>,
    secondary: Arc<str>,
    point: LibrationPoint,
}

/// Computes [`PositionSnapshot`]s from a [`SolarSystem`] description.
///
/// Holds no per-tick state: a snapshot is a pure function of the system and
/// the simulated time. The only mutable state is a memo of normalized
/// libration offsets, which depend on body masses alone and never change
/// after first computation.
pub struct PositionEngine {
    system: SolarSystem,
    libration_cache: RwLock<HashMap<LibrationKey, Vector2<f64>>>,
}

impl PositionEngine {
    /// Validate `system` and build an engine around it.
    ///
    /// Rejects any `keplerian_2d` orbit whose eccentricity falls outside
    /// `[0, 1)`; the anomaly solver is only meaningful for closed orbits.
    pub fn new(system: SolarSystem) -> eyre::Result<Self> {
        for body in &system.bodies {
            if let Some(spec) = &body.orbit {
                if let OrbitModel::Keplerian2D { e, .. } = spec.model {
                    if !(0.0..1.0).contains(&e) {
                        bail!("body {} has eccentricity {e}, outside [0, 1)", body.name);
                    }
                }
            }
        }
        Ok(Self {
            system,
            libration_cache: RwLock::new(HashMap::new()),
        })
    }

    /// Compute the snapshot for `sim_time_s` simulated seconds since epoch.
    ///
    /// Fails only on configuration errors surfaced lazily (a Lagrange pair
    /// with missing or non-positive mass, or a collinear bracket with no
    /// root). An unresolvable body is not an error; it is left out.
    pub fn compute_positions(&self, sim_time_s: f64) -> eyre::Result<PositionSnapshot> {
        let mut positions: HashMap<Arc<str>, Vector2<f64>> = HashMap::new();
        let mut rings: HashMap<Arc<str>, Ring> = HashMap::new();

        for pass in 0..RESOLUTION_PASSES {
            let mut resolved = 0_usize;
            for body in &self.system.bodies {
                let Some(spec) = &body.orbit else { continue };
                if positions.contains_key(&body.name) {
                    continue;
                }
                let parent_pos = match spec.parent.as_deref() {
                    Some(parent) => match positions.get(parent) {
                        Some(pos) => *pos,
                        // Unresolved so far; retry next pass.
                        None => continue,
                    },
                    None => Vector2::zeros(),
                };
                let pos = match &spec.model {
                    OrbitModel::Fixed { x_km, y_km } => parent_pos + Vector2::new(*x_km, *y_km),
                    OrbitModel::Keplerian2D {
                        a_km,
                        e,
                        period_s,
                        epoch_s,
                        m0,
                    } => {
                        let dt = (sim_time_s - epoch_s) * self.system.time_scale;
                        let ma = math::wrap_radians(m0 + consts::TAU * dt / period_s);
                        let (ta, r) = kepler::ta_and_radius(ma, *e, *a_km);
                        parent_pos + Vector2::new(r * cos(ta), r * sin(ta))
                    }
                    OrbitModel::RingMarker { radius_km, label } => {
                        rings.insert(
                            body.name.clone(),
                            Ring {
                                center: parent_pos,
                                radius_km: *radius_km,
                                label: label.clone(),
                            },
                        );
                        parent_pos + Vector2::new(*radius_km, 0.0)
                    }
                };
                positions.insert(body.name.clone(), pos);
                resolved += 1;
            }
            trace!("pass {pass}: resolved {resolved} bodies");
            if resolved == 0 {
                // Positions only accumulate, so a pass that resolves nothing
                // is a fixed point.
                break;
            }
        }

        for node in &self.system.derived {
            let DerivedModel::LagrangeCr3bp {
                primary,
                secondary,
                point,
            } = &node.model;
            let (Some(&primary_pos), Some(&secondary_pos)) =
                (positions.get(primary), positions.get(secondary))
            else {
                trace!("derived body {} skipped: endpoint unresolved", node.body);
                continue;
            };
            let delta = secondary_pos - primary_pos;
            let separation = delta.norm();
            let theta = atan2(delta.y, delta.x);
            let offset = self.libration_offset(primary, secondary, *point)?;
            let world = primary_pos + math::rotate(offset * separation, theta);
            positions.insert(node.body.clone(), world);
        }

        Ok(PositionSnapshot {
            positions,
            rings,
            km_to_px: self.system.km_to_px,
        })
    }

    /// Normalized offset of `point` for the pair, memoized for the engine's
    /// lifetime. The libration equation is solved at most once per
    /// `(primary, secondary, point)` triple.
    fn libration_offset(
        &self,
        primary: &Arc<str>,
        secondary: &Arc<str>,
        point: LibrationPoint,
    ) -> eyre::Result<Vector2<f64>> {
        let key = LibrationKey {
            primary: primary.clone(),
            secondary: secondary.clone(),
            point,
        };
        if let Some(offset) = self.libration_cache.read().get(&key) {
            return Ok(*offset);
        }
        let m1 = self.body_mass(primary)?;
        let m2 = self.body_mass(secondary)?;
        let mu = m2 / (m1 + m2);
        let offset = libration::libration_offset(mu, point)?;
        debug!("solved {point} for {primary}/{secondary}: mu = {mu}");
        self.libration_cache.write().insert(key, offset);
        Ok(offset)
    }

    fn body_mass(&self, name: &str) -> eyre::Result<f64> {
        let Some(body) = self.system.bodies.iter().find(|body| &*body.name == name) else {
            bail!("Lagrange pair references unknown body {name}");
        };
        match body.mass_kg {
            Some(mass) if mass > 0.0 => Ok(mass),
            Some(mass) => bail!("body {name} has non-positive mass {mass} kg"),
            None => bail!("body {name} has no mass, required for a Lagrange pair"),
        }
    }
}
