use anise::math::Vector6;

use crate::{
    constants::ReferenceFrame,
    kepler::KeplerSolution,
    prelude::{Epoch, Frame, Orbit, Vector3},
};

/// [Xvt] is the satellite state resolved from one broadcast ephemeris:
/// Earth fixed position and velocity, onboard clock state and
/// relativistic correction.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Xvt {
    /// [Epoch] of resolution
    pub epoch: Epoch,
    /// Earth fixed position (m)
    pub position_m: Vector3<f64>,
    /// Earth fixed velocity (m.s⁻¹)
    pub velocity_m_s: Vector3<f64>,
    /// Clock bias (s)
    pub clock_bias_s: f64,
    /// Clock drift (s.s⁻¹)
    pub clock_drift_s_s: f64,
    /// Relativistic clock correction (s)
    pub relativity_s: f64,
    /// [ReferenceFrame] the state is expressed in
    pub frame: ReferenceFrame,
    /// Kepler solver diagnostics
    pub kepler: KeplerSolution,
}

impl Xvt {
    /// Clock bias, corrected for the relativistic effect (s)
    pub fn corrected_clock_bias(&self) -> f64 {
        self.clock_bias_s + self.relativity_s
    }

    /// Converts this [Xvt] to an [Orbit] expressed in the desired Earth fixed [Frame].
    pub fn to_orbit(&self, frame: Frame) -> Orbit {
        let pos_vel_km_s = Vector6::new(
            self.position_m[0] / 1.0E3,
            self.position_m[1] / 1.0E3,
            self.position_m[2] / 1.0E3,
            self.velocity_m_s[0] / 1.0E3,
            self.velocity_m_s[1] / 1.0E3,
            self.velocity_m_s[2] / 1.0E3,
        );
        Orbit::from_cartesian_pos_vel(pos_vel_km_s, self.epoch, frame)
    }
}
