use log::{debug, trace, warn};
use nalgebra::Vector3;

use std::f64::consts::TAU;

use crate::{
    cfg::KeplerOpts,
    constants::GEO_INCLINATION_COMPENSATION_RAD,
    error::Error,
    kepler::solve_eccentric_anomaly,
    prelude::{Epoch, OrbitModel, OrbitRecord, Xvt},
    rotation::{frame_rotation_x, plane_to_frame, rotating_frame_z},
};

/// Intermediate quantities of one propagation, for diagnostics.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Trace {
    /// Elapsed time since ToE (s)
    pub tk_s: f64,
    /// Mean anomaly, reduced to [0, 2π) (rad)
    pub mean_anomaly_rad: f64,
    /// Eccentric anomaly (rad)
    pub eccentric_anomaly_rad: f64,
    /// Kepler solver iterations
    pub iterations: usize,
    /// True anomaly (rad)
    pub true_anomaly_rad: f64,
    /// Corrected argument of latitude (rad)
    pub argument_of_latitude_rad: f64,
    /// Corrected radius (m)
    pub radius_m: f64,
    /// Corrected inclination (rad)
    pub inclination_rad: f64,
    /// Longitude of the ascending node (rad)
    pub node_rad: f64,
    /// Position in the orbital plane (m)
    pub orbital_plane_m: Vector3<f64>,
    /// Position in the GK inertial frame (m), for geostationary vehicles only
    pub gk_frame_m: Option<Vector3<f64>>,
}

impl OrbitRecord {
    /// Resolves the satellite state at `t` with default [KeplerOpts].
    /// `t` may be expressed in any timescale.
    pub fn sv_xvt(&self, t: Epoch) -> Result<Xvt, Error> {
        self.sv_xvt_with(t, &KeplerOpts::default())
    }

    /// Resolves the satellite state at `t` with desired [KeplerOpts].
    pub fn sv_xvt_with(&self, t: Epoch, opts: &KeplerOpts) -> Result<Xvt, Error> {
        let (xvt, _) = self.sv_xvt_traced(t, opts)?;
        Ok(xvt)
    }

    /// Resolves the satellite state at `t`, also returning the intermediate [Trace].
    /// Health is not considered here: unhealthy vehicles propagate normally.
    pub fn sv_xvt_traced(&self, t: Epoch, opts: &KeplerOpts) -> Result<(Xvt, Trace), Error> {
        self.loaded()?;

        if !self.has_valid_orbit() {
            return Err(Error::InvalidOrbit(self.sv));
        }

        let model = self.model()?;
        let ellipsoid = model.ellipsoid();
        let gm = ellipsoid.gm_m3_s2;
        let omega_e = ellipsoid.angular_velocity_rad_s;

        let kepler = &self.keplerian;
        let perturbations = &self.perturbations;

        let e = kepler.eccentricity;
        let a0 = kepler.semi_major_axis_m;
        let (cus, cuc) = perturbations.cus_cuc_rad;
        let (cis, cic) = perturbations.cis_cic_rad;
        let (crs, crc) = perturbations.crs_crc_m;

        let t_k = (t - self.toe).to_seconds();

        let a_k = a0 + kepler.a_dot_m_s * t_k;

        let n0 = (gm / a0.powi(3)).sqrt();
        let n = n0 + perturbations.dn_rad_s + 0.5 * perturbations.dn_dot_rad_s2 * t_k;
        let m_k = (kepler.m0_rad + n * t_k).rem_euclid(TAU);

        let solution = solve_eccentric_anomaly(m_k, e, opts);

        if !solution.converged {
            warn!(
                "{}({}) - kepler solver did not converge after {} iterations (|dE|={:.3E})",
                t, self.sv, solution.iterations, solution.last_correction_rad
            );
        }

        let e_k = solution.eccentric_anomaly_rad;
        let (sin_e_k, cos_e_k) = e_k.sin_cos();
        let one_minus_ecos = 1.0 - e * cos_e_k;
        let sqrt_1_e2 = (1.0 - e.powi(2)).sqrt();

        let v_k = (sqrt_1_e2 * sin_e_k).atan2(cos_e_k - e);

        let phi_k = v_k + kepler.omega_rad;
        let (sin_2phi, cos_2phi) = (2.0 * phi_k).sin_cos();

        let u_k = phi_k + cus * sin_2phi + cuc * cos_2phi;
        let r_k = a_k * one_minus_ecos + crs * sin_2phi + crc * cos_2phi;
        let i_k = kepler.i0_rad + perturbations.idot_rad_s * t_k + cis * sin_2phi + cic * cos_2phi;

        // derivatives
        let m_dot = n0 + perturbations.dn_rad_s + perturbations.dn_dot_rad_s2 * t_k;
        let e_dot = m_dot / one_minus_ecos;
        let phi_dot = e_dot * sqrt_1_e2 / one_minus_ecos;

        let u_dot = phi_dot * (1.0 + 2.0 * (cus * cos_2phi - cuc * sin_2phi));
        let r_dot = kepler.a_dot_m_s * one_minus_ecos
            + a_k * e * sin_e_k * e_dot
            + 2.0 * (crs * cos_2phi - crc * sin_2phi) * phi_dot;
        let i_dot = perturbations.idot_rad_s + 2.0 * (cis * cos_2phi - cic * sin_2phi) * phi_dot;

        let (sin_u_k, cos_u_k) = u_k.sin_cos();

        let plane_pos = Vector3::new(r_k * cos_u_k, r_k * sin_u_k, 0.0);
        let plane_vel = Vector3::new(
            r_dot * cos_u_k - r_k * u_dot * sin_u_k,
            r_dot * sin_u_k + r_k * u_dot * cos_u_k,
            0.0,
        );

        let toe_sow = self.weekly_toe_seconds(model);

        let node_rad;
        let mut gk_frame_m = None;

        let (position_m, velocity_m_s) = match model {
            OrbitModel::BeiDouGeo => {
                // node in the GK inertial frame
                node_rad =
                    kepler.omega0_rad + perturbations.omega_dot_rad_s * t_k - omega_e * toe_sow;

                let (gk_pos, gk_vel) = plane_to_frame(
                    plane_pos,
                    plane_vel,
                    i_k,
                    i_dot,
                    node_rad,
                    perturbations.omega_dot_rad_s,
                );

                gk_frame_m = Some(gk_pos);

                let rot_x = frame_rotation_x(GEO_INCLINATION_COMPENSATION_RAD);
                rotating_frame_z(rot_x * gk_pos, rot_x * gk_vel, omega_e * t_k, omega_e)
            },
            _ => {
                let node_rate = perturbations.omega_dot_rad_s - omega_e;
                node_rad = kepler.omega0_rad + node_rate * t_k - omega_e * toe_sow;

                plane_to_frame(plane_pos, plane_vel, i_k, i_dot, node_rad, node_rate)
            },
        };

        let dt_c = (t - self.toc).to_seconds();
        let (clock_bias_s, clock_drift_s_s) = self.clock.evaluate(dt_c);

        let relativity_s = ellipsoid.relativity_constant() * e * a_k.sqrt() * sin_e_k;

        trace!(
            "{}({}) - {} tk={:.3} M={:.12} E={:.12} v={:.12} u={:.12} r={:.3} i={:.12} Omega={:.12}",
            t,
            self.sv,
            model,
            t_k,
            m_k,
            e_k,
            v_k,
            u_k,
            r_k,
            i_k,
            node_rad
        );

        debug!(
            "{}({}) - kepler solving x_km={} y_km={} z_km={} t_k={}",
            t,
            self.sv,
            position_m[0] / 1000.0,
            position_m[1] / 1000.0,
            position_m[2] / 1000.0,
            t_k
        );

        let xvt = Xvt {
            epoch: t,
            position_m,
            velocity_m_s,
            clock_bias_s,
            clock_drift_s_s,
            relativity_s,
            frame: ellipsoid.frame,
            kepler: solution,
        };

        let trace = Trace {
            tk_s: t_k,
            mean_anomaly_rad: m_k,
            eccentric_anomaly_rad: e_k,
            iterations: solution.iterations,
            true_anomaly_rad: v_k,
            argument_of_latitude_rad: u_k,
            radius_m: r_k,
            inclination_rad: i_k,
            node_rad,
            orbital_plane_m: plane_pos,
            gk_frame_m,
        };

        Ok((xvt, trace))
    }
}
