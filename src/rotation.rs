//! Rotation composition used by the frame transforms.
//! nalgebra rotations are active (they rotate vectors): the frame (passive)
//! rotations found in the ICDs are their inverse.

use nalgebra::{Rotation3, Vector3};

/// Frame rotation about the X axis, as defined in the ICDs:
/// | 1    0      0   |
/// | 0  cos(a) sin(a)|
/// | 0 -sin(a) cos(a)|
pub fn frame_rotation_x(angle_rad: f64) -> Rotation3<f64> {
    Rotation3::from_axis_angle(&Vector3::x_axis(), -angle_rad)
}

/// Frame rotation about the Z axis, as defined in the ICDs:
/// | cos(a) sin(a) 0 |
/// |-sin(a) cos(a) 0 |
/// |   0      0    1 |
pub fn frame_rotation_z(angle_rad: f64) -> Rotation3<f64> {
    Rotation3::from_axis_angle(&Vector3::z_axis(), -angle_rad)
}

/// Rotates an orbital plane state vector by the inclination then the node longitude,
/// i.e. Rz(Ω) Rx(i) [x, y, 0], where both angles evolve in time.
/// Returns (position, velocity).
pub(crate) fn plane_to_frame(
    plane_pos: Vector3<f64>,
    plane_vel: Vector3<f64>,
    inclination_rad: f64,
    inclination_rate_rad_s: f64,
    node_rad: f64,
    node_rate_rad_s: f64,
) -> (Vector3<f64>, Vector3<f64>) {
    let rot_x = Rotation3::from_axis_angle(&Vector3::x_axis(), inclination_rad);
    let rot_z = Rotation3::from_axis_angle(&Vector3::z_axis(), node_rad);

    let inclined = rot_x * plane_pos;
    let pos = rot_z * inclined;

    // d/dt(Rz Rx p) = Rz Rx dp + dΩ z × (Rz Rx p) + di Rz (x × Rx p)
    let vel = rot_z * (rot_x * plane_vel)
        + node_rate_rad_s * Vector3::z().cross(&pos)
        + inclination_rate_rad_s * (rot_z * Vector3::x().cross(&inclined));

    (pos, vel)
}

/// Applies a frame that rotates at constant rate about Z: position is rotated,
/// velocity is rotated and corrected for the transport term.
/// `angle_rad` is the current frame angle and `rate_rad_s` its rate.
pub(crate) fn rotating_frame_z(
    pos: Vector3<f64>,
    vel: Vector3<f64>,
    angle_rad: f64,
    rate_rad_s: f64,
) -> (Vector3<f64>, Vector3<f64>) {
    let rot = frame_rotation_z(angle_rad);
    let rotated = rot * pos;
    let vel = rot * vel - rate_rad_s * Vector3::z().cross(&rotated);
    (rotated, vel)
}
