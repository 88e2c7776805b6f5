use std::f64::consts::PI;
use std::ops::RangeInclusive;

use anise::constants::SPEED_OF_LIGHT_KM_S;

use crate::prelude::Constellation;

/// Speed of light in m.s⁻¹
pub const SPEED_OF_LIGHT_M_S: f64 = SPEED_OF_LIGHT_KM_S * 1000.0;

/// BeiDou PRN ranges that designate geostationary vehicles
/// (BDS-2 C01..C05 and BDS-3 C59..C63).
pub const BEIDOU_GEO_PRN_RANGES: [RangeInclusive<u8>; 2] = [1..=5, 59..=63];

/// Fixed inclination compensation angle of the BeiDou GEO
/// user-defined inertial (GK) frame, in radians.
pub const GEO_INCLINATION_COMPENSATION_RAD: f64 = -5.0 * PI / 180.0;

/// Earth fixed [ReferenceFrame] in which a constellation expresses its broadcast orbits.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ReferenceFrame {
    /// World Geodetic System 1984 (GPS, IRNSS)
    WGS84,
    /// Galileo Terrestrial Reference Frame
    GTRF,
    /// China Geodetic Coordinate System 2000 (BeiDou)
    CGCS2000,
    /// Japanese Geodetic System (QZSS)
    JGS,
}

impl std::fmt::Display for ReferenceFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WGS84 => write!(f, "WGS84"),
            Self::GTRF => write!(f, "GTRF"),
            Self::CGCS2000 => write!(f, "CGCS2000"),
            Self::JGS => write!(f, "JGS"),
        }
    }
}

/// [Ellipsoid] gathers the Earth model constants each ICD uses
/// when resolving its broadcast orbits.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ellipsoid {
    /// Earth gravitational constant (m³.s⁻²)
    pub gm_m3_s2: f64,
    /// Earth angular velocity (rad.s⁻¹)
    pub angular_velocity_rad_s: f64,
    /// [ReferenceFrame] attached to this model
    pub frame: ReferenceFrame,
}

impl Ellipsoid {
    /// IS-GPS-200 constants
    pub const WGS84: Self = Self {
        gm_m3_s2: 3.986005E14,
        angular_velocity_rad_s: 7.2921151467E-5,
        frame: ReferenceFrame::WGS84,
    };

    /// Galileo OS-SIS-ICD constants
    pub const GTRF: Self = Self {
        gm_m3_s2: 3.986004418E14,
        angular_velocity_rad_s: 7.2921151467E-5,
        frame: ReferenceFrame::GTRF,
    };

    /// BDS-SIS-ICD constants
    pub const CGCS2000: Self = Self {
        gm_m3_s2: 3.986004418E14,
        angular_velocity_rad_s: 7.292115E-5,
        frame: ReferenceFrame::CGCS2000,
    };

    /// IS-QZSS constants
    pub const JGS: Self = Self {
        gm_m3_s2: 3.986005E14,
        angular_velocity_rad_s: 7.2921151467E-5,
        frame: ReferenceFrame::JGS,
    };

    /// Returns the [Ellipsoid] used by this [Constellation], if it broadcasts Keplerian orbits.
    pub fn from_constellation(constellation: Constellation) -> Option<Self> {
        match constellation {
            Constellation::GPS | Constellation::IRNSS => Some(Self::WGS84),
            Constellation::Galileo => Some(Self::GTRF),
            Constellation::BeiDou => Some(Self::CGCS2000),
            Constellation::QZSS => Some(Self::JGS),
            _ => None,
        }
    }

    /// Relativistic clock correction constant F = -2 √GM / c² (s.m^-1/2)
    pub fn relativity_constant(&self) -> f64 {
        -2.0 * self.gm_m3_s2.sqrt() / SPEED_OF_LIGHT_M_S.powi(2)
    }
}
