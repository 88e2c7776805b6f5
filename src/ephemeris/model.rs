use crate::{
    constants::{Ellipsoid, BEIDOU_GEO_PRN_RANGES},
    error::Error,
    prelude::{Constellation, TimeScale, SV},
};

/// [OrbitModel] designates the constellation specific variant of the
/// broadcast Keplerian model, which drives the Earth model constants,
/// the fit interval and the propagation sequence.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OrbitModel {
    /// IS-GPS-200 model
    Gps,
    /// IS-QZSS model
    Qzss,
    /// Galileo OS-SIS-ICD model
    Galileo,
    /// BDS-SIS-ICD model, for MEO and IGSO vehicles
    BeiDou,
    /// BDS-SIS-ICD model, for GEO vehicles, which requires
    /// an intermediate inertial frame
    BeiDouGeo,
    /// IRNSS-SIS-ICD model
    Irnss,
}

impl std::fmt::Display for OrbitModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gps => write!(f, "GPS"),
            Self::Qzss => write!(f, "QZSS"),
            Self::Galileo => write!(f, "Galileo"),
            Self::BeiDou => write!(f, "BDS"),
            Self::BeiDouGeo => write!(f, "BDS-GEO"),
            Self::Irnss => write!(f, "IRNSS"),
        }
    }
}

/// Returns true if this BeiDou PRN designates a geostationary vehicle
pub(crate) fn is_beidou_geo_prn(prn: u8) -> bool {
    BEIDOU_GEO_PRN_RANGES
        .iter()
        .any(|range| range.contains(&prn))
}

impl OrbitModel {
    /// Identifies the [OrbitModel] of this [SV]. Only constellations that
    /// broadcast Keplerian orbits are supported.
    pub fn from_sv(sv: SV) -> Result<Self, Error> {
        match sv.constellation {
            Constellation::GPS => Ok(Self::Gps),
            Constellation::QZSS => Ok(Self::Qzss),
            Constellation::Galileo => Ok(Self::Galileo),
            Constellation::BeiDou => {
                if is_beidou_geo_prn(sv.prn) {
                    Ok(Self::BeiDouGeo)
                } else {
                    Ok(Self::BeiDou)
                }
            },
            Constellation::IRNSS => Ok(Self::Irnss),
            constellation => Err(Error::UnsupportedSystem(constellation)),
        }
    }

    /// True for BeiDou geostationary vehicles
    pub fn is_geostationary(&self) -> bool {
        matches!(self, Self::BeiDouGeo)
    }

    /// [Constellation] this model applies to
    pub fn constellation(&self) -> Constellation {
        match self {
            Self::Gps => Constellation::GPS,
            Self::Qzss => Constellation::QZSS,
            Self::Galileo => Constellation::Galileo,
            Self::BeiDou | Self::BeiDouGeo => Constellation::BeiDou,
            Self::Irnss => Constellation::IRNSS,
        }
    }

    /// [TimeScale] in which the reference times should be interpreted
    pub fn timescale(&self) -> TimeScale {
        match self {
            Self::Gps | Self::Irnss => TimeScale::GPST,
            Self::Qzss => TimeScale::QZSST,
            Self::Galileo => TimeScale::GST,
            Self::BeiDou | Self::BeiDouGeo => TimeScale::BDT,
        }
    }

    /// [Ellipsoid] constants defined by the ICD
    pub fn ellipsoid(&self) -> Ellipsoid {
        match self {
            Self::Gps | Self::Irnss => Ellipsoid::WGS84,
            Self::Qzss => Ellipsoid::JGS,
            Self::Galileo => Ellipsoid::GTRF,
            Self::BeiDou | Self::BeiDouGeo => Ellipsoid::CGCS2000,
        }
    }
}
