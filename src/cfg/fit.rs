//! Fit interval presets

#[cfg(feature = "serde")]
use serde::Deserialize;

use crate::{
    ephemeris::OrbitModel,
    error::Error,
    prelude::{Duration, Unit},
};

const fn default_gps_s() -> f64 {
    7200.0
}

const fn default_qzss_s() -> f64 {
    7200.0
}

const fn default_galileo_s() -> f64 {
    10800.0
}

// BDS-SIS-ICD leaves the fit interval undefined: ToE is aligned to the start of
// transmission, which lasts one hour. Data remains usable for one more hour.
const fn default_beidou_s() -> f64 {
    3600.0
}

const fn default_beidou_geo_s() -> f64 {
    3600.0
}

const fn default_irnss_s() -> f64 {
    7200.0
}

/// [FitIntervals] defines, per constellation, how long (in seconds) past its reference
/// time an ephemeris remains authoritative. Those are calibrated values rather than
/// ICD values and may be overridden freely.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct FitIntervals {
    #[cfg_attr(feature = "serde", serde(default = "default_gps_s"))]
    pub gps_s: f64,
    #[cfg_attr(feature = "serde", serde(default = "default_qzss_s"))]
    pub qzss_s: f64,
    #[cfg_attr(feature = "serde", serde(default = "default_galileo_s"))]
    pub galileo_s: f64,
    /// BeiDou MEO and IGSO vehicles
    #[cfg_attr(feature = "serde", serde(default = "default_beidou_s"))]
    pub beidou_s: f64,
    /// BeiDou GEO vehicles
    #[cfg_attr(feature = "serde", serde(default = "default_beidou_geo_s"))]
    pub beidou_geo_s: f64,
    #[cfg_attr(feature = "serde", serde(default = "default_irnss_s"))]
    pub irnss_s: f64,
}

impl Default for FitIntervals {
    fn default() -> Self {
        Self {
            gps_s: default_gps_s(),
            qzss_s: default_qzss_s(),
            galileo_s: default_galileo_s(),
            beidou_s: default_beidou_s(),
            beidou_geo_s: default_beidou_geo_s(),
            irnss_s: default_irnss_s(),
        }
    }
}

impl FitIntervals {
    /// Returns the fit interval that applies to this [OrbitModel]
    pub fn fit_interval(&self, model: OrbitModel) -> Duration {
        let seconds = match model {
            OrbitModel::Gps => self.gps_s,
            OrbitModel::Qzss => self.qzss_s,
            OrbitModel::Galileo => self.galileo_s,
            OrbitModel::BeiDou => self.beidou_s,
            OrbitModel::BeiDouGeo => self.beidou_geo_s,
            OrbitModel::Irnss => self.irnss_s,
        };
        seconds * Unit::Second
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        for (name, value) in [
            ("gps", self.gps_s),
            ("qzss", self.qzss_s),
            ("galileo", self.galileo_s),
            ("beidou", self.beidou_s),
            ("beidou_geo", self.beidou_geo_s),
            ("irnss", self.irnss_s),
        ] {
            if value.is_nan() || value <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{} fit interval must be positive",
                    name
                )));
            }
        }
        Ok(())
    }
}
