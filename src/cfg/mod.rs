#[cfg(feature = "serde")]
use serde::Deserialize;

use crate::{
    error::Error,
    prelude::{Constellation, Duration, TimeScale},
};

mod fit;
mod solver;

pub use fit::FitIntervals;
pub use solver::KeplerOpts;

fn default_timescale() -> TimeScale {
    TimeScale::GPST
}

fn default_only_healthy() -> bool {
    false
}

fn default_min_cutover_spacing() -> f64 {
    300.0
}

/// [SearchMethod] selects how the store picks the authoritative
/// ephemeris at a given instant.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub enum SearchMethod {
    /// Real-time user behavior: only ephemerides whose validity window
    /// contains the instant qualify, and the latest issue wins.
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "user"))]
    User,
    /// Post processing behavior: the ephemeris whose reference time is
    /// closest to the instant wins, regardless of its validity window.
    /// Tolerates messages that were collected out of order.
    #[cfg_attr(feature = "serde", serde(alias = "nearest", alias = "near"))]
    Nearest,
}

impl std::fmt::Display for SearchMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "User"),
            Self::Nearest => write!(f, "Nearest"),
        }
    }
}

impl std::str::FromStr for SearchMethod {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user" => Ok(Self::User),
            "near" | "nearest" => Ok(Self::Nearest),
            _ => Err(Error::InvalidConfig(format!("unknown search method \"{}\"", s))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct Config {
    /// [SearchMethod] used by the store
    #[cfg_attr(feature = "serde", serde(default))]
    pub search: SearchMethod,
    /// [TimeScale] in which the store expresses its time bounds,
    /// [TimeScale::GPST] is the default value.
    #[cfg_attr(feature = "serde", serde(default = "default_timescale"))]
    pub timescale: TimeScale,
    /// When true, unhealthy ephemerides never answer a query.
    /// They are still stored and still propagate when used directly.
    #[cfg_attr(feature = "serde", serde(default = "default_only_healthy"))]
    pub only_healthy: bool,
    /// Restricts the store to these constellations. None means all
    /// constellations that broadcast Keplerian orbits.
    #[cfg_attr(feature = "serde", serde(default))]
    pub constellations: Option<Vec<Constellation>>,
    /// Per constellation [FitIntervals]
    #[cfg_attr(feature = "serde", serde(default))]
    pub fit_intervals: FitIntervals,
    /// Kepler solver settings
    #[cfg_attr(feature = "serde", serde(default))]
    pub kepler: KeplerOpts,
    /// Two successive ephemerides of one satellite whose validity starts
    /// are closer than this (in seconds) are considered a stale upload,
    /// the earliest one gets discarded when rationalizing.
    #[cfg_attr(feature = "serde", serde(default = "default_min_cutover_spacing"))]
    pub min_cutover_spacing_s: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search: SearchMethod::default(),
            timescale: default_timescale(),
            only_healthy: default_only_healthy(),
            constellations: None,
            fit_intervals: FitIntervals::default(),
            kepler: KeplerOpts::default(),
            min_cutover_spacing_s: default_min_cutover_spacing(),
        }
    }
}

impl Config {
    /// Returns [Config] preset for offline reprocessing, where messages
    /// may have been collected out of order.
    pub fn post_processing_preset() -> Self {
        Self {
            search: SearchMethod::Nearest,
            ..Default::default()
        }
    }

    /// Copies and returns [Config] with desired [SearchMethod]
    pub fn with_search_method(&self, search: SearchMethod) -> Self {
        let mut s = self.clone();
        s.search = search;
        s
    }

    /// Copies and returns [Config] restricted to a single [Constellation]
    pub fn with_constellation(&self, constellation: Constellation) -> Self {
        let mut s = self.clone();
        s.constellations = Some(vec![constellation]);
        s
    }

    /// Copies and returns [Config] that only answers with healthy ephemerides
    pub fn with_only_healthy(&self, only_healthy: bool) -> Self {
        let mut s = self.clone();
        s.only_healthy = only_healthy;
        s
    }

    /// Minimal cutover spacing, as [Duration]
    pub(crate) fn min_cutover_spacing(&self) -> Duration {
        Duration::from_seconds(self.min_cutover_spacing_s)
    }

    /// Returns true if this [Constellation] is enabled
    pub(crate) fn enables(&self, constellation: Constellation) -> bool {
        match &self.constellations {
            Some(list) => list.contains(&constellation),
            None => true,
        }
    }

    /// Verifies this [Config] is physically meaningful
    pub fn validate(&self) -> Result<(), Error> {
        self.fit_intervals.validate()?;
        self.kepler.validate()?;
        if self.min_cutover_spacing_s.is_nan() || self.min_cutover_spacing_s < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "negative cutover spacing {}",
                self.min_cutover_spacing_s
            )));
        }
        Ok(())
    }
}
