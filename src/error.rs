use thiserror::Error;

use crate::prelude::{Constellation, Epoch, SV};

#[derive(Debug, PartialEq, Error)]
pub enum Error {
    /// An operation that requires a fully populated [OrbitRecord](crate::prelude::OrbitRecord)
    /// was invoked before the ingestion layer marked it as loaded.
    #[error("ephemeris data not loaded")]
    NotLoaded,

    /// No ephemeris satisfies the active search policy
    /// for this satellite at this instant.
    #[error("no ephemeris found for {0} at {1}")]
    NotFound(SV, Epoch),

    /// The store only models constellations that broadcast Keplerian orbits.
    #[error("unsupported satellite system: {0}")]
    UnsupportedSystem(Constellation),

    /// Semi-major axis must be positive and eccentricity within [0, 1).
    #[error("{0} - physically invalid orbital elements")]
    InvalidOrbit(SV),

    /// A [Config](crate::prelude::Config) value is not physically meaningful.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
