#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate gnss_rs as gnss;

// private modules
mod cfg;
mod ephemeris;
mod error;
mod kepler;
mod rotation;
mod store;
mod xvt;

// public modules
pub mod constants;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::cfg::{Config, FitIntervals, KeplerOpts, SearchMethod};
    pub use crate::constants::{Ellipsoid, ReferenceFrame};
    pub use crate::ephemeris::{
        Accuracy, ClockPolynomial, GroupDelay, Health, IssueOfData, Keplerian, OrbitModel,
        OrbitRecord, Perturbations, Trace,
    };
    pub use crate::error::Error;
    pub use crate::kepler::{solve_eccentric_anomaly, KeplerSolution};
    pub use crate::store::EphemerisStore;
    pub use crate::xvt::Xvt;
    // re-export
    pub use anise::prelude::{Frame, Orbit};
    pub use gnss::prelude::{Constellation, SV};
    pub use hifitime::{Duration, Epoch, TimeScale, Unit};
    pub use nalgebra::Vector3;
}

// pub export
pub use error::Error;
