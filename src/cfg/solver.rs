//! Kepler solver settings

#[cfg(feature = "serde")]
use serde::Deserialize;

use crate::error::Error;

const fn default_tolerance_rad() -> f64 {
    1.0E-11
}

const fn default_max_iterations() -> usize {
    20
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct KeplerOpts {
    /// Iteration stops once the eccentric anomaly correction
    /// falls below this value (in radians).
    #[cfg_attr(feature = "serde", serde(default = "default_tolerance_rad"))]
    pub tolerance_rad: f64,
    /// Iteration cap. Reaching it is not fatal, but the solution
    /// is then flagged as not converged.
    #[cfg_attr(feature = "serde", serde(default = "default_max_iterations"))]
    pub max_iterations: usize,
}

impl Default for KeplerOpts {
    fn default() -> Self {
        Self {
            tolerance_rad: default_tolerance_rad(),
            max_iterations: default_max_iterations(),
        }
    }
}

impl KeplerOpts {
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.tolerance_rad.is_nan() || self.tolerance_rad <= 0.0 {
            return Err(Error::InvalidConfig(
                "kepler tolerance must be positive".to_string(),
            ));
        }
        if self.max_iterations == 0 {
            return Err(Error::InvalidConfig(
                "kepler solver needs at least one iteration".to_string(),
            ));
        }
        Ok(())
    }
}
