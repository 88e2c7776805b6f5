use crate::{
    cfg::FitIntervals,
    error::Error,
    prelude::{Duration, Epoch, SV},
};

mod health;
mod model;
mod propagation;

pub use health::{Accuracy, GroupDelay, Health};
pub use model::OrbitModel;
pub use propagation::Trace;

/// Keplerian elements, at reference time
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Keplerian {
    /// Semi-major axis (in meters)
    pub semi_major_axis_m: f64,
    /// Semi-major axis rate of change (in m.s⁻¹), null for legacy messages
    pub a_dot_m_s: f64,
    /// Eccentricity (n.a)
    pub eccentricity: f64,
    /// Inclination angle (in radians)
    pub i0_rad: f64,
    /// Argument of perigee (in radians)
    pub omega_rad: f64,
    /// Longitude of ascending node at weekly epoch (in radians)
    pub omega0_rad: f64,
    /// Mean anomaly (in radians)
    pub m0_rad: f64,
}

/// Keplerian [Perturbations]
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Perturbations {
    /// Mean motion difference from computed value (in rad.s⁻¹)
    pub dn_rad_s: f64,
    /// Mean motion difference rate of change (in rad.s⁻²), null for legacy messages
    pub dn_dot_rad_s2: f64,
    /// Inclination rate of change (in rad.s⁻¹)
    pub idot_rad_s: f64,
    /// Right ascension rate of change (in rad.s⁻¹)
    pub omega_dot_rad_s: f64,
    /// Sine / Cosine harmonic corrections of the argument of latitude (in radians)
    pub cus_cuc_rad: (f64, f64),
    /// Sine / Cosine harmonic corrections of the inclination (in radians)
    pub cis_cic_rad: (f64, f64),
    /// Sine / Cosine harmonic corrections of the orbit radius (in meters)
    pub crs_crc_m: (f64, f64),
}

/// Onboard clock polynomial, referenced to ToC
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ClockPolynomial {
    /// Clock bias (s)
    pub bias_s: f64,
    /// Clock drift (s.s⁻¹)
    pub drift_s_s: f64,
    /// Clock drift rate (s.s⁻²)
    pub drift_rate_s_s2: f64,
}

impl ClockPolynomial {
    /// Returns (bias [s], drift [s.s⁻¹]) evaluated `dt` seconds past ToC
    pub fn evaluate(&self, dt: f64) -> (f64, f64) {
        let bias = self.bias_s + self.drift_s_s * dt + self.drift_rate_s_s2 * dt.powi(2);
        let drift = self.drift_s_s + 2.0 * self.drift_rate_s_s2 * dt;
        (bias, drift)
    }
}

/// Issue of data identifiers. Their exact meaning is constellation dependent
/// (IODE/IODC for GPS, IODnav for Galileo, AODE/AODC for BeiDou).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct IssueOfData {
    /// Issue of ephemeris data
    pub iode: u16,
    /// Issue of clock data
    pub iodc: u16,
}

/// [OrbitRecord] is one broadcast ephemeris snapshot, for one satellite.
/// It is formed once per navigation message, from decoded fields,
/// then marked as loaded which determines its validity window.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitRecord {
    /// [SV] identity
    pub sv: SV,
    /// [OrbitModel] (constellation variant) for this [SV]
    pub(crate) model: Option<OrbitModel>,
    /// Reference time of the orbital elements (ToE)
    pub toe: Epoch,
    /// Reference time of the clock polynomial (ToC)
    pub toc: Epoch,
    /// Transmission time of the message
    pub transmission: Epoch,
    /// [Keplerian] elements
    pub keplerian: Keplerian,
    /// Orbital [Perturbations]
    pub perturbations: Perturbations,
    /// [ClockPolynomial]
    pub clock: ClockPolynomial,
    /// Group delays (in seconds), per frequency combination
    pub(crate) group_delays: Vec<(GroupDelay, f64)>,
    /// Decoded [Health]
    pub health: Health,
    /// Decoded accuracy (in meters), when predicted
    pub accuracy_m: Option<f64>,
    /// [IssueOfData]
    pub issue_of_data: IssueOfData,
    pub(crate) data_loaded: bool,
    pub(crate) fit_interval: Duration,
    pub(crate) begin_valid: Epoch,
    pub(crate) end_valid: Epoch,
}

impl OrbitRecord {
    /// Starts a new [OrbitRecord] for this [SV], from its reference times.
    /// The record is not loaded: populate it with the builder methods,
    /// then finalize with [Self::with_data_loaded].
    pub fn new(sv: SV, toe: Epoch, toc: Epoch, transmission: Epoch) -> Self {
        Self {
            sv,
            model: OrbitModel::from_sv(sv).ok(),
            toe,
            toc,
            transmission,
            keplerian: Default::default(),
            perturbations: Default::default(),
            clock: Default::default(),
            group_delays: Default::default(),
            health: Default::default(),
            accuracy_m: None,
            issue_of_data: Default::default(),
            data_loaded: false,
            fit_interval: Duration::ZERO,
            begin_valid: toe,
            end_valid: toe,
        }
    }

    /// Copies and returns [OrbitRecord] with desired [Keplerian] elements
    pub fn with_keplerian(&self, keplerian: Keplerian) -> Self {
        let mut s = self.clone();
        s.keplerian = keplerian;
        s
    }

    /// Copies and returns [OrbitRecord] with desired [Perturbations]
    pub fn with_perturbations(&self, perturbations: Perturbations) -> Self {
        let mut s = self.clone();
        s.perturbations = perturbations;
        s
    }

    /// Copies and returns [OrbitRecord] with desired [ClockPolynomial]
    pub fn with_clock(&self, clock: ClockPolynomial) -> Self {
        let mut s = self.clone();
        s.clock = clock;
        s
    }

    /// Copies and returns [OrbitRecord] with desired [Health]
    pub fn with_health(&self, health: Health) -> Self {
        let mut s = self.clone();
        s.health = health;
        s
    }

    /// Copies and returns [OrbitRecord] with desired accuracy (in meters)
    pub fn with_accuracy_m(&self, accuracy_m: Option<f64>) -> Self {
        let mut s = self.clone();
        s.accuracy_m = accuracy_m;
        s
    }

    /// Copies and returns [OrbitRecord] with desired [IssueOfData]
    pub fn with_issue_of_data(&self, issue_of_data: IssueOfData) -> Self {
        let mut s = self.clone();
        s.issue_of_data = issue_of_data;
        s
    }

    /// Copies and returns [OrbitRecord] with this [GroupDelay] (in seconds).
    /// Any previous value for the same frequency combination is replaced.
    pub fn with_group_delay(&self, kind: GroupDelay, delay_s: f64) -> Self {
        let mut s = self.clone();
        s.group_delays.retain(|(k, _)| *k != kind);
        s.group_delays.push((kind, delay_s));
        s
    }

    /// Marks this record as fully populated and determines its validity window
    /// from the [FitIntervals]. Call this once all fields are known.
    pub fn with_data_loaded(&self, fit_intervals: &FitIntervals) -> Self {
        let mut s = self.clone();
        s.data_loaded = true;
        s.update_validity(fit_intervals);
        s
    }

    /// True once the ingestion layer populated every field
    pub fn is_loaded(&self) -> bool {
        self.data_loaded
    }

    pub(crate) fn loaded(&self) -> Result<(), Error> {
        if self.data_loaded {
            Ok(())
        } else {
            Err(Error::NotLoaded)
        }
    }

    /// Returns the [OrbitModel] of this record
    pub fn model(&self) -> Result<OrbitModel, Error> {
        self.model
            .ok_or(Error::UnsupportedSystem(self.sv.constellation))
    }

    /// Returns the [GroupDelay] for this frequency combination, if broadcast
    pub fn group_delay(&self, kind: GroupDelay) -> Option<Duration> {
        self.group_delays
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, delay_s)| Duration::from_seconds(*delay_s))
    }

    /// Iterates over all broadcast [GroupDelay]s
    pub fn group_delays(&self) -> impl Iterator<Item = (GroupDelay, Duration)> + '_ {
        self.group_delays
            .iter()
            .map(|(k, delay_s)| (*k, Duration::from_seconds(*delay_s)))
    }

    /// Returns ToE expressed in seconds of week, in the [SV] timescale
    pub(crate) fn weekly_toe_seconds(&self, model: OrbitModel) -> f64 {
        let toe = self.toe.to_time_scale(model.timescale());
        (toe.to_time_of_week().1 as f64) / 1.0E9
    }

    /// Returns true if the elements describe a closed orbit
    pub fn has_valid_orbit(&self) -> bool {
        let a = self.keplerian.semi_major_axis_m;
        let e = self.keplerian.eccentricity;
        a.is_finite() && a > 0.0 && e.is_finite() && (0.0..1.0).contains(&e)
    }

    /// Start of validity window
    pub fn begin_valid(&self) -> Result<Epoch, Error> {
        self.loaded()?;
        Ok(self.begin_valid)
    }

    /// End of validity window
    pub fn end_valid(&self) -> Result<Epoch, Error> {
        self.loaded()?;
        Ok(self.end_valid)
    }

    /// Fit interval that was used to determine the validity window
    pub fn fit_interval(&self) -> Result<Duration, Error> {
        self.loaded()?;
        Ok(self.fit_interval)
    }

    /// Returns true if `t` lies within the validity window (bounds included).
    pub fn is_valid(&self, t: Epoch) -> Result<bool, Error> {
        self.loaded()?;
        Ok(t >= self.begin_valid && t <= self.end_valid)
    }

    /// Returns true if the decoded [Health] is the healthy sentinel. Health does not
    /// prevent propagation: stores may use this to discard ephemerides.
    pub fn is_healthy(&self) -> Result<bool, Error> {
        self.loaded()?;
        Ok(self.health.is_healthy())
    }

    /// Determines the validity window: it starts at the latest of ToE and
    /// transmission time (elements may be updated past ToE) and lasts
    /// one fit interval past ToE.
    pub fn adjust_validity(&mut self, fit_intervals: &FitIntervals) -> Result<(), Error> {
        self.loaded()?;
        self.update_validity(fit_intervals);
        Ok(())
    }

    pub(crate) fn update_validity(&mut self, fit_intervals: &FitIntervals) {
        // unsupported systems never propagate: their window stays empty
        let fit = match self.model {
            Some(model) => fit_intervals.fit_interval(model),
            None => Duration::ZERO,
        };

        self.fit_interval = fit;
        self.begin_valid = if self.transmission > self.toe {
            self.transmission
        } else {
            self.toe
        };
        self.end_valid = self.toe + fit;

        // late transmission beyond the fit interval
        if self.end_valid < self.begin_valid {
            self.end_valid = self.begin_valid;
        }
    }

    /// Store bookkeeping: shortens the validity window (rationalization)
    pub(crate) fn truncate_validity(&mut self, end: Epoch) {
        if end < self.end_valid {
            self.end_valid = if end < self.begin_valid {
                self.begin_valid
            } else {
                end
            };
        }
    }
}
