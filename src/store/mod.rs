use log::{debug, error};

use std::{
    collections::BTreeMap,
    sync::atomic::{AtomicUsize, Ordering},
};

use crate::{
    cfg::{Config, SearchMethod},
    error::Error,
    prelude::{Epoch, OrbitRecord, SV},
};

mod maintenance;
mod search;

/// [EphemerisStore] owns, per satellite, a timeline of [OrbitRecord]s
/// sorted by reference time (ToE), with unique reference times.
#[derive(Debug)]
pub struct EphemerisStore {
    /// [Config] preset
    cfg: Config,
    /// Per [SV] timelines
    timelines: BTreeMap<SV, Vec<OrbitRecord>>,
    /// (earliest begin_valid, latest end_valid) over all records
    bounds: Option<(Epoch, Epoch)>,
    /// Kepler solver non-convergence events
    nonconvergence: AtomicUsize,
}

impl Default for EphemerisStore {
    fn default() -> Self {
        Self {
            cfg: Config::default(),
            timelines: Default::default(),
            bounds: None,
            nonconvergence: AtomicUsize::new(0),
        }
    }
}

impl EphemerisStore {
    /// Creates a new empty [EphemerisStore] from [Config] preset.
    pub fn new(cfg: Config) -> Result<Self, Error> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            ..Default::default()
        })
    }

    /// Inserts a new [OrbitRecord] into the timeline of its [SV].
    /// A record that shares its reference time with a stored record supersedes it
    /// (last ingested wins). The validity window is determined from the store
    /// [FitIntervals](crate::prelude::FitIntervals). Returns a reference to the stored record.
    ///
    /// Fails when:
    /// - the constellation does not broadcast Keplerian orbits, or is not enabled
    /// - the record is not loaded
    /// - the orbital elements are not physically meaningful
    pub fn add(&mut self, mut record: OrbitRecord) -> Result<&OrbitRecord, Error> {
        let sv = record.sv;

        if let Err(e) = record.model() {
            error!("{}({}) - rejected ephemeris: {}", record.toe, sv, e);
            return Err(e);
        }

        if !self.cfg.enables(sv.constellation) {
            error!("{}({}) - constellation is disabled", record.toe, sv);
            return Err(Error::UnsupportedSystem(sv.constellation));
        }

        if let Err(e) = record.loaded() {
            error!("{}({}) - rejected ephemeris: {}", record.toe, sv, e);
            return Err(e);
        }

        if !record.has_valid_orbit() {
            error!("{}({}) - rejected ephemeris: invalid orbit", record.toe, sv);
            return Err(Error::InvalidOrbit(sv));
        }

        // stored windows always follow the store fit intervals
        record.update_validity(&self.cfg.fit_intervals);

        let (begin, end) = (record.begin_valid, record.end_valid);

        let timeline = self.timelines.entry(sv).or_default();

        let (index, superseded) = match timeline.binary_search_by(|rec| rec.toe.cmp(&record.toe)) {
            Ok(index) => {
                debug!("{}({}) - superseding ephemeris", record.toe, sv);
                timeline[index] = record;
                (index, true)
            },
            Err(index) => {
                debug!(
                    "{}({}) - new ephemeris valid from {} until {}",
                    record.toe, sv, begin, end
                );
                timeline.insert(index, record);
                (index, false)
            },
        };

        if superseded {
            self.update_bounds();
        } else {
            self.extend_bounds(begin, end);
        }

        Ok(&self.timelines[&sv][index])
    }

    /// Total number of [OrbitRecord]s, for all satellites
    pub fn len(&self) -> usize {
        self.timelines.values().map(|timeline| timeline.len()).sum()
    }

    /// True if this store holds no [OrbitRecord]
    pub fn is_empty(&self) -> bool {
        self.timelines.is_empty()
    }

    /// Number of [OrbitRecord]s for this [SV]
    pub fn len_of(&self, sv: SV) -> usize {
        self.timelines.get(&sv).map_or(0, |timeline| timeline.len())
    }

    /// Iterates over all satellites
    pub fn satellites(&self) -> impl Iterator<Item = SV> + '_ {
        self.timelines.keys().copied()
    }

    /// Returns the timeline of this [SV], sorted by reference time
    pub fn timeline(&self, sv: SV) -> Option<&[OrbitRecord]> {
        self.timelines.get(&sv).map(|timeline| timeline.as_slice())
    }

    /// Earliest instant covered by this store, expressed in the configured timescale
    pub fn initial_time(&self) -> Option<Epoch> {
        self.bounds
            .map(|(initial, _)| initial.to_time_scale(self.cfg.timescale))
    }

    /// Latest instant covered by this store, expressed in the configured timescale
    pub fn final_time(&self) -> Option<Epoch> {
        self.bounds
            .map(|(_, last)| last.to_time_scale(self.cfg.timescale))
    }

    /// Active [SearchMethod]
    pub fn search_method(&self) -> SearchMethod {
        self.cfg.search
    }

    /// Updates the [SearchMethod] for subsequent queries
    pub fn set_search_method(&mut self, search: SearchMethod) {
        self.cfg.search = search;
    }

    /// [Config] preset
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Number of propagations for which the Kepler solver
    /// reached its iteration cap
    pub fn nonconvergence_count(&self) -> usize {
        self.nonconvergence.load(Ordering::Relaxed)
    }

    pub(crate) fn count_nonconvergence(&self) {
        self.nonconvergence.fetch_add(1, Ordering::Relaxed);
    }

    fn extend_bounds(&mut self, begin: Epoch, end: Epoch) {
        self.bounds = match self.bounds {
            Some((initial, last)) => Some((
                if begin < initial { begin } else { initial },
                if end > last { end } else { last },
            )),
            None => Some((begin, end)),
        };
    }

    /// Recomputes the store bounds from all retained records
    pub(crate) fn update_bounds(&mut self) {
        self.bounds = None;

        let windows = self
            .timelines
            .values()
            .flatten()
            .map(|rec| (rec.begin_valid, rec.end_valid))
            .collect::<Vec<_>>();

        for (begin, end) in windows {
            self.extend_bounds(begin, end);
        }
    }
}
