use log::debug;

use crate::{
    cfg::SearchMethod,
    error::Error,
    prelude::{EphemerisStore, Epoch, OrbitRecord, Xvt, SV},
};

impl EphemerisStore {
    /// Locates the authoritative [OrbitRecord] for this [SV] at `t`,
    /// using the active [SearchMethod].
    pub fn find(&self, sv: SV, t: Epoch) -> Result<&OrbitRecord, Error> {
        match self.cfg.search {
            SearchMethod::User => self.find_user(sv, t),
            SearchMethod::Nearest => self.find_nearest(sv, t),
        }
    }

    fn eligible(&self, rec: &OrbitRecord) -> bool {
        !self.cfg.only_healthy || rec.health.is_healthy()
    }

    /// Real-time user policy: among the records whose validity window
    /// contains `t`, returns the most recent one.
    pub fn find_user(&self, sv: SV, t: Epoch) -> Result<&OrbitRecord, Error> {
        let timeline = self.timelines.get(&sv).ok_or(Error::NotFound(sv, t))?;

        // records past t can't be valid: begin_valid >= toe
        let upper = timeline.partition_point(|rec| rec.toe <= t);

        timeline[..upper]
            .iter()
            .rev()
            .find(|rec| t >= rec.begin_valid && t <= rec.end_valid && self.eligible(rec))
            .ok_or(Error::NotFound(sv, t))
    }

    /// Post processing policy: returns the record whose reference time is
    /// the closest to `t`, regardless of its validity window.
    /// `t` must lie within the store bounds. On ties, the later record wins.
    pub fn find_nearest(&self, sv: SV, t: Epoch) -> Result<&OrbitRecord, Error> {
        let (initial, last) = self.bounds.ok_or(Error::NotFound(sv, t))?;

        if t < initial || t > last {
            debug!("{}({}) - out of store bounds", t, sv);
            return Err(Error::NotFound(sv, t));
        }

        let timeline = self.timelines.get(&sv).ok_or(Error::NotFound(sv, t))?;

        let split = timeline.partition_point(|rec| rec.toe <= t);

        let before = timeline[..split]
            .iter()
            .rev()
            .find(|rec| self.eligible(rec));

        let after = timeline[split..].iter().find(|rec| self.eligible(rec));

        match (before, after) {
            (Some(before), Some(after)) => {
                if (after.toe - t).abs() <= (t - before.toe).abs() {
                    Ok(after)
                } else {
                    Ok(before)
                }
            },
            (Some(rec), None) | (None, Some(rec)) => Ok(rec),
            (None, None) => Err(Error::NotFound(sv, t)),
        }
    }

    /// Resolves the state of this [SV] at `t`, from the authoritative [OrbitRecord].
    pub fn xvt(&self, sv: SV, t: Epoch) -> Result<Xvt, Error> {
        let rec = self.find(sv, t)?;
        let xvt = rec.sv_xvt_with(t, &self.cfg.kepler)?;

        if !xvt.kepler.converged {
            self.count_nonconvergence();
        }

        Ok(xvt)
    }

    /// Returns the health of the authoritative [OrbitRecord] for this [SV] at `t`.
    pub fn is_healthy(&self, sv: SV, t: Epoch) -> Result<bool, Error> {
        self.find(sv, t)?.is_healthy()
    }
}
