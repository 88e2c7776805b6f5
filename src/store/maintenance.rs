use itertools::Itertools;
use log::debug;

use crate::prelude::{EphemerisStore, Epoch, OrbitRecord, SV};

impl EphemerisStore {
    /// Resolves stale uploads and overlaps, in every timeline. Walking in reference time order:
    /// - when the next record begins less than [Config::min_cutover_spacing_s](crate::prelude::Config)
    ///   after the previous one, the pair describes a single cutover: the record that was
    ///   transmitted first is a stale upload and gets removed (the previous one, on equal
    ///   transmission times).
    /// - otherwise, overlapping windows are truncated so the previous record
    ///   ends where the next one begins.
    ///
    /// Returns the number of removed records.
    pub fn rationalize(&mut self) -> usize {
        let spacing = self.cfg.min_cutover_spacing();
        let mut removed = 0;

        for (sv, timeline) in self.timelines.iter_mut() {
            let mut i = 1;
            while i < timeline.len() {
                let next_begin = timeline[i].begin_valid;

                if next_begin <= timeline[i - 1].begin_valid + spacing {
                    let stale_index = if timeline[i - 1].transmission > timeline[i].transmission {
                        i
                    } else {
                        i - 1
                    };

                    let stale = timeline.remove(stale_index);
                    debug!(
                        "{}({}) - stale ephemeris (transmitted {}) superseded at cutover",
                        stale.toe, sv, stale.transmission
                    );
                    removed += 1;

                    // new pair needs to be verified
                    if stale_index < i {
                        i = (i - 1).max(1);
                    }
                    continue;
                }

                if timeline[i - 1].end_valid > next_begin {
                    timeline[i - 1].truncate_validity(next_begin);
                }

                i += 1;
            }
        }

        self.update_bounds();
        removed
    }

    /// Removes all records that end before `tmin` or begin after `tmax`.
    /// Returns the number of removed records.
    pub fn prune(&mut self, tmin: Epoch, tmax: Epoch) -> usize {
        let mut removed = 0;

        for timeline in self.timelines.values_mut() {
            let size = timeline.len();
            timeline.retain(|rec| rec.end_valid >= tmin && rec.begin_valid <= tmax);
            removed += size - timeline.len();
        }

        self.timelines.retain(|_, timeline| !timeline.is_empty());
        self.update_bounds();

        debug!("pruned {} ephemerides outside {} - {}", removed, tmin, tmax);
        removed
    }

    /// Releases all records
    pub fn clear(&mut self) {
        self.timelines.clear();
        self.bounds = None;
    }

    /// Appends a snapshot of the stored records, sorted by reference time, to `target`.
    /// Either a single [SV] or all satellites are copied.
    /// Returns the number of appended records.
    pub fn add_to_list(&self, sv: Option<SV>, target: &mut Vec<OrbitRecord>) -> usize {
        let size = target.len();

        match sv {
            Some(sv) => {
                if let Some(timeline) = self.timelines.get(&sv) {
                    target.extend_from_slice(timeline);
                }
            },
            None => {
                target.extend(
                    self.timelines
                        .values()
                        .map(|timeline| timeline.iter())
                        .kmerge_by(|a, b| a.toe < b.toe)
                        .cloned(),
                );
            },
        }

        target.len() - size
    }
}
