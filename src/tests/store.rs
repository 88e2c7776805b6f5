use rstest::*;

use rand::{prelude::*, rngs::SmallRng, SeedableRng};

use crate::{
    prelude::{
        ClockPolynomial, Config, Constellation, EphemerisStore, Error, FitIntervals, Health,
        KeplerOpts, OrbitRecord, SearchMethod, Unit, SV,
    },
    tests::{
        beidou_geo_record, gps_keplerian, gps_perturbations, gps_record, init_logger,
        reference_epoch,
    },
};

#[fixture]
fn hourly_store() -> EphemerisStore {
    let t0 = reference_epoch();
    let mut store = EphemerisStore::default();

    for hour in 0..3 {
        let toe = t0 + (hour as f64) * Unit::Hour;
        store.add(gps_record(1, toe)).unwrap();
    }

    store
}

#[rstest]
fn hourly_user_scenario(hourly_store: EphemerisStore) {
    init_logger();

    let t0 = reference_epoch();
    let sv = SV::new(Constellation::GPS, 1);

    // midpoint of the second interval
    let t = t0 + 1.5 * Unit::Hour;
    let rec = hourly_store.find(sv, t).unwrap();
    assert_eq!(rec.toe, t0 + 1.0 * Unit::Hour);

    let last_end = hourly_store.timeline(sv).unwrap()[2].end_valid().unwrap();
    let t = last_end + 1.0 * Unit::Second;
    assert_eq!(hourly_store.find(sv, t), Err(Error::NotFound(sv, t)));

    let t = t0 - 1.0 * Unit::Second;
    assert_eq!(hourly_store.find(sv, t), Err(Error::NotFound(sv, t)));

    let unknown = SV::new(Constellation::GPS, 2);
    let t = t0 + 10.0 * Unit::Minute;
    assert_eq!(hourly_store.find(unknown, t), Err(Error::NotFound(unknown, t)));
}

#[rstest]
fn user_policy_prefers_latest_issue(hourly_store: EphemerisStore) {
    let t0 = reference_epoch();
    let sv = SV::new(Constellation::GPS, 1);

    for (dt_min, expected_hour) in [(0.0, 0.0), (59.0, 0.0), (60.0, 1.0), (150.0, 2.0), (230.0, 2.0)] {
        let t = t0 + dt_min * Unit::Minute;
        let rec = hourly_store.find_user(sv, t).unwrap();
        assert_eq!(rec.toe, t0 + expected_hour * Unit::Hour, "t={}", t);
    }
}

#[rstest]
fn store_bounds(hourly_store: EphemerisStore) {
    let t0 = reference_epoch();

    assert_eq!(hourly_store.len(), 3);
    assert_eq!(hourly_store.len_of(SV::new(Constellation::GPS, 1)), 3);
    assert!(!hourly_store.is_empty());

    assert_eq!(hourly_store.initial_time(), Some(t0));
    assert_eq!(hourly_store.final_time(), Some(t0 + 4.0 * Unit::Hour));
}

#[test]
fn round_trip_is_time_ordered() {
    init_logger();

    let t0 = reference_epoch();
    let sv = SV::new(Constellation::GPS, 12);
    let mut rng = SmallRng::seed_from_u64(1234);

    let mut hours = (0..24).collect::<Vec<u32>>();
    hours.shuffle(&mut rng);

    let mut store = EphemerisStore::default();

    for hour in hours.iter() {
        let toe = t0 + (*hour as f64) * Unit::Hour;
        store.add(gps_record(sv.prn, toe)).unwrap();
    }

    let mut snapshot = Vec::new();
    assert_eq!(store.add_to_list(Some(sv), &mut snapshot), 24);
    assert_eq!(snapshot.len(), 24);

    for (i, rec) in snapshot.iter().enumerate() {
        assert_eq!(rec.toe, t0 + (i as f64) * Unit::Hour);
    }

    // appends to existing content
    assert_eq!(store.add_to_list(Some(sv), &mut snapshot), 24);
    assert_eq!(snapshot.len(), 48);

    let mut empty = Vec::new();
    assert_eq!(
        store.add_to_list(Some(SV::new(Constellation::GPS, 13)), &mut empty),
        0
    );
}

#[test]
fn all_satellites_snapshot() {
    let t0 = reference_epoch();
    let mut store = EphemerisStore::default();

    for (prn, offset_min) in [(1, 0.0), (2, 30.0), (3, 15.0)] {
        for hour in 0..3 {
            let toe = t0 + (hour as f64) * Unit::Hour + offset_min * Unit::Minute;
            store.add(gps_record(prn, toe)).unwrap();
        }
    }

    store.add(beidou_geo_record(3, t0 + 5.0 * Unit::Minute)).unwrap();

    let mut snapshot = Vec::new();
    assert_eq!(store.add_to_list(None, &mut snapshot), 10);

    for pair in snapshot.windows(2) {
        assert!(pair[0].toe <= pair[1].toe);
    }

    assert_eq!(store.satellites().count(), 4);
}

#[test]
fn same_reference_time_is_superseded() {
    let t0 = reference_epoch();
    let sv = SV::new(Constellation::GPS, 1);

    let mut store = EphemerisStore::default();

    store.add(gps_record(1, t0)).unwrap();

    let update = gps_record(1, t0).with_clock(ClockPolynomial {
        bias_s: 1.0E-5,
        ..Default::default()
    });

    let stored = store.add(update).unwrap();
    assert_eq!(stored.clock.bias_s, 1.0E-5);

    assert_eq!(store.len_of(sv), 1);
    assert_eq!(store.find(sv, t0).unwrap().clock.bias_s, 1.0E-5);
}

#[test]
fn rejected_records() {
    let t0 = reference_epoch();
    let mut store = EphemerisStore::default();

    for constellation in [Constellation::Glonass, Constellation::SBAS] {
        let sv = SV::new(constellation, 1);
        let rec = OrbitRecord::new(sv, t0, t0, t0)
            .with_keplerian(gps_keplerian())
            .with_data_loaded(&FitIntervals::default());

        assert_eq!(store.add(rec), Err(Error::UnsupportedSystem(constellation)));
    }

    let sv = SV::new(Constellation::GPS, 1);
    let rec = OrbitRecord::new(sv, t0, t0, t0).with_keplerian(gps_keplerian());
    assert_eq!(store.add(rec), Err(Error::NotLoaded));

    let mut keplerian = gps_keplerian();
    keplerian.eccentricity = 1.2;
    let rec = gps_record(1, t0).with_keplerian(keplerian);
    assert_eq!(store.add(rec), Err(Error::InvalidOrbit(sv)));

    assert!(store.is_empty());
    assert_eq!(store.initial_time(), None);
}

#[test]
fn disabled_constellation() {
    let t0 = reference_epoch();
    let cfg = Config::default().with_constellation(Constellation::Galileo);

    let mut store = EphemerisStore::new(cfg).unwrap();

    assert_eq!(
        store.add(gps_record(1, t0)),
        Err(Error::UnsupportedSystem(Constellation::GPS))
    );
}

#[test]
fn nearest_policy() {
    init_logger();

    let t0 = reference_epoch();
    let sv = SV::new(Constellation::GPS, 1);

    let mut store = EphemerisStore::new(Config::post_processing_preset()).unwrap();
    assert_eq!(store.search_method(), SearchMethod::Nearest);

    for hour in [0.0, 2.0, 4.0] {
        store.add(gps_record(1, t0 + hour * Unit::Hour)).unwrap();
    }

    for (dt_min, expected_hour) in [
        (0.0, 0.0),
        (54.0, 0.0),
        (60.0, 2.0),
        (66.0, 2.0),
        (179.0, 2.0),
        (181.0, 4.0),
        (300.0, 4.0),
        (360.0, 4.0),
    ] {
        let t = t0 + dt_min * Unit::Minute;
        let rec = store.find(sv, t).unwrap();
        assert_eq!(rec.toe, t0 + expected_hour * Unit::Hour, "t={}", t);
    }

    // out of store bounds
    let t = t0 + 6.0 * Unit::Hour + 1.0 * Unit::Second;
    assert_eq!(store.find(sv, t), Err(Error::NotFound(sv, t)));

    let t = t0 - 1.0 * Unit::Second;
    assert_eq!(store.find(sv, t), Err(Error::NotFound(sv, t)));

    // the user policy remains available
    let t = t0 + 1.5 * Unit::Hour;
    assert_eq!(store.find_user(sv, t).unwrap().toe, t0);

    store.set_search_method(SearchMethod::User);
    assert_eq!(store.find(sv, t).unwrap().toe, t0);
}

#[test]
fn healthy_only() {
    let t0 = reference_epoch();
    let sv = SV::new(Constellation::GPS, 1);

    let unhealthy = gps_record(1, t0 + 1.0 * Unit::Hour).with_health(Health::Unhealthy(0x01));

    let mut store = EphemerisStore::default();
    store.add(gps_record(1, t0)).unwrap();
    store.add(unhealthy.clone()).unwrap();

    let t = t0 + 90.0 * Unit::Minute;

    // default: unhealthy vehicles are still reported
    assert_eq!(store.find(sv, t).unwrap().toe, t0 + 1.0 * Unit::Hour);
    assert_eq!(store.is_healthy(sv, t), Ok(false));

    let mut store = EphemerisStore::new(Config::default().with_only_healthy(true)).unwrap();
    store.add(gps_record(1, t0)).unwrap();
    store.add(unhealthy).unwrap();

    assert_eq!(store.find(sv, t).unwrap().toe, t0);
    assert_eq!(store.is_healthy(sv, t), Ok(true));

    // past the healthy record's window
    let t = t0 + 150.0 * Unit::Minute;
    assert_eq!(store.find(sv, t), Err(Error::NotFound(sv, t)));
}

#[test]
fn rationalize() {
    init_logger();

    let t0 = reference_epoch();
    let sv = SV::new(Constellation::GPS, 1);

    let mut store = EphemerisStore::default();

    // stale upload, two minutes apart
    store.add(gps_record(1, t0)).unwrap();
    store.add(gps_record(1, t0 + 2.0 * Unit::Minute)).unwrap();

    // regular cutovers
    store.add(gps_record(1, t0 + 1.0 * Unit::Hour)).unwrap();
    store.add(gps_record(1, t0 + 2.0 * Unit::Hour)).unwrap();

    assert_eq!(store.rationalize(), 1);
    assert_eq!(store.len_of(sv), 3);

    let timeline = store.timeline(sv).unwrap();
    assert_eq!(timeline[0].toe, t0 + 2.0 * Unit::Minute);

    for pair in timeline.windows(2) {
        assert_eq!(pair[0].end_valid().unwrap(), pair[1].begin_valid().unwrap());
    }

    // last record remains untouched
    assert_eq!(
        timeline[2].end_valid().unwrap(),
        t0 + 4.0 * Unit::Hour
    );

    assert_eq!(store.initial_time(), Some(t0 + 2.0 * Unit::Minute));
    assert_eq!(store.final_time(), Some(t0 + 4.0 * Unit::Hour));

    // stable
    assert_eq!(store.rationalize(), 0);
    assert_eq!(store.len_of(sv), 3);

    // truncation routes queries to the latest issue
    let t = t0 + 61.0 * Unit::Minute;
    assert_eq!(store.find(sv, t).unwrap().toe, t0 + 1.0 * Unit::Hour);
}

#[test]
fn rationalize_stale_series() {
    let t0 = reference_epoch();
    let sv = SV::new(Constellation::GPS, 1);

    let mut store = EphemerisStore::default();

    for dt_s in [0.0, 60.0, 120.0, 180.0] {
        store.add(gps_record(1, t0 + dt_s * Unit::Second)).unwrap();
    }

    assert_eq!(store.rationalize(), 3);
    assert_eq!(store.timeline(sv).unwrap()[0].toe, t0 + 180.0 * Unit::Second);
}

#[test]
fn rationalize_keeps_latest_upload() {
    init_logger();

    let t0 = reference_epoch();
    let sv = SV::new(Constellation::GPS, 1);

    // late upload of the t0 issue, received after the next issue
    let late = OrbitRecord::new(sv, t0, t0, t0 + 1.0 * Unit::Hour)
        .with_keplerian(gps_keplerian())
        .with_perturbations(gps_perturbations())
        .with_data_loaded(&FitIntervals::default());

    let mut store = EphemerisStore::default();
    store.add(late).unwrap();
    store.add(gps_record(1, t0 + 59.0 * Unit::Minute)).unwrap();

    assert_eq!(store.rationalize(), 1);
    assert_eq!(store.len_of(sv), 1);

    let timeline = store.timeline(sv).unwrap();
    assert_eq!(timeline[0].toe, t0);
    assert_eq!(timeline[0].transmission, t0 + 1.0 * Unit::Hour);
    assert_eq!(store.initial_time(), Some(t0 + 1.0 * Unit::Hour));

    assert_eq!(store.rationalize(), 0);
}

#[rstest]
fn prune(mut hourly_store: EphemerisStore) {
    let t0 = reference_epoch();
    let sv = SV::new(Constellation::GPS, 1);

    // first record ends 2 hours past t0
    let removed = hourly_store.prune(
        t0 + 2.0 * Unit::Hour + 1.0 * Unit::Second,
        t0 + 10.0 * Unit::Hour,
    );

    assert_eq!(removed, 1);
    assert_eq!(hourly_store.len_of(sv), 2);
    assert_eq!(hourly_store.initial_time(), Some(t0 + 1.0 * Unit::Hour));

    // last record begins 2 hours past t0
    let removed = hourly_store.prune(t0, t0 + 2.0 * Unit::Hour - 1.0 * Unit::Second);
    assert_eq!(removed, 1);
    assert_eq!(hourly_store.len_of(sv), 1);
    assert_eq!(hourly_store.final_time(), Some(t0 + 3.0 * Unit::Hour));

    let removed = hourly_store.prune(t0 + 12.0 * Unit::Hour, t0 + 13.0 * Unit::Hour);
    assert_eq!(removed, 1);
    assert!(hourly_store.is_empty());
    assert_eq!(hourly_store.satellites().count(), 0);
    assert_eq!(hourly_store.initial_time(), None);
}

#[rstest]
fn clear(mut hourly_store: EphemerisStore) {
    hourly_store.clear();
    assert!(hourly_store.is_empty());
    assert_eq!(hourly_store.len(), 0);
    assert_eq!(hourly_store.final_time(), None);
}

#[rstest]
fn store_xvt(hourly_store: EphemerisStore) {
    let t0 = reference_epoch();
    let sv = SV::new(Constellation::GPS, 1);

    let t = t0 + 1.5 * Unit::Hour;
    let xvt = hourly_store.xvt(sv, t).unwrap();
    let direct = hourly_store.find(sv, t).unwrap().sv_xvt(t).unwrap();

    assert_eq!(xvt, direct);
    assert_eq!(hourly_store.nonconvergence_count(), 0);

    let t = t0 + 5.0 * Unit::Hour;
    assert_eq!(hourly_store.xvt(sv, t), Err(Error::NotFound(sv, t)));
}

#[test]
fn nonconvergence_is_counted() {
    let t0 = reference_epoch();
    let sv = SV::new(Constellation::GPS, 1);

    let cfg = Config {
        kepler: KeplerOpts {
            tolerance_rad: 1.0E-11,
            max_iterations: 1,
        },
        ..Default::default()
    };

    let mut store = EphemerisStore::new(cfg).unwrap();
    store.add(gps_record(1, t0)).unwrap();

    let xvt = store.xvt(sv, t0 + 60.0 * Unit::Second).unwrap();
    assert!(!xvt.kepler.converged);
    assert_eq!(store.nonconvergence_count(), 1);

    store.xvt(sv, t0 + 120.0 * Unit::Second).unwrap();
    assert_eq!(store.nonconvergence_count(), 2);
}

#[test]
fn invalid_config_is_rejected() {
    let cfg = Config {
        fit_intervals: FitIntervals {
            gps_s: 0.0,
            ..Default::default()
        },
        ..Default::default()
    };

    assert!(matches!(
        EphemerisStore::new(cfg),
        Err(Error::InvalidConfig(_))
    ));
}

#[test]
fn configured_fit_interval() {
    init_logger();

    let t0 = reference_epoch();
    let sv = SV::new(Constellation::GPS, 1);

    let cfg = Config {
        fit_intervals: FitIntervals {
            gps_s: 14400.0,
            ..Default::default()
        },
        ..Default::default()
    };

    let mut store = EphemerisStore::new(cfg).unwrap();

    // record windows are determined by the store, whatever the ingestion layer used
    let stored = store.add(gps_record(1, t0)).unwrap();
    assert_eq!(stored.fit_interval().unwrap(), 4.0 * Unit::Hour);
    assert_eq!(stored.end_valid().unwrap(), t0 + 4.0 * Unit::Hour);

    let t = t0 + 3.0 * Unit::Hour;
    assert_eq!(store.find(sv, t).unwrap().toe, t0);
    assert_eq!(store.final_time(), Some(t0 + 4.0 * Unit::Hour));

    let t = t0 + 4.0 * Unit::Hour + 1.0 * Unit::Second;
    assert_eq!(store.find(sv, t).err(), Some(Error::NotFound(sv, t)));
}
