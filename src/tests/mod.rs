mod store;

use log::LevelFilter;
use std::{str::FromStr, sync::Once};

use crate::prelude::{
    ClockPolynomial, Constellation, Epoch, FitIntervals, GroupDelay, Health, IssueOfData,
    Keplerian, OrbitRecord, Perturbations, SV,
};

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        env_logger::builder()
            .is_test(true)
            .filter_level(LevelFilter::Debug)
            .init();
    });
}

/// Reference epoch of the test dataset
pub fn reference_epoch() -> Epoch {
    Epoch::from_str("2020-06-25T00:00:00 GPST").unwrap()
}

pub fn gps_keplerian() -> Keplerian {
    Keplerian {
        semi_major_axis_m: 5153.6419_f64.powi(2),
        a_dot_m_s: 0.0,
        eccentricity: 0.005_148_614_384,
        i0_rad: 0.962_608_795_383,
        omega_rad: 0.694_409_691_237,
        omega0_rad: -2.172_248_755_842,
        m0_rad: 1.310_331_605_901,
    }
}

pub fn gps_perturbations() -> Perturbations {
    Perturbations {
        dn_rad_s: 4.513_759_306_79E-9,
        dn_dot_rad_s2: 0.0,
        idot_rad_s: 1.003_613_523_35E-10,
        omega_dot_rad_s: -8.027_834_510_86E-9,
        cus_cuc_rad: (8.227_303_624_15E-6, 1.045_107_841_49E-6),
        cis_cic_rad: (-5.029_141_902_92E-8, 1.192_092_895_51E-7),
        crs_crc_m: (19.906_25, 207.8125),
    }
}

pub fn gps_clock() -> ClockPolynomial {
    ClockPolynomial {
        bias_s: -1.745_722_256_60E-4,
        drift_s_s: -9.094_947_017_73E-13,
        drift_rate_s_s2: 1.0E-18,
    }
}

/// Builds a loaded GPS [OrbitRecord], transmitted at ToE
pub fn gps_record(prn: u8, toe: Epoch) -> OrbitRecord {
    OrbitRecord::new(SV::new(Constellation::GPS, prn), toe, toe, toe)
        .with_keplerian(gps_keplerian())
        .with_perturbations(gps_perturbations())
        .with_clock(gps_clock())
        .with_group_delay(GroupDelay::L1L2, -1.117_587_089_54E-8)
        .with_issue_of_data(IssueOfData { iode: 71, iodc: 71 })
        .with_accuracy_m(Some(2.4))
        .with_health(Health::Healthy)
        .with_data_loaded(&FitIntervals::default())
}

/// Builds a loaded BeiDou GEO [OrbitRecord], transmitted at ToE
pub fn beidou_geo_record(prn: u8, toe: Epoch) -> OrbitRecord {
    OrbitRecord::new(SV::new(Constellation::BeiDou, prn), toe, toe, toe)
        .with_keplerian(Keplerian {
            semi_major_axis_m: 6493.4421_f64.powi(2),
            a_dot_m_s: 0.0,
            eccentricity: 3.903_819_574_04E-4,
            i0_rad: 0.034_073_479_837_6,
            omega_rad: -2.652_102_121_73,
            omega0_rad: 1.912_365_440_78,
            m0_rad: 2.696_983_290_49,
        })
        .with_perturbations(Perturbations {
            dn_rad_s: 3.271_564_006_22E-10,
            dn_dot_rad_s2: 0.0,
            idot_rad_s: 6.328_834_797_45E-11,
            omega_dot_rad_s: -2.575_464_996_46E-10,
            cus_cuc_rad: (-1.718_290_150_18E-6, -1.089_111_901_50E-5),
            cis_cic_rad: (-1.024_455_823_02E-7, 2.328_306_436_54E-8),
            crs_crc_m: (-330.375, 170.515_625),
        })
        .with_clock(ClockPolynomial {
            bias_s: 2.027_212_479_06E-4,
            drift_s_s: 4.311_662_265_40E-11,
            drift_rate_s_s2: 0.0,
        })
        .with_group_delay(GroupDelay::B1B3, 1.42E-8)
        .with_group_delay(GroupDelay::B2B3, -1.04E-8)
        .with_data_loaded(&FitIntervals::default())
}

/// Central finite difference of the position, at `t` (m.s⁻¹)
pub fn finite_difference_velocity(record: &OrbitRecord, t: Epoch, h_s: f64) -> [f64; 3] {
    use crate::prelude::Unit;

    let before = record.sv_xvt(t - h_s * Unit::Second).unwrap();
    let after = record.sv_xvt(t + h_s * Unit::Second).unwrap();
    let mut v = [0.0; 3];

    for (i, v_i) in v.iter_mut().enumerate() {
        *v_i = (after.position_m[i] - before.position_m[i]) / (2.0 * h_s);
    }
    v
}
