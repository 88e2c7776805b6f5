//! Broadcast health, accuracy and group delay decoding

use crate::prelude::Constellation;

/// User range accuracy (URA) nominal values, indexed by the broadcast
/// URA index (in meters). Index 15 and above means "no prediction".
const URA_TABLE_M: [f64; 15] = [
    2.4, 3.4, 4.85, 6.85, 9.65, 13.65, 24.0, 48.0, 96.0, 192.0, 384.0, 768.0, 1536.0,
    3072.0, 6144.0,
];

/// Decoded satellite [Health]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum Health {
    /// Healthy vehicle
    #[default]
    Healthy,
    /// Unhealthy vehicle, with the relevant raw health bits
    Unhealthy(u32),
}

impl Health {
    /// Decodes the raw broadcast health field of this [Constellation].
    /// Only the bits that describe the navigation signal are retained:
    /// - GPS/QZSS: 6 bit word, all bits significant
    /// - Galileo: E5b/E1b data validity and signal health (9 bits)
    /// - BeiDou: SatH1 (1 bit)
    /// - IRNSS: L5/S health (2 bits)
    ///
    /// Other constellations keep all bits.
    pub fn decode(constellation: Constellation, raw: u32) -> Self {
        let mask = match constellation {
            Constellation::GPS | Constellation::QZSS => 0x3F,
            Constellation::Galileo => 0x1FF,
            Constellation::BeiDou => 0x01,
            Constellation::IRNSS => 0x03,
            _ => u32::MAX,
        };
        match raw & mask {
            0 => Self::Healthy,
            bits => Self::Unhealthy(bits),
        }
    }

    /// True for [Health::Healthy]
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }
}

/// Broadcast signal in space [Accuracy] index
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Accuracy {
    /// User range accuracy index (GPS, QZSS, BeiDou, IRNSS)
    Ura(u8),
    /// Signal in space accuracy index (Galileo)
    Sisa(u8),
}

impl Accuracy {
    /// Builds the [Accuracy] index that applies to this [Constellation]
    pub fn from_index(constellation: Constellation, index: u8) -> Self {
        match constellation {
            Constellation::Galileo => Self::Sisa(index),
            _ => Self::Ura(index),
        }
    }

    /// Nominal accuracy in meters, None when no prediction is available
    pub fn meters(&self) -> Option<f64> {
        match self {
            Self::Ura(index) => URA_TABLE_M.get(*index as usize).copied(),
            Self::Sisa(index) => {
                let n = *index as f64;
                match index {
                    0..=49 => Some(n * 0.01),
                    50..=74 => Some(0.5 + (n - 50.0) * 0.02),
                    75..=99 => Some(1.0 + (n - 75.0) * 0.04),
                    100..=125 => Some(2.0 + (n - 100.0) * 0.16),
                    // 126..=254 spare, 255: no accuracy prediction (NAPA)
                    _ => None,
                }
            },
        }
    }
}

/// Inter frequency [GroupDelay] combinations
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupDelay {
    /// GPS/QZSS/IRNSS TGD (L1/L2)
    L1L2,
    /// Galileo BGD E1/E5a
    E1E5a,
    /// Galileo BGD E1/E5b
    E1E5b,
    /// BeiDou TGD1 (B1/B3)
    B1B3,
    /// BeiDou TGD2 (B2/B3)
    B2B3,
}

impl std::fmt::Display for GroupDelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::L1L2 => write!(f, "L1/L2"),
            Self::E1E5a => write!(f, "E1/E5a"),
            Self::E1E5b => write!(f, "E1/E5b"),
            Self::B1B3 => write!(f, "B1/B3"),
            Self::B2B3 => write!(f, "B2/B3"),
        }
    }
}
