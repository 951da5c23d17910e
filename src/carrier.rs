//! Carrier signals and frequency bands
use crate::{
    clock::TimeOrigin,
    constants::{Frequency, SPEED_OF_LIGHT_M_S},
    error::Error,
    prelude::{Constellation, SV},
    version::Schema,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Glonass frequency channel of each orbital slot (1..=24)
const GLONASS_CHANNELS: [i8; 24] = [
    1, -4, 5, 6, 1, -4, 5, 6, -2, -7, 0, -1, -2, -7, 0, -1, -6, -3, 3, 2, 4, -3, 3, 2,
];

/// Returns frequency channel of given Glonass orbital slot
pub fn glonass_channel(slot: u16) -> Option<i8> {
    if slot == 0 {
        return None;
    }
    GLONASS_CHANNELS.get(slot as usize - 1).copied()
}

/// Iterates (slot, channel) over the Glonass channel table
pub fn glonass_channels() -> impl Iterator<Item = (u16, i8)> {
    GLONASS_CHANNELS
        .iter()
        .enumerate()
        .map(|(i, k)| (i as u16 + 1, *k))
}

/// Output slot a [Band] lands in
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BandClass {
    /// Main signal (L1, G1, E1, B1I)
    Primary,
    /// Any other signal
    Secondary,
}

/// Frequency bands we know how to measure
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Band {
    /// GPS L1
    L1,
    /// GPS L2
    L2,
    /// GPS L5
    L5,
    /// Glonass G1 (FDMA)
    G1,
    /// Glonass G2 (FDMA)
    G2,
    /// Galileo E1
    E1,
    /// Galileo E5a
    E5a,
    /// Galileo E5b
    E5b,
    /// Galileo E6
    E6,
    /// BeiDou B1I
    B1I,
    /// BeiDou B2I
    B2I,
    /// BeiDou B2a
    B2a,
    /// BeiDou B3I
    B3I,
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::L1 => write!(f, "L1"),
            Self::L2 => write!(f, "L2"),
            Self::L5 => write!(f, "L5"),
            Self::G1 => write!(f, "G1"),
            Self::G2 => write!(f, "G2"),
            Self::E1 => write!(f, "E1"),
            Self::E5a => write!(f, "E5a"),
            Self::E5b => write!(f, "E5b"),
            Self::E6 => write!(f, "E6"),
            Self::B1I => write!(f, "B1I"),
            Self::B2I => write!(f, "B2I"),
            Self::B2a => write!(f, "B2a"),
            Self::B3I => write!(f, "B3I"),
        }
    }
}

/*
 * Band lookup table: per constellation, descending lower bounds [Hz].
 * The first bound the carrier frequency exceeds wins.
 */
const GPS_BANDS: &[(f64, Band)] = &[
    (1500.0E6, Band::L1),
    (1200.0E6, Band::L2),
    (1100.0E6, Band::L5),
];

const GLONASS_BANDS: &[(f64, Band)] = &[(1500.0E6, Band::G1), (1200.0E6, Band::G2)];

const GALILEO_BANDS: &[(f64, Band)] = &[
    (1500.0E6, Band::E1),
    (1250.0E6, Band::E6),
    (1200.0E6, Band::E5b),
    (1100.0E6, Band::E5a),
];

const BEIDOU_BANDS: &[(f64, Band)] = &[
    (1500.0E6, Band::B1I),
    (1250.0E6, Band::B3I),
    (1200.0E6, Band::B2I),
    (1100.0E6, Band::B2a),
];

impl Band {
    /// Identifies the [Band] of a carrier tracked on given [Constellation].
    pub fn lookup(constellation: Constellation, frequency_hz: f64) -> Option<Self> {
        let table = match constellation {
            Constellation::GPS => GPS_BANDS,
            Constellation::Glonass => GLONASS_BANDS,
            Constellation::Galileo => GALILEO_BANDS,
            Constellation::BeiDou => BEIDOU_BANDS,
            _ => return None,
        };
        table
            .iter()
            .find(|(threshold, _)| frequency_hz > *threshold)
            .map(|(_, band)| *band)
    }
    /// [BandClass] of this band
    pub fn class(&self) -> BandClass {
        match self {
            Self::L1 | Self::G1 | Self::E1 | Self::B1I => BandClass::Primary,
            _ => BandClass::Secondary,
        }
    }
    /// Frame the reception time must be expressed in,
    /// to match the transmission time of this signal.
    pub fn time_origin(&self) -> TimeOrigin {
        match self {
            Self::G1 | Self::G2 => TimeOrigin::GlonassDay,
            Self::B1I | Self::B2I | Self::B2a | Self::B3I => TimeOrigin::BeiDouWeek,
            Self::E5a | Self::E5b | Self::E6 => TimeOrigin::HundredMs,
            _ => TimeOrigin::Week,
        }
    }
    /// Nominal carrier frequency [Hz]. Glonass carriers depend on
    /// the frequency channel of the satellite.
    pub fn carrier_frequency_hz(&self, sv: SV) -> Result<f64, Error> {
        let channel = || {
            glonass_channel(sv.prn as u16).ok_or(Error::UnknownGlonassChannel(sv.prn as u16))
        };
        match self {
            Self::L1 => Ok(Frequency::GPS_L1),
            Self::L2 => Ok(Frequency::GPS_L2),
            Self::L5 => Ok(Frequency::GPS_L5),
            Self::G1 => Ok(Frequency::GLO_G1 + channel()? as f64 * Frequency::GLO_G1_STEP),
            Self::G2 => Ok(Frequency::GLO_G2 + channel()? as f64 * Frequency::GLO_G2_STEP),
            Self::E1 => Ok(Frequency::GAL_E1),
            Self::E5a => Ok(Frequency::GAL_E5A),
            Self::E5b => Ok(Frequency::GAL_E5B),
            Self::E6 => Ok(Frequency::GAL_E6),
            Self::B1I => Ok(Frequency::BDS_B1I),
            Self::B2I => Ok(Frequency::BDS_B2I),
            Self::B2a => Ok(Frequency::BDS_B2A),
            Self::B3I => Ok(Frequency::BDS_B3I),
        }
    }
    /// Carrier wavelength [m]
    pub fn wavelength(&self, sv: SV) -> Result<f64, Error> {
        Ok(SPEED_OF_LIGHT_M_S / self.carrier_frequency_hz(sv)?)
    }
    /// RINEX3 frequency and attribute code ("1C", "5Q"..)
    pub fn rinex3_code(&self) -> &'static str {
        match self {
            Self::L1 | Self::G1 | Self::E1 => "1C",
            Self::L2 => "2L",
            Self::G2 => "2C",
            Self::L5 | Self::E5a => "5Q",
            Self::E5b => "7Q",
            Self::E6 => "6C",
            Self::B1I => "2I",
            Self::B2I => "7I",
            Self::B2a => "5P",
            Self::B3I => "6I",
        }
    }
    /// Returns true if given [Schema] declares observables for this band.
    /// Legacy files only describe the primary band. Modern files describe
    /// the primary band and one secondary band per constellation.
    pub fn is_declared(&self, schema: Schema) -> bool {
        match schema {
            Schema::V2_11 => self.class() == BandClass::Primary,
            Schema::V3_03 => matches!(
                self,
                Self::L1
                    | Self::L5
                    | Self::G1
                    | Self::G2
                    | Self::E1
                    | Self::E5a
                    | Self::B1I
                    | Self::B2I
            ),
        }
    }
    /// Bands declared by given [Schema] for this [Constellation],
    /// in column order.
    pub fn declared(constellation: Constellation, schema: Schema) -> Vec<Self> {
        let table = match constellation {
            Constellation::GPS => GPS_BANDS,
            Constellation::Glonass => GLONASS_BANDS,
            Constellation::Galileo => GALILEO_BANDS,
            Constellation::BeiDou => BEIDOU_BANDS,
            _ => return Vec::new(),
        };
        let mut bands = table
            .iter()
            .map(|(_, band)| *band)
            .filter(|band| band.is_declared(schema))
            .collect::<Vec<_>>();
        bands.sort_by_key(|band| band.class());
        bands
    }
}
