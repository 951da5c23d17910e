//! Raw GNSS measurement
mod state;

pub use state::{AdrState, SyncState};

use crate::{
    error::Error,
    prelude::Constellation,
    reader::{FieldDescriptor, Record},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Constellation identifier, as reported by the receiver
/// (Android `GnssStatus` constellation codes).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConstellationType {
    GPS,
    SBAS,
    Glonass,
    QZSS,
    BeiDou,
    Galileo,
    /// Any other code
    Unknown(i64),
}

impl ConstellationType {
    /// Builds [ConstellationType] from its numeric code
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Self::GPS,
            2 => Self::SBAS,
            3 => Self::Glonass,
            4 => Self::QZSS,
            5 => Self::BeiDou,
            6 => Self::Galileo,
            code => Self::Unknown(code),
        }
    }
    /// Converts to [Constellation], if we support it.
    pub fn constellation(&self) -> Result<Constellation, Error> {
        match self {
            Self::GPS => Ok(Constellation::GPS),
            Self::Glonass => Ok(Constellation::Glonass),
            Self::Galileo => Ok(Constellation::Galileo),
            Self::BeiDou => Ok(Constellation::BeiDou),
            Self::QZSS => Err(Error::UnsupportedConstellation("QZSS")),
            Self::SBAS => Err(Error::UnsupportedConstellation("SBAS")),
            Self::Unknown(code) => Err(Error::UnknownConstellation(*code)),
        }
    }
}

/// Position of every field we use, resolved once from the [FieldDescriptor].
#[derive(Debug, Clone)]
pub struct Layout {
    arity: usize,
    time_nanos: Option<usize>,
    leap_second: Option<usize>,
    full_bias_nanos: Option<usize>,
    bias_nanos: Option<usize>,
    svid: Option<usize>,
    time_offset_nanos: Option<usize>,
    state: Option<usize>,
    received_sv_time_nanos: Option<usize>,
    cn0_dbhz: Option<usize>,
    pseudorange_rate: Option<usize>,
    adr_state: Option<usize>,
    adr_meters: Option<usize>,
    carrier_frequency_hz: Option<usize>,
    constellation: Option<usize>,
}

impl Layout {
    /// Resolves field positions from given [FieldDescriptor]
    pub fn new(descriptor: &FieldDescriptor) -> Self {
        Self {
            arity: descriptor.len(),
            time_nanos: descriptor.position("TimeNanos"),
            leap_second: descriptor.position("LeapSecond"),
            full_bias_nanos: descriptor.position("FullBiasNanos"),
            bias_nanos: descriptor.position("BiasNanos"),
            svid: descriptor.position("Svid"),
            time_offset_nanos: descriptor.position("TimeOffsetNanos"),
            state: descriptor.position("State"),
            received_sv_time_nanos: descriptor.position("ReceivedSvTimeNanos"),
            cn0_dbhz: descriptor.position("Cn0DbHz"),
            pseudorange_rate: descriptor.position("PseudorangeRateMetersPerSecond"),
            adr_state: descriptor.position("AccumulatedDeltaRangeState"),
            adr_meters: descriptor.position("AccumulatedDeltaRangeMeters"),
            carrier_frequency_hz: descriptor.position("CarrierFrequencyHz"),
            constellation: descriptor.position("ConstellationType"),
        }
    }
    /// Number of fields a [Record] must contain
    pub fn arity(&self) -> usize {
        self.arity
    }
}

/// Raw measurement of one satellite signal, at one receiver clock instant.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Measurement {
    /// Satellite number
    pub svid: u16,
    /// Constellation code
    pub constellation: ConstellationType,
    /// Receiver clock [ns]
    pub time_nanos: i64,
    /// Receiver clock offset to GPST, integer part [ns]
    pub full_bias_nanos: Option<i64>,
    /// Receiver clock offset to GPST, sub nanosecond part [ns]
    pub bias_nanos: f64,
    /// Measurement time offset to `time_nanos` [ns]
    pub time_offset_nanos: f64,
    /// GPST - UTC leap seconds
    pub leap_seconds: i64,
    /// Tracked carrier frequency [Hz]
    pub carrier_frequency_hz: Option<f64>,
    /// Signal transmission time, in the constellation time frame [ns]
    pub received_sv_time_nanos: i64,
    /// Accumulated delta range [m]
    pub adr_m: f64,
    /// [AdrState]
    pub adr_state: AdrState,
    /// Pseudo range rate [m/s]
    pub pseudorange_rate_m_s: f64,
    /// Carrier to noise density ratio [dB-Hz]
    pub cn0_dbhz: f64,
    /// [SyncState]
    pub state: SyncState,
}

impl Default for Measurement {
    fn default() -> Self {
        Self {
            svid: 0,
            constellation: ConstellationType::GPS,
            time_nanos: 0,
            full_bias_nanos: None,
            bias_nanos: 0.0,
            time_offset_nanos: 0.0,
            leap_seconds: 0,
            carrier_frequency_hz: None,
            received_sv_time_nanos: 0,
            adr_m: 0.0,
            adr_state: AdrState::empty(),
            pseudorange_rate_m_s: 0.0,
            cn0_dbhz: 0.0,
            state: SyncState::empty(),
        }
    }
}

fn field<'a>(
    record: &'a Record,
    index: Option<usize>,
    name: &'static str,
) -> Result<&'a str, Error> {
    index
        .and_then(|i| record.get(i))
        .ok_or(Error::MissingField(name))
}

fn parse_f64(value: &str, name: &'static str) -> Result<f64, Error> {
    value.parse::<f64>().map_err(|_| Error::FieldParsing {
        field: name,
        value: value.to_string(),
    })
}

/// Integer fields are sometimes logged in floating point notation
fn parse_i64(value: &str, name: &'static str) -> Result<i64, Error> {
    match value.parse::<i64>() {
        Ok(v) => Ok(v),
        Err(_) => Ok(parse_f64(value, name)? as i64),
    }
}

fn optional<T>(
    record: &Record,
    index: Option<usize>,
    name: &'static str,
    parser: fn(&str, &'static str) -> Result<T, Error>,
) -> Result<Option<T>, Error> {
    match index.and_then(|i| record.get(i)) {
        Some(value) => Ok(Some(parser(value, name)?)),
        None => Ok(None),
    }
}

impl Measurement {
    /// Interprets a [Record] with given [Layout].
    /// The record must contain exactly as many fields as the descriptor did.
    pub fn from_record(layout: &Layout, record: &Record) -> Result<Self, Error> {
        if record.len() != layout.arity {
            return Err(Error::MalformedRecord {
                expected: layout.arity,
                found: record.len(),
            });
        }

        let svid = parse_i64(field(record, layout.svid, "Svid")?, "Svid")?;
        let constellation = parse_i64(
            field(record, layout.constellation, "ConstellationType")?,
            "ConstellationType",
        )?;
        let time_nanos = parse_i64(field(record, layout.time_nanos, "TimeNanos")?, "TimeNanos")?;
        let received_sv_time_nanos = parse_i64(
            field(record, layout.received_sv_time_nanos, "ReceivedSvTimeNanos")?,
            "ReceivedSvTimeNanos",
        )?;
        let state = parse_i64(field(record, layout.state, "State")?, "State")?;
        let cn0_dbhz = parse_f64(field(record, layout.cn0_dbhz, "Cn0DbHz")?, "Cn0DbHz")?;
        let pseudorange_rate_m_s = parse_f64(
            field(
                record,
                layout.pseudorange_rate,
                "PseudorangeRateMetersPerSecond",
            )?,
            "PseudorangeRateMetersPerSecond",
        )?;

        let full_bias_nanos = optional(record, layout.full_bias_nanos, "FullBiasNanos", parse_i64)?;
        let bias_nanos = optional(record, layout.bias_nanos, "BiasNanos", parse_f64)?;
        let time_offset_nanos =
            optional(record, layout.time_offset_nanos, "TimeOffsetNanos", parse_f64)?;
        let leap_seconds = optional(record, layout.leap_second, "LeapSecond", parse_i64)?;
        let carrier_frequency_hz = optional(
            record,
            layout.carrier_frequency_hz,
            "CarrierFrequencyHz",
            parse_f64,
        )?;
        let adr_m = optional(
            record,
            layout.adr_meters,
            "AccumulatedDeltaRangeMeters",
            parse_f64,
        )?;
        let adr_state = optional(
            record,
            layout.adr_state,
            "AccumulatedDeltaRangeState",
            parse_i64,
        )?;

        Ok(Self {
            svid: svid as u16,
            constellation: ConstellationType::from_code(constellation),
            time_nanos,
            full_bias_nanos,
            bias_nanos: bias_nanos.unwrap_or(0.0),
            time_offset_nanos: time_offset_nanos.unwrap_or(0.0),
            leap_seconds: leap_seconds.unwrap_or(0),
            carrier_frequency_hz,
            received_sv_time_nanos,
            adr_m: adr_m.unwrap_or(0.0),
            adr_state: AdrState::from_bits_truncate(adr_state.unwrap_or(0) as u16),
            pseudorange_rate_m_s,
            cn0_dbhz,
            state: SyncState::from_bits_truncate(state as u32),
        })
    }
}
