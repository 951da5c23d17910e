use thiserror::Error;

use crate::prelude::{Epoch, SV};

/// Conversion [Error]s.
///
/// Only [Error::Io] aborts a conversion. Every other variant describes a
/// record (or an epoch) that was skipped or degraded: the [crate::pipeline::Pipeline]
/// reports them as warnings and keeps going.
#[derive(Error, Debug)]
pub enum Error {
    /// Field count does not match the descriptor
    #[error("malformed record: expecting {expected} fields, got {found}")]
    MalformedRecord { expected: usize, found: usize },
    /// Log does not describe its "Raw" fields
    #[error("missing \"# Raw\" field descriptor")]
    MissingFieldDescriptor,
    /// Mandatory field is absent or empty
    #[error("missing \"{0}\" field")]
    MissingField(&'static str),
    /// Field value is not a number
    #[error("failed to parse \"{field}\" from \"{value}\"")]
    FieldParsing { field: &'static str, value: String },
    /// No FullBiasNanos was ever observed
    #[error("receiver clock bias unknown")]
    MissingClockBias,
    /// Code lock and/or TOW decoding are missing
    #[error("invalid sync state 0x{0:04x}: missing code lock or TOW decoding")]
    SyncStateInvalid(u32),
    /// Glonass frequency slot number reported instead of orbital slot
    #[error("R{0}: frequency slot numbering is not supported")]
    UnsupportedNumbering(u16),
    /// Glonass slot that the channel table does not describe
    #[error("R{0}: unknown frequency channel")]
    UnknownGlonassChannel(u16),
    /// Constellation we do not convert (QZSS, SBAS)
    #[error("{0} constellation is not supported")]
    UnsupportedConstellation(&'static str),
    /// Constellation code we do not know
    #[error("unknown constellation #{0}")]
    UnknownConstellation(i64),
    /// Carrier frequency that no declared observable describes
    #[error("{sv}: no declared observable for {frequency_hz} Hz carrier")]
    UnsupportedBand { sv: SV, frequency_hz: f64 },
    /// Accumulated delta range is not valid
    #[error("{sv}: invalid ADR state 0x{state:02x}")]
    CarrierPhaseInvalid { sv: SV, state: u16 },
    /// Pseudorange failed the sanity check
    #[error("{sv}: pseudo range {range_m:.3} m out of bounds")]
    OutOfBoundsRange { sv: SV, range_m: f64 },
    /// Same satellite reported twice within one epoch
    #[error("{epoch}: repeated entries, epoch skipped")]
    DuplicateEpochEntry { epoch: Epoch },
    /// I/O error
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
