//! Tracking and carrier phase status flags
use bitflags::bitflags;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

bitflags! {
    /// Receiver synchronization state of one measurement
    /// (Android `GnssMeasurement.getState()`).
    #[derive(Debug, Default, Copy, Clone)]
    #[derive(PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct SyncState: u32 {
        /// Code is locked
        const CODE_LOCK = 0x0001;
        /// Bit synchronization achieved
        const BIT_SYNC = 0x0002;
        /// Sub frame synchronization achieved
        const SUBFRAME_SYNC = 0x0004;
        /// Time of week decoded
        const TOW_DECODED = 0x0008;
        /// Millisecond ambiguity remains
        const MSEC_AMBIGUOUS = 0x0010;
        /// Symbol synchronization achieved
        const SYMBOL_SYNC = 0x0020;
        /// Glonass string synchronization
        const GLO_STRING_SYNC = 0x0040;
        /// Glonass time of day decoded
        const GLO_TOD_DECODED = 0x0080;
        /// BeiDou D2 bit synchronization
        const BDS_D2_BIT_SYNC = 0x0100;
        /// BeiDou D2 sub frame synchronization
        const BDS_D2_SUBFRAME_SYNC = 0x0200;
        /// Galileo E1BC code lock
        const GAL_E1BC_CODE_LOCK = 0x0400;
        /// Galileo E1C secondary code lock
        const GAL_E1C_2ND_CODE_LOCK = 0x0800;
        /// Galileo E1B page synchronization
        const GAL_E1B_PAGE_SYNC = 0x1000;
        /// SBAS synchronization
        const SBAS_SYNC = 0x2000;
        /// Time of week known
        const TOW_KNOWN = 0x4000;
        /// Glonass time of day known
        const GLO_TOD_KNOWN = 0x8000;
    }
}

impl SyncState {
    /// Minimal state for a measurement to be trusted:
    /// code lock and decoded time of week.
    pub const REQUIRED: Self = Self::CODE_LOCK.union(Self::TOW_DECODED);

    /// Returns true if both code lock and TOW decoding are reported
    pub fn is_valid(&self) -> bool {
        self.contains(Self::REQUIRED)
    }
}

bitflags! {
    /// Accumulated delta range state
    /// (Android `GnssMeasurement.getAccumulatedDeltaRangeState()`).
    #[derive(Debug, Default, Copy, Clone)]
    #[derive(PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct AdrState: u16 {
        /// ADR is valid
        const VALID = 0x01;
        /// ADR was reset
        const RESET = 0x02;
        /// Cycle slip detected
        const CYCLE_SLIP = 0x04;
        /// Half cycle ambiguity resolved
        const HALF_CYCLE_RESOLVED = 0x08;
        /// Half cycle ambiguity reported
        const HALF_CYCLE_REPORTED = 0x10;
    }
}

impl AdrState {
    /// Returns true if carrier phase may be used
    pub fn is_valid(&self) -> bool {
        self.contains(Self::VALID)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sync_state() {
        assert!(SyncState::from_bits_truncate(0x4009).is_valid());
        assert!(SyncState::from_bits_truncate(0x000f).is_valid());
        assert!(!SyncState::from_bits_truncate(0x0001).is_valid());
        assert!(!SyncState::from_bits_truncate(0x0008).is_valid());
        assert!(!SyncState::empty().is_valid());
    }

    #[test]
    fn adr_state() {
        assert!(AdrState::from_bits_truncate(0x11).is_valid());
        assert!(!AdrState::from_bits_truncate(0x04).is_valid());
        assert!(!AdrState::default().is_valid());
    }
}
