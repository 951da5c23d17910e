//! const values used in the conversion

/// Speed of light in vacuum [m/s]
pub const SPEED_OF_LIGHT_M_S: f64 = 299_792_458.0;

/// Number of seconds in one GPS week
pub const SECONDS_PER_WEEK: f64 = 604_800.0;

/// Accumulated delta range roll over modulus [cycles]
pub const ADR_ROLL_OVER_CYCLES: f64 = 8_388_608.0;

/// Nanosecond counters, in integer domain.
pub(crate) struct Nanos;

impl Nanos {
    pub const SECOND: i64 = 1_000_000_000;
    pub const HUNDRED_MS: i64 = 100_000_000;
    pub const DAY: i64 = 86_400 * Self::SECOND;
    pub const WEEK: i64 = 7 * Self::DAY;
}

/// Carrier frequencies [Hz]
pub(crate) struct Frequency;

impl Frequency {
    pub const GPS_L1: f64 = 1575.42E6;
    pub const GPS_L2: f64 = 1227.60E6;
    pub const GPS_L5: f64 = 1176.45E6;

    pub const GAL_E1: f64 = 1575.42E6;
    pub const GAL_E5A: f64 = 1176.45E6;
    pub const GAL_E5B: f64 = 1207.14E6;
    pub const GAL_E6: f64 = 1278.75E6;

    pub const BDS_B1I: f64 = 1561.098E6;
    pub const BDS_B2I: f64 = 1207.14E6;
    pub const BDS_B2A: f64 = 1176.45E6;
    pub const BDS_B3I: f64 = 1268.52E6;

    /// Glonass G1 base frequency
    pub const GLO_G1: f64 = 1602.0E6;
    /// Glonass G1 channel step
    pub const GLO_G1_STEP: f64 = 562.5E3;
    /// Glonass G2 base frequency
    pub const GLO_G2: f64 = 1246.0E6;
    /// Glonass G2 channel step
    pub const GLO_G2_STEP: f64 = 437.5E3;

    /// Frequency assumed when the receiver did not report it
    pub const DEFAULT: f64 = 2000.0E6;
}

/// Glonass time is UTC(SU) + 3h
pub(crate) const GLONASS_UTC_OFFSET_S: i64 = 3 * 3600;

/// BeiDou time started 14s after GPST (leap seconds frozen since)
pub(crate) const BDT_GPST_OFFSET_S: i64 = 14;

/// Minimal sane pseudorange [m]
pub(crate) const MIN_PSEUDO_RANGE_M: f64 = 10.0E6;

/// Maximal sane pseudorange [m]
pub(crate) const MAX_PSEUDO_RANGE_M: f64 = 40.0E6;
