//! Receiver clock resolution
use crate::{
    constants::{Nanos, BDT_GPST_OFFSET_S, GLONASS_UTC_OFFSET_S},
    epoch::from_gpst_week,
    error::Error,
    measurement::Measurement,
    prelude::Epoch,
};

use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Describes how the receiver clock bias is maintained
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BiasPolicy {
    /// FullBiasNanos is updated with every measurement
    #[default]
    Refresh,
    /// FullBiasNanos is held from the first measurement that reports it.
    /// BiasNanos keeps tracking every measurement.
    Fixed,
}

/// Receiver clock offset to GPST
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClockState {
    /// Integer part [ns]
    pub full_bias_nanos: i64,
    /// Sub nanosecond part [ns]
    pub bias_nanos: f64,
}

impl ClockState {
    /// Start of current GPS week, in nanoseconds since GPST origin
    pub fn week_nanos(&self) -> i64 {
        (-self.full_bias_nanos).div_euclid(Nanos::WEEK) * Nanos::WEEK
    }
    /// Start of current day, in nanoseconds since GPST origin
    pub fn day_nanos(&self) -> i64 {
        (-self.full_bias_nanos).div_euclid(Nanos::DAY) * Nanos::DAY
    }
    /// Start of current 100 ms period, in nanoseconds since GPST origin
    pub fn hundred_ms_nanos(&self) -> i64 {
        (-self.full_bias_nanos).div_euclid(Nanos::HUNDRED_MS) * Nanos::HUNDRED_MS
    }
}

/// Reference the reception time is expressed against,
/// so it matches the transmission time frame of each signal.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TimeOrigin {
    /// Start of GPS week
    Week,
    /// Start of GPS week, shifted to BeiDou time
    BeiDouWeek,
    /// Start of day, shifted to Glonass time
    GlonassDay,
    /// Start of current 100 ms period
    HundredMs,
}

/// Time resolved from one measurement
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ResolvedTime {
    /// GPS week number
    pub week: u32,
    /// Seconds within that week. Whole second when integerized.
    pub tow_s: f64,
    /// Fractional part removed by integerization [s], null otherwise
    pub residual_s: f64,
    /// [Epoch] in GPST
    pub epoch: Epoch,
    /// Clock state this time was resolved with
    pub clock: ClockState,
}

impl ResolvedTime {
    /// Signal reception time [s] of given [Measurement],
    /// relative to given [TimeOrigin].
    pub fn reception_time_s(
        &self,
        measurement: &Measurement,
        origin: TimeOrigin,
        leap_seconds: i64,
    ) -> f64 {
        let origin_nanos = match origin {
            TimeOrigin::Week => self.clock.week_nanos(),
            TimeOrigin::BeiDouWeek => {
                self.clock.week_nanos() + BDT_GPST_OFFSET_S * Nanos::SECOND
            },
            TimeOrigin::GlonassDay => {
                self.clock.day_nanos() - (GLONASS_UTC_OFFSET_S - leap_seconds) * Nanos::SECOND
            },
            TimeOrigin::HundredMs => self.clock.hundred_ms_nanos(),
        };
        let integer = measurement.time_nanos - self.clock.full_bias_nanos - origin_nanos;
        let nanos = integer as f64 + measurement.time_offset_nanos - self.clock.bias_nanos;
        nanos * 1.0E-9
    }
}

/// [ClockResolver] maintains the [ClockState] across the measurement stream
/// and resolves each measurement to an absolute time.
#[derive(Debug, Default, Clone)]
pub struct ClockResolver {
    policy: BiasPolicy,
    state: Option<ClockState>,
}

impl ClockResolver {
    /// Builds a new [ClockResolver] with given [BiasPolicy]
    pub fn new(policy: BiasPolicy) -> Self {
        Self {
            policy,
            state: None,
        }
    }
    /// Current [ClockState], if any was ever observed
    pub fn state(&self) -> Option<ClockState> {
        self.state
    }
    fn update(&mut self, measurement: &Measurement) -> Result<ClockState, Error> {
        let full_bias_nanos = match (self.policy, self.state, measurement.full_bias_nanos) {
            (BiasPolicy::Fixed, Some(state), _) => state.full_bias_nanos,
            (_, _, Some(full_bias)) => full_bias,
            (BiasPolicy::Refresh, Some(state), None) => state.full_bias_nanos,
            (_, None, None) => return Err(Error::MissingClockBias),
        };
        if self.state.is_none() {
            debug!("receiver clock bias: {} ns", full_bias_nanos);
        }
        let state = ClockState {
            full_bias_nanos,
            bias_nanos: measurement.bias_nanos,
        };
        self.state = Some(state);
        Ok(state)
    }
    /// Resolves the reception [Epoch] of this [Measurement].
    /// When `integerize` is set, the epoch is moved to the nearest whole second
    /// and the fractional offset is returned in [ResolvedTime::residual_s].
    pub fn resolve(
        &mut self,
        measurement: &Measurement,
        integerize: bool,
    ) -> Result<ResolvedTime, Error> {
        let clock = self.update(measurement)?;

        let week = (-clock.full_bias_nanos).div_euclid(Nanos::WEEK);
        let within_week = measurement.time_nanos - clock.full_bias_nanos - week * Nanos::WEEK;
        let tow_s = (within_week as f64 - clock.bias_nanos) * 1.0E-9;

        let (tow_s, residual_s) = if integerize {
            let rounded = (tow_s + 0.5).floor();
            (rounded, tow_s - rounded)
        } else {
            (tow_s, 0.0)
        };

        Ok(ResolvedTime {
            week: week as u32,
            tow_s,
            residual_s,
            epoch: from_gpst_week(week as u32, tow_s),
            clock,
        })
    }
}
