//! Observables computation
pub mod ambiguity;

use crate::{
    carrier::{glonass_channel, Band},
    clock::ResolvedTime,
    constants::{
        Frequency, MAX_PSEUDO_RANGE_M, MIN_PSEUDO_RANGE_M, SECONDS_PER_WEEK, SPEED_OF_LIGHT_M_S,
    },
    error::Error,
    measurement::{ConstellationType, Measurement},
    prelude::SV,
    version::Schema,
};

use log::trace;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Glonass slots from this value are frequency slot numbers (FCN + 100)
const GLONASS_FCN_OFFSET: u16 = 93;

/// How measurements that are not code locked or whose
/// time of week is not decoded are handled.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SyncPolicy {
    /// Report and keep going
    #[default]
    Warn,
    /// Report and drop the measurement
    Reject,
}

/// [Observable] is everything we compute from one [Measurement]
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Observable {
    /// [SV] the signal is coming from
    pub sv: SV,
    /// Carrier [Band]
    pub band: Band,
    /// Pseudo range [m]
    pub pseudo_range_m: f64,
    /// Ambiguity corrected carrier phase [cycles]
    pub phase_cycles: f64,
    /// Doppler shift [Hz], positive when the satellite is approaching
    pub doppler_hz: f64,
    /// Carrier to noise density ratio [dB-Hz]
    pub cn0_dbhz: f64,
}

/// [Engine] turns [Measurement]s into [Observable]s.
#[derive(Debug, Copy, Clone)]
pub struct Engine {
    schema: Schema,
    sync_policy: SyncPolicy,
    range_edit: bool,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            schema: Schema::default(),
            sync_policy: SyncPolicy::default(),
            range_edit: true,
        }
    }
}

impl Engine {
    /// Builds a new [Engine]
    pub fn new(schema: Schema, sync_policy: SyncPolicy, range_edit: bool) -> Self {
        Self {
            schema,
            sync_policy,
            range_edit,
        }
    }

    /// Identifies the [SV] this [Measurement] is tracking
    pub fn satellite(measurement: &Measurement) -> Result<SV, Error> {
        let constellation = measurement.constellation.constellation()?;
        let prn = measurement.svid;
        if measurement.constellation == ConstellationType::Glonass {
            if prn >= GLONASS_FCN_OFFSET {
                return Err(Error::UnsupportedNumbering(prn));
            }
            if glonass_channel(prn).is_none() {
                return Err(Error::UnknownGlonassChannel(prn));
            }
        }
        let prn = u8::try_from(prn).map_err(|_| Error::UnsupportedNumbering(prn))?;
        Ok(SV::new(constellation, prn))
    }

    /// Identifies the [Band] of this [Measurement]. Fails if
    /// the band is not described by our [Schema].
    pub fn band(&self, sv: SV, measurement: &Measurement) -> Result<Band, Error> {
        let frequency_hz = measurement
            .carrier_frequency_hz
            .unwrap_or(Frequency::DEFAULT);
        match Band::lookup(sv.constellation, frequency_hz) {
            Some(band) if band.is_declared(self.schema) => Ok(band),
            _ => Err(Error::UnsupportedBand { sv, frequency_hz }),
        }
    }

    /// Computes the [Observable] of this [Measurement], resolved at [ResolvedTime].
    /// Non fatal issues are stacked into `warnings`.
    pub fn compute(
        &self,
        measurement: &Measurement,
        time: &ResolvedTime,
        warnings: &mut Vec<Error>,
    ) -> Result<Observable, Error> {
        let sv = Self::satellite(measurement)?;
        let band = self.band(sv, measurement)?;

        if !measurement.state.is_valid() {
            let error = Error::SyncStateInvalid(measurement.state.bits());
            match self.sync_policy {
                SyncPolicy::Warn => warnings.push(error),
                SyncPolicy::Reject => return Err(error),
            }
        }

        let wavelength = band.wavelength(sv)?;

        let pseudo_range_m = Self::pseudo_range(measurement, time, band);

        if self.range_edit && !(MIN_PSEUDO_RANGE_M..=MAX_PSEUDO_RANGE_M).contains(&pseudo_range_m)
        {
            return Err(Error::OutOfBoundsRange {
                sv,
                range_m: pseudo_range_m,
            });
        }

        let phase_cycles = if measurement.adr_state.is_valid() {
            let raw = measurement.adr_m / wavelength;
            ambiguity::correct(pseudo_range_m, raw, wavelength)
        } else {
            warnings.push(Error::CarrierPhaseInvalid {
                sv,
                state: measurement.adr_state.bits(),
            });
            0.0
        };

        let doppler_hz = -measurement.pseudorange_rate_m_s / wavelength;

        trace!(
            "{}({}) - {} pr={:.3} phase={:.3} dop={:.3}",
            time.epoch,
            sv,
            band,
            pseudo_range_m,
            phase_cycles,
            doppler_hz
        );

        Ok(Observable {
            sv,
            band,
            pseudo_range_m,
            phase_cycles,
            doppler_hz,
            cn0_dbhz: measurement.cn0_dbhz,
        })
    }

    /// Pseudo range [m]: signal travel time times the speed of light.
    /// When the epoch was integerized, the range is moved to that epoch
    /// using the range rate.
    pub fn pseudo_range(measurement: &Measurement, time: &ResolvedTime, band: Band) -> f64 {
        let rx_s = time.reception_time_s(measurement, band.time_origin(), measurement.leap_seconds);
        let tx_s = measurement.received_sv_time_nanos as f64 * 1.0E-9;

        let mut tau = rx_s - tx_s;
        if tau < 0.0 {
            // week roll over
            tau += SECONDS_PER_WEEK;
        }

        tau * SPEED_OF_LIGHT_M_S - time.residual_s * measurement.pseudorange_rate_m_s
    }
}
