//! Carrier phase ambiguity correction
use crate::constants::ADR_ROLL_OVER_CYCLES;

/// Number of ADR roll overs between the raw carrier phase and
/// the code range, rounded half away from zero.
pub fn roll_overs(pseudo_range_m: f64, raw_cycles: f64, wavelength_m: f64) -> f64 {
    ((pseudo_range_m / wavelength_m + raw_cycles) / ADR_ROLL_OVER_CYCLES).round()
}

/// Corrects raw carrier phase [cycles] for ADR roll overs.
/// The returned phase is sign inverted with respect to the raw ADR,
/// and stays within one roll over window of the code range.
pub fn correct(pseudo_range_m: f64, raw_cycles: f64, wavelength_m: f64) -> f64 {
    let rolls = roll_overs(pseudo_range_m, raw_cycles, wavelength_m);
    -(raw_cycles - ADR_ROLL_OVER_CYCLES * rolls)
}
