use crate::prelude::{Duration, Epoch, TimeScale};
use hifitime::Unit;

/*
 * Infaillible `Epoch::now()` call.
 */
pub(crate) fn now() -> Epoch {
    Epoch::now().unwrap_or(Epoch::from_gregorian_utc_at_midnight(2000, 1, 1))
}

/*
 * Gregorian decomposition, expressed in the epoch's own GNSS timescale.
 * GPST, GST and BDT are steered to TAI - 19s, other timescales are printed as UTC.
 */
pub(crate) fn gregorian(epoch: Epoch) -> (i32, u8, u8, u8, u8, u8, u32) {
    // RINEX resolution is 0.1 us
    let epoch = epoch.round(100 * Unit::Nanosecond);
    match epoch.time_scale {
        TimeScale::GPST | TimeScale::GST | TimeScale::BDT => {
            (epoch - 19 * Unit::Second).to_gregorian_tai()
        },
        _ => epoch.to_gregorian_utc(),
    }
}

/*
 * Formats epoch of an observation record.
 * V2: "yy mm dd hh mm ss.sssssss", V3: "yyyy mm dd hh mm ss.sssssss"
 */
pub(crate) fn format(epoch: Epoch, major: u8) -> String {
    let (y, m, d, hh, mm, ss, nanos) = gregorian(epoch);
    let units = nanos / 100;
    if major < 3 {
        // old RINEX wants 2 digit YY field
        let mut y = y - 2000;
        if y < 0 {
            y += 100;
        }
        format!(
            "{:02} {:>2} {:>2} {:>2} {:>2} {:>2}.{:07}",
            y, m, d, hh, mm, ss, units
        )
    } else {
        format!(
            "{:04} {:02} {:02} {:02} {:02} {:>2}.{:07}",
            y, m, d, hh, mm, ss, units
        )
    }
}

/*
 * Formats epoch of the TIME OF FIRST OBS header field
 */
pub(crate) fn format_first_obs(epoch: Epoch) -> String {
    let (y, m, d, hh, mm, ss, nanos) = gregorian(epoch);
    let seconds = ss as f64 + nanos as f64 * 1.0E-9;
    format!(
        "{:6}{:6}{:6}{:6}{:6}{:13.7}     GPS",
        y, m, d, hh, mm, seconds
    )
}

/*
 * Run date stamp of the PGM / RUN BY / DATE header field
 */
pub(crate) fn format_run_date(epoch: Epoch) -> String {
    let (y, m, d, hh, mm, ss, _) = epoch.to_gregorian_utc();
    format!("{:04}{:02}{:02} {:02}{:02}{:02} UTC", y, m, d, hh, mm, ss)
}

/// Builds an [Epoch] from GPS week and seconds within that week
pub fn from_gpst_week(week: u32, tow_s: f64) -> Epoch {
    Epoch::from_time_of_week(week, 0, TimeScale::GPST) + Duration::from_seconds(tow_s)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn gpst_decomposition() {
        let epoch = Epoch::from_gregorian(2020, 1, 16, 11, 6, 40, 0, TimeScale::GPST);
        assert_eq!(gregorian(epoch), (2020, 1, 16, 11, 6, 40, 0));

        let epoch = from_gpst_week(2088, 385_600.0);
        assert_eq!(gregorian(epoch), (2020, 1, 16, 11, 6, 40, 0));
    }

    #[test]
    fn observation_epochs() {
        let epoch = Epoch::from_gregorian(2020, 1, 15, 11, 6, 40, 500_000_000, TimeScale::GPST);
        assert_eq!(format(epoch, 2), "20  1 15 11  6 40.5000000");
        assert_eq!(format(epoch, 3), "2020 01 15 11 06 40.5000000");

        let epoch = Epoch::from_gregorian(2020, 1, 15, 11, 6, 0, 0, TimeScale::GPST);
        assert_eq!(format(epoch, 2), "20  1 15 11  6  0.0000000");
        assert_eq!(format(epoch, 3), "2020 01 15 11 06  0.0000000");
    }

    #[test]
    fn first_obs() {
        let epoch = Epoch::from_gregorian(2020, 1, 15, 11, 6, 40, 0, TimeScale::GPST);
        assert_eq!(
            format_first_obs(epoch),
            "  2020     1    15    11     6   40.0000000     GPS"
        );
    }

    #[test]
    fn run_date() {
        let epoch = Epoch::from_gregorian_utc(2024, 3, 9, 8, 5, 1, 0);
        assert_eq!(format_run_date(epoch), "20240309 080501 UTC");
    }
}
