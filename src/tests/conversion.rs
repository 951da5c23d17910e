use std::collections::HashMap;
use std::io::BufReader;

use crate::{
    prelude::*,
    tests::toolkit::{
        generic_formatted_lines_test, gnss_log, observation_fields, RawLine, Utf8Buffer,
    },
};

const GPS_L1: f64 = 1575.42E6;
const GPS_L2: f64 = 1227.60E6;
const GPS_L5: f64 = 1176.45E6;
const BDS_B1I: f64 = 1561.098E6;
const GLO_R03_G1: f64 = 1604.8125E6;

// transmission times matching a 42s reception (2020-01-16 11:06:42 GPST)
const GPS_TX_75MS: i64 = 385_601_925_000_000;
const GAL_TX_70MS: i64 = 385_601_930_000_000;
const BDS_TX_120MS: i64 = 385_587_880_000_000;
const GLO_TX_70MS: i64 = 50_783_930_000_000;

const RANGE_75MS: f64 = 22_484_434.35;
const RANGE_70MS: f64 = 20_985_472.06;
const RANGE_120MS: f64 = 35_975_094.96;

fn run(log: &str, options: Options) -> (String, Diagnostics) {
    let mut buffer = Utf8Buffer::new(4096);
    let diagnostics = convert(
        BufReader::new(log.as_bytes()),
        &mut buffer,
        options,
        Header::default(),
    )
    .unwrap();
    (buffer.to_ascii_utf8(), diagnostics)
}

fn assert_close(value: Option<f64>, expected: f64, tolerance: f64) {
    let value = value.unwrap();
    assert!(
        (value - expected).abs() < tolerance,
        "{} is not {} (+/-{})",
        value,
        expected,
        tolerance
    );
}

#[test]
fn v3_mixed_constellations() {
    let log = gnss_log(&[
        RawLine::gps(5, GPS_TX_75MS),
        RawLine::new(5, 8, BDS_TX_120MS).with_carrier(BDS_B1I),
        RawLine::gps(5, GPS_TX_75MS).with_carrier(GPS_L5),
        RawLine::new(6, 11, GAL_TX_70MS).with_carrier(GPS_L1),
        RawLine::new(3, 3, GLO_TX_70MS).with_carrier(GLO_R03_G1),
        RawLine::gps(5, GPS_TX_75MS + 1_000_000_000).with_time_nanos(3_000_000_000),
    ]);

    let (content, diagnostics) = run(&log, Options::default());

    assert_eq!(diagnostics.records, 6);
    assert_eq!(diagnostics.observables, 6);
    assert_eq!(diagnostics.epochs, 2);
    assert_eq!(diagnostics.discarded_epochs, 0);

    generic_formatted_lines_test(
        &content,
        HashMap::from([
            (
                0,
                "     3.03           OBSERVATION DATA    M: Mixed            RINEX VERSION / TYPE",
            ),
            (
                14,
                "  2020     1    16    11     6   42.0000000     GPS         TIME OF FIRST OBS",
            ),
            (
                27,
                "                                                            END OF HEADER",
            ),
            (28, "> 2020 01 16 11 06 42.0000000  0  4"),
            (33, "> 2020 01 16 11 06 43.0000000  0  1"),
        ]),
    );

    let lines = content.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 35);

    // rows are sorted by constellation, GPS first
    assert!(lines[29].starts_with("G05"));
    assert!(lines[30].starts_with("C08"));
    assert!(lines[31].starts_with("E11"));
    assert!(lines[32].starts_with("R03"));
    assert!(lines[34].starts_with("G05"));

    // L1 and L5 merged in a single row
    let g05 = observation_fields(lines[29], 3);
    assert_eq!(g05.len(), 8);
    assert_close(g05[0], RANGE_75MS, 0.1);
    assert_close(g05[1], 117_440_512.0, 1.0E-3);
    assert_close(g05[2], 525.504, 1.0E-3);
    assert_close(g05[3], 40.0, 1.0E-3);
    assert_close(g05[4], RANGE_75MS, 0.1);
    assert_close(g05[5], 92_274_688.0, 1.0E-3);
    assert_close(g05[6], 392.421, 1.0E-3);
    assert_close(g05[7], 40.0, 1.0E-3);

    let c08 = observation_fields(lines[30], 3);
    assert_close(c08[0], RANGE_120MS, 0.1);
    assert_close(c08[1], 184_549_376.0, 1.0E-3);
    assert_close(c08[2], 520.726, 1.0E-3);
    assert!(c08[4..].iter().all(|field| field.is_none()));

    let e11 = observation_fields(lines[31], 3);
    assert_close(e11[0], RANGE_70MS, 0.1);
    assert_close(e11[1], 109_051_904.0, 1.0E-3);
    assert!(e11[4..].iter().all(|field| field.is_none()));

    let r03 = observation_fields(lines[32], 3);
    assert_close(r03[0], RANGE_70MS, 0.1);
    assert_close(r03[1], 109_051_904.0, 1.0E-3);
    assert_close(r03[2], 535.308, 1.0E-3);
}

#[test]
fn v3_same_band_overwrites() {
    let log = gnss_log(&[
        RawLine::gps(5, GPS_TX_75MS).with_cn0(30.0),
        RawLine::gps(5, GPS_TX_75MS).with_cn0(35.0),
    ]);

    let (content, diagnostics) = run(&log, Options::default());
    assert_eq!(diagnostics.observables, 2);
    assert_eq!(diagnostics.epochs, 1);

    let lines = content.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 30);
    assert_eq!(lines[28], "> 2020 01 16 11 06 42.0000000  0  1");

    let g05 = observation_fields(lines[29], 3);
    assert_close(g05[3], 35.0, 1.0E-3);
}

#[test]
fn v2_single_band() {
    let log = gnss_log(&[
        RawLine::gps(5, GPS_TX_75MS),
        RawLine::gps(5, GPS_TX_75MS).with_carrier(GPS_L5),
        RawLine::gps(7, GPS_TX_75MS),
        RawLine::gps(13, GPS_TX_75MS),
    ]);

    let options = Options::default().with_schema(Schema::V2_11);
    let (content, diagnostics) = run(&log, options);

    assert_eq!(diagnostics.observables, 3);
    assert_eq!(diagnostics.unsupported_bands, 1);
    assert_eq!(diagnostics.epochs, 1);

    generic_formatted_lines_test(
        &content,
        HashMap::from([
            (
                0,
                "     2.11           OBSERVATION DATA    M (MIXED)           RINEX VERSION / TYPE",
            ),
            (
                9,
                "     4    C1    S1    L1    D1                              # / TYPES OF OBSERV",
            ),
            (
                10,
                "  2020     1    16    11     6   42.0000000     GPS         TIME OF FIRST OBS",
            ),
            (12, " 20  1 16 11  6 42.0000000  0  3G05G07G13"),
        ]),
    );

    let lines = content.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 16);

    // C1 S1 L1 D1
    let g05 = observation_fields(lines[13], 0);
    assert_eq!(g05.len(), 4);
    assert_close(g05[0], RANGE_75MS, 0.1);
    assert_close(g05[1], 40.0, 1.0E-3);
    assert_close(g05[2], 117_440_512.0, 1.0E-3);
    assert_close(g05[3], 525.504, 1.0E-3);
}

#[test]
fn v2_duplicate_entries() {
    let log = gnss_log(&[
        RawLine::gps(5, GPS_TX_75MS),
        RawLine::gps(7, GPS_TX_75MS),
        RawLine::gps(5, GPS_TX_75MS),
        RawLine::gps(5, GPS_TX_75MS + 1_000_000_000).with_time_nanos(3_000_000_000),
    ]);

    let options = Options::default().with_schema(Schema::V2_11);
    let (content, diagnostics) = run(&log, options);

    assert_eq!(diagnostics.observables, 4);
    assert_eq!(diagnostics.epochs, 1);
    assert_eq!(diagnostics.discarded_epochs, 1);

    let lines = content.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 14);
    // the discarded epoch is not announced
    assert_eq!(
        lines[10],
        "  2020     1    16    11     6   43.0000000     GPS         TIME OF FIRST OBS"
    );
    assert_eq!(lines[12], " 20  1 16 11  6 43.0000000  0  1G05");
}

#[test]
fn integerized_epochs() {
    let log = gnss_log(&[RawLine::gps(5, GPS_TX_75MS + 300_000_000).with_time_nanos(2_300_000_000)]);

    let (content, _) = run(&log, Options::default());
    let lines = content.lines().collect::<Vec<_>>();
    assert_eq!(lines[28], "> 2020 01 16 11 06 42.3000000  0  1");
    let fields = observation_fields(lines[29], 3);
    assert_close(fields[0], RANGE_75MS, 0.1);

    let (content, _) = run(&log, Options::default().with_integerization(true));
    let lines = content.lines().collect::<Vec<_>>();
    assert_eq!(lines[28], "> 2020 01 16 11 06 42.0000000  0  1");
    assert_eq!(
        lines[14],
        "  2020     1    16    11     6   42.0000000     GPS         TIME OF FIRST OBS"
    );

    // range moved back by 300ms, at -100m/s
    let fields = observation_fields(lines[29], 3);
    assert_close(fields[0], RANGE_75MS + 30.0, 0.1);
}

#[test]
fn bias_policies() {
    let refreshed = -1_263_208_001_000_000_000;

    let log = gnss_log(&[
        RawLine::gps(5, GPS_TX_75MS),
        RawLine::gps(5, GPS_TX_75MS + 2_000_000_000)
            .with_time_nanos(3_000_000_000)
            .with_full_bias(Some(refreshed)),
    ]);
    let (content, diagnostics) = run(&log, Options::default());
    assert_eq!(diagnostics.epochs, 2);
    let lines = content.lines().collect::<Vec<_>>();
    assert_eq!(lines[30], "> 2020 01 16 11 06 44.0000000  0  1");

    let log = gnss_log(&[
        RawLine::gps(5, GPS_TX_75MS),
        RawLine::gps(5, GPS_TX_75MS + 1_000_000_000)
            .with_time_nanos(3_000_000_000)
            .with_full_bias(Some(refreshed)),
    ]);
    let (content, diagnostics) = run(&log, Options::default().with_bias_policy(BiasPolicy::Fixed));
    assert_eq!(diagnostics.epochs, 2);
    let lines = content.lines().collect::<Vec<_>>();
    assert_eq!(lines[30], "> 2020 01 16 11 06 43.0000000  0  1");
}

#[test]
fn rejected_records() {
    let mut log = gnss_log(&[
        RawLine::gps(5, GPS_TX_75MS).with_full_bias(None),
        RawLine::new(4, 193, GPS_TX_75MS).with_carrier(GPS_L1),
        RawLine::new(2, 131, GPS_TX_75MS).with_carrier(GPS_L1),
        RawLine::new(3, 95, GLO_TX_70MS).with_carrier(GLO_R03_G1),
        RawLine::new(9, 1, GPS_TX_75MS).with_carrier(GPS_L1),
        RawLine::gps(7, GPS_TX_75MS).with_carrier(GPS_L2),
        RawLine::gps(9, GPS_TX_75MS + 65_000_000),
        RawLine::gps(13, GPS_TX_75MS).with_state(0),
        RawLine::gps(15, GPS_TX_75MS),
    ]);
    log.push_str("Raw,1579172800000,2000000000,18\n");

    let (content, diagnostics) = run(&log, Options::default());

    assert_eq!(diagnostics.records, 10);
    assert_eq!(diagnostics.missing_clock_bias, 1);
    assert_eq!(diagnostics.unsupported_satellites, 4);
    assert_eq!(diagnostics.unsupported_bands, 1);
    assert_eq!(diagnostics.out_of_bounds_ranges, 1);
    assert_eq!(diagnostics.invalid_sync, 1);
    assert_eq!(diagnostics.malformed_records, 1);
    assert_eq!(diagnostics.observables, 2);
    assert_eq!(diagnostics.epochs, 1);

    let lines = content.lines().collect::<Vec<_>>();
    assert_eq!(lines[28], "> 2020 01 16 11 06 42.0000000  0  2");
    assert!(lines[29].starts_with("G13"));
    assert!(lines[30].starts_with("G15"));
}

#[test]
fn strict_synchronization() {
    let log = gnss_log(&[
        RawLine::gps(13, GPS_TX_75MS).with_state(0x01),
        RawLine::gps(15, GPS_TX_75MS),
    ]);
    let options = Options::default().with_sync_policy(SyncPolicy::Reject);
    let (content, diagnostics) = run(&log, options);

    assert_eq!(diagnostics.invalid_sync, 1);
    assert_eq!(diagnostics.observables, 1);

    let lines = content.lines().collect::<Vec<_>>();
    assert_eq!(lines[28], "> 2020 01 16 11 06 42.0000000  0  1");
    assert!(lines[29].starts_with("G15"));
}

#[test]
fn range_edition() {
    let log = gnss_log(&[RawLine::gps(9, GPS_TX_75MS + 65_000_000)]);

    let (content, diagnostics) = run(&log, Options::default());
    assert_eq!(diagnostics.out_of_bounds_ranges, 1);
    assert_eq!(diagnostics.epochs, 0);
    assert!(!content.contains("TIME OF FIRST OBS"));

    let (content, diagnostics) = run(&log, Options::default().with_range_edit(false));
    assert_eq!(diagnostics.out_of_bounds_ranges, 0);
    assert_eq!(diagnostics.epochs, 1);
    let lines = content.lines().collect::<Vec<_>>();
    let fields = observation_fields(lines[29], 3);
    assert_close(fields[0], 2_997_924.58, 0.1);
}

#[test]
fn without_observations() {
    let log = gnss_log(&[RawLine::new(4, 193, GPS_TX_75MS).with_carrier(GPS_L1)]);

    let (content, diagnostics) = run(&log, Options::default());
    assert_eq!(diagnostics.observables, 0);
    assert_eq!(diagnostics.epochs, 0);

    let lines = content.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 27);
    assert!(!content.contains("TIME OF FIRST OBS"));
    assert_eq!(
        lines[26],
        "                                                            END OF HEADER"
    );
}

#[test]
fn missing_descriptor() {
    let log = "# Header Description:\n#\nFix,gps,41.382,2.112\n";
    let mut buffer = Utf8Buffer::new(128);
    let result = convert(
        BufReader::new(log.as_bytes()),
        &mut buffer,
        Options::default(),
        Header::default(),
    );
    assert!(matches!(result, Err(Error::MissingFieldDescriptor)));
    assert!(buffer.to_ascii_utf8().is_empty());
}

#[test]
fn buffered_output() {
    let log = gnss_log(&[RawLine::gps(5, GPS_TX_75MS)]);
    let mut writer = BufferedWriter::plain(Utf8Buffer::new(4096));

    let diagnostics = convert(
        BufReader::new(log.as_bytes()),
        &mut writer,
        Options::default().with_schema(Schema::V2_11),
        Header::default().with_marker_name("ROOF"),
    )
    .unwrap();
    assert_eq!(diagnostics.epochs, 1);

    let content = writer.finish().unwrap().to_ascii_utf8();
    generic_formatted_lines_test(
        &content,
        HashMap::from([
            (
                3,
                "ROOF                                                        MARKER NAME",
            ),
            (12, " 20  1 16 11  6 42.0000000  0  1G05"),
        ]),
    );
}
