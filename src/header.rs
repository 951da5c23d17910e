//! Observation RINEX header
use crate::{
    carrier::{glonass_channels, Band},
    epoch::{format_first_obs, format_run_date, now},
    formatting::{fmt_comment, fmt_rinex},
    hardware::{Antenna, Receiver},
    prelude::{Constellation, Epoch},
    version::Schema,
};

use itertools::Itertools;
use log::warn;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Program that produced the file
const PROGRAM: &str = "ANDROID_RINEX";

/// Value of a header field that was not specified
const UNKNOWN: &str = "UNKN";

/// Constellations declared in the observation types, in declaration order
const DECLARED_CONSTELLATIONS: [Constellation; 4] = [
    Constellation::GPS,
    Constellation::Glonass,
    Constellation::Galileo,
    Constellation::BeiDou,
];

/// Observable kinds, in RINEX3 column order
const OBSERVABLE_KINDS: [char; 4] = ['C', 'L', 'D', 'S'];

/// Maximal number of Glonass slots per GLONASS SLOT / FRQ # line
const NUM_SLOTS_PER_LINE: usize = 8;

/// Replaces characters a RINEX file cannot hold (non ASCII and control
/// characters) with '?'.
pub(crate) fn to_ascii(name: &str, value: &str) -> String {
    if value.chars().all(|c| c.is_ascii() && !c.is_ascii_control()) {
        return value.to_string();
    }
    warn!(
        "\"{}\" field \"{}\" is not printable ASCII: invalid characters replaced",
        name, value
    );
    value
        .chars()
        .map(|c| {
            if c.is_ascii() && !c.is_ascii_control() {
                c
            } else {
                '?'
            }
        })
        .collect()
}

/// Sanitizes a header field: missing fields are declared unknown,
/// non ASCII characters are replaced and values that do not fit are cropped.
pub(crate) fn check_field(name: &str, value: Option<&str>, size: usize) -> String {
    match value {
        None => UNKNOWN.to_string(),
        Some(value) => {
            let value = to_ascii(name, value);
            if value.len() > size {
                warn!(
                    "\"{}\" field \"{}\" is too long ({}): cropped to {} characters",
                    name,
                    value,
                    value.len(),
                    size
                );
                value[..size].to_string()
            } else {
                value
            }
        },
    }
}

/// Phase shift applied to given RINEX3 phase observable, if any
fn phase_shift(constellation: Constellation, band: Band) -> Option<f64> {
    match (constellation, band) {
        (Constellation::GPS, Band::L5) | (Constellation::Galileo, Band::E5a) => Some(-0.25),
        (Constellation::Galileo, Band::E1) => Some(0.5),
        _ => None,
    }
}

/// Observation RINEX [Header]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Header {
    /// Operator running the conversion
    pub run_by: Option<String>,
    /// File production date
    pub date: Epoch,
    /// Comments
    pub comments: Vec<String>,
    /// Station / marker name
    pub marker_name: Option<String>,
    /// Marker type (RINEX3)
    pub marker_type: Option<String>,
    /// Observer name
    pub observer: Option<String>,
    /// Observer's agency
    pub agency: Option<String>,
    /// [Receiver]
    pub rcvr: Receiver,
    /// Receiver [Antenna]
    pub rcvr_antenna: Antenna,
    /// Approximate marker position, ECEF [m]
    pub ground_position: (f64, f64, f64),
}

impl Default for Header {
    fn default() -> Self {
        Self {
            run_by: None,
            date: now(),
            comments: vec!["Converted from Android raw GNSS measurements".to_string()],
            marker_name: None,
            marker_type: None,
            observer: None,
            agency: None,
            rcvr: Receiver::default(),
            rcvr_antenna: Antenna::default(),
            ground_position: (0.0, 0.0, 0.0),
        }
    }
}

impl Header {
    /// Copies and sets operator name
    pub fn with_run_by(&self, run_by: &str) -> Self {
        let mut s = self.clone();
        s.run_by = Some(run_by.to_string());
        s
    }
    /// Copies and sets production date
    pub fn with_date(&self, date: Epoch) -> Self {
        let mut s = self.clone();
        s.date = date;
        s
    }
    /// Copies and appends a comment
    pub fn with_comment(&self, comment: &str) -> Self {
        let mut s = self.clone();
        s.comments.push(comment.to_string());
        s
    }
    /// Copies and sets marker name
    pub fn with_marker_name(&self, name: &str) -> Self {
        let mut s = self.clone();
        s.marker_name = Some(name.to_string());
        s
    }
    /// Copies and sets marker type
    pub fn with_marker_type(&self, marker_type: &str) -> Self {
        let mut s = self.clone();
        s.marker_type = Some(marker_type.to_string());
        s
    }
    /// Copies and sets observer name
    pub fn with_observer(&self, observer: &str) -> Self {
        let mut s = self.clone();
        s.observer = Some(observer.to_string());
        s
    }
    /// Copies and sets agency
    pub fn with_agency(&self, agency: &str) -> Self {
        let mut s = self.clone();
        s.agency = Some(agency.to_string());
        s
    }
    /// Copies and sets [Receiver]
    pub fn with_receiver(&self, rcvr: Receiver) -> Self {
        let mut s = self.clone();
        s.rcvr = rcvr;
        s
    }
    /// Copies and sets receiver [Antenna]
    pub fn with_receiver_antenna(&self, antenna: Antenna) -> Self {
        let mut s = self.clone();
        s.rcvr_antenna = antenna;
        s
    }
    /// Copies and sets approximate position (ECEF, meters)
    pub fn with_ground_position(&self, position: (f64, f64, f64)) -> Self {
        let mut s = self.clone();
        s.ground_position = position;
        s
    }

    /// Formats the leading part of the [Header], up to the observables
    /// description, following given [Schema].
    pub fn format_lines(&self, schema: Schema) -> Vec<String> {
        let mut lines = Vec::with_capacity(16);
        lines.push(self.format_rinex_version(schema));
        lines.push(self.format_prog_runby());
        for comment in self.comments.iter() {
            lines.push(fmt_comment(&to_ascii("COMMENT", comment)));
        }
        lines.push(fmt_rinex(
            &check_field("MARKER NAME", self.marker_name.as_deref(), 60),
            "MARKER NAME",
        ));
        if !schema.is_legacy() {
            lines.push(fmt_rinex(
                &check_field("MARKER TYPE", self.marker_type.as_deref(), 20),
                "MARKER TYPE",
            ));
        }
        lines.push(self.format_observer_agency());
        lines.push(fmt_rinex(&self.rcvr.format(), "REC # / TYPE / VERS"));
        lines.push(fmt_rinex(&self.rcvr_antenna.format(), "ANT # / TYPE"));

        let (x, y, z) = self.ground_position;
        lines.push(fmt_rinex(
            &format!("{:14.4}{:14.4}{:14.4}", x, y, z),
            "APPROX POSITION XYZ",
        ));
        lines.push(fmt_rinex(
            &self.rcvr_antenna.format_eccentricity(),
            "ANTENNA: DELTA H/E/N",
        ));

        if schema.is_legacy() {
            lines.push(fmt_rinex(
                "     4    C1    S1    L1    D1",
                "# / TYPES OF OBSERV",
            ));
        } else {
            for constellation in DECLARED_CONSTELLATIONS {
                lines.push(Self::format_observables_v3(constellation));
            }
        }
        lines
    }

    /// Formats the closing part of the [Header], which requires the
    /// first [Epoch] of the file.
    pub fn format_closing_lines(&self, schema: Schema, first_epoch: Option<Epoch>) -> Vec<String> {
        let mut lines = Vec::with_capacity(16);
        match first_epoch {
            Some(epoch) => lines.push(fmt_rinex(&format_first_obs(epoch), "TIME OF FIRST OBS")),
            None => warn!("no observation: TIME OF FIRST OBS is omitted"),
        }
        if !schema.is_legacy() {
            lines.extend(Self::format_glonass_slots());
            lines.extend(Self::format_phase_shifts());
            lines.push(fmt_rinex(
                " C1C    0.000 C1P    0.000 C2C    0.000 C2P    0.000",
                "GLONASS COD/PHS/BIS",
            ));
        }
        lines.push(fmt_rinex("", "END OF HEADER"));
        lines
    }

    /// Formats "RINEX VERSION / TYPE"
    fn format_rinex_version(&self, schema: Schema) -> String {
        let system = if schema.is_legacy() {
            "M (MIXED)"
        } else {
            "M: Mixed"
        };
        fmt_rinex(
            &format!(
                "{:>9}           {:<20}{:<20}",
                schema.version().to_string(),
                "OBSERVATION DATA",
                system
            ),
            "RINEX VERSION / TYPE",
        )
    }

    /// Formats "PGM / RUN BY / DATE"
    fn format_prog_runby(&self) -> String {
        fmt_rinex(
            &format!(
                "{:<20}{:<20}{:<20}",
                PROGRAM,
                check_field("RUN BY", self.run_by.as_deref(), 20),
                format_run_date(self.date)
            ),
            "PGM / RUN BY / DATE",
        )
    }

    /// Formats "OBSERVER / AGENCY"
    fn format_observer_agency(&self) -> String {
        fmt_rinex(
            &format!(
                "{:<20}{:<40}",
                check_field("OBSERVER", self.observer.as_deref(), 20),
                check_field("AGENCY", self.agency.as_deref(), 40)
            ),
            "OBSERVER / AGENCY",
        )
    }

    /// Formats "SYS / # / OBS TYPES" of one constellation
    fn format_observables_v3(constellation: Constellation) -> String {
        let codes = Band::declared(constellation, Schema::V3_03)
            .iter()
            .flat_map(|band| {
                OBSERVABLE_KINDS
                    .iter()
                    .map(move |kind| format!(" {}{}", kind, band.rinex3_code()))
            })
            .collect::<Vec<_>>();
        fmt_rinex(
            &format!("{:x}  {:3}{}", constellation, codes.len(), codes.concat()),
            "SYS / # / OBS TYPES",
        )
    }

    /// Formats "GLONASS SLOT / FRQ #"
    fn format_glonass_slots() -> Vec<String> {
        let channels = glonass_channels().collect::<Vec<_>>();
        channels
            .chunks(NUM_SLOTS_PER_LINE)
            .enumerate()
            .map(|(nth, chunk)| {
                let prefix = if nth == 0 {
                    format!("{:3} ", channels.len())
                } else {
                    "    ".to_string()
                };
                let slots = chunk
                    .iter()
                    .map(|(slot, channel)| format!("R{:02} {:2} ", slot, channel))
                    .join("");
                fmt_rinex(&format!("{}{}", prefix, slots), "GLONASS SLOT / FRQ #")
            })
            .collect()
    }

    /// Formats "SYS / PHASE SHIFT"
    fn format_phase_shifts() -> Vec<String> {
        let mut lines = Vec::with_capacity(8);
        for constellation in [
            Constellation::GPS,
            Constellation::Glonass,
            Constellation::Galileo,
            Constellation::BeiDou,
        ] {
            for band in Band::declared(constellation, Schema::V3_03) {
                let content = match phase_shift(constellation, band) {
                    Some(shift) => format!(
                        "{:x} L{} {:+8.5}",
                        constellation,
                        band.rinex3_code(),
                        shift
                    ),
                    None => format!("{:x} L{}", constellation, band.rinex3_code()),
                };
                lines.push(fmt_rinex(&content, "SYS / PHASE SHIFT"));
            }
        }
        lines
    }
}
