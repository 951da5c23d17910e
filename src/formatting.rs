//! RINEX text formatting
use crate::{
    epoch::format as epoch_format,
    prelude::{Epoch, SV},
};

use itertools::Itertools;

/// Width of the content part of a header line
const HEADER_CONTENT_WIDTH: usize = 60;

/// Maximal number of satellites per V2 epoch line
const NUM_SV_PER_LINE: usize = 12;

/*
 * Formats one header line or a comment. Content wider than 60 characters
 * spans several lines, each with the same marker.
 */
pub(crate) fn fmt_rinex(content: &str, marker: &str) -> String {
    if content.chars().count() <= HEADER_CONTENT_WIDTH {
        format!(
            "{:<padding$}{}",
            content,
            marker,
            padding = HEADER_CONTENT_WIDTH
        )
    } else {
        content
            .chars()
            .chunks(HEADER_CONTENT_WIDTH)
            .into_iter()
            .map(|chunk| {
                format!(
                    "{:<padding$}{}",
                    chunk.collect::<String>(),
                    marker,
                    padding = HEADER_CONTENT_WIDTH
                )
            })
            .join("\n")
    }
}

/*
 * Formats comments
 */
pub(crate) fn fmt_comment(content: &str) -> String {
    fmt_rinex(content, "COMMENT")
}

/*
 * F14.3 observation field, blanked when missing
 */
pub(crate) fn fmt_observation(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{:14.3}", value),
        None => format!("{:14}", ""),
    }
}

/*
 * Joins observation fields, separated by the (blank) LLI and SSI columns
 */
pub(crate) fn fmt_observations(values: &[Option<f64>]) -> String {
    values
        .iter()
        .map(|v| fmt_observation(*v))
        .collect::<Vec<_>>()
        .join("  ")
}

/*
 * V2 epoch description: epoch line and satellite list,
 * wrapped every 12 satellites.
 */
pub(crate) fn fmt_epoch_v2(epoch: Epoch, sv_list: &[SV]) -> Vec<String> {
    let mut lines = Vec::with_capacity(1 + sv_list.len() / NUM_SV_PER_LINE);
    for (nth, chunk) in sv_list.chunks(NUM_SV_PER_LINE).enumerate() {
        let ids = chunk.iter().map(|sv| format!("{:x}", sv)).collect::<String>();
        if nth == 0 {
            lines.push(format!(
                " {}  0{:3}{}",
                epoch_format(epoch, 2),
                sv_list.len(),
                ids
            ));
        } else {
            lines.push(format!("{:32}{}", "", ids));
        }
    }
    if lines.is_empty() {
        lines.push(format!(" {}  0{:3}", epoch_format(epoch, 2), 0));
    }
    lines
}

/*
 * V3 epoch line
 */
pub(crate) fn fmt_epoch_v3(epoch: Epoch, numsat: usize) -> String {
    format!("> {}  0{:3}", epoch_format(epoch, 3), numsat)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::prelude::{Constellation, TimeScale};

    #[test]
    fn header_lines() {
        let line = fmt_rinex("     3.03           OBSERVATION DATA    M", "RINEX VERSION / TYPE");
        assert_eq!(line.len(), 80);
        assert!(line.starts_with("     3.03"));
        assert_eq!(&line[60..], "RINEX VERSION / TYPE");

        let content = "x".repeat(70);
        let lines = fmt_comment(&content);
        let lines = lines.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], format!("{}COMMENT", "x".repeat(60)));
        assert_eq!(lines[1], format!("{:<60}COMMENT", "x".repeat(10)));

        let content = "x".repeat(60);
        assert_eq!(fmt_comment(&content), format!("{}COMMENT", content));

        let content = format!("a{}", "€".repeat(65));
        let lines = fmt_comment(&content);
        let lines = lines.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], format!("a{}COMMENT", "€".repeat(59)));
        assert_eq!(lines[1], format!("{:<60}COMMENT", "€".repeat(6)));
    }

    #[test]
    fn observation_fields() {
        assert_eq!(fmt_observation(Some(22484434.354)), "  22484434.354");
        assert_eq!(fmt_observation(Some(-1234.5678)), "     -1234.568");
        assert_eq!(fmt_observation(None), "              ");
        assert_eq!(
            fmt_observations(&[Some(1.0), None, Some(2.0)]),
            "         1.000                           2.000"
        );
    }

    #[test]
    fn epoch_v2() {
        let epoch = Epoch::from_gregorian(2020, 1, 16, 11, 6, 40, 0, TimeScale::GPST);
        let sv_list = (1..=14)
            .map(|prn| SV::new(Constellation::GPS, prn))
            .collect::<Vec<_>>();

        let lines = fmt_epoch_v2(epoch, &sv_list[..3]);
        assert_eq!(lines, vec![" 20  1 16 11  6 40.0000000  0  3G01G02G03"]);

        let lines = fmt_epoch_v2(epoch, &sv_list);
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            " 20  1 16 11  6 40.0000000  0 14G01G02G03G04G05G06G07G08G09G10G11G12"
        );
        assert_eq!(lines[1], "                                G13G14");
    }

    #[test]
    fn epoch_v3() {
        let epoch = Epoch::from_gregorian(2020, 1, 16, 11, 6, 40, 500_000_000, TimeScale::GPST);
        assert_eq!(
            fmt_epoch_v3(epoch, 5),
            "> 2020 01 16 11 06 40.5000000  0  5"
        );
    }
}
