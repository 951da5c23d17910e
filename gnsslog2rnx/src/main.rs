//! Converts Android GnssLogger logs to RINEX observation files.
use std::{
    fs::File,
    io::{stdout, BufReader, Write},
};

use env_logger::{Builder, Target};
use log::{info, LevelFilter};
use thiserror::Error;

use android_rinex::prelude::{convert, Antenna, BufferedWriter, Header, Receiver};

mod cli;
use cli::Cli;

/// Gzip compression level
const COMPRESSION_LEVEL: u32 = 6;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no input log")]
    MissingInput,
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("conversion error: {0}")]
    Conversion(#[from] android_rinex::Error),
}

/// Builds the RINEX [Header] from user fields
fn header(cli: &Cli) -> Header {
    let mut header = Header::default();
    for comment in cli.comments() {
        header = header.with_comment(comment);
    }
    if let Some(name) = cli.header_field("marker-name") {
        header = header.with_marker_name(name);
    }
    if let Some(marker_type) = cli.header_field("marker-type") {
        header = header.with_marker_type(marker_type);
    }
    if let Some(observer) = cli.header_field("observer") {
        header = header.with_observer(observer);
    }
    if let Some(agency) = cli.header_field("agency") {
        header = header.with_agency(agency);
    }
    if let Some(run_by) = cli.header_field("run-by") {
        header = header.with_run_by(run_by);
    }

    let mut rcvr = Receiver::default();
    if let Some(sn) = cli.header_field("receiver-number") {
        rcvr = rcvr.with_serial_number(sn);
    }
    if let Some(model) = cli.header_field("receiver-type") {
        rcvr = rcvr.with_model(model);
    }
    if let Some(firmware) = cli.header_field("receiver-version") {
        rcvr = rcvr.with_firmware(firmware);
    }

    let mut antenna = Antenna::default();
    if let Some(sn) = cli.header_field("antenna-number") {
        antenna = antenna.with_serial_number(sn);
    }
    if let Some(model) = cli.header_field("antenna-type") {
        antenna = antenna.with_model(model);
    }

    header.with_receiver(rcvr).with_receiver_antenna(antenna)
}

pub fn main() -> Result<(), Error> {
    // RINEX may be streamed to stdout
    let mut builder = Builder::new();
    builder
        .target(Target::Stderr)
        .filter_level(LevelFilter::Warn)
        .parse_default_env()
        .format_timestamp_secs()
        .format_module_path(false)
        .init();

    let cli = Cli::new();
    let input_path = cli.input_path().ok_or(Error::MissingInput)?;

    let options = cli.options();
    let header = header(&cli);

    info!(
        "converting \"{}\" to RINEX {}",
        input_path.display(),
        options.schema
    );

    let reader = BufReader::new(File::open(input_path)?);

    let output: Box<dyn Write> = match cli.output_path() {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(stdout().lock()),
    };

    let mut writer = if cli.gzip() {
        BufferedWriter::gzip(output, COMPRESSION_LEVEL)
    } else {
        BufferedWriter::plain(output)
    };

    let diagnostics = convert(reader, &mut writer, options, header)?;
    writer.finish()?;

    if let Some(path) = cli.output_path() {
        info!(
            "\"{}\" generated: {} epochs",
            path.display(),
            diagnostics.epochs
        );
    }
    Ok(())
}
