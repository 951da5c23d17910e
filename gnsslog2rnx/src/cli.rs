use std::path::PathBuf;
use std::str::FromStr;

use clap::{value_parser, Arg, ArgAction, ArgMatches, ColorChoice, Command};

use android_rinex::prelude::{BiasPolicy, Options, Schema, SyncPolicy};

pub struct Cli {
    /// Arguments passed by user
    pub matches: ArgMatches,
}

impl Default for Cli {
    fn default() -> Self {
        Self::new()
    }
}

impl Cli {
    /// Build new command line interface
    pub fn new() -> Self {
        Self {
            matches: Self::command().get_matches(),
        }
    }
    fn command() -> Command {
        Command::new("gnsslog2rnx")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Android GnssLogger logs to RINEX observation files")
            .arg_required_else_help(true)
            .color(ColorChoice::Always)
            .arg(Arg::new("filepath")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Log file, as recorded by the GnssLogger application"))
            .arg(Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Output RINEX file. RINEX is streamed to stdout when omitted."))
            .arg(Arg::new("rinex-version")
                .long("rinex-version")
                .value_name("REVISION")
                .value_parser(["2", "2.11", "3", "3.03"])
                .default_value("3")
                .help("RINEX revision to produce"))
            .arg(Arg::new("gzip")
                .long("gzip")
                .action(ArgAction::SetTrue)
                .help("Gzip compress the output"))
            .next_help_heading("Processing")
            .arg(Arg::new("integerize")
                .short('i')
                .long("integerize")
                .action(ArgAction::SetTrue)
                .help("Integerize epochs to the nearest second.
Pseudo ranges are moved to the integer epoch using the range rate."))
            .arg(Arg::new("fix-bias")
                .short('b')
                .long("fix-bias")
                .action(ArgAction::SetTrue)
                .help("Hold the first FullBiasNanos for the whole log.
Avoids pseudo range jumps when the receiver refreshes its clock bias."))
            .arg(Arg::new("skip-edit")
                .long("skip-edit")
                .action(ArgAction::SetTrue)
                .help("Keep pseudo ranges that are out of the realistic bounds"))
            .arg(Arg::new("strict")
                .long("strict")
                .action(ArgAction::SetTrue)
                .help("Drop measurements that lack code lock or TOW decoding"))
            .next_help_heading("Header")
            .arg(Arg::new("marker-name")
                .short('m')
                .long("marker-name")
                .value_name("NAME")
                .help("Marker name (station id)"))
            .arg(Arg::new("marker-type")
                .long("marker-type")
                .value_name("TYPE")
                .help("Marker type (RINEX3 only)"))
            .arg(Arg::new("observer")
                .short('n')
                .long("observer")
                .value_name("NAME")
                .help("Observer name or e-mail"))
            .arg(Arg::new("agency")
                .short('a')
                .long("agency")
                .value_name("NAME")
                .help("Observer's agency"))
            .arg(Arg::new("run-by")
                .long("run-by")
                .value_name("NAME")
                .help("Operator running this conversion"))
            .arg(Arg::new("comment")
                .short('c')
                .long("comment")
                .action(ArgAction::Append)
                .help("Custom comment, use as many as needed"))
            .arg(Arg::new("receiver-number")
                .long("receiver-number")
                .value_name("SN")
                .help("Receiver serial number"))
            .arg(Arg::new("receiver-type")
                .long("receiver-type")
                .value_name("MODEL")
                .help("Receiver model"))
            .arg(Arg::new("receiver-version")
                .long("receiver-version")
                .value_name("VERSION")
                .help("Receiver firmware version, \"Android OS >7.0\" by default"))
            .arg(Arg::new("antenna-number")
                .long("antenna-number")
                .value_name("SN")
                .help("Antenna serial number"))
            .arg(Arg::new("antenna-type")
                .long("antenna-type")
                .value_name("MODEL")
                .help("Antenna model, \"internal\" by default"))
    }
    /// Input log. Not enforced by the parser: options passed
    /// without any log are reported as [crate::Error::MissingInput].
    pub fn input_path(&self) -> Option<&PathBuf> {
        self.matches.get_one::<PathBuf>("filepath")
    }
    /// Output RINEX, if any
    pub fn output_path(&self) -> Option<&PathBuf> {
        self.matches.get_one::<PathBuf>("output")
    }
    pub fn gzip(&self) -> bool {
        self.matches.get_flag("gzip")
    }
    fn schema(&self) -> Schema {
        self.matches
            .get_one::<String>("rinex-version")
            .and_then(|revision| Schema::from_str(revision).ok())
            .unwrap_or_default()
    }
    /// Conversion [Options] defined by user
    pub fn options(&self) -> Options {
        let bias_policy = if self.matches.get_flag("fix-bias") {
            BiasPolicy::Fixed
        } else {
            BiasPolicy::Refresh
        };
        let sync_policy = if self.matches.get_flag("strict") {
            SyncPolicy::Reject
        } else {
            SyncPolicy::Warn
        };
        Options::default()
            .with_schema(self.schema())
            .with_bias_policy(bias_policy)
            .with_integerization(self.matches.get_flag("integerize"))
            .with_range_edit(!self.matches.get_flag("skip-edit"))
            .with_sync_policy(sync_policy)
    }
    /// Returns header field, if defined by user
    pub fn header_field(&self, name: &str) -> Option<&String> {
        self.matches.get_one::<String>(name)
    }
    /// Custom comments
    pub fn comments(&self) -> Vec<&String> {
        self.matches
            .get_many::<String>("comment")
            .map(|comments| comments.collect())
            .unwrap_or_default()
    }
}
