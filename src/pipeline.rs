//! Conversion pipeline: GnssLogger records in, RINEX lines out
use std::io::{BufRead, Write};

use crate::{
    batch::{Accumulator, EpochBatch, MergePolicy},
    clock::{BiasPolicy, ClockResolver},
    error::Error,
    header::Header,
    measurement::{Layout, Measurement},
    observation::{Engine, SyncPolicy},
    prelude::Epoch,
    reader::{FieldDescriptor, LogReader, Record},
    version::Schema,
};

use log::{debug, info, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Conversion [Options]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Options {
    /// Output [Schema]
    pub schema: Schema,
    /// Receiver clock [BiasPolicy]
    pub bias_policy: BiasPolicy,
    /// Move epochs to the nearest whole second
    pub integerize: bool,
    /// Drop pseudo ranges that are not realistic
    pub range_edit: bool,
    /// [SyncPolicy]
    pub sync_policy: SyncPolicy,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            schema: Schema::default(),
            bias_policy: BiasPolicy::default(),
            integerize: false,
            range_edit: true,
            sync_policy: SyncPolicy::default(),
        }
    }
}

impl Options {
    /// Copies and sets output [Schema]
    pub fn with_schema(&self, schema: Schema) -> Self {
        let mut s = *self;
        s.schema = schema;
        s
    }
    /// Copies and sets [BiasPolicy]
    pub fn with_bias_policy(&self, policy: BiasPolicy) -> Self {
        let mut s = *self;
        s.bias_policy = policy;
        s
    }
    /// Copies and enables or disables epoch integerization
    pub fn with_integerization(&self, integerize: bool) -> Self {
        let mut s = *self;
        s.integerize = integerize;
        s
    }
    /// Copies and enables or disables pseudo range edition
    pub fn with_range_edit(&self, range_edit: bool) -> Self {
        let mut s = *self;
        s.range_edit = range_edit;
        s
    }
    /// Copies and sets [SyncPolicy]
    pub fn with_sync_policy(&self, policy: SyncPolicy) -> Self {
        let mut s = *self;
        s.sync_policy = policy;
        s
    }
}

/// What happened during a conversion
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Diagnostics {
    /// Raw records processed
    pub records: usize,
    /// Observables accepted
    pub observables: usize,
    /// Epochs produced
    pub epochs: usize,
    /// Records whose field count mismatched the descriptor
    pub malformed_records: usize,
    /// Records with missing or invalid fields
    pub invalid_fields: usize,
    /// Records received before any clock bias
    pub missing_clock_bias: usize,
    /// Records lacking code lock or TOW decoding
    pub invalid_sync: usize,
    /// Records of satellites we cannot identify
    pub unsupported_satellites: usize,
    /// Records of signals no column describes
    pub unsupported_bands: usize,
    /// Records with invalid carrier phase
    pub invalid_phase: usize,
    /// Records with unrealistic pseudo range
    pub out_of_bounds_ranges: usize,
    /// Epochs dropped because of repeated entries
    pub discarded_epochs: usize,
}

impl Diagnostics {
    /// Reports and counts a non fatal [Error]
    fn report(&mut self, error: &Error) {
        warn!("{}", error);
        match error {
            Error::MalformedRecord { .. } => self.malformed_records += 1,
            Error::MissingField(_) | Error::FieldParsing { .. } => self.invalid_fields += 1,
            Error::MissingClockBias => self.missing_clock_bias += 1,
            Error::SyncStateInvalid(_) => self.invalid_sync += 1,
            Error::UnsupportedNumbering(_)
            | Error::UnknownGlonassChannel(_)
            | Error::UnsupportedConstellation(_)
            | Error::UnknownConstellation(_) => self.unsupported_satellites += 1,
            Error::UnsupportedBand { .. } => self.unsupported_bands += 1,
            Error::CarrierPhaseInvalid { .. } => self.invalid_phase += 1,
            Error::OutOfBoundsRange { .. } => self.out_of_bounds_ranges += 1,
            Error::DuplicateEpochEntry { .. } => self.discarded_epochs += 1,
            Error::MissingFieldDescriptor | Error::Io(_) => {},
        }
    }
}

/// [Pipeline] threads each [Record] through clock resolution,
/// observables computation and epoch accumulation, and produces
/// the RINEX lines.
#[derive(Debug, Clone)]
pub struct Pipeline {
    options: Options,
    header: Header,
    layout: Layout,
    clock: ClockResolver,
    engine: Engine,
    accumulator: Accumulator,
    header_released: bool,
    diagnostics: Diagnostics,
}

impl Pipeline {
    /// Builds a new [Pipeline], for records described by this [FieldDescriptor]
    pub fn new(options: Options, header: Header, descriptor: &FieldDescriptor) -> Self {
        Self {
            layout: Layout::new(descriptor),
            clock: ClockResolver::new(options.bias_policy),
            engine: Engine::new(options.schema, options.sync_policy, options.range_edit),
            accumulator: Accumulator::new(MergePolicy::from(options.schema)),
            header_released: false,
            diagnostics: Diagnostics::default(),
            options,
            header,
        }
    }

    /// [Diagnostics] so far
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Processes a new [Record]. Returns the lines that are ready for output:
    /// an epoch each time an epoch is completed, preceded by the header
    /// when this is the first epoch released.
    pub fn process(&mut self, record: &Record) -> Vec<String> {
        self.diagnostics.records += 1;

        let measurement = match Measurement::from_record(&self.layout, record) {
            Ok(measurement) => measurement,
            Err(e) => {
                self.diagnostics.report(&e);
                return Vec::new();
            },
        };

        let time = match self.clock.resolve(&measurement, self.options.integerize) {
            Ok(time) => time,
            Err(e) => {
                self.diagnostics.report(&e);
                return Vec::new();
            },
        };

        let mut warnings = Vec::new();
        let computed = self.engine.compute(&measurement, &time, &mut warnings);

        for warning in warnings.iter() {
            self.diagnostics.report(warning);
        }

        let observable = match computed {
            Ok(observable) => observable,
            Err(e) => {
                self.diagnostics.report(&e);
                return Vec::new();
            },
        };

        self.diagnostics.observables += 1;

        match self.accumulator.push(observable, time.epoch) {
            Some(batch) => self.release(batch),
            None => Vec::new(),
        }
    }

    /// Terminates the conversion: releases the pending epoch
    /// (and the header, if it was never released).
    pub fn finish(&mut self) -> Vec<String> {
        let mut lines = match self.accumulator.finish() {
            Some(batch) => self.release(batch),
            None => Vec::new(),
        };
        if !self.header_released {
            lines.extend(self.release_header(None));
        }
        info!(
            "{} records: {} observables in {} epochs ({} epochs discarded)",
            self.diagnostics.records,
            self.diagnostics.observables,
            self.diagnostics.epochs,
            self.diagnostics.discarded_epochs
        );
        lines
    }

    /// Header lines. TIME OF FIRST OBS is the first released epoch, if any.
    fn release_header(&mut self, first_epoch: Option<Epoch>) -> Vec<String> {
        self.header_released = true;
        let mut lines = self.header.format_lines(self.options.schema);
        lines.extend(
            self.header
                .format_closing_lines(self.options.schema, first_epoch),
        );
        lines
    }

    fn release(&mut self, batch: EpochBatch) -> Vec<String> {
        match batch.validate() {
            Ok(_) => {
                debug!("{}: releasing {} rows", batch.epoch, batch.len());
                self.diagnostics.epochs += 1;
                let mut lines = if self.header_released {
                    Vec::new()
                } else {
                    self.release_header(Some(batch.epoch))
                };
                lines.extend(batch.format(self.options.schema));
                lines
            },
            Err(e) => {
                self.diagnostics.report(&e);
                Vec::new()
            },
        }
    }
}

/// Converts a complete GnssLogger log into a RINEX observation stream.
/// Only I/O errors (and a log without `Raw` descriptor) abort the conversion.
pub fn convert<R: BufRead, W: Write>(
    reader: R,
    writer: &mut W,
    options: Options,
    header: Header,
) -> Result<Diagnostics, Error> {
    let reader = LogReader::new(reader)?;
    let mut pipeline = Pipeline::new(options, header, reader.descriptor());

    for record in reader {
        let record = record?;
        for line in pipeline.process(&record) {
            writeln!(writer, "{}", line)?;
        }
    }

    for line in pipeline.finish() {
        writeln!(writer, "{}", line)?;
    }

    writer.flush()?;
    Ok(*pipeline.diagnostics())
}
