#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate gnss_rs as gnss;

pub mod batch;
pub mod carrier;
pub mod clock;
pub mod hardware;
pub mod header;
pub mod measurement;
pub mod observation;
pub mod pipeline;
pub mod reader;
pub mod version;
pub mod writer;

mod constants;
mod epoch;
mod error;
mod formatting;

#[cfg(test)]
mod tests;

pub use epoch::from_gpst_week;
pub use error::Error;
pub use pipeline::convert;

/// Package to include all basic structures
pub mod prelude {
    // export
    pub use crate::{
        batch::{Accumulator, EpochBatch, MergePolicy, SatelliteRow},
        carrier::{Band, BandClass},
        clock::{BiasPolicy, ClockResolver, ClockState, ResolvedTime, TimeOrigin},
        error::Error,
        hardware::{Antenna, Receiver},
        header::Header,
        measurement::{AdrState, ConstellationType, Layout, Measurement, SyncState},
        observation::{Engine, Observable, SyncPolicy},
        pipeline::{convert, Diagnostics, Options, Pipeline},
        reader::{FieldDescriptor, LogReader, Record},
        version::{Schema, Version},
        writer::BufferedWriter,
    };

    // pub re-export
    pub use gnss::prelude::{Constellation, SV};
    pub use hifitime::{Duration, Epoch, TimeScale};
}
