//! Epoch batches
use crate::{
    carrier::BandClass,
    error::Error,
    formatting::{fmt_epoch_v2, fmt_epoch_v3, fmt_observations},
    observation::Observable,
    prelude::{Constellation, Epoch, SV},
    version::Schema,
};

use itertools::Itertools;
use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Order in which RINEX3 epochs list the satellites
const V3_CONSTELLATION_ORDER: [Constellation; 5] = [
    Constellation::GPS,
    Constellation::BeiDou,
    Constellation::Galileo,
    Constellation::Glonass,
    Constellation::QZSS,
];

/// How [Observable]s of one satellite are gathered within an epoch
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MergePolicy {
    /// One row per satellite, one slot per [BandClass].
    /// A repeated [BandClass] overwrites the previous value.
    #[default]
    ByBand,
    /// One row per [Observable]
    Append,
}

impl From<Schema> for MergePolicy {
    fn from(schema: Schema) -> Self {
        match schema {
            Schema::V2_11 => Self::Append,
            Schema::V3_03 => Self::ByBand,
        }
    }
}

/// Observations of one satellite, within one epoch
#[derive(Debug, Clone, PartialEq)]
pub struct SatelliteRow {
    /// [SV]
    pub sv: SV,
    /// [BandClass::Primary] slot
    pub primary: Option<Observable>,
    /// [BandClass::Secondary] slot
    pub secondary: Option<Observable>,
}

impl SatelliteRow {
    fn new(observable: Observable) -> Self {
        let mut row = Self {
            sv: observable.sv,
            primary: None,
            secondary: None,
        };
        row.set(observable);
        row
    }
    fn set(&mut self, observable: Observable) {
        match observable.band.class() {
            BandClass::Primary => self.primary = Some(observable),
            BandClass::Secondary => self.secondary = Some(observable),
        }
    }
    /// C, L, D, S values of given slot
    fn values(slot: Option<&Observable>) -> [Option<f64>; 4] {
        match slot {
            Some(obs) => [
                Some(obs.pseudo_range_m),
                Some(obs.phase_cycles),
                Some(obs.doppler_hz),
                Some(obs.cn0_dbhz),
            ],
            None => [None; 4],
        }
    }
    /*
     * V2 data line: C1 S1 L1 D1
     */
    fn format_v2(&self) -> String {
        let [c, l, d, s] = Self::values(self.primary.as_ref().or(self.secondary.as_ref()));
        fmt_observations(&[c, s, l, d])
    }
    /*
     * V3 data line: SV then C L D S of both slots
     */
    fn format_v3(&self) -> String {
        let values = Self::values(self.primary.as_ref())
            .into_iter()
            .chain(Self::values(self.secondary.as_ref()))
            .collect::<Vec<_>>();
        format!("{:x}{}", self.sv, fmt_observations(&values))
    }
}

/// All [Observable]s sharing one [Epoch]
#[derive(Debug, Clone, PartialEq)]
pub struct EpochBatch {
    /// [Epoch] of every observation in this batch
    pub epoch: Epoch,
    rows: Vec<SatelliteRow>,
}

impl EpochBatch {
    /// Creates a new empty [EpochBatch]
    pub fn new(epoch: Epoch) -> Self {
        Self {
            epoch,
            rows: Vec::new(),
        }
    }
    /// [SatelliteRow]s, in first encounter order
    pub fn rows(&self) -> &[SatelliteRow] {
        &self.rows
    }
    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }
    /// True if batch has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
    /// Inserts a new [Observable], following the [MergePolicy]
    pub fn insert(&mut self, observable: Observable, policy: MergePolicy) {
        match policy {
            MergePolicy::ByBand => {
                if let Some(row) = self.rows.iter_mut().find(|row| row.sv == observable.sv) {
                    row.set(observable);
                } else {
                    self.rows.push(SatelliteRow::new(observable));
                }
            },
            MergePolicy::Append => self.rows.push(SatelliteRow::new(observable)),
        }
    }
    /// Satellites, in first encounter order
    pub fn satellites(&self) -> Vec<SV> {
        self.rows.iter().map(|row| row.sv).collect()
    }
    /// Verifies that each satellite appears only once.
    /// A batch that fails this test is corrupt and must be dropped.
    pub fn validate(&self) -> Result<(), Error> {
        if self.rows.iter().map(|row| row.sv).duplicates().next().is_some() {
            Err(Error::DuplicateEpochEntry { epoch: self.epoch })
        } else {
            Ok(())
        }
    }
    /// Formats this batch following given [Schema]
    pub fn format(&self, schema: Schema) -> Vec<String> {
        match schema {
            Schema::V2_11 => {
                let mut lines = fmt_epoch_v2(self.epoch, &self.satellites());
                lines.extend(self.rows.iter().map(|row| row.format_v2()));
                lines
            },
            Schema::V3_03 => {
                let mut lines = Vec::with_capacity(self.rows.len() + 1);
                lines.push(fmt_epoch_v3(self.epoch, self.rows.len()));
                for constellation in V3_CONSTELLATION_ORDER.iter() {
                    lines.extend(
                        self.rows
                            .iter()
                            .filter(|row| row.sv.constellation == *constellation)
                            .map(|row| row.format_v3()),
                    );
                }
                lines
            },
        }
    }
}

/// [Accumulator] gathers [Observable]s into [EpochBatch]es.
/// A batch is released when a new epoch starts, or on [Accumulator::finish].
#[derive(Debug, Default, Clone)]
pub struct Accumulator {
    policy: MergePolicy,
    batch: Option<EpochBatch>,
}

impl Accumulator {
    /// Creates a new [Accumulator]
    pub fn new(policy: MergePolicy) -> Self {
        Self {
            policy,
            batch: None,
        }
    }
    /// Current (unreleased) [EpochBatch]
    pub fn pending(&self) -> Option<&EpochBatch> {
        self.batch.as_ref()
    }
    /// Accumulates a new [Observable]. Returns the previous [EpochBatch]
    /// when this observable starts a new epoch.
    pub fn push(&mut self, observable: Observable, epoch: Epoch) -> Option<EpochBatch> {
        let released = if self
            .batch
            .as_ref()
            .is_some_and(|batch| batch.epoch != epoch)
        {
            self.batch.take()
        } else {
            None
        };
        if let Some(released) = &released {
            debug!("{}: {} satellites", released.epoch, released.len());
        }
        self.batch
            .get_or_insert_with(|| EpochBatch::new(epoch))
            .insert(observable, self.policy);
        released
    }
    /// Releases the current [EpochBatch]
    pub fn finish(&mut self) -> Option<EpochBatch> {
        self.batch.take()
    }
}
