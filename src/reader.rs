//! GnssLogger log reader.
//!
//! A GnssLogger log is a CSV-like text file. Comment lines start with `#`,
//! one of them describes the fields of the `Raw` measurement lines:
//! ```text
//! # Raw,utcTimeMillis,TimeNanos,LeapSecond,...,ConstellationType,...
//! Raw,1578999991444,91414000000,18,...,1,...
//! ```
use std::io::{BufRead, Lines};

use crate::error::Error;

use log::trace;

const RAW_DESCRIPTOR_MARKER: &str = "# Raw";
const RAW_RECORD_MARKER: &str = "Raw,";

/// Names of the `Raw` fields, in log order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldDescriptor {
    names: Vec<String>,
}

impl FieldDescriptor {
    /// Builds a [FieldDescriptor] from given field names.
    pub fn new<S: AsRef<str>>(names: &[S]) -> Self {
        Self {
            names: names.iter().map(|n| n.as_ref().trim().to_string()).collect(),
        }
    }
    /// Parses the `# Raw,...` descriptor line. Returns None
    /// if this line does not describe `Raw` records.
    pub fn parse(line: &str) -> Option<Self> {
        if !line.starts_with(RAW_DESCRIPTOR_MARKER) {
            return None;
        }
        let names = line[2..]
            .trim()
            .split(',')
            .skip(1)
            .map(|f| f.trim().to_string())
            .collect();
        Some(Self { names })
    }
    /// Number of fields per record
    pub fn len(&self) -> usize {
        self.names.len()
    }
    /// True if no field is described
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
    /// Position of named field
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
    /// Iterates field names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|n| n.as_str())
    }
}

/// One `Raw` record, values in descriptor order.
/// Empty values are stored as None.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    values: Vec<Option<String>>,
}

impl Record {
    /// Builds a [Record] from raw values, in descriptor order
    pub fn new<S: AsRef<str>>(values: &[S]) -> Self {
        Self {
            values: values
                .iter()
                .map(|v| {
                    let v = v.as_ref().trim();
                    if v.is_empty() {
                        None
                    } else {
                        Some(v.to_string())
                    }
                })
                .collect(),
        }
    }
    /// Parses a `Raw,...` line. Returns None for any other kind of line.
    pub fn parse(line: &str) -> Option<Self> {
        if !line.starts_with(RAW_RECORD_MARKER) {
            return None;
        }
        let values = line.trim().split(',').skip(1).collect::<Vec<_>>();
        Some(Self::new(&values))
    }
    /// Number of values
    pub fn len(&self) -> usize {
        self.values.len()
    }
    /// True if record has no values
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
    /// Value at given position, if it exists and is not empty
    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).and_then(|v| v.as_deref())
    }
}

/// [LogReader] iterates the `Raw` [Record]s of a GnssLogger log.
pub struct LogReader<R: BufRead> {
    lines: Lines<R>,
    descriptor: FieldDescriptor,
}

impl<R: BufRead> LogReader<R> {
    /// Creates a new [LogReader], consuming the log up to (and including)
    /// the `# Raw` descriptor line.
    pub fn new(reader: R) -> Result<Self, Error> {
        let mut lines = reader.lines();
        for line in lines.by_ref() {
            let line = line?;
            if let Some(descriptor) = FieldDescriptor::parse(&line) {
                trace!("raw fields: {:?}", descriptor.names);
                return Ok(Self { lines, descriptor });
            }
        }
        Err(Error::MissingFieldDescriptor)
    }
    /// [FieldDescriptor] of this log
    pub fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }
}

impl<R: BufRead> Iterator for LogReader<R> {
    type Item = Result<Record, Error>;
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.lines.next()? {
                Ok(line) => {
                    if let Some(record) = Record::parse(&line) {
                        return Some(Ok(record));
                    }
                },
                Err(e) => return Some(Err(Error::Io(e))),
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::BufReader;

    const LOG: &str = "# Header Description:
#
# Version: v2.0.0.1 Platform: 7.0 Manufacturer: Google Model: Pixel
#
# Raw,ElapsedRealtimeMillis,TimeNanos,FullBiasNanos,Svid
#
# Fix,Provider,Latitude,Longitude
Fix,gps,41.38,2.11
Raw,1000,5000,-1167383078000000000,5
Raw,1000,5000,,7
Status,1,2,3
Raw,1001,6000,-1167383078000000000
";

    #[test]
    fn descriptor_parsing() {
        let descriptor =
            FieldDescriptor::parse("# Raw,ElapsedRealtimeMillis,TimeNanos, FullBiasNanos").unwrap();
        assert_eq!(descriptor.len(), 3);
        assert_eq!(descriptor.position("TimeNanos"), Some(1));
        assert_eq!(descriptor.position("FullBiasNanos"), Some(2));
        assert!(FieldDescriptor::parse("# Fix,Provider").is_none());
    }

    #[test]
    fn record_parsing() {
        let record = Record::parse("Raw,1000,,-5\n").unwrap();
        assert_eq!(record.len(), 3);
        assert_eq!(record.get(0), Some("1000"));
        assert_eq!(record.get(1), None);
        assert_eq!(record.get(2), Some("-5"));
        assert_eq!(record.get(3), None);
        assert!(Record::parse("Fix,gps,1,2").is_none());
    }

    #[test]
    fn log_reader() {
        let reader = LogReader::new(BufReader::new(LOG.as_bytes())).unwrap();
        assert_eq!(reader.descriptor().len(), 4);

        let records = reader.collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].get(3), Some("5"));
        assert_eq!(records[1].get(2), None);
        assert_eq!(records[2].len(), 3);
    }

    #[test]
    fn missing_descriptor() {
        let log = "# Fix,Provider\nRaw,1,2,3\n";
        match LogReader::new(BufReader::new(log.as_bytes())) {
            Err(Error::MissingFieldDescriptor) => {},
            _ => panic!("descriptor should be missing"),
        }
    }
}
