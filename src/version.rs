//! `RINEX` revision description
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Version is used to describe RINEX standards revisions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Version {
    /// Version major number
    pub major: u8,
    /// Version minor number
    pub minor: u8,
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.major, self.minor)
    }
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum ParsingError {
    #[error("non supported revision \"{0}\"")]
    NotSupported(String),
}

/// Observation file layouts we produce
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Schema {
    /// RINEX 2.11: primary band only, `C1 S1 L1 D1` observables
    V2_11,
    /// RINEX 3.03: primary and one secondary band per constellation
    #[default]
    V3_03,
}

impl Schema {
    /// [Version] described by this [Schema]
    pub fn version(&self) -> Version {
        match self {
            Self::V2_11 => Version {
                major: 2,
                minor: 11,
            },
            Self::V3_03 => Version { major: 3, minor: 3 },
        }
    }
    /// Returns true for the legacy (V2) layout
    pub fn is_legacy(&self) -> bool {
        *self == Self::V2_11
    }
}

impl std::fmt::Display for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.version())
    }
}

impl std::str::FromStr for Schema {
    type Err = ParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "2" | "2.11" => Ok(Self::V2_11),
            "3" | "3.03" => Ok(Self::V3_03),
            _ => Err(ParsingError::NotSupported(s.to_string())),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;
    #[test]
    fn schema_parsing() {
        assert_eq!(Schema::from_str("2").unwrap(), Schema::V2_11);
        assert_eq!(Schema::from_str("2.11").unwrap(), Schema::V2_11);
        assert_eq!(Schema::from_str("3").unwrap(), Schema::V3_03);
        assert_eq!(Schema::from_str(" 3.03").unwrap(), Schema::V3_03);
        assert!(Schema::from_str("4").is_err());
        assert_eq!(Schema::default(), Schema::V3_03);
    }
    #[test]
    fn schema_display() {
        assert_eq!(Schema::V2_11.to_string(), "2.11");
        assert_eq!(Schema::V3_03.to_string(), "3.03");
        assert!(Schema::V2_11.is_legacy());
        assert!(Schema::V2_11.version() < Schema::V3_03.version());
    }
}
