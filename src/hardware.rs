//! Hardware: receiver, antenna informations
use crate::header::check_field;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// GNSS receiver description
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Receiver {
    /// Receiver identification number
    pub sn: Option<String>,
    /// Receiver (hardware) model
    pub model: Option<String>,
    /// Receiver embedded software info
    pub firmware: Option<String>,
}

impl Default for Receiver {
    /// Smartphone chipsets are not identified, only the OS is
    fn default() -> Self {
        Self {
            sn: None,
            model: None,
            firmware: Some("Android OS >7.0".to_string()),
        }
    }
}

impl Receiver {
    /// Sets desired serial number
    pub fn with_serial_number(&self, sn: &str) -> Self {
        let mut s = self.clone();
        s.sn = Some(sn.to_string());
        s
    }
    /// Sets desired model
    pub fn with_model(&self, model: &str) -> Self {
        let mut s = self.clone();
        s.model = Some(model.to_string());
        s
    }
    /// Sets desired firmware version
    pub fn with_firmware(&self, firmware: &str) -> Self {
        let mut s = self.clone();
        s.firmware = Some(firmware.to_string());
        s
    }
    /*
     * REC # / TYPE / VERS content
     */
    pub(crate) fn format(&self) -> String {
        format!(
            "{:<20}{:<20}{:<20}",
            check_field("RECEIVER NUMBER", self.sn.as_deref(), 20),
            check_field("RECEIVER TYPE", self.model.as_deref(), 20),
            check_field("RECEIVER VERSION", self.firmware.as_deref(), 20),
        )
    }
}

/// Antenna description
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Antenna {
    /// Serial number / identification number
    pub sn: Option<String>,
    /// Hardware model / make descriptor
    pub model: Option<String>,
    /// `h` eccentricity (height component),
    /// referenced to base/reference point, in meter
    pub height: f64,
    /// `eastern` eccentricity (eastern component),
    /// referenced to base/reference point, in meter
    pub eastern: f64,
    /// `northern` eccentricity (northern component),
    /// referenced to base/reference point, in meter
    pub northern: f64,
}

impl Default for Antenna {
    /// Smartphone antennas are built in
    fn default() -> Self {
        Self {
            sn: None,
            model: Some("internal".to_string()),
            height: 0.0,
            eastern: 0.0,
            northern: 0.0,
        }
    }
}

impl Antenna {
    /// Sets desired model
    pub fn with_model(&self, m: &str) -> Self {
        let mut s = self.clone();
        s.model = Some(m.to_string());
        s
    }
    /// Sets desired Serial Number
    pub fn with_serial_number(&self, sn: &str) -> Self {
        let mut s = self.clone();
        s.sn = Some(sn.to_string());
        s
    }
    /// Sets antenna `h` eccentricity component
    pub fn with_height(&self, h: f64) -> Self {
        let mut s = self.clone();
        s.height = h;
        s
    }
    /// Sets antenna `eastern` coordinates component
    pub fn with_eastern_component(&self, e: f64) -> Self {
        let mut s = self.clone();
        s.eastern = e;
        s
    }
    /// Sets antenna `northern` coordinates component
    pub fn with_northern_component(&self, n: f64) -> Self {
        let mut s = self.clone();
        s.northern = n;
        s
    }
    /*
     * ANT # / TYPE content
     */
    pub(crate) fn format(&self) -> String {
        format!(
            "{:<20}{:<40}",
            check_field("ANTENNA NUMBER", self.sn.as_deref(), 20),
            check_field("ANTENNA TYPE", self.model.as_deref(), 40),
        )
    }
    /*
     * ANTENNA: DELTA H/E/N content
     */
    pub(crate) fn format_eccentricity(&self) -> String {
        format!(
            "{:14.4}{:14.4}{:14.4}",
            self.height, self.eastern, self.northern
        )
    }
}
