use serde::{Deserialize, Serialize};
use std::fmt;

/// Divisions from screen center to the top/bottom edge.
pub const VERTICAL_DIVISIONS: f64 = 4.0;
/// Divisions from screen center to the left/right edge.
pub const HORIZONTAL_DIVISIONS: f64 = 6.0;

/// Network location of the instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Reply to `*IDN?`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub model: String,
    pub serial: String,
    pub software_version: String,
}

/// Entry popped from the instrument's error queue by `:SYST:ERR?`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemError {
    pub code: i32,
    pub message: String,
}

impl SystemError {
    pub fn is_ok(&self) -> bool {
        self.code == 0
    }
}

/// Absolute bounds of one screen axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisLimits {
    pub min: f64,
    pub max: f64,
}

impl AxisLimits {
    /// Limits spanning `divisions` on either side of center at `per_division` units each.
    pub fn from_scale(per_division: f64, divisions: f64) -> Self {
        Self {
            min: -per_division * divisions,
            max: per_division * divisions,
        }
    }

    /// Inclusive on both ends; NaN is never contained.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveformPreamble {
    pub points: u32,
    pub xincrement: f64,
}

/// Decoded capture: parallel time and voltage series of equal length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaveformResult {
    pub time: Vec<f64>,
    pub voltage: Vec<f64>,
}

impl WaveformResult {
    pub fn len(&self) -> usize {
        self.voltage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voltage.is_empty()
    }
}

/// Acquisition state applied by [`crate::ScopeClient::configure_acquisition`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionSettings {
    pub secs_per_div: f64,
    pub volts_per_div: f64,
    pub trigger_level: f64,
    pub horizontal_position: f64,
    pub vertical_position: f64,
}

impl Default for AcquisitionSettings {
    /// Settings for the built-in 1 kHz calibration square wave.
    fn default() -> Self {
        Self {
            secs_per_div: 0.0005,
            volts_per_div: 1.0,
            trigger_level: 1.0,
            horizontal_position: 0.0,
            vertical_position: 0.0,
        }
    }
}
