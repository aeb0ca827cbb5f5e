use crate::error::ScopeError;
use crate::types::{Identity, SystemError, WaveformPreamble, WaveformResult};

// Command set
pub const IDN: &str = "*IDN?";
pub const RST: &str = "*RST";
pub const SYST_ERR: &str = ":SYST:ERR?";
pub const TIMEBASE_SCALE: &str = ":TIM:MAIN:SCAL";
pub const TIMEBASE_OFFSET: &str = ":TIM:MAIN:OFFS";
pub const CHAN1_SCALE: &str = ":CHAN1:SCAL";
pub const CHAN1_OFFSET: &str = ":CHAN1:OFFS";
pub const TRIG_MODE_EDGE: &str = ":TRIG:MODE EDGE";
pub const TRIG_EDGE_LEVEL: &str = ":TRIG:EDG:LEV";
pub const TRIG_EDGE_SOURCE_CHAN1: &str = ":TRIG:EDG:SOUR CHAN1";
pub const TRIG_EDGE_SLOPE_POS: &str = ":TRIG:EDG:SLOP POS";
pub const SINGLE: &str = ":SING";
pub const WAV_SOURCE_CHAN1: &str = ":WAV:SOUR CHAN1";
pub const WAV_MODE_NORMAL: &str = ":WAV:MODE NORM";
pub const WAV_FORMAT_ASCII: &str = ":WAV:FORM ASC";
pub const WAV_PREAMBLE: &str = ":WAV:PRE?";
pub const WAV_DATA: &str = ":WAV:DATA?";

// Firmware limits. Out-of-range values hang the DS1000Z's LAN interface.
pub const MAX_TIMEBASE: f64 = 50.0;
pub const MIN_CHANNEL_SCALE: f64 = -0.01;
pub const MAX_CHANNEL_SCALE: f64 = 100.0;

const PREAMBLE_POINTS_FIELD: usize = 2;
const PREAMBLE_XINCREMENT_FIELD: usize = 4;

/// Build a `<header> <value>` setter command.
pub fn set_command(header: &str, value: f64) -> String {
    format!("{header} {value}")
}

/// Build the query form of a setter header.
pub fn query_command(header: &str) -> String {
    format!("{header}?")
}

/// Reply parsing and value checks for the DS1000Z command set
pub struct Protocol;

impl Protocol {
    /// Parse a `code,message` reply from `:SYST:ERR?`.
    pub fn parse_error_reply(reply: &str) -> Result<SystemError, ScopeError> {
        let parts: Vec<&str> = reply.split(',').collect();
        let [code, message] = parts.as_slice() else {
            return Err(ScopeError::MalformedResponse(format!(
                "error query returned {} fields, expected 2: {reply:?}",
                parts.len()
            )));
        };

        let code = code.trim().parse::<i32>().map_err(|_| {
            ScopeError::MalformedResponse(format!("error code is not an integer: {code:?}"))
        })?;

        Ok(SystemError {
            code,
            message: message.trim().trim_matches('"').to_string(),
        })
    }

    /// Turn a non-zero error reply into an [`ScopeError::InstrumentFault`].
    pub fn check_error_reply(reply: &str) -> Result<(), ScopeError> {
        let error = Self::parse_error_reply(reply)?;
        if error.is_ok() {
            Ok(())
        } else {
            Err(ScopeError::InstrumentFault {
                code: error.code,
                message: error.message,
            })
        }
    }

    /// Split an `*IDN?` reply into exactly four fields.
    pub fn parse_identity(reply: &str) -> Result<Identity, ScopeError> {
        let fields: Vec<&str> = reply.split(',').collect();
        match fields.as_slice() {
            [name, model, serial, software_version] => Ok(Identity {
                name: name.to_string(),
                model: model.to_string(),
                serial: serial.to_string(),
                software_version: software_version.to_string(),
            }),
            _ => Err(ScopeError::MalformedResponse(format!(
                "*IDN? query did not return a valid ID string ({} fields): {reply:?}",
                fields.len()
            ))),
        }
    }

    /// Parse a decimal scale reply such as `5.000000e-04`.
    pub fn parse_scale(reply: &str) -> Result<f64, ScopeError> {
        reply.trim().parse::<f64>().map_err(|_| {
            ScopeError::MalformedResponse(format!("scale is not a number: {reply:?}"))
        })
    }

    /// Extract `points` and `xincrement` from a `:WAV:PRE?` reply.
    pub fn parse_preamble(reply: &str) -> Result<WaveformPreamble, ScopeError> {
        let fields: Vec<&str> = reply.split(',').collect();
        if fields.len() <= PREAMBLE_XINCREMENT_FIELD {
            return Err(ScopeError::MalformedResponse(format!(
                "preamble has {} fields, expected at least {}",
                fields.len(),
                PREAMBLE_XINCREMENT_FIELD + 1
            )));
        }

        let points_field = fields[PREAMBLE_POINTS_FIELD].trim();
        let points = points_field.parse::<u32>().map_err(|_| {
            ScopeError::MalformedResponse(format!(
                "preamble points is not an integer: {points_field:?}"
            ))
        })?;

        let xincrement_field = fields[PREAMBLE_XINCREMENT_FIELD].trim();
        let xincrement = xincrement_field.parse::<f64>().map_err(|_| {
            ScopeError::MalformedResponse(format!(
                "preamble xincrement is not a number: {xincrement_field:?}"
            ))
        })?;

        Ok(WaveformPreamble { points, xincrement })
    }

    /// Decode an ASCII `:WAV:DATA?` reply into a time/voltage series.
    ///
    /// The first token carries the block header and the last is a trailing
    /// artifact of the ASCII format; both are dropped. Time starts at 0 and
    /// advances by `xincrement` per sample.
    pub fn decode_ascii_samples(
        reply: &str,
        xincrement: f64,
    ) -> Result<WaveformResult, ScopeError> {
        let tokens: Vec<&str> = reply.split(',').collect();
        let samples = match tokens.len() {
            0..=2 => &[][..],
            n => &tokens[1..n - 1],
        };

        let voltage = samples
            .iter()
            .map(|token| {
                token.trim().parse::<f64>().map_err(|_| {
                    ScopeError::MalformedResponse(format!(
                        "waveform sample is not a number: {token:?}"
                    ))
                })
            })
            .collect::<Result<Vec<f64>, ScopeError>>()?;

        let time = (0..voltage.len()).map(|i| i as f64 * xincrement).collect();

        Ok(WaveformResult { time, voltage })
    }

    pub fn check_timebase(secs_per_div: f64) -> Result<(), ScopeError> {
        if secs_per_div > 0.0 && secs_per_div <= MAX_TIMEBASE {
            Ok(())
        } else {
            Err(ScopeError::Validation(format!(
                "Timebase must be > 0 and <= {MAX_TIMEBASE} seconds, got {secs_per_div}"
            )))
        }
    }

    pub fn check_channel_scale(volts_per_div: f64) -> Result<(), ScopeError> {
        if (MIN_CHANNEL_SCALE..=MAX_CHANNEL_SCALE).contains(&volts_per_div) {
            Ok(())
        } else {
            Err(ScopeError::Validation(format!(
                "Vertical scale must be between 0.01V and {MAX_CHANNEL_SCALE}V, got {volts_per_div}"
            )))
        }
    }
}
