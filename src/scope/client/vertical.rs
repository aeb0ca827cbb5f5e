use super::ScopeClient;
use crate::error::ScopeError;
use crate::scope::channel::ByteChannel;
use crate::scope::protocol::{self, Protocol};
use crate::types::{AxisLimits, VERTICAL_DIVISIONS};
use log::debug;

impl<C: ByteChannel> ScopeClient<C> {
    /// Set channel 1 vertical scale in volts per division.
    pub fn set_channel_scale(&mut self, volts_per_div: f64) -> Result<(), ScopeError> {
        Protocol::check_channel_scale(volts_per_div)?;

        debug!("Setting vertical scale to {volts_per_div} volts");
        self.execute_checked(&protocol::set_command(
            protocol::CHAN1_SCALE,
            volts_per_div,
        ))
    }

    /// Current channel 1 scale in volts per division.
    pub fn channel_scale(&mut self) -> Result<f64, ScopeError> {
        let reply = self.query_checked(&protocol::query_command(protocol::CHAN1_SCALE))?;
        Protocol::parse_scale(&reply)
    }

    /// Voltage span covered by the screen, queried fresh from the instrument.
    pub fn vertical_limits(&mut self) -> Result<AxisLimits, ScopeError> {
        debug!("Getting vertical limits");
        let volts_per_div = self.channel_scale()?;
        Ok(AxisLimits::from_scale(volts_per_div, VERTICAL_DIVISIONS))
    }

    /// Shift channel 1 vertically, in volts.
    pub fn set_vertical_position(&mut self, v_pos: f64) -> Result<(), ScopeError> {
        let limits = self.vertical_limits()?;
        if !limits.contains(v_pos) {
            return Err(ScopeError::Validation(format!(
                "Vertical position (y) outside limits. The limits are {}V and +{}V",
                limits.min, limits.max
            )));
        }

        debug!("Setting vertical position to {v_pos} volts");
        self.execute_checked(&protocol::set_command(protocol::CHAN1_OFFSET, v_pos))
    }
}
