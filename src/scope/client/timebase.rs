use super::ScopeClient;
use crate::error::ScopeError;
use crate::scope::channel::ByteChannel;
use crate::scope::protocol::{self, Protocol};
use crate::types::{AxisLimits, HORIZONTAL_DIVISIONS};
use log::debug;

impl<C: ByteChannel> ScopeClient<C> {
    /// Set the main timebase in seconds per division.
    ///
    /// # Errors
    /// [`ScopeError::Validation`] unless `0 < secs_per_div <= 50`; nothing is
    /// sent in that case.
    pub fn set_timebase(&mut self, secs_per_div: f64) -> Result<(), ScopeError> {
        Protocol::check_timebase(secs_per_div)?;

        debug!("Setting timebase to {secs_per_div} seconds");
        self.execute_checked(&protocol::set_command(
            protocol::TIMEBASE_SCALE,
            secs_per_div,
        ))
    }

    /// Current timebase in seconds per division.
    pub fn timebase(&mut self) -> Result<f64, ScopeError> {
        let reply = self.query_checked(&protocol::query_command(protocol::TIMEBASE_SCALE))?;
        Protocol::parse_scale(&reply)
    }

    /// Time span covered by the screen, queried fresh from the instrument.
    pub fn horizontal_limits(&mut self) -> Result<AxisLimits, ScopeError> {
        debug!("Getting horizontal limits");
        let secs_per_div = self.timebase()?;
        Ok(AxisLimits::from_scale(secs_per_div, HORIZONTAL_DIVISIONS))
    }

    /// Move the trigger point horizontally, in seconds.
    pub fn set_horizontal_position(&mut self, t_pos: f64) -> Result<(), ScopeError> {
        let limits = self.horizontal_limits()?;
        if !limits.contains(t_pos) {
            return Err(ScopeError::Validation(format!(
                "Horizontal position (x) outside limits. The limits are {} s and +{} s",
                limits.min, limits.max
            )));
        }

        debug!("Setting horizontal position to {t_pos} seconds");
        self.execute_checked(&protocol::set_command(protocol::TIMEBASE_OFFSET, t_pos))
    }
}
