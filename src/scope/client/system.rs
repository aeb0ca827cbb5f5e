use super::ScopeClient;
use crate::error::ScopeError;
use crate::scope::channel::ByteChannel;
use crate::scope::protocol::{self, Protocol};
use crate::types::{Identity, SystemError};
use log::debug;

impl<C: ByteChannel> ScopeClient<C> {
    /// Identify the instrument with `*IDN?`.
    ///
    /// Call this first after connecting. The reply must have exactly four
    /// comma-separated fields.
    ///
    /// # Errors
    /// - [`ScopeError::InstrumentFault`] if the error queue reports a fault
    /// - [`ScopeError::MalformedResponse`] if the ID string does not have four fields
    pub fn handshake(&mut self) -> Result<Identity, ScopeError> {
        debug!("Handshaking with device");

        let reply = self.query_checked(protocol::IDN)?;
        let identity = Protocol::parse_identity(&reply)?;

        debug!("Handshake returned:");
        debug!("-- Name:              {}", identity.name);
        debug!("-- Model:             {}", identity.model);
        debug!("-- Serial number:     {}", identity.serial);
        debug!("-- Software version:  {}", identity.software_version);

        Ok(identity)
    }

    /// Restore the factory default state with `*RST`.
    pub fn reset(&mut self) -> Result<(), ScopeError> {
        debug!("Resetting device");
        self.execute_checked(protocol::RST)
    }

    /// Pop one entry from the error queue without treating it as a failure.
    pub fn system_error(&mut self) -> Result<SystemError, ScopeError> {
        let reply = self.query(protocol::SYST_ERR)?;
        Protocol::parse_error_reply(&reply)
    }
}
