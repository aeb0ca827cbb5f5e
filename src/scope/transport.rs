use log::trace;

use super::channel::ByteChannel;
use crate::error::ScopeError;

/// Default `max_bytes` for a single reply read.
pub const DEFAULT_RECEIVE_SIZE: usize = 4096;

/// Newline-framed text on top of a [`ByteChannel`].
///
/// `receive` issues exactly one read. A reply split across several TCP segments
/// comes back truncated; long `:WAV:DATA?` replies are the usual victim.
pub struct LineTransport<C: ByteChannel> {
    channel: C,
}

impl<C: ByteChannel> LineTransport<C> {
    pub fn new(channel: C) -> Self {
        Self { channel }
    }

    /// Send one command, appending `\n` unless it is already there.
    pub fn send(&mut self, command: &str) -> Result<(), ScopeError> {
        let mut line = String::with_capacity(command.len() + 1);
        line.push_str(command);
        if !line.ends_with('\n') {
            line.push('\n');
        }

        trace!("-> {:?}", line);
        self.channel
            .send(line.as_bytes())
            .map_err(|e| ScopeError::transport("Failed to send message", e))
    }

    /// Read one reply and strip surrounding whitespace.
    pub fn receive(&mut self, max_bytes: usize) -> Result<String, ScopeError> {
        let bytes = self
            .channel
            .receive(max_bytes)
            .map_err(|e| ScopeError::transport("Failed to receive message", e))?;

        if bytes.is_empty() {
            return Err(ScopeError::transport(
                "Failed to receive message",
                std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "connection closed by instrument",
                ),
            ));
        }

        let text = String::from_utf8(bytes).map_err(|e| {
            ScopeError::MalformedResponse(format!("reply is not valid UTF-8: {e}"))
        })?;
        trace!("<- {:?}", text);

        Ok(text.trim().to_string())
    }

    pub fn close(&mut self) -> Result<(), ScopeError> {
        self.channel
            .close()
            .map_err(|e| ScopeError::transport("Failed to close connection", e))
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }
}
