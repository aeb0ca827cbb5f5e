use super::channel::{ByteChannel, TcpChannel};
use super::protocol::{self, Protocol};
use super::transport::{LineTransport, DEFAULT_RECEIVE_SIZE};
use crate::error::ScopeError;
use crate::types::{AcquisitionSettings, Endpoint};
use log::debug;
use std::time::Duration;

pub mod system;
pub mod timebase;
pub mod trigger;
pub mod vertical;
pub mod waveform;

/// Connection configuration for the oscilloscope TCP client.
///
/// Timeouts are applied to the socket, so a silent instrument surfaces as a
/// transport error instead of blocking forever.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use rigol_scope::ConnectionConfig;
///
/// let config = ConnectionConfig {
///     read_timeout: Duration::from_secs(30),
///     ..ConnectionConfig::default()
/// };
/// assert_eq!(config.receive_buffer_size, 4096);
/// ```
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Timeout for establishing the TCP connection
    pub connect_timeout: Duration,
    /// Timeout for a single reply read
    pub read_timeout: Duration,
    /// Timeout for writing a command
    pub write_timeout: Duration,
    /// Upper bound on bytes taken by one reply read
    pub receive_buffer_size: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(10),
            write_timeout: Duration::from_secs(5),
            receive_buffer_size: DEFAULT_RECEIVE_SIZE,
        }
    }
}

/// Builder for [`ScopeClient`] connections over TCP.
///
/// ```no_run
/// use std::time::Duration;
/// use rigol_scope::ScopeClient;
///
/// let mut scope = ScopeClient::builder()
///     .host("10.0.0.17")
///     .port(5555)
///     .read_timeout(Duration::from_secs(20))
///     .build()?;
/// scope.handshake()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Default)]
pub struct ScopeClientBuilder {
    host: Option<String>,
    port: Option<u16>,
    config: ConnectionConfig,
}

impl ScopeClientBuilder {
    pub fn host(mut self, host: &str) -> Self {
        self.host = Some(host.to_string());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the full connection configuration
    pub fn config(mut self, config: ConnectionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.config.read_timeout = timeout;
        self
    }

    pub fn write_timeout(mut self, timeout: Duration) -> Self {
        self.config.write_timeout = timeout;
        self
    }

    pub fn receive_buffer_size(mut self, bytes: usize) -> Self {
        self.config.receive_buffer_size = bytes;
        self
    }

    /// Connect and return the session
    pub fn build(self) -> Result<ScopeClient<TcpChannel>, ScopeError> {
        let host = self
            .host
            .ok_or_else(|| ScopeError::InvalidCommand("Host must be specified".to_string()))?;

        let port = self
            .port
            .ok_or_else(|| ScopeError::InvalidCommand("Port must be specified".to_string()))?;

        let channel = TcpChannel::connect(&Endpoint::new(host, port), &self.config)?;

        Ok(ScopeClient::with_receive_size(
            channel,
            self.config.receive_buffer_size,
        ))
    }
}

/// SCPI session with a Rigol DS1000Z oscilloscope.
///
/// The session owns its channel for its whole life. Every state-changing
/// command is followed by a `:SYST:ERR?` check, so a rejected command comes
/// back as [`ScopeError::InstrumentFault`]. The channel is closed by
/// [`ScopeClient::close`] or, failing that, when the session is dropped.
///
/// One command/response is in flight at a time; replies carry no correlation
/// id, so a session must not be shared between callers.
///
/// ```no_run
/// use rigol_scope::ScopeClient;
///
/// let mut scope = ScopeClient::new("10.0.0.17", 5555)?;
/// let identity = scope.handshake()?;
/// println!("Connected to {} {}", identity.name, identity.model);
///
/// scope.set_timebase(0.0005)?;
/// scope.set_rising_edge_trigger(1.0)?;
/// scope.set_single_shot()?;
///
/// let waveform = scope.read_waveform_data()?;
/// println!("{} samples", waveform.len());
/// scope.close()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct ScopeClient<C: ByteChannel = TcpChannel> {
    transport: LineTransport<C>,
    receive_size: usize,
    closed: bool,
}

impl ScopeClient<TcpChannel> {
    /// Connect with default timeouts.
    pub fn new(host: &str, port: u16) -> Result<Self, ScopeError> {
        Self::builder().host(host).port(port).build()
    }

    pub fn builder() -> ScopeClientBuilder {
        ScopeClientBuilder::default()
    }

    /// Connect to `endpoint` with the given configuration.
    pub fn open(endpoint: &Endpoint, config: ConnectionConfig) -> Result<Self, ScopeError> {
        Self::builder()
            .host(&endpoint.host)
            .port(endpoint.port)
            .config(config)
            .build()
    }
}

impl<C: ByteChannel> ScopeClient<C> {
    /// Wrap an already open channel.
    pub fn from_channel(channel: C) -> Self {
        Self::with_receive_size(channel, DEFAULT_RECEIVE_SIZE)
    }

    pub fn with_receive_size(channel: C, receive_size: usize) -> Self {
        Self {
            transport: LineTransport::new(channel),
            receive_size,
            closed: false,
        }
    }

    pub fn channel(&self) -> &C {
        self.transport.channel()
    }

    /// Close the channel. The session is consumed and cannot be reused.
    pub fn close(mut self) -> Result<(), ScopeError> {
        self.closed = true;
        self.transport.close()
    }

    /// Send a command and fail if the instrument's error queue reports a fault.
    pub fn execute_checked(&mut self, command: &str) -> Result<(), ScopeError> {
        self.transport.send(command)?;
        self.check_for_error()
    }

    /// Send a query, read its reply, then check the error queue.
    pub fn query_checked(&mut self, command: &str) -> Result<String, ScopeError> {
        let reply = self.query(command)?;
        self.check_for_error()?;
        Ok(reply)
    }

    /// Apply a full acquisition state: timebase, channel scale, trigger,
    /// horizontal position and vertical position, in that order.
    pub fn configure_acquisition(
        &mut self,
        settings: &AcquisitionSettings,
    ) -> Result<(), ScopeError> {
        debug!("Configuring acquisition: {settings:?}");
        self.set_timebase(settings.secs_per_div)?;
        self.set_channel_scale(settings.volts_per_div)?;
        self.set_rising_edge_trigger(settings.trigger_level)?;
        self.set_horizontal_position(settings.horizontal_position)?;
        self.set_vertical_position(settings.vertical_position)?;
        Ok(())
    }

    /// Send a query and read its reply without consulting the error queue.
    pub(crate) fn query(&mut self, command: &str) -> Result<String, ScopeError> {
        self.transport.send(command)?;
        self.transport.receive(self.receive_size)
    }

    fn check_for_error(&mut self) -> Result<(), ScopeError> {
        let reply = self.query(protocol::SYST_ERR)?;
        Protocol::check_error_reply(&reply)
    }
}

impl<C: ByteChannel> Drop for ScopeClient<C> {
    fn drop(&mut self) {
        if !self.closed {
            let _ = self.transport.close();
        }
    }
}
