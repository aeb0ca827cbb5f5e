use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};

use log::{debug, warn};

use super::client::ConnectionConfig;
use crate::error::ScopeError;
use crate::types::Endpoint;

/// Duplex byte stream to an instrument.
///
/// Implementations perform a single blocking operation per call. Timeouts, if
/// any, are the implementation's business.
pub trait ByteChannel {
    fn send(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Read at most `max_bytes` in one call. An empty vector means the peer closed.
    fn receive(&mut self, max_bytes: usize) -> io::Result<Vec<u8>>;

    fn close(&mut self) -> io::Result<()>;
}

/// [`ByteChannel`] over a plain TCP socket (Rigol LAN port, usually 5555).
pub struct TcpChannel {
    stream: TcpStream,
    endpoint: Endpoint,
}

impl TcpChannel {
    pub fn connect(endpoint: &Endpoint, config: &ConnectionConfig) -> Result<Self, ScopeError> {
        let address = endpoint.to_string();

        let socket_addr: SocketAddr = (endpoint.host.as_str(), endpoint.port)
            .to_socket_addrs()
            .map_err(|e| {
                warn!("Failed to resolve {address}: {e}");
                ScopeError::Connection {
                    address: address.clone(),
                    source: e,
                }
            })?
            .next()
            .ok_or_else(|| ScopeError::InvalidAddress(address.clone()))?;

        debug!("Connecting to {address}");

        let stream = TcpStream::connect_timeout(&socket_addr, config.connect_timeout)
            .map_err(|e| {
                warn!("Failed to connect to {address}: {e}");
                ScopeError::Connection {
                    address: address.clone(),
                    source: e,
                }
            })?;

        let with_address = |source| ScopeError::Connection {
            address: address.clone(),
            source,
        };
        stream
            .set_read_timeout(Some(config.read_timeout))
            .map_err(with_address)?;
        stream
            .set_write_timeout(Some(config.write_timeout))
            .map_err(with_address)?;
        stream.set_nodelay(true).map_err(with_address)?;

        debug!("Connected to {address}");

        Ok(Self {
            stream,
            endpoint: endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

impl ByteChannel for TcpChannel {
    fn send(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.stream.write_all(bytes)?;
        self.stream.flush()
    }

    fn receive(&mut self, max_bytes: usize) -> io::Result<Vec<u8>> {
        let mut buf = vec![0u8; max_bytes];
        let n = self.stream.read(&mut buf)?;
        buf.truncate(n);
        Ok(buf)
    }

    fn close(&mut self) -> io::Result<()> {
        let result = match self.stream.shutdown(Shutdown::Both) {
            Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(()),
            other => other,
        };
        debug!("Connection to {} closed", self.endpoint);
        result
    }
}
