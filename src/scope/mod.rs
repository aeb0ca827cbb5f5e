pub mod channel;
pub mod client;
pub mod protocol;
pub mod transport;

#[cfg(test)]
pub(crate) mod mock;

pub use channel::{ByteChannel, TcpChannel};
pub use client::{ConnectionConfig, ScopeClient, ScopeClientBuilder};
pub use protocol::Protocol;
pub use transport::{LineTransport, DEFAULT_RECEIVE_SIZE};
