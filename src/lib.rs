pub mod error;
pub mod export;
pub mod plotting;
pub mod scope;
pub mod types;

pub use error::ScopeError;
pub use export::save_waveform;
pub use plotting::plot_waveform;
pub use scope::{
    ByteChannel, ConnectionConfig, LineTransport, Protocol, ScopeClient, ScopeClientBuilder,
    TcpChannel,
};
pub use types::{
    AcquisitionSettings, AxisLimits, Endpoint, Identity, SystemError, WaveformPreamble,
    WaveformResult,
};
