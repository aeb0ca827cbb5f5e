use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScopeError {
    #[error("Could not connect on {address}: {source}")]
    Connection {
        address: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Transport error ({context}): {source}")]
    Transport {
        context: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Scope returned an error. The code was: {code}. The message was: {message}")]
    InstrumentFault { code: i32, message: String },
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    #[error("Export error: {0}")]
    Export(String),
}

impl ScopeError {
    pub(crate) fn transport(context: impl Into<String>, source: std::io::Error) -> Self {
        ScopeError::Transport {
            context: context.into(),
            source,
        }
    }

    /// Process exit code used by the command line front end.
    pub fn exit_code(&self) -> i32 {
        match self {
            ScopeError::Connection { .. } => 2,
            ScopeError::Transport { .. } => 3,
            ScopeError::InstrumentFault { .. } => 4,
            ScopeError::MalformedResponse(_) => 5,
            ScopeError::Validation(_) => 6,
            _ => 1,
        }
    }
}
