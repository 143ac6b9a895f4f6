use thiserror::Error;

#[derive(Error, Debug)]
pub enum PeerscopeError {
    #[error("error opening database: {0}")]
    Database(#[from] maxminddb::MaxMindDBError),

    #[error("dial: {0}")]
    Connect(String),

    #[error("error reading message: {0}")]
    Transport(String),

    #[error("feed closed the session")]
    SessionClosed,

    #[error("error decoding message: {0}")]
    Decode(String),

    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    #[error("invalid feed endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("failed to install signal handler: {0}")]
    Signal(std::io::Error),

    #[error("error opening log file: {0}")]
    LogFile(std::io::Error),
}

impl From<url::ParseError> for PeerscopeError {
    fn from(err: url::ParseError) -> Self {
        PeerscopeError::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for PeerscopeError {
    fn from(err: serde_json::Error) -> Self {
        PeerscopeError::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PeerscopeError>;
