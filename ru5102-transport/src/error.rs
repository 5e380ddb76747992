//! Transport errors

use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Not connected")]
    NotConnected,
    
    #[error("Already connected")]
    AlreadyConnected,
    
    #[error("Failed to open {port}: {reason}")]
    Open {
        port: String,
        reason: String,
    },
    
    #[error("Connection closed by remote")]
    ConnectionClosed,
    
    #[error("Read cancelled")]
    Cancelled,
    
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Check if the caller aborted the operation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
