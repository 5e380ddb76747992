//! High-level error types

pub type Result<T> = std::result::Result<T, Error>;

/// Failure classes surfaced to callers
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Framing,
    Checksum,
    Capability,
    Encoding,
    Transport,
    Cancelled,
    Nak,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Core protocol error: {0}")]
    Core(#[from] ru5102_core::Error),
    
    #[error("Transport error: {0}")]
    Transport(#[from] ru5102_transport::Error),
    
    #[error("Reader did not answer within {0:?}")]
    ConnectTimeout(std::time::Duration),
    
    #[error("Channel is broken by an earlier failure - reconnect to the reader")]
    ChannelBroken,
    
    #[error("Tag did not respond")]
    Nak,
}

impl Error {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        use ru5102_core::ErrorKind as Core;
        
        match self {
            Self::Core(e) => match e.kind() {
                Core::Framing => ErrorKind::Framing,
                Core::Checksum => ErrorKind::Checksum,
                Core::Capability => ErrorKind::Capability,
                Core::Encoding => ErrorKind::Encoding,
            },
            Self::Transport(e) if e.is_cancelled() => ErrorKind::Cancelled,
            Self::Transport(_) | Self::ConnectTimeout(_) | Self::ChannelBroken => {
                ErrorKind::Transport
            }
            Self::Nak => ErrorKind::Nak,
        }
    }
    
    /// Check if the caller aborted the operation
    pub fn is_cancelled(&self) -> bool {
        self.kind() == ErrorKind::Cancelled
    }
    
    /// Check if the connection must be discarded and reopened
    pub fn requires_reconnect(&self) -> bool {
        !matches!(self.kind(), ErrorKind::Encoding | ErrorKind::Nak)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_cancelled_is_distinct_from_transport() {
        let cancelled = Error::from(ru5102_transport::Error::Cancelled);
        let closed = Error::from(ru5102_transport::Error::ConnectionClosed);
        
        assert!(cancelled.is_cancelled());
        assert_eq!(closed.kind(), ErrorKind::Transport);
        assert!(!closed.is_cancelled());
    }
    
    #[test]
    fn test_requires_reconnect() {
        assert!(Error::ChannelBroken.requires_reconnect());
        assert!(Error::from(ru5102_core::Error::InvalidBand(5)).requires_reconnect());
        assert!(!Error::from(ru5102_core::Error::OddTagLength(3)).requires_reconnect());
        assert!(!Error::Nak.requires_reconnect());
    }
}
