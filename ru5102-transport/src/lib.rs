//! Transport layer for the RU5102 protocol
//!
//! Provides byte-stream access to readers over a serial port or any other
//! async stream.

pub mod error;
pub mod serial;
pub mod stream;

pub use error::{Error, Result};
pub use serial::SerialTransport;
pub use stream::StreamTransport;
pub use tokio_util::sync::CancellationToken;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Transport trait for different communication methods
///
/// A transport carries one exchange at a time. After an error or a
/// cancelled read the stream position is unknown and the transport should
/// be closed.
#[async_trait]
pub trait Transport: Send {
    /// Open the underlying port
    async fn open(&mut self) -> Result<()>;
    
    /// Close the underlying port
    async fn close(&mut self) -> Result<()>;
    
    /// Check if open
    fn is_open(&self) -> bool;
    
    /// Write all of `data`
    async fn send(&mut self, data: &[u8]) -> Result<()>;
    
    /// Fill `buf` completely, or fail if the stream ends or `cancel` fires
    async fn receive_exact(&mut self, buf: &mut [u8], cancel: &CancellationToken) -> Result<()>;
    
    /// Port identifier for logging
    fn port_name(&self) -> String;
}

/// Read until `buf` is full, aborting promptly on cancellation
pub(crate) async fn read_exact_cancellable<S>(
    stream: &mut S,
    buf: &mut [u8],
    cancel: &CancellationToken,
) -> Result<()>
where
    S: AsyncRead + Unpin + ?Sized,
{
    let mut filled = 0;
    
    while filled < buf.len() {
        let n = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            read = stream.read(&mut buf[filled..]) => read?,
        };
        
        if n == 0 {
            return Err(Error::ConnectionClosed);
        }
        filled += n;
    }
    
    Ok(())
}
