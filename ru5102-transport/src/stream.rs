//! Transport over an already connected async stream
//!
//! Useful for readers behind a TCP serial server, and for driving the
//! protocol against an in-memory pipe.

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::{debug, trace};

use crate::{error::*, read_exact_cancellable, CancellationToken, Transport};

/// Transport wrapping any `AsyncRead + AsyncWrite` stream
///
/// The stream is supplied open; once closed it cannot be reopened.
pub struct StreamTransport<S> {
    name: String,
    stream: Option<S>,
}

impl<S> StreamTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Wrap an open stream, `name` is used in logs
    pub fn new(name: impl Into<String>, stream: S) -> Self {
        Self {
            name: name.into(),
            stream: Some(stream),
        }
    }

    /// Give back the stream if still open
    pub fn into_inner(mut self) -> Option<S> {
        self.stream.take()
    }
}

#[async_trait]
impl<S> Transport for StreamTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn open(&mut self) -> Result<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(Error::NotConnected)
        }
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(mut stream) = self.stream.take() {
            debug!("Closing {}...", self.name);
            let _ = stream.shutdown().await;
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    async fn send(&mut self, data: &[u8]) -> Result<()> {
        let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;

        trace!("Sending {} bytes to {}: {:02X?}", data.len(), self.name, data);

        stream.write_all(data).await?;
        stream.flush().await?;

        Ok(())
    }

    async fn receive_exact(&mut self, buf: &mut [u8], cancel: &CancellationToken) -> Result<()> {
        let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;

        read_exact_cancellable(stream, buf, cancel).await?;

        trace!("Received {} bytes from {}: {:02X?}", buf.len(), self.name, buf);

        Ok(())
    }

    fn port_name(&self) -> String {
        self.name.clone()
    }
}
