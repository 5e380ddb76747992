//! Request/response exchange over a transport
//!
//! A channel carries one exchange at a time: it writes a request frame once,
//! then reads one or more response frames that must carry the channel's
//! device address and the request's command code.

use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use ru5102_core::{Frame, FrameHeader, Request};
use ru5102_transport::Transport;

use crate::error::{Error, Result};

/// Exclusive link to one reader address
///
/// There is no way to resynchronise on a byte stream, so once an exchange
/// fails after its request went out the channel refuses further use.
pub struct Channel {
    transport: Box<dyn Transport>,
    address: u8,
    broken: bool,
}

impl Channel {
    pub fn new(transport: Box<dyn Transport>, address: u8) -> Self {
        Self {
            transport,
            address,
            broken: false,
        }
    }

    /// Device address every response must carry
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Check if an earlier failure left the stream at an unknown position
    pub fn is_broken(&self) -> bool {
        self.broken
    }

    /// Check if the channel can still carry exchanges
    pub fn is_usable(&self) -> bool {
        !self.broken && self.transport.is_open()
    }

    pub fn port_name(&self) -> String {
        self.transport.port_name()
    }

    /// Close the underlying transport
    pub async fn close(&mut self) -> Result<()> {
        self.transport.close().await?;
        Ok(())
    }

    /// Send `request` and read exactly one response
    pub async fn send_receive<R: Request>(
        &mut self,
        request: &R,
        cancel: &CancellationToken,
    ) -> Result<R::Response> {
        let frame = self.prepare(request)?;

        let result = self.exchange(&frame, request, cancel).await;
        self.latch(result)
    }

    /// Send `request` once, then read responses until `should_continue`
    /// returns `false`
    ///
    /// Responses are handed over strictly in arrival order.
    pub async fn send_receive_until<R, F>(
        &mut self,
        request: &R,
        should_continue: F,
        cancel: &CancellationToken,
    ) -> Result<()>
    where
        R: Request,
        F: FnMut(R::Response) -> bool + Send,
    {
        let frame = self.prepare(request)?;

        let result = self.exchange_until(&frame, request, should_continue, cancel).await;
        self.latch(result)
    }

    fn prepare<R: Request>(&self, request: &R) -> Result<Frame> {
        if self.broken {
            return Err(Error::ChannelBroken);
        }

        Ok(request.to_frame(self.address)?)
    }

    async fn exchange<R: Request>(
        &mut self,
        frame: &Frame,
        request: &R,
        cancel: &CancellationToken,
    ) -> Result<R::Response> {
        self.write_frame(frame).await?;
        self.read_response(request, cancel).await
    }

    async fn exchange_until<R, F>(
        &mut self,
        frame: &Frame,
        request: &R,
        mut should_continue: F,
        cancel: &CancellationToken,
    ) -> Result<()>
    where
        R: Request,
        F: FnMut(R::Response) -> bool + Send,
    {
        self.write_frame(frame).await?;

        let mut responses = 0usize;
        loop {
            let response = self.read_response(request, cancel).await?;
            responses += 1;

            if !should_continue(response) {
                break;
            }
        }

        debug!(command = %R::COMMAND, responses, "Exchange complete");
        Ok(())
    }

    async fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        trace!("Sending: {:?}", frame);

        let data = frame.encode()?;
        self.transport.send(&data).await?;

        Ok(())
    }

    async fn read_response<R: Request>(
        &mut self,
        request: &R,
        cancel: &CancellationToken,
    ) -> Result<R::Response> {
        let mut header = [0u8; FrameHeader::SIZE];
        self.transport.receive_exact(&mut header, cancel).await?;

        let header = FrameHeader::from_bytes(header);
        header.validate(self.address, R::COMMAND)?;
        request.validate_response_size(header.payload_len()?)?;

        let mut buf = vec![0u8; header.frame_len()];
        buf[..FrameHeader::SIZE].copy_from_slice(&header.to_bytes());
        self.transport
            .receive_exact(&mut buf[FrameHeader::SIZE..], cancel)
            .await?;

        let frame = Frame::decode(&buf, self.address, R::COMMAND)?;

        trace!("Received: {:?}", frame);

        Ok(request.parse_response(&frame.payload)?)
    }

    fn latch<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            if !self.broken {
                warn!("Exchange on {} failed, channel unusable: {}", self.port_name(), e);
            }
            self.broken = true;
        }
        result
    }
}
