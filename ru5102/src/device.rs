//! High-level reader interface

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use ru5102_core::{GetReaderInformation, Inventory, ReadMemory};
use ru5102_transport::{SerialTransport, Transport};
use ru5102_types::{AddressSegment, MemoryBank, ReadResult, ReaderInfo};

use crate::channel::Channel;
use crate::config::DeviceConfig;
use crate::error::{Error, Result};

/// RU5102 reader
///
/// High-level interface for a Chafon RU5102 UHF RFID reader. A `Device`
/// owns its port exclusively and handles one operation at a time.
///
/// # Examples
///
/// ```no_run
/// use ru5102::{CancellationToken, Device, DeviceConfig};
///
/// #[tokio::main]
/// async fn main() -> ru5102::Result<()> {
///     let mut device = Device::connect(&DeviceConfig::new("/dev/ttyUSB0")).await?;
///     println!("Reader: {}", device.info());
///
///     let cancel = CancellationToken::new();
///     device.inventory(None, |tag| println!("{}", tag), &cancel).await?;
///
///     device.disconnect().await?;
///     Ok(())
/// }
/// ```
pub struct Device {
    channel: Channel,
    info: ReaderInfo,
}

impl Device {
    /// Open the serial port in `config` and identify the reader
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The port cannot be opened
    /// - The reader does not answer within `config.connect_timeout`
    /// - The reader answer is malformed or the reader lacks ISO 18000-6C
    ///
    /// The port is closed again on every error path.
    pub async fn connect(config: &DeviceConfig) -> Result<Self> {
        info!(
            "Connecting to reader 0x{:02X} on {} at {} baud...",
            config.address, config.port, config.baud_rate
        );

        let mut transport = SerialTransport::new(config.port.as_str(), config.baud_rate);
        transport.open().await?;

        Self::with_transport(Box::new(transport), config.address, config.connect_timeout).await
    }

    /// Identify the reader over an already open transport
    pub async fn with_transport(
        transport: Box<dyn Transport>,
        address: u8,
        timeout: Duration,
    ) -> Result<Self> {
        let mut channel = Channel::new(transport, address);
        let cancel = CancellationToken::new();

        let handshake = tokio::time::timeout(
            timeout,
            channel.send_receive(&GetReaderInformation, &cancel),
        )
        .await
        .unwrap_or(Err(Error::ConnectTimeout(timeout)));

        match handshake {
            Ok(info) => {
                info!("Connected to {}: {}", channel.port_name(), info);
                Ok(Self { channel, info })
            }
            Err(e) => {
                warn!("Handshake on {} failed: {}", channel.port_name(), e);
                if let Err(close_err) = channel.close().await {
                    warn!("Failed to close {}: {}", channel.port_name(), close_err);
                }
                Err(e)
            }
        }
    }

    /// Reader information captured at connect time
    pub fn info(&self) -> &ReaderInfo {
        &self.info
    }

    /// Reader address
    pub fn address(&self) -> u8 {
        self.channel.address()
    }

    /// Check if the reader can still be used
    pub fn is_connected(&self) -> bool {
        self.channel.is_usable()
    }

    /// Query reader information again and refresh the cached copy
    pub async fn get_reader_info(&mut self, cancel: &CancellationToken) -> Result<ReaderInfo> {
        let info = self.channel.send_receive(&GetReaderInformation, cancel).await?;
        self.info = info.clone();
        Ok(info)
    }

    /// Run one inventory scan, calling `on_tag` for every reported tag
    ///
    /// Tags are passed on in arrival order; a tag reported in several
    /// frames is passed on each time.
    pub async fn inventory<F>(
        &mut self,
        tid_address: Option<AddressSegment>,
        mut on_tag: F,
        cancel: &CancellationToken,
    ) -> Result<()>
    where
        F: FnMut(String) + Send,
    {
        debug!("Starting inventory (tid_address={:?})...", tid_address);

        self.channel
            .send_receive_until(
                &Inventory::new(tid_address),
                |batch| {
                    let more = !batch.scan_finished;
                    batch.tags.into_iter().for_each(&mut on_tag);
                    more
                },
                cancel,
            )
            .await
    }

    /// Run one inventory scan and collect every reported tag
    pub async fn inventory_tags(
        &mut self,
        tid_address: Option<AddressSegment>,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>> {
        let mut tags = Vec::new();
        self.inventory(tid_address, |tag| tags.push(tag), cancel).await?;

        debug!("Inventory found {} tags", tags.len());
        Ok(tags)
    }

    /// Read tag memory, reporting a NAK as `success == false`
    pub async fn try_read_memory(
        &mut self,
        tag: &str,
        password: u32,
        bank: MemoryBank,
        segment: AddressSegment,
        cancel: &CancellationToken,
    ) -> Result<ReadResult> {
        debug!("Reading {} bank at {} from tag {}...", bank, segment, tag);

        let request = ReadMemory::new(tag, password, bank, segment);
        let result = self.channel.send_receive(&request, cancel).await?;

        Ok(result.into())
    }

    /// Read tag memory
    ///
    /// # Errors
    ///
    /// Returns [`Error::Nak`] if the tag did not answer.
    pub async fn read_memory(
        &mut self,
        tag: &str,
        password: u32,
        bank: MemoryBank,
        segment: AddressSegment,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>> {
        let result = self
            .try_read_memory(tag, password, bank, segment, cancel)
            .await?;

        if !result.success {
            return Err(Error::Nak);
        }
        Ok(result.data)
    }

    /// Close the port
    pub async fn disconnect(mut self) -> Result<()> {
        info!("Disconnecting from {}...", self.channel.port_name());

        self.channel.close().await?;

        info!("Disconnected");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;
    use ru5102_core::{Command, Frame};
    use ru5102_transport::StreamTransport;
    use ru5102_types::{FirmwareVersion, FrequencyBand};
    use tokio::io::{duplex, AsyncReadExt, AsyncWriteExt, DuplexStream};

    const READER_INFO: [u8; 9] = [0x00, 0x01, 0x17, 0x08, 0x03, 0x3E, 0x00, 0x0D, 0x1E];
    const CONNECT_REQUEST: [u8; 5] = [0x04, 0x00, 0x21, 0xD9, 0x6A];

    fn response(command: Command, payload: &[u8]) -> Vec<u8> {
        Frame::with_payload(0x00, command, payload.to_vec())
            .encode()
            .unwrap()
            .to_vec()
    }

    async fn open(reader_info: &[u8]) -> (Result<Device>, DuplexStream) {
        let (client, mut reader) = duplex(1024);
        reader
            .write_all(&response(Command::GetReaderInformation, reader_info))
            .await
            .unwrap();

        let device = Device::with_transport(
            Box::new(StreamTransport::new("sim", client)),
            0x00,
            Duration::from_secs(1),
        )
        .await;

        let mut sent = [0u8; 5];
        reader.read_exact(&mut sent).await.unwrap();
        assert_eq!(sent, CONNECT_REQUEST);

        (device, reader)
    }

    async fn connected() -> (Device, DuplexStream) {
        let (device, reader) = open(&READER_INFO).await;
        (device.unwrap(), reader)
    }

    #[tokio::test]
    async fn test_device_connect() {
        let (device, _reader) = connected().await;
        let info = device.info();

        assert!(device.is_connected());
        assert_eq!(device.address(), 0x00);
        assert_eq!(info.firmware_version, FirmwareVersion::new(1, 23));
        assert_eq!(info.band, FrequencyBand::UserDefined);
        assert_eq!(info.min_frequency_mhz, 902.6);
        assert_eq!(info.power_dbm, 13);
        assert_eq!(info.inventory_scan_timeout, Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_device_connect_capability_error_closes_port() {
        let mut info = READER_INFO;
        info[4] = 0x01;
        let (device, mut reader) = open(&info).await;

        let err = device.err().expect("connect should fail");
        assert_eq!(err.kind(), ErrorKind::Capability);

        let mut rest = Vec::new();
        reader.read_to_end(&mut rest).await.unwrap();
        assert!(rest.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_device_connect_timeout() {
        let (client, _reader) = duplex(1024);

        let result = Device::with_transport(
            Box::new(StreamTransport::new("sim", client)),
            0x00,
            Duration::from_secs(5),
        )
        .await;

        assert!(matches!(result, Err(Error::ConnectTimeout(_))));
    }

    #[tokio::test]
    async fn test_device_connect_wrong_address() {
        let (client, mut reader) = duplex(1024);
        reader
            .write_all(&response(Command::GetReaderInformation, &READER_INFO))
            .await
            .unwrap();

        let result = Device::with_transport(
            Box::new(StreamTransport::new("sim", client)),
            0x05,
            Duration::from_secs(1),
        )
        .await;

        let err = result.err().expect("connect should fail");
        assert_eq!(err.kind(), ErrorKind::Framing);
    }

    #[tokio::test]
    async fn test_inventory_continuation() {
        let (mut device, mut reader) = connected().await;
        reader
            .write_all(&response(Command::Inventory, &[0x03, 0x01, 0x02, 0xE2, 0x00]))
            .await
            .unwrap();
        reader
            .write_all(&response(Command::Inventory, &[0xFB]))
            .await
            .unwrap();

        let cancel = CancellationToken::new();
        let mut seen = Vec::new();
        device
            .inventory(None, |tag| seen.push(tag), &cancel)
            .await
            .unwrap();

        assert_eq!(seen, vec!["E200".to_string()]);
    }

    #[tokio::test]
    async fn test_inventory_finished_without_tags() {
        let (mut device, mut reader) = connected().await;
        reader
            .write_all(&response(Command::Inventory, &[0x01, 0x00]))
            .await
            .unwrap();

        let cancel = CancellationToken::new();
        let mut calls = 0;
        device
            .inventory(None, |_| calls += 1, &cancel)
            .await
            .unwrap();

        assert_eq!(calls, 0);
    }

    #[tokio::test]
    async fn test_inventory_keeps_duplicates() {
        let (mut device, mut reader) = connected().await;
        reader
            .write_all(&response(Command::Inventory, &[0x03, 0x01, 0x02, 0xE2, 0x00]))
            .await
            .unwrap();
        reader
            .write_all(&response(
                Command::Inventory,
                &[0x01, 0x02, 0x02, 0xE2, 0x00, 0x02, 0x30, 0x00],
            ))
            .await
            .unwrap();

        let cancel = CancellationToken::new();
        let tags = device
            .inventory_tags(Some(AddressSegment::new(0, 6)), &cancel)
            .await
            .unwrap();

        assert_eq!(tags, vec!["E200", "E200", "3000"]);

        let mut sent = [0u8; 7];
        reader.read_exact(&mut sent).await.unwrap();
        assert_eq!(&sent[..5], &[0x06, 0x00, 0x01, 0x00, 0x06]);
    }

    #[tokio::test]
    async fn test_read_memory() {
        let (mut device, mut reader) = connected().await;
        reader
            .write_all(&response(Command::ReadMemory, &[0x00, 0xDE, 0xAD, 0xBE, 0xEF]))
            .await
            .unwrap();

        let cancel = CancellationToken::new();
        let result = device
            .try_read_memory("0001", 0, MemoryBank::Reserved, AddressSegment::new(4, 4), &cancel)
            .await
            .unwrap();

        assert_eq!(
            result,
            ReadResult {
                success: true,
                data: vec![0xDE, 0xAD, 0xBE, 0xEF],
            }
        );

        let mut sent = [0u8; 15];
        reader.read_exact(&mut sent).await.unwrap();
        assert_eq!(
            sent,
            [
                0x0E, 0x00, 0x02, 0x01, 0x00, 0x01, 0x00, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00,
                0xC0, 0x1D
            ]
        );
    }

    #[tokio::test]
    async fn test_read_memory_nak() {
        let (mut device, mut reader) = connected().await;
        let nak = response(Command::ReadMemory, &[0xFC]);
        reader.write_all(&nak).await.unwrap();
        reader.write_all(&nak).await.unwrap();

        let cancel = CancellationToken::new();
        let segment = AddressSegment::new(0, 4);

        let result = device
            .try_read_memory("E200", 0, MemoryBank::Tid, segment, &cancel)
            .await
            .unwrap();
        assert!(!result.success);

        let err = device
            .read_memory("E200", 0, MemoryBank::Tid, segment, &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Nak));
        assert!(!err.requires_reconnect());
        assert!(device.is_connected());
    }

    #[tokio::test]
    async fn test_read_memory_invalid_segment() {
        let (mut device, _reader) = connected().await;
        let cancel = CancellationToken::new();

        let err = device
            .read_memory("E200", 0, MemoryBank::User, AddressSegment::new(0, 3), &cancel)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Encoding);
        assert!(device.is_connected());
    }

    #[tokio::test]
    async fn test_disconnect_closes_port() {
        let (device, mut reader) = connected().await;

        device.disconnect().await.unwrap();

        let mut rest = Vec::new();
        reader.read_to_end(&mut rest).await.unwrap();
        assert!(rest.is_empty());
    }
}
