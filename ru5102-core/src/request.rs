//! Requests and their response formats
//!
//! Each request type knows its command code, how to lay out its payload and
//! how to turn the payload of the matching response into a typed value.

use std::fmt;

use bytes::{BufMut, BytesMut};
use tracing::trace;

use ru5102_types::{
    AddressSegment, FirmwareVersion, FrequencyBand, InventoryBatch, MemoryBank, MemoryReadResult,
    ReadStatus, ReaderInfo, TransceiverFlags,
};

use crate::{
    command::Command,
    constants::{self, inventory},
    error::{Error, Result},
    frame::Frame,
};

/// A request with a typed response
pub trait Request: fmt::Debug + Send + Sync {
    /// Parsed response type
    type Response: fmt::Debug + Send;

    /// Command code shared by the request and its responses
    const COMMAND: Command;

    /// Write the request payload (none by default)
    fn encode_payload(&self, _buf: &mut BytesMut) -> Result<()> {
        Ok(())
    }

    /// Vet the announced response payload size before it is read
    fn validate_response_size(&self, _size: usize) -> Result<()> {
        Ok(())
    }

    /// Parse a response payload
    fn parse_response(&self, payload: &[u8]) -> Result<Self::Response>;

    /// Build the request frame for the reader at `address`
    fn to_frame(&self, address: u8) -> Result<Frame> {
        let mut payload = BytesMut::new();
        self.encode_payload(&mut payload)?;

        Ok(Frame::with_payload(address, Self::COMMAND, payload.freeze()))
    }
}

/// Sequential reader over a response payload
struct PayloadReader<'a> {
    command: Command,
    data: &'a [u8],
}

impl<'a> PayloadReader<'a> {
    fn new(command: Command, data: &'a [u8]) -> Self {
        Self { command, data }
    }

    fn u8(&mut self, field: &'static str) -> Result<u8> {
        let (&value, rest) = self.data.split_first().ok_or(Error::Truncated {
            command: self.command,
            field,
        })?;
        self.data = rest;
        Ok(value)
    }

    fn bytes(&mut self, len: usize, field: &'static str) -> Result<&'a [u8]> {
        if self.data.len() < len {
            return Err(Error::Truncated {
                command: self.command,
                field,
            });
        }
        let (head, rest) = self.data.split_at(len);
        self.data = rest;
        Ok(head)
    }

    fn rest(self) -> &'a [u8] {
        self.data
    }

    fn finish(self) -> Result<()> {
        if self.data.is_empty() {
            Ok(())
        } else {
            Err(Error::TrailingData {
                command: self.command,
                data: hex::encode_upper(self.data),
            })
        }
    }
}

fn byte_field(field: &'static str, value: usize) -> Result<u8> {
    u8::try_from(value).map_err(|_| Error::ValueOverflow { field, value })
}

/// Query firmware version, RF band, power and scan time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetReaderInformation;

impl GetReaderInformation {
    /// Fixed response payload size
    pub const RESPONSE_SIZE: usize = 9;
}

impl Request for GetReaderInformation {
    type Response = ReaderInfo;
    const COMMAND: Command = Command::GetReaderInformation;

    fn validate_response_size(&self, size: usize) -> Result<()> {
        if size != Self::RESPONSE_SIZE {
            return Err(Error::UnexpectedResponseSize {
                command: Self::COMMAND,
                expected: "exactly 9",
                actual: size,
            });
        }
        Ok(())
    }

    fn parse_response(&self, payload: &[u8]) -> Result<ReaderInfo> {
        self.validate_response_size(payload.len())?;
        let mut reader = PayloadReader::new(Self::COMMAND, payload);

        let reserved = reader.u8("reserved")?;
        if reserved != 0 {
            return Err(Error::InvalidReserved(reserved));
        }

        let major = reader.u8("firmware major")?;
        let minor = reader.u8("firmware minor")?;
        let reader_type = reader.u8("reader type")?;

        let transceiver = TransceiverFlags::from_bits_retain(reader.u8("transceiver type")?);
        if !transceiver.contains(TransceiverFlags::ISO18000_6C) {
            return Err(Error::UnsupportedTagProtocol {
                flags: transceiver.bits(),
            });
        }

        // Band sits in the top two bits of both frequency bytes; the low six
        // bits are channel indices.
        let max_index = reader.u8("max frequency")?;
        let min_index = reader.u8("min frequency")?;
        let raw_band = ((max_index & 0xC0) >> 4) | (min_index >> 6);
        let band = FrequencyBand::try_from(raw_band).map_err(|_| Error::InvalidBand(raw_band))?;

        let power_dbm = reader.u8("power")?;
        let scan_time = reader.u8("scan time")?;
        reader.finish()?;

        let info = ReaderInfo {
            firmware_version: FirmwareVersion::new(major, minor),
            reader_type,
            transceiver,
            band,
            min_frequency_mhz: band.frequency_mhz(min_index & 0x3F),
            max_frequency_mhz: band.frequency_mhz(max_index & 0x3F),
            power_dbm,
            inventory_scan_timeout: constants::SCAN_TIME_UNIT * u32::from(scan_time),
        };

        trace!(?info, "Parsed reader information");

        Ok(info)
    }
}

/// Gen2 inventory
///
/// The reader answers with one or more frames; every frame but the last
/// reports `scan_finished == false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Inventory {
    /// TID window to report instead of the reader default (offset 2, 4 words)
    pub tid_address: Option<AddressSegment>,
}

impl Inventory {
    pub fn new(tid_address: Option<AddressSegment>) -> Self {
        Self { tid_address }
    }
}

impl Request for Inventory {
    type Response = InventoryBatch;
    const COMMAND: Command = Command::Inventory;

    fn encode_payload(&self, buf: &mut BytesMut) -> Result<()> {
        if let Some(tid) = self.tid_address {
            buf.put_u8(byte_field("TID offset", tid.offset)?);
            buf.put_u8(byte_field("TID length", tid.length)?);
        }
        Ok(())
    }

    fn parse_response(&self, payload: &[u8]) -> Result<InventoryBatch> {
        let mut reader = PayloadReader::new(Self::COMMAND, payload);

        match reader.u8("subtype")? {
            subtype @ (inventory::FINISHED
            | inventory::FINISHED_TIMEOUT
            | inventory::PARTIAL
            | inventory::PARTIAL_FULL) => {
                let count = reader.u8("tag count")?;
                let mut tags = Vec::with_capacity(usize::from(count));

                for _ in 0..count {
                    let len = reader.u8("tag length")?;
                    let id = reader.bytes(usize::from(len), "tag ID")?;
                    tags.push(hex::encode_upper(id));
                }
                reader.finish()?;

                Ok(InventoryBatch {
                    scan_finished: matches!(
                        subtype,
                        inventory::FINISHED | inventory::FINISHED_TIMEOUT
                    ),
                    tags,
                })
            }
            inventory::NO_TAG => {
                reader.finish()?;
                Ok(InventoryBatch::finished())
            }
            other => Err(Error::UnexpectedSubtype(other)),
        }
    }
}

/// Gen2 memory read from a single tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadMemory {
    /// EPC of the tag to address, as hex
    pub tag: String,

    /// Access password
    pub password: u32,

    /// Bank to read from
    pub bank: MemoryBank,

    /// Word offset and byte length (multiple of 4) to read
    pub segment: AddressSegment,
}

impl ReadMemory {
    pub fn new(
        tag: impl Into<String>,
        password: u32,
        bank: MemoryBank,
        segment: AddressSegment,
    ) -> Self {
        Self {
            tag: tag.into(),
            password,
            bank,
            segment,
        }
    }
}

impl Request for ReadMemory {
    type Response = MemoryReadResult;
    const COMMAND: Command = Command::ReadMemory;

    fn encode_payload(&self, buf: &mut BytesMut) -> Result<()> {
        let tag = hex::decode(&self.tag).map_err(|e| Error::InvalidTagId {
            tag: self.tag.clone(),
            reason: e.to_string(),
        })?;
        if tag.len() % 2 != 0 {
            return Err(Error::OddTagLength(tag.len()));
        }
        if self.segment.length % 4 != 0 {
            return Err(Error::SegmentNotWordAligned(self.segment.length));
        }

        buf.put_u8(byte_field("tag word count", tag.len() / 2)?);
        buf.put_slice(&tag);
        buf.put_u8(self.bank.into());
        buf.put_u8(byte_field("segment offset", self.segment.offset)?);
        buf.put_u8(byte_field("segment word count", self.segment.length / 4)?);
        buf.put_u32_le(self.password);

        Ok(())
    }

    fn validate_response_size(&self, size: usize) -> Result<()> {
        if size < 1 {
            return Err(Error::UnexpectedResponseSize {
                command: Self::COMMAND,
                expected: "at least 1",
                actual: size,
            });
        }
        Ok(())
    }

    fn parse_response(&self, payload: &[u8]) -> Result<MemoryReadResult> {
        let mut reader = PayloadReader::new(Self::COMMAND, payload);
        let status = ReadStatus::from(reader.u8("status")?);

        Ok(MemoryReadResult {
            status,
            data: reader.rest().to_vec(),
        })
    }
}
