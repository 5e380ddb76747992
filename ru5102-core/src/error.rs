//! Error types for ru5102-core

use crate::command::Command;

/// Result type alias for ru5102 operations
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classes of protocol failure
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Response frame or payload is malformed
    Framing,

    /// Frame CRC did not check
    Checksum,

    /// Reader lacks a required feature
    Capability,

    /// Request cannot be expressed on the wire
    Encoding,
}

/// Core protocol errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Response came from another device address
    #[error("Unexpected address: expected 0x{expected:02X}, received 0x{actual:02X}")]
    AddressMismatch {
        expected: u8,
        actual: u8,
    },

    /// Response answers a different command
    #[error("Expected response for command 0x{expected:02X} but received {length} bytes with command 0x{actual:02X}")]
    CommandMismatch {
        expected: u8,
        actual: u8,
        length: u8,
    },

    /// Length byte too small to hold address, command and CRC
    #[error("Invalid frame length: {0}")]
    InvalidLength(u8),

    /// Payload size not accepted by the command
    #[error("Unexpected response size for {command}: expected {expected}, got {actual} bytes")]
    UnexpectedResponseSize {
        command: Command,
        expected: &'static str,
        actual: usize,
    },

    /// Payload ended before a field was complete
    #[error("Truncated {command} response: {field} missing")]
    Truncated {
        command: Command,
        field: &'static str,
    },

    /// Bytes left over after the last field
    #[error("Unexpected data after {command} response: {data}")]
    TrailingData {
        command: Command,
        data: String,
    },

    /// Inventory response subtype not recognised
    #[error("Unexpected inventory subtype 0x{0:02X}")]
    UnexpectedSubtype(u8),

    /// Reserved byte not zero
    #[error("Unexpected reserved value {0}")]
    InvalidReserved(u8),

    /// Frequency band outside the band table
    #[error("Invalid band {0}")]
    InvalidBand(u8),

    /// Unknown command code
    #[error("Unknown command code: 0x{0:02X}")]
    UnknownCommand(u8),

    /// CRC over the whole frame left a nonzero residue
    #[error("Unexpected CRC (residue 0x{residue:04X}) on frame {frame}")]
    ChecksumMismatch {
        residue: u16,
        frame: String,
    },

    /// Reader cannot talk to ISO 18000-6C tags
    #[error("Reader does not support ISO 18000-6B or 6C (transceiver flags 0x{flags:02X})")]
    UnsupportedTagProtocol {
        flags: u8,
    },

    /// Tag ID is not valid hex
    #[error("Invalid tag ID {tag:?}: {reason}")]
    InvalidTagId {
        tag: String,
        reason: String,
    },

    /// Tag ID does not fill whole 16-bit words
    #[error("Tag ID must be a two-byte multiple, got {0} bytes")]
    OddTagLength(usize),

    /// Memory segment length is not a whole number of words
    #[error("Segment length must be a multiple of 4, got {0}")]
    SegmentNotWordAligned(usize),

    /// Value does not fit its single-byte field
    #[error("{field} value {value} does not fit in one byte")]
    ValueOverflow {
        field: &'static str,
        value: usize,
    },

    /// Payload too large for the length byte
    #[error("Payload too large: {size} bytes (max: {max} bytes)")]
    PayloadTooLarge {
        size: usize,
        max: usize,
    },
}

impl Error {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ChecksumMismatch { .. } => ErrorKind::Checksum,
            Self::UnsupportedTagProtocol { .. } => ErrorKind::Capability,
            Self::InvalidTagId { .. }
            | Self::OddTagLength(_)
            | Self::SegmentNotWordAligned(_)
            | Self::ValueOverflow { .. }
            | Self::PayloadTooLarge { .. } => ErrorKind::Encoding,
            _ => ErrorKind::Framing,
        }
    }

    /// Check if the error was raised before anything was sent
    pub fn is_encoding(&self) -> bool {
        self.kind() == ErrorKind::Encoding
    }
}
