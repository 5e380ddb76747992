//! RU5102 protocol frame structure and encoding/decoding

use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;
use tracing::trace;

use crate::{
    command::Command,
    crc,
    error::{Error, Result},
};

/// First three bytes of every frame
///
/// Read on its own so the command can vet the payload size before the
/// rest of the frame is pulled off the wire.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FrameHeader {
    /// Bytes following the length byte (address, command, payload, CRC)
    pub length: u8,

    /// Device address
    pub address: u8,

    /// Raw command code
    pub command: u8,
}

impl FrameHeader {
    /// Header size in bytes
    pub const SIZE: usize = 3;

    pub fn from_bytes(bytes: [u8; Self::SIZE]) -> Self {
        Self {
            length: bytes[0],
            address: bytes[1],
            command: bytes[2],
        }
    }

    pub fn to_bytes(self) -> [u8; Self::SIZE] {
        [self.length, self.address, self.command]
    }

    /// Check the header answers `command` sent to `address`
    pub fn validate(&self, address: u8, command: Command) -> Result<()> {
        if self.address != address {
            return Err(Error::AddressMismatch {
                expected: address,
                actual: self.address,
            });
        }

        if self.command != u8::from(command) {
            return Err(Error::CommandMismatch {
                expected: command.into(),
                actual: self.command,
                length: self.length,
            });
        }

        Ok(())
    }

    /// Payload size announced by the length byte
    pub fn payload_len(&self) -> Result<usize> {
        usize::from(self.length)
            .checked_sub(Frame::OVERHEAD)
            .ok_or(Error::InvalidLength(self.length))
    }

    /// Size of the whole frame including the length byte
    pub fn frame_len(&self) -> usize {
        1 + usize::from(self.length)
    }
}

/// RU5102 protocol frame
///
/// # Frame Structure
///
/// ```text
/// ┌──────────┬──────────┬──────────┬─────────────┬──────────────┐
/// │  Length  │ Address  │ Command  │   Payload   │    CRC-16    │
/// │  1 byte  │  1 byte  │  1 byte  │   N bytes   │   2 bytes    │
/// │          │          │          │             │  (LE u16)    │
/// └──────────┴──────────┴──────────┴─────────────┴──────────────┘
/// ```
///
/// `Length` counts every byte after itself, so `Length = N + 4`. The CRC
/// covers the length byte through the end of the payload. Requests and
/// responses share this layout.
///
/// # Examples
///
/// ```
/// use ru5102_core::{Command, Frame};
///
/// let frame = Frame::new(0x00, Command::GetReaderInformation);
/// let encoded = frame.encode().unwrap();
/// assert_eq!(&encoded[..], &[0x04, 0x00, 0x21, 0xD9, 0x6A]);
///
/// let decoded = Frame::decode(&encoded, 0x00, Command::GetReaderInformation).unwrap();
/// assert_eq!(frame, decoded);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    /// Device address
    pub address: u8,

    /// Command code
    pub command: Command,

    /// Command-specific data
    pub payload: Bytes,
}

impl Frame {
    /// CRC size in bytes
    pub const CRC_SIZE: usize = 2;

    /// Bytes counted by the length byte besides the payload
    pub const OVERHEAD: usize = 2 + Self::CRC_SIZE;

    /// Largest payload the length byte can describe
    pub const MAX_PAYLOAD_SIZE: usize = u8::MAX as usize - Self::OVERHEAD;

    /// Smallest valid frame (no payload)
    pub const MIN_SIZE: usize = 1 + Self::OVERHEAD;

    /// Create a new frame with empty payload
    pub fn new(address: u8, command: Command) -> Self {
        Self {
            address,
            command,
            payload: Bytes::new(),
        }
    }

    /// Create a frame with payload
    pub fn with_payload(address: u8, command: Command, payload: impl Into<Bytes>) -> Self {
        Self {
            address,
            command,
            payload: payload.into(),
        }
    }

    /// Value of the length byte for this frame
    pub fn length_byte(&self) -> Result<u8> {
        if self.payload.len() > Self::MAX_PAYLOAD_SIZE {
            return Err(Error::PayloadTooLarge {
                size: self.payload.len(),
                max: Self::MAX_PAYLOAD_SIZE,
            });
        }

        Ok((self.payload.len() + Self::OVERHEAD) as u8)
    }

    /// Encode frame to bytes
    ///
    /// # Errors
    ///
    /// Returns [`Error::PayloadTooLarge`] if the payload does not fit the
    /// length byte.
    pub fn encode(&self) -> Result<BytesMut> {
        let length = self.length_byte()?;
        let mut buf = BytesMut::with_capacity(self.size());

        buf.put_u8(length);
        buf.put_u8(self.address);
        buf.put_u8(self.command.into());
        buf.put_slice(&self.payload);

        let crc = crc::calculate(&buf);
        buf.put_u16_le(crc);

        trace!(
            command = %self.command,
            address = self.address,
            crc = format!("0x{:04X}", crc),
            "Encoded frame"
        );

        Ok(buf)
    }

    /// Decode a complete frame answering `command` from `address`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Buffer is shorter than the smallest frame
    /// - Address or command do not match
    /// - Length byte disagrees with the buffer size
    /// - CRC check fails
    pub fn decode(buf: &[u8], address: u8, command: Command) -> Result<Self> {
        if buf.len() < Self::MIN_SIZE {
            return Err(Error::Truncated {
                command,
                field: "frame header",
            });
        }

        let header = FrameHeader::from_bytes([buf[0], buf[1], buf[2]]);
        header.validate(address, command)?;
        let payload_len = header.payload_len()?;

        if header.frame_len() != buf.len() {
            return Err(Error::InvalidLength(header.length));
        }

        crc::verify(buf).map_err(|residue| Error::ChecksumMismatch {
            residue,
            frame: hex::encode_upper(buf),
        })?;

        let start = FrameHeader::SIZE;
        let payload = Bytes::copy_from_slice(&buf[start..start + payload_len]);

        Ok(Self {
            address,
            command,
            payload,
        })
    }

    /// Get total frame size
    pub fn size(&self) -> usize {
        1 + Self::OVERHEAD + self.payload.len()
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("address", &format!("0x{:02X}", self.address))
            .field("command", &self.command)
            .field("payload", &hex::encode_upper(&self.payload))
            .finish()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Frame[{}](address=0x{:02X}, len={})",
            self.command,
            self.address,
            self.payload.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    const READER_INFO_FRAME: [u8; 14] = [
        0x0D, 0x00, 0x21, 0x00, 0x01, 0x17, 0x08, 0x03, 0x3E, 0x00, 0x0D, 0x1E, 0xB1, 0xF1,
    ];

    #[test]
    fn test_frame_encode_empty() {
        let frame = Frame::new(0x00, Command::Inventory);
        let encoded = frame.encode().unwrap();

        assert_eq!(encoded.to_vec(), vec![0x04, 0x00, 0x01, 0xDB, 0x4B]);
        assert_eq!(encoded.len(), Frame::MIN_SIZE);
    }

    #[test]
    fn test_frame_encode_read_request() {
        let payload = vec![0x01, 0x00, 0x01, 0x00, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00];
        let frame = Frame::with_payload(0x00, Command::ReadMemory, payload);

        assert_eq!(
            frame.encode().unwrap().to_vec(),
            vec![
                0x0E, 0x00, 0x02, 0x01, 0x00, 0x01, 0x00, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00,
                0xC0, 0x1D
            ]
        );
    }

    #[test]
    fn test_frame_decode_captured() {
        let frame = Frame::decode(&READER_INFO_FRAME, 0x00, Command::GetReaderInformation).unwrap();

        assert_eq!(frame.address, 0x00);
        assert_eq!(frame.command, Command::GetReaderInformation);
        assert_eq!(
            frame.payload.as_ref(),
            &[0x00, 0x01, 0x17, 0x08, 0x03, 0x3E, 0x00, 0x0D, 0x1E]
        );
    }

    #[test]
    fn test_frame_decode_wrong_address() {
        let result = Frame::decode(&READER_INFO_FRAME, 0x01, Command::GetReaderInformation);

        assert!(matches!(
            result,
            Err(Error::AddressMismatch { expected: 0x01, actual: 0x00 })
        ));
    }

    #[test]
    fn test_frame_decode_wrong_command() {
        let result = Frame::decode(&READER_INFO_FRAME, 0x00, Command::Inventory);

        assert!(matches!(
            result,
            Err(Error::CommandMismatch { expected: 0x01, actual: 0x21, length: 0x0D })
        ));
    }

    #[test]
    fn test_frame_checksum_verification() {
        let mut corrupted = READER_INFO_FRAME;
        corrupted[5] ^= 0xFF;

        let result = Frame::decode(&corrupted, 0x00, Command::GetReaderInformation);
        assert!(matches!(result, Err(Error::ChecksumMismatch { .. })));
    }

    #[test]
    fn test_frame_too_short() {
        let result = Frame::decode(&[0x04, 0x00, 0x21], 0x00, Command::GetReaderInformation);
        assert!(matches!(result, Err(Error::Truncated { .. })));
    }

    #[test]
    fn test_frame_length_disagrees_with_buffer() {
        let mut buf = Frame::new(0x00, Command::Inventory).encode().unwrap().to_vec();
        buf.push(0x00);

        let result = Frame::decode(&buf, 0x00, Command::Inventory);
        assert!(matches!(result, Err(Error::InvalidLength(0x04))));
    }

    #[test]
    fn test_frame_payload_too_large() {
        let frame = Frame::with_payload(0x00, Command::Inventory, vec![0u8; 252]);
        assert!(matches!(
            frame.encode(),
            Err(Error::PayloadTooLarge { size: 252, max: 251 })
        ));

        let frame = Frame::with_payload(0x00, Command::Inventory, vec![0u8; 251]);
        assert_eq!(frame.encode().unwrap()[0], 0xFF);
    }

    #[test]
    fn test_header_payload_len() {
        let header = FrameHeader::from_bytes([0x0D, 0x00, 0x21]);
        assert_eq!(header.payload_len().unwrap(), 9);
        assert_eq!(header.frame_len(), 14);

        let header = FrameHeader::from_bytes([0x03, 0x00, 0x21]);
        assert!(matches!(header.payload_len(), Err(Error::InvalidLength(0x03))));
    }

    proptest! {
        #[test]
        fn prop_encoded_frame_crc_residue_is_zero(
            address in any::<u8>(),
            payload in proptest::collection::vec(any::<u8>(), 0..=Frame::MAX_PAYLOAD_SIZE),
        ) {
            let frame = Frame::with_payload(address, Command::Inventory, payload);
            let encoded = frame.encode().unwrap();

            prop_assert_eq!(crc::calculate(&encoded), 0);
            prop_assert_eq!(encoded.len(), frame.size());

            let decoded = Frame::decode(&encoded, address, Command::Inventory).unwrap();
            prop_assert_eq!(decoded, frame);
        }

        #[test]
        fn prop_encoding_is_deterministic(
            payload in proptest::collection::vec(any::<u8>(), 0..32),
        ) {
            let frame = Frame::with_payload(0x00, Command::ReadMemory, payload);
            prop_assert_eq!(frame.encode().unwrap(), frame.encode().unwrap());
        }
    }
}
