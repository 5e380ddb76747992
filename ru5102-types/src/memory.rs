//! Tag memory addressing and read results

use std::fmt;

use crate::error::{Error, Result};

/// Gen2 tag memory bank
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MemoryBank {
    Reserved = 0,
    Epc = 1,
    Tid = 2,
    User = 3,
}

impl MemoryBank {
    pub fn name(self) -> &'static str {
        match self {
            Self::Reserved => "Reserved",
            Self::Epc => "EPC",
            Self::Tid => "TID",
            Self::User => "User",
        }
    }
}

impl From<MemoryBank> for u8 {
    fn from(bank: MemoryBank) -> u8 {
        bank as u8
    }
}

impl TryFrom<u8> for MemoryBank {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Reserved),
            1 => Ok(Self::Epc),
            2 => Ok(Self::Tid),
            3 => Ok(Self::User),
            _ => Err(Error::Validation(format!("Invalid memory bank: {}", value))),
        }
    }
}

impl fmt::Display for MemoryBank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A region of tag memory
///
/// What the numbers mean depends on the request carrying the segment:
/// memory reads take `length` in bytes (must be a multiple of 4), while the
/// inventory TID override sends both values as raw single bytes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct AddressSegment {
    pub offset: usize,
    pub length: usize,
}

impl AddressSegment {
    /// TID window the reader uses when an inventory carries no override
    pub const DEFAULT_TID: Self = Self::new(2, 4);

    pub const fn new(offset: usize, length: usize) -> Self {
        Self { offset, length }
    }
}

impl fmt::Display for AddressSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.offset, self.length)
    }
}

/// Status byte of a memory read response
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ReadStatus {
    Success,
    /// Tag did not answer or refused the access
    Nak,
    /// Any other status code, kept as received
    Other(u8),
}

impl ReadStatus {
    pub const SUCCESS: u8 = 0x00;
    pub const NAK: u8 = 0xFC;

    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl From<u8> for ReadStatus {
    fn from(value: u8) -> Self {
        match value {
            Self::SUCCESS => Self::Success,
            Self::NAK => Self::Nak,
            other => Self::Other(other),
        }
    }
}

impl From<ReadStatus> for u8 {
    fn from(status: ReadStatus) -> u8 {
        match status {
            ReadStatus::Success => ReadStatus::SUCCESS,
            ReadStatus::Nak => ReadStatus::NAK,
            ReadStatus::Other(code) => code,
        }
    }
}

/// Parsed memory read response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryReadResult {
    pub status: ReadStatus,
    pub data: Vec<u8>,
}

impl MemoryReadResult {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Outcome of a memory read as returned to callers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadResult {
    pub success: bool,
    pub data: Vec<u8>,
}

impl From<MemoryReadResult> for ReadResult {
    fn from(result: MemoryReadResult) -> Self {
        Self {
            success: result.is_success(),
            data: result.data,
        }
    }
}

impl fmt::Display for ReadResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.success {
            write!(f, "Read {}", hex::encode_upper(&self.data))
        } else {
            f.write_str("Read NAK")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_memory_bank_conversion() {
        assert_eq!(u8::from(MemoryBank::Tid), 2);
        assert_eq!(MemoryBank::try_from(3).unwrap(), MemoryBank::User);
        assert!(MemoryBank::try_from(4).is_err());
    }

    #[test]
    fn test_read_status_from_byte() {
        assert_eq!(ReadStatus::from(0x00), ReadStatus::Success);
        assert_eq!(ReadStatus::from(0xFC), ReadStatus::Nak);
        assert_eq!(ReadStatus::from(0x0B), ReadStatus::Other(0x0B));
        assert_eq!(u8::from(ReadStatus::Other(0x0B)), 0x0B);
    }

    #[test]
    fn test_read_result_from_memory_read() {
        let result = ReadResult::from(MemoryReadResult {
            status: ReadStatus::Nak,
            data: vec![],
        });

        assert!(!result.success);
        assert_eq!(result.to_string(), "Read NAK");
    }

    #[test]
    fn test_read_result_display() {
        let result = ReadResult {
            success: true,
            data: vec![0xDE, 0xAD, 0xBE, 0xEF],
        };

        assert_eq!(result.to_string(), "Read DEADBEEF");
    }
}
