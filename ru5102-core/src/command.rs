//! RU5102 protocol command definitions

use std::fmt;

use crate::error::{Error, Result};

/// Protocol command codes
///
/// The reader echoes the request's command code in every response frame,
/// including each frame of a multi-frame inventory.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Command {
    /// Gen2 inventory
    Inventory = 0x01,

    /// Gen2 memory read
    ReadMemory = 0x02,

    /// Reader information
    GetReaderInformation = 0x21,
}

impl Command {
    /// Get command name
    pub fn name(self) -> &'static str {
        match self {
            Self::Inventory => "CMD_INVENTORY",
            Self::ReadMemory => "CMD_READ_DATA",
            Self::GetReaderInformation => "CMD_GET_READER_INFO",
        }
    }
}

impl From<Command> for u8 {
    fn from(cmd: Command) -> u8 {
        cmd as u8
    }
}

impl TryFrom<u8> for Command {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x01 => Ok(Self::Inventory),
            0x02 => Ok(Self::ReadMemory),
            0x21 => Ok(Self::GetReaderInformation),
            _ => Err(Error::UnknownCommand(value)),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:02X})", self.name(), *self as u8)
    }
}
