//! # ru5102-core
//!
//! Core protocol implementation for Chafon RU5102 UHF RFID readers.
//!
//! This crate provides the low-level protocol primitives:
//! - Frame structure and encoding/decoding
//! - CRC-16 calculation
//! - Command definitions and their payload formats
//! - Protocol constants

pub mod command;
pub mod constants;
pub mod crc;
pub mod error;
pub mod frame;
pub mod request;

pub use command::Command;
pub use error::{Error, ErrorKind, Result};
pub use frame::{Frame, FrameHeader};
pub use request::{GetReaderInformation, Inventory, ReadMemory, Request};
