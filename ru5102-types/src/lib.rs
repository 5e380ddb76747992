//! Type definitions for ru5102

pub mod error;
pub mod inventory;
pub mod memory;
pub mod reader_info;

pub use error::{Error, Result};
pub use inventory::InventoryBatch;
pub use memory::{AddressSegment, MemoryBank, MemoryReadResult, ReadResult, ReadStatus};
pub use reader_info::{FirmwareVersion, FrequencyBand, ReaderInfo, TransceiverFlags};
