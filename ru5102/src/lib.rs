//! # ru5102
//!
//! Rust driver for Chafon RU5102 UHF RFID readers.
//!
//! ## Features
//!
//! - Type-safe protocol implementation
//! - Async/await API using Tokio
//! - Cancellable reads
//! - Multi-frame inventory scans
//!
//! ## Quick Start
//!
//! ```no_run
//! use ru5102::{AddressSegment, CancellationToken, Device, DeviceConfig, MemoryBank};
//!
//! #[tokio::main]
//! async fn main() -> ru5102::Result<()> {
//!     // Connect to reader
//!     let mut device = Device::connect(&DeviceConfig::new("/dev/ttyUSB0")).await?;
//!     println!("{}", device.info());
//!     
//!     // Scan for tags
//!     let cancel = CancellationToken::new();
//!     let tags = device.inventory_tags(None, &cancel).await?;
//!     
//!     // Read the kill and access passwords of the first tag
//!     if let Some(tag) = tags.first() {
//!         let result = device
//!             .try_read_memory(tag, 0, MemoryBank::Reserved, AddressSegment::new(0, 8), &cancel)
//!             .await?;
//!         println!("{}", result);
//!     }
//!     
//!     // Disconnect
//!     device.disconnect().await?;
//!     
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod config;
pub mod device;
pub mod error;

// Re-exports
pub use channel::Channel;
pub use config::DeviceConfig;
pub use device::Device;
pub use error::{Error, ErrorKind, Result};

pub use tokio_util::sync::CancellationToken;

// Re-export types
pub use ru5102_core::{Command, Frame};
pub use ru5102_transport::{SerialTransport, StreamTransport, Transport};
pub use ru5102_types::{
    AddressSegment, FirmwareVersion, FrequencyBand, InventoryBatch, MemoryBank, ReadResult,
    ReadStatus, ReaderInfo,
};
