//! Protocol constants

use std::time::Duration;

/// Default serial speed of the reader
pub const DEFAULT_BAUD_RATE: u32 = 57600;

/// Factory default device address
pub const DEFAULT_ADDRESS: u8 = 0x00;

/// Default time allowed for the connect handshake
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Unit of the inventory scan time byte
pub const SCAN_TIME_UNIT: Duration = Duration::from_millis(100);

/// Inventory response subtypes
pub mod inventory {
    /// Scan complete, tags attached
    pub const FINISHED: u8 = 1;
    
    /// Scan complete (time limit reached), tags attached
    pub const FINISHED_TIMEOUT: u8 = 2;
    
    /// More frames follow, tags attached
    pub const PARTIAL: u8 = 3;
    
    /// More frames follow (buffer full), tags attached
    pub const PARTIAL_FULL: u8 = 4;
    
    /// End of scan, no tags
    pub const NO_TAG: u8 = 0xFB;
}
