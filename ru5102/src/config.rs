//! Connection settings

use std::time::Duration;

use ru5102_core::constants::{DEFAULT_ADDRESS, DEFAULT_BAUD_RATE, DEFAULT_CONNECT_TIMEOUT};

/// Where and how to reach a reader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Serial port path, e.g. `/dev/ttyUSB0` or `COM1`
    pub port: String,
    
    /// Serial speed
    pub baud_rate: u32,
    
    /// Reader address on the bus
    pub address: u8,
    
    /// Deadline for the connect handshake
    pub connect_timeout: Duration,
}

impl DeviceConfig {
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            address: DEFAULT_ADDRESS,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
    
    /// Set serial speed
    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }
    
    /// Set reader address
    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }
    
    /// Set connect handshake deadline
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}
