//! Reader information structures

use std::fmt;
use std::time::Duration;

use bitflags::bitflags;

use crate::error::{Error, Result};

/// Firmware version reported by the reader
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FirmwareVersion {
    pub major: u8,
    pub minor: u8,
}

impl FirmwareVersion {
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

bitflags! {
    /// Air protocols the transceiver supports
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct TransceiverFlags: u8 {
        const ISO18000_6B = 0b0000_0001;
        const ISO18000_6C = 0b0000_0010;
    }
}

/// Regulatory band the reader is tuned to
///
/// The channel frequency is `base + step * index`, where the index is the
/// low six bits of the min/max frequency bytes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FrequencyBand {
    UserDefined = 0,
    Chinese = 1,
    Us = 2,
    Korean = 3,
    Eu = 4,
}

impl FrequencyBand {
    const BASE_MHZ: [f64; 5] = [902.6, 920.125, 902.75, 917.1, 865.1];
    const STEP_MHZ: [f64; 5] = [0.4, 0.25, 0.5, 0.2, 0.2];

    /// Frequency of channel 0
    pub fn base_mhz(self) -> f64 {
        Self::BASE_MHZ[self as usize]
    }

    /// Spacing between adjacent channels
    pub fn step_mhz(self) -> f64 {
        Self::STEP_MHZ[self as usize]
    }

    /// Frequency of channel `index`
    pub fn frequency_mhz(self, index: u8) -> f64 {
        self.base_mhz() + self.step_mhz() * f64::from(index)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::UserDefined => "user-defined",
            Self::Chinese => "Chinese",
            Self::Us => "US",
            Self::Korean => "Korean",
            Self::Eu => "EU",
        }
    }
}

impl TryFrom<u8> for FrequencyBand {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::UserDefined),
            1 => Ok(Self::Chinese),
            2 => Ok(Self::Us),
            3 => Ok(Self::Korean),
            4 => Ok(Self::Eu),
            _ => Err(Error::Parse(format!("Invalid frequency band: {}", value))),
        }
    }
}

impl fmt::Display for FrequencyBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reader information
#[derive(Debug, Clone, PartialEq)]
pub struct ReaderInfo {
    /// Firmware version
    pub firmware_version: FirmwareVersion,

    /// Reader type byte, reported as-is
    pub reader_type: u8,

    /// Supported air protocols
    pub transceiver: TransceiverFlags,

    /// Tuning band
    pub band: FrequencyBand,

    /// Lowest channel frequency in MHz
    pub min_frequency_mhz: f64,

    /// Highest channel frequency in MHz
    pub max_frequency_mhz: f64,

    /// RF output power in dBm
    pub power_dbm: u8,

    /// How long the reader scans during one inventory
    pub inventory_scan_timeout: Duration,
}

impl fmt::Display for ReaderInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Reader[FW: {}, band: {}, {:.3}-{:.3} MHz, {} dBm, scan {} ms]",
            self.firmware_version,
            self.band,
            self.min_frequency_mhz,
            self.max_frequency_mhz,
            self.power_dbm,
            self.inventory_scan_timeout.as_millis()
        )
    }
}
