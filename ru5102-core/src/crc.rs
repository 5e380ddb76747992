//! RU5102 frame CRC
//!
//! Bit-reflected CRC-16 (polynomial 0x1021, reflected 0x8408), seeded with
//! 0xFFFF and no final XOR (CRC-16/MCRF4XX). The CRC is sent low byte first,
//! so running the algorithm over a whole intact frame, CRC included, leaves
//! a residue of zero.

use tracing::trace;

/// Initial accumulator value
pub const SEED: u16 = 0xFFFF;

/// Reflected generator polynomial
pub const POLYNOMIAL: u16 = 0x8408;

/// Calculate the CRC of `data`
///
/// # Examples
///
/// ```
/// use ru5102_core::crc;
///
/// assert_eq!(crc::calculate(b"123456789"), 0x6F91);
/// ```
pub fn calculate(data: &[u8]) -> u16 {
    let mut crc = SEED;

    for &byte in data {
        crc ^= u16::from(byte);
        for _ in 0..8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ POLYNOMIAL
            } else {
                crc >> 1
            };
        }
    }

    crc
}

/// Check a complete frame whose last two bytes are its CRC
///
/// Returns the residue on failure so callers can report it.
pub fn verify(frame: &[u8]) -> std::result::Result<(), u16> {
    let residue = calculate(frame);

    trace!(
        frame_len = frame.len(),
        residue = format!("0x{:04X}", residue),
        "Verified frame CRC"
    );

    if residue == 0 { Ok(()) } else { Err(residue) }
}
