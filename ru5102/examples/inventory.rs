//! Inventory and memory read example
//!
//! Press Enter to scan, any other input quits.

use std::io::BufRead;

use ru5102::{AddressSegment, CancellationToken, Device, DeviceConfig, MemoryBank};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Change to your reader's port
    let port = std::env::var("RU5102_PORT").unwrap_or_else(|_| "/dev/ttyUSB0".to_string());
    let address = std::env::var("RU5102_ADDRESS")
        .ok()
        .and_then(|a| a.parse().ok())
        .unwrap_or(0x00);

    let config = DeviceConfig::new(port).with_address(address);
    let mut device = Device::connect(&config).await?;
    println!("✓ Connected: {}", device.info());

    let cancel = CancellationToken::new();
    let stdin = std::io::stdin();

    for line in stdin.lock().lines() {
        if !line?.is_empty() {
            break;
        }

        device
            .inventory(None, |tag| println!("{}", tag), &cancel)
            .await?;

        let result = device
            .try_read_memory("0001", 0, MemoryBank::Reserved, AddressSegment::new(4, 4), &cancel)
            .await?;
        println!("{}", result);
    }

    device.disconnect().await?;
    println!("✓ Disconnected");

    Ok(())
}
