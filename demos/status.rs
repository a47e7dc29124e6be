//! Print the receiver status, optionally setting the volume first.
//!
//! ```text
//! YAMAHA_HOST=192.168.1.86 cargo run --example status -- [volume]
//! ```

use yamaha_ctrl::{ClientConfig, Toggle, YamahaClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = ClientConfig::from_env()?;
    let client = YamahaClient::with_config(&config)?;

    if let Some(volume) = std::env::args().nth(1) {
        let volume: u32 = volume.parse()?;
        client.set_volume(volume).await?;
        println!("Volume set to {}", volume);
    }

    let status = client.fetch_status().await?;
    let unit = status.actual_volume.unit.as_deref().unwrap_or("");

    println!(
        "Volume:       {} / {} ({} {})",
        status.volume, status.max_volume, status.actual_volume.value, unit
    );
    println!("Subwoofer:    {}", status.subwoofer_volume);
    println!(
        "Tone:         {} (bass {}, treble {})",
        status.tone_control.mode, status.tone_control.bass, status.tone_control.treble
    );
    println!("Dialogue:     {}", status.dialogue_level);
    for toggle in Toggle::ALL {
        println!(
            "{:<13} {}",
            format!("{}:", toggle.label()),
            if status.toggle(toggle) { "on" } else { "off" }
        );
    }

    Ok(())
}
