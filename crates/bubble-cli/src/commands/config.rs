//! Print the default configuration

use anyhow::Result;
use bubble_particles::BubbleConfig;

pub fn run() -> Result<()> {
    print!("{}", BubbleConfig::default().to_toml_string()?);
    Ok(())
}
