use std::path::Path;

use postaja_core::AutopilotConfig;

pub fn init(path: &str, name: &str) -> anyhow::Result<()> {
    let output = Path::new(path);
    if output.exists() {
        anyhow::bail!("{} already exists", output.display());
    }

    let config = AutopilotConfig::scaffold(name);
    std::fs::write(output, config.to_toml_string()?)?;
    println!("✓ Generated {}", output.display());
    Ok(())
}
