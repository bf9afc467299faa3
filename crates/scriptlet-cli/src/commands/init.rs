use std::path::Path;

use anyhow::Result;

use scriptlet_core::config::TranspileConfig;

use crate::output;

/// Write a default config file at `config_path`.
pub fn run(config_path: &Path) -> Result<()> {
    output::print_header("scriptlet init");

    let config = TranspileConfig::init(config_path)?;

    output::print_success(&format!("Created {}", config_path.display()));
    if let Some(preset) = &config.preset {
        output::print_key_value("Preset", preset);
    }
    println!();
    println!("  Next steps:");
    println!("    scriptlet presets");
    println!("    scriptlet transpile page.ejs -o page.js");
    println!();

    Ok(())
}
