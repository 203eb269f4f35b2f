use anyhow::Result;

use folio_core::AppConfig;
use folio_tui::themes::available_themes;

/// Print the effective configuration as TOML
pub fn run(config: &AppConfig) -> Result<()> {
    println!("# {}", AppConfig::config_path().display());
    println!("# themes: {}", available_themes().join(", "));
    print!("{}", config.to_toml()?);
    Ok(())
}
