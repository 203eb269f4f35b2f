use anyhow::{Context, Result};

use folio_core::works::{pad_with_placeholders, works_for};
use folio_core::{AppConfig, WorkAction};

pub fn run(config: &AppConfig) -> Result<()> {
    let source = config
        .works_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in".to_string());
    let works = works_for(config).with_context(|| format!("Failed to load works from {}", source))?;
    let loaded = works.len();
    let works = pad_with_placeholders(works, config.works.min_count, &config.works.placeholder_palette);

    println!("Works from {} ({} loaded, {} cards):\n", source, loaded, works.len());

    for (i, work) in works.iter().enumerate() {
        let action = match work.action() {
            Some(WorkAction::Link(url)) => url,
            Some(WorkAction::Detail) => "[detail]".to_string(),
            None if work.placeholder => "[placeholder]".to_string(),
            None => "[no action]".to_string(),
        };
        println!("  {:>2}. {} - {}", i + 1, work.title, work.description);
        println!("      {}", action);
    }

    Ok(())
}
