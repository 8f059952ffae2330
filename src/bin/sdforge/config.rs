use anyhow::{Context, Result};

use sdforge::io::{PropertyFilter, WriterConfig};

use crate::cli::Cli;

/// Starts from the config file (or defaults) and applies command-line flags
/// on top.
pub fn build_writer_config(cli: &Cli) -> Result<WriterConfig> {
    let mut config = match &cli.config {
        Some(path) => WriterConfig::load(path)
            .with_context(|| format!("Failed to load writer config: {}", path.display()))?,
        None => WriterConfig::default(),
    };

    if let Some(names) = &cli.props {
        config.props = PropertyFilter::from_names(names.iter().map(|n| n.trim()));
    }
    if cli.no_kekulize {
        config.kekulize = false;
    }
    if cli.v3000 {
        config.force_v3000 = true;
    }

    Ok(config)
}
