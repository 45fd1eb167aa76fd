use std::path::PathBuf;

use clap::Args;
use storefront::site::SiteConfig;

use super::output::{Listing, OutputFormat};

#[derive(Debug, Args)]
pub(crate) struct SiteCommand {
    /// YAML file overriding the default branding
    #[arg(long, env = "SITE_CONFIG")]
    config: Option<PathBuf>,
}

/// Branding is loaded once here and handed to whatever renders it.
pub(crate) fn load(command: &SiteCommand) -> Result<SiteConfig, String> {
    match &command.config {
        Some(path) => SiteConfig::load(path)
            .map_err(|error| format!("failed to load {}: {error}", path.display())),
        None => Ok(SiteConfig::default()),
    }
}

pub(crate) fn run(command: &SiteCommand, format: OutputFormat) -> Result<(), String> {
    let config = load(command)?;
    let mut listing = Listing::new(&["site_header", "site_title", "index_title"]);

    listing.push(vec![config.site_header, config.site_title, config.index_title]);

    println!("{}", listing.render(format)?);

    Ok(())
}
