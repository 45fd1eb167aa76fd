//! Site configuration
//!
//! Branding for the administration screens, passed explicitly to the
//! presentation layer at startup.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Site Config Errors
#[derive(Debug, Error)]
pub enum SiteConfigError {
    /// IO error reading the config file
    #[error("Failed to read site config: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse site config: {0}")]
    Yaml(#[from] serde_norway::Error),
}

/// Administration site branding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Heading shown on every admin page.
    pub site_header: String,

    /// Browser title of admin pages.
    pub site_title: String,

    /// Heading of the admin index page.
    pub index_title: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_header: "Rannaghore Protidin Administration".to_string(),
            site_title: "Rannaghore Protidin Admin".to_string(),
            index_title: "Welcome to Rannaghore Protidin Admin Panel".to_string(),
        }
    }
}

impl SiteConfig {
    /// Parse a YAML document; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SiteConfigError::Yaml`] for malformed documents.
    pub fn from_yaml(yaml: &str) -> Result<Self, SiteConfigError> {
        Ok(serde_norway::from_str(yaml)?)
    }

    /// Load from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SiteConfigError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use testresult::TestResult;

    use super::*;

    #[test]
    fn defaults_match_storefront_branding() {
        let config = SiteConfig::default();

        assert_eq!(config.site_header, "Rannaghore Protidin Administration");
        assert_eq!(config.site_title, "Rannaghore Protidin Admin");
    }

    #[test]
    fn partial_yaml_keeps_defaults() -> TestResult {
        let config = SiteConfig::from_yaml("site_header: Storefront Ops\n")?;

        assert_eq!(config.site_header, "Storefront Ops");
        assert_eq!(config.index_title, SiteConfig::default().index_title);

        Ok(())
    }

    #[test]
    fn malformed_yaml_is_rejected() {
        let result = SiteConfig::from_yaml("site_header: [unterminated");

        assert!(matches!(result, Err(SiteConfigError::Yaml(_))));
    }

    #[test]
    fn loads_from_file() -> TestResult {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "site_title: Night Shift")?;

        let config = SiteConfig::load(file.path())?;

        assert_eq!(config.site_title, "Night Shift");

        Ok(())
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = SiteConfig::load("/nonexistent/storefront/site.yml");

        assert!(matches!(result, Err(SiteConfigError::Io(_))));
    }
}
