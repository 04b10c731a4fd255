use crate::error::{ReportError, Result};
use crate::page::{mm, Page};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_FILE_PREFIX: &str = "Smashly-Comparativa";

/// The page footer lives inside the bottom margin, so it cannot shrink below this.
pub const MIN_MARGIN_MM: f64 = 10.0;
pub const MAX_MARGIN_MM: f64 = 50.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    #[default]
    A4,
    Letter,
}

impl PageSize {
    pub fn new_page(self) -> Page {
        match self {
            PageSize::A4 => Page::a4(),
            PageSize::Letter => Page::letter(),
        }
    }
}

/// Settings for one report run.
///
/// Every field has a default, so a config file only needs the keys it changes:
///
/// ```json
/// { "proxy_base_url": "https://api.smashly.app", "footer_brand": "Smashly.app" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub page: PageSize,
    /// Margin on all four sides, in millimetres
    pub margin_mm: f64,
    /// Relay used for remote images; `None` fetches them directly
    pub proxy_base_url: Option<String>,
    pub file_prefix: String,
    /// Appended to the page footer as " - <brand>"
    pub footer_brand: Option<String>,
    pub fetch_timeout_secs: u64,
    pub author: Option<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            page: PageSize::A4,
            margin_mm: 20.0,
            proxy_base_url: None,
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            footer_brand: None,
            fetch_timeout_secs: 10,
            author: None,
        }
    }
}

impl ReportConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|e| ReportError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        // Leave at least half the narrowest page for content
        if !(MIN_MARGIN_MM..=MAX_MARGIN_MM).contains(&self.margin_mm) {
            return Err(ReportError::Config(format!(
                "margin_mm must be in [{MIN_MARGIN_MM}, {MAX_MARGIN_MM}], got {}",
                self.margin_mm
            )));
        }
        let prefix = self.file_prefix.trim();
        if prefix.is_empty() {
            return Err(ReportError::Config("file_prefix must not be empty".to_string()));
        }
        // The prefix becomes a file name inside the output directory
        if prefix.contains(['/', '\\']) || prefix.starts_with('.') {
            return Err(ReportError::Config(format!(
                "file_prefix must be a plain file name, got {:?}",
                self.file_prefix
            )));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(ReportError::Config(
                "fetch_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Margin in points.
    pub fn margin(&self) -> f64 {
        mm(self.margin_mm)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}
