//! Site configuration.
//!
//! An optional `cloaksite.toml` in the project root overrides the stock
//! defaults. Files are sparse: only the keys being changed need to appear.
//!
//! ```toml
//! content_dir = "content"
//! templates_dir = "templates"
//! output_dir = "build"
//! mapping_file = "build_info/directory_mapping.tsv"   # optional
//!
//! [ids]
//! length = 12
//!
//! [routes]
//! trailing_slash_redirects = false
//! canonical_host_redirect = false
//!
//! [markdown]
//! tables = true
//! strikethrough = true
//! footnotes = false
//! ```
//!
//! Unknown keys are rejected to catch typos early. The output directory is
//! deleted by `--clean`, so it may not contain the content, the templates,
//! or the mapping file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Name of the config file looked up in the project root.
pub const CONFIG_FILE: &str = "cloaksite.toml";

/// Longest identifier the config accepts.
pub const MAX_ID_LENGTH: usize = 64;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Directory holding `*.md` pages and asset subdirectories.
    pub content_dir: PathBuf,
    /// Directory holding `page.html` and `home.html`.
    pub templates_dir: PathBuf,
    /// Build output directory. Must not exist when a build starts.
    pub output_dir: PathBuf,
    /// Where to write the `name<TAB>id` asset directory manifest. Kept
    /// outside the output directory so the ids are not published with it.
    pub mapping_file: Option<PathBuf>,
    pub ids: IdsConfig,
    pub routes: RoutesConfig,
    pub markdown: MarkdownConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content"),
            templates_dir: PathBuf::from("templates"),
            output_dir: PathBuf::from("build"),
            mapping_file: None,
            ids: IdsConfig::default(),
            routes: RoutesConfig::default(),
            markdown: MarkdownConfig::default(),
        }
    }
}

impl SiteConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ids.length == 0 || self.ids.length > MAX_ID_LENGTH {
            return Err(ConfigError::Validation(format!(
                "ids.length must be 1-{MAX_ID_LENGTH}"
            )));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "output_dir must not be empty".into(),
            ));
        }
        let output = resolve_path(&self.output_dir)?;
        let mut protected = vec![
            ("content_dir", &self.content_dir),
            ("templates_dir", &self.templates_dir),
        ];
        if let Some(mapping) = &self.mapping_file {
            protected.push(("mapping_file", mapping));
        }
        for (key, path) in protected {
            if resolve_path(path)?.starts_with(&output) {
                return Err(ConfigError::Validation(format!(
                    "output_dir {} must not contain {key} {}",
                    self.output_dir.display(),
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

/// Absolute form of `path` with `.` and `..` folded away and symlinks
/// resolved for the part of the path that exists.
fn resolve_path(path: &Path) -> Result<PathBuf, ConfigError> {
    let mut normal = PathBuf::new();
    for component in std::path::absolute(path)?.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normal.pop();
            }
            other => normal.push(other),
        }
    }

    let mut existing = normal.as_path();
    let mut missing = Vec::new();
    loop {
        if let Ok(real) = fs::canonicalize(existing) {
            return Ok(missing.iter().rev().fold(real, |acc, part| acc.join(part)));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => return Ok(normal),
        }
    }
}

/// Random identifier settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IdsConfig {
    /// Characters per identifier.
    pub length: usize,
}

impl Default for IdsConfig {
    fn default() -> Self {
        Self {
            length: crate::ident::DEFAULT_LENGTH,
        }
    }
}

/// Route table settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoutesConfig {
    /// Also emit `^slug/$ → /slug` permanent redirects for every page.
    pub trailing_slash_redirects: bool,
    /// Redirect `www.<host>` to the bare host before any other rule.
    pub canonical_host_redirect: bool,
}

/// Markdown extensions passed to the converter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkdownConfig {
    pub tables: bool,
    pub strikethrough: bool,
    pub footnotes: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            footnotes: false,
        }
    }
}

// =============================================================================
// Loading
// =============================================================================

/// Returns the stock defaults as a TOML table, the base layer for overrides.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("stock config: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key by key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Parse a config document and layer it over the stock defaults.
pub fn parse_config(content: &str) -> Result<SiteConfig, ConfigError> {
    let overlay: toml::Value = toml::from_str(content)?;
    let merged = merge_toml(stock_defaults_value()?, overlay);
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, or the stock defaults when the file is absent.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(SiteConfig::default());
    }
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// A fully-commented stock config, printed by `cloaksite gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# cloaksite configuration
# =======================
#
# Every key is optional; the values below are the defaults.

# Markdown pages (*.md) and asset directories live here.
content_dir = "content"

# Must contain page.html (title, content) and home.html (pages).
# A missing template falls back to the built-in one.
templates_dir = "templates"

# Created fresh by every build. The build refuses to start if it exists.
output_dir = "build"

# Write an `<asset dir><TAB><id>` line per asset directory to this file.
# Must be outside output_dir.
# mapping_file = "build_info/directory_mapping.tsv"

[ids]
# Length of the random public identifiers (a-z, 0-9). Range 1-64.
length = 12

[routes]
# Add `RewriteRule ^slug/$ /slug [R=301,L]` for every page.
trailing_slash_redirects = false
# Redirect www.<host> to https://<host> (301) ahead of the page rules.
canonical_host_redirect = false

[markdown]
tables = true
strikethrough = true
footnotes = false
"##
}
