//! Patterns directory configuration (`rmfile.toml`)

use std::path::Path;

use color_eyre::Result;
use color_eyre::eyre::{WrapErr as _, bail};

use crate::pattern::PatternKind;

/// Settings read from a patterns directory
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RmfileConfig {
    /// Read buffer size for digests that do not dictate their own
    pub buffer_size: Option<usize>,

    /// Pattern file names inside the directory
    pub files: PatternFiles,
}

/// Pattern file name per kind
#[derive(Debug, serde::Deserialize)]
#[serde(default)]
pub struct PatternFiles {
    pub name: String,
    pub iname: String,
    pub sha1: String,
    pub gcid: String,
}

impl Default for PatternFiles {
    fn default() -> Self {
        Self {
            name: PatternKind::Name.default_file_name().to_string(),
            iname: PatternKind::IName.default_file_name().to_string(),
            sha1: PatternKind::Sha1.default_file_name().to_string(),
            gcid: PatternKind::Gcid.default_file_name().to_string(),
        }
    }
}

impl PatternFiles {
    #[must_use]
    pub fn file_name(&self, kind: PatternKind) -> &str {
        match kind {
            PatternKind::Name => &self.name,
            PatternKind::IName => &self.iname,
            PatternKind::Sha1 => &self.sha1,
            PatternKind::Gcid => &self.gcid,
        }
    }
}

/// Config file name
pub const CONFIG_FILE: &str = "rmfile.toml";

impl RmfileConfig {
    /// Read `rmfile.toml` from a patterns directory.
    ///
    /// A directory without one uses the built-in file names and buffer size.
    ///
    /// # Errors
    /// Returns an error if the file is unreadable, is not valid TOML, or sets
    /// `buffer_size` to zero.
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join(CONFIG_FILE);
        if !config_path.is_file() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)
            .wrap_err_with(|| format!("failed to read {}", config_path.display()))?;
        let config: Self = toml::from_str(&content)
            .wrap_err_with(|| format!("invalid {}", config_path.display()))?;
        if config.buffer_size == Some(0) {
            bail!("{}: buffer_size must be at least 1", config_path.display());
        }
        Ok(config)
    }
}
