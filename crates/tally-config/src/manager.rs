use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{NaiveDateTime, Utc};

use crate::{Config, ConfigError};

const CONFIG_FILE: &str = "tally.json";
const BACKUP_PREFIX: &str = "tally_";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Reads, writes and snapshots the on-disk [`Config`].
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
    backups_dir: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf, backups_dir: PathBuf) -> Self {
        Self {
            config_path,
            backups_dir,
        }
    }

    /// Lays out `<base>/config/tally.json` with backups alongside.
    pub fn with_base_dir(base: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config_dir = base.as_ref().join("config");
        let backups_dir = config_dir.join("backups");
        fs::create_dir_all(&backups_dir)?;
        Ok(Self::new(config_dir.join(CONFIG_FILE), backups_dir))
    }

    /// `~/.config/tally/tally.json`. Nothing is created until [`Self::save`].
    pub fn default_location() -> Self {
        let config_dir = dirs::config_dir()
            .map(|dir| dir.join("tally"))
            .unwrap_or_else(|| PathBuf::from(".tally"));
        Self::new(config_dir.join(CONFIG_FILE), config_dir.join("backups"))
    }

    /// Uses an explicit config file, keeping backups next to it.
    pub fn for_file(config_path: impl Into<PathBuf>) -> Self {
        let config_path = config_path.into();
        let backups_dir = config_path
            .parent()
            .map(|parent| parent.join("backups"))
            .unwrap_or_else(|| PathBuf::from("backups"));
        Self::new(config_path, backups_dir)
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    /// Missing file yields defaults; a present file must parse and validate.
    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.config_path.exists() {
            return Ok(Config::default());
        }
        let config = read_config(&self.config_path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        config.validate()?;
        write_atomic(&self.config_path, config)
    }

    /// Copies `config` into the backups dir and returns the file name.
    pub fn backup(&self, config: &Config, note: Option<&str>) -> Result<String, ConfigError> {
        let mut name = format!(
            "{BACKUP_PREFIX}{}",
            Utc::now().format(BACKUP_TIMESTAMP_FORMAT)
        );
        if let Some(label) = note.map(slug).filter(|label| !label.is_empty()) {
            name.push('_');
            name.push_str(&label);
        }
        name.push_str(".json");
        write_atomic(&self.backups_dir.join(&name), config)?;
        Ok(name)
    }

    pub fn restore(&self, backup_name: &str) -> Result<Config, ConfigError> {
        let config = read_config(&self.backups_dir.join(backup_name))?;
        config.validate()?;
        Ok(config)
    }

    /// Backup file names, newest first.
    pub fn list_backups(&self) -> Result<Vec<String>, ConfigError> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                names.push(name.to_string());
            }
        }
        names.sort_by(|a, b| backup_timestamp(b).cmp(&backup_timestamp(a)).then(b.cmp(a)));
        Ok(names)
    }
}

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let data = fs::read_to_string(path)?;
    serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))
}

fn write_atomic(path: &Path, config: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json =
        serde_json::to_string_pretty(config).map_err(|err| ConfigError::Serde(err.to_string()))?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn slug(note: &str) -> String {
    let mut out = String::new();
    for ch in note.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_end_matches('-').to_string()
}

fn backup_timestamp(name: &str) -> Option<NaiveDateTime> {
    let stamp = name.strip_prefix(BACKUP_PREFIX)?.get(..15)?;
    NaiveDateTime::parse_from_str(stamp, BACKUP_TIMESTAMP_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_collapses_punctuation() {
        assert_eq!(slug("  Before Tax Season!! "), "before-tax-season");
        assert_eq!(slug("***"), "");
    }

    #[test]
    fn backup_timestamp_parses_prefix() {
        assert!(backup_timestamp("tally_20240701_101500_note.json").is_some());
        assert!(backup_timestamp("other.json").is_none());
    }
}
