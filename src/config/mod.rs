use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

use dirs::home_dir;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, WizardError};
use crate::payment::txn::DEFAULT_TXN_PREFIX;

const DEFAULT_DIR_NAME: &str = ".passport_wizard";
const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";
pub const HOME_ENV: &str = "PASSPORT_WIZARD_HOME";

/// Tunables for the wizard; every key falls back to its default when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    pub verification_delay_ms: u64,
    pub transaction_prefix: String,
    pub application_fee: String,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            verification_delay_ms: 900,
            transaction_prefix: DEFAULT_TXN_PREFIX.into(),
            application_fee: "INR 1,500".into(),
        }
    }
}

impl WizardConfig {
    pub const KEYS: [&'static str; 3] = [
        "verification_delay_ms",
        "transaction_prefix",
        "application_fee",
    ];

    pub fn verification_delay(&self) -> Duration {
        Duration::from_millis(self.verification_delay_ms)
    }

    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            (Self::KEYS[0], self.verification_delay_ms.to_string()),
            (Self::KEYS[1], self.transaction_prefix.clone()),
            (Self::KEYS[2], self.application_fee.clone()),
        ]
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "verification_delay_ms" => {
                self.verification_delay_ms = value.parse().map_err(|_| {
                    WizardError::Config(format!("`{value}` is not a whole number of milliseconds"))
                })?;
            }
            "transaction_prefix" => {
                validate_prefix(value)?;
                self.transaction_prefix = value.to_string();
            }
            "application_fee" => {
                if value.is_empty() {
                    return Err(WizardError::Config("application fee cannot be empty".into()));
                }
                self.application_fee = value.to_string();
            }
            other => {
                return Err(WizardError::Config(format!(
                    "unknown key `{other}` (expected one of: {})",
                    Self::KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        validate_prefix(&self.transaction_prefix)
    }
}

fn validate_prefix(prefix: &str) -> Result<()> {
    if prefix.is_empty()
        || !prefix
            .chars()
            .all(|ch| ch.is_ascii_uppercase() || ch.is_ascii_digit())
    {
        return Err(WizardError::Config(format!(
            "transaction prefix `{prefix}` must be uppercase letters or digits"
        )));
    }
    Ok(())
}

/// Application data directory, `$PASSPORT_WIZARD_HOME` or `~/.passport_wizard`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Loads and saves [`WizardConfig`] as pretty JSON.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
        })
    }

    pub fn load(&self) -> Result<WizardConfig> {
        if !self.path.exists() {
            return Ok(WizardConfig::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: WizardConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &WizardConfig) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        assert_eq!(manager.load().unwrap(), WizardConfig::default());
    }

    #[test]
    fn save_then_load_keeps_changes() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().join("nested")).unwrap();
        let mut config = WizardConfig::default();
        config.set("verification_delay_ms", "25").unwrap();
        config.set("transaction_prefix", "PSK").unwrap();
        manager.save(&config).unwrap();

        let loaded = manager.load().unwrap();
        assert_eq!(loaded.verification_delay(), Duration::from_millis(25));
        assert_eq!(loaded.transaction_prefix, "PSK");
        assert!(!manager.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.path(), r#"{ "application_fee": "INR 2,000" }"#).unwrap();
        let loaded = manager.load().unwrap();
        assert_eq!(loaded.application_fee, "INR 2,000");
        assert_eq!(loaded.verification_delay_ms, 900);
    }

    #[test]
    fn rejects_bad_values() {
        let mut config = WizardConfig::default();
        assert!(config.set("verification_delay_ms", "soon").is_err());
        assert!(config.set("transaction_prefix", "gov").is_err());
        assert!(config.set("application_fee", " ").is_err());
        assert!(config.set("theme", "dark").is_err());
        assert_eq!(config, WizardConfig::default());
    }
}
