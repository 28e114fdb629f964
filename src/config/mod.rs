use crate::core::policy::{
    AccountingPolicy, DEFAULT_LUNCH_CAP_MINUTES, DEFAULT_LUNCH_MINUTES,
    DEFAULT_UTC_OFFSET_MINUTES,
};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    /// Offset of the employee-local day boundary, in minutes east of UTC.
    #[serde(default = "default_utc_offset")]
    pub utc_offset_minutes: i32,
    #[serde(default = "default_lunch_cap")]
    pub lunch_cap_minutes: u32,
    #[serde(default = "default_lunch")]
    pub default_lunch_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_hourly_rate: Option<f64>,
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_utc_offset() -> i32 {
    DEFAULT_UTC_OFFSET_MINUTES
}
fn default_lunch_cap() -> u32 {
    DEFAULT_LUNCH_CAP_MINUTES
}
fn default_lunch() -> u32 {
    DEFAULT_LUNCH_MINUTES
}
fn default_tick_interval() -> u64 {
    1000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            utc_offset_minutes: default_utc_offset(),
            lunch_cap_minutes: default_lunch_cap(),
            default_lunch_minutes: default_lunch(),
            default_hourly_rate: None,
            tick_interval_ms: default_tick_interval(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        let base = if cfg!(target_os = "windows") {
            dirs::config_dir()
        } else {
            dirs::home_dir()
        };
        let base = base.unwrap_or_else(|| PathBuf::from("."));

        if cfg!(target_os = "windows") {
            base.join("rpunchclock")
        } else {
            base.join(".rpunchclock")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rpunchclock.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rpunchclock.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| AppError::ConfigLoad(format!("{}: {e}", path.display())))?;
        let cfg: Config = serde_yaml::from_str(&content)
            .map_err(|e| AppError::ConfigLoad(format!("{}: {e}", path.display())))?;

        // Fail early on a bad offset instead of at first use.
        cfg.policy()?;
        Ok(cfg)
    }

    /// Accounting policy derived from this configuration.
    pub fn policy(&self) -> AppResult<AccountingPolicy> {
        if let Some(rate) = self.default_hourly_rate
            && (!rate.is_finite() || rate < 0.0)
        {
            return Err(AppError::Config(format!(
                "default_hourly_rate must be a non-negative number, got {rate}"
            )));
        }

        Ok(AccountingPolicy::default()
            .with_offset_minutes(self.utc_offset_minutes)?
            .with_lunch_cap_minutes(self.lunch_cap_minutes)
            .with_default_lunch_minutes(self.default_lunch_minutes)
            .with_default_hourly_rate(self.default_hourly_rate))
    }

    /// Initialize configuration and database files.
    ///
    /// Returns the database path. In test mode the configuration file is
    /// left untouched.
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();

        // DB name: user provided or default
        let db_path = match custom_name {
            Some(name) => {
                let p = Path::new(&name);
                if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    dir.join(p)
                }
            }
            None => Self::database_file(),
        };

        if !is_test {
            fs::create_dir_all(&dir)?;

            let config = Config {
                database: db_path.to_string_lossy().to_string(),
                ..Config::default()
            };

            let yaml = serde_yaml::to_string(&config)?;
            let mut file = fs::File::create(Self::config_file()).map_err(|_| AppError::ConfigSave)?;
            file.write_all(yaml.as_bytes())
                .map_err(|_| AppError::ConfigSave)?;
        }

        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        Ok(db_path)
    }
}
