// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use daybook_app::TaskTime;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use time::Date;
use time::macros::format_description;

const CONFIG_VERSION: i64 = 1;
const APP_NAME: &str = "daybook";
const DEFAULT_LOG_LEVEL: &str = "info";
const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

pub const CONFIG_PATH_ENV: &str = "DAYBOOK_CONFIG_PATH";
pub const LOG_FILE_ENV: &str = "DAYBOOK_LOG_FILE";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            ui: Ui::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub default_time: Option<String>,
    pub start_date: Option<String>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            default_time: Some(TaskTime::DEFAULT.to_string()),
            start_date: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub file: Option<String>,
    pub level: Option<String>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            file: None,
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set {CONFIG_PATH_ENV} to the config file")
        })?;
        Ok(config_root.join(APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} has no version; add `version = 1` at the top",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if self.version != CONFIG_VERSION {
            bail!(
                "config {} has version {}; expected 1",
                path.display(),
                self.version
            );
        }

        self.default_time()
            .with_context(|| format!("ui.default_time in {}", path.display()))?;
        self.start_date()
            .with_context(|| format!("ui.start_date in {}", path.display()))?;

        if let Some(level) = &self.log.level
            && !LOG_LEVELS.contains(&level.as_str())
        {
            bail!(
                "log.level in {} must be one of {}, got {level:?}",
                path.display(),
                LOG_LEVELS.join(", ")
            );
        }

        if let Some(file) = &self.log.file
            && file.trim().is_empty()
        {
            bail!(
                "log.file in {} is empty; remove it to disable logging",
                path.display()
            );
        }

        Ok(())
    }

    pub fn default_time(&self) -> Result<TaskTime> {
        match &self.ui.default_time {
            Some(raw) => TaskTime::parse(raw),
            None => Ok(TaskTime::DEFAULT),
        }
    }

    pub fn start_date(&self) -> Result<Option<Date>> {
        let Some(raw) = &self.ui.start_date else {
            return Ok(None);
        };
        let date = Date::parse(raw.trim(), format_description!("[year]-[month]-[day]"))
            .with_context(|| format!("invalid date {raw:?}; use YYYY-MM-DD"))?;
        Ok(Some(date))
    }

    /// The config file wins; the env var only fills in when the file is silent.
    pub fn log_file(&self) -> Option<PathBuf> {
        if let Some(file) = &self.log.file {
            return Some(PathBuf::from(file));
        }
        env::var_os(LOG_FILE_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# daybook config\n# Place this file at: {}\n\nversion = 1\n\n[ui]\n# Time prefilled in the add-task form until a task is added at another time.\ndefault_time = \"{}\"\n# Optional. Open with this date selected instead of today.\n# start_date = \"2026-01-01\"\n\n[log]\n# Optional. Logging is off unless a file is set here or in {}.\n# file = \"/tmp/daybook.log\"\nlevel = \"{}\"\n",
            path.display(),
            TaskTime::DEFAULT,
            LOG_FILE_ENV,
            DEFAULT_LOG_LEVEL,
        )
    }
}
