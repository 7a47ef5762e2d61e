//! TOML-based application configuration.
//!
//! Stores:
//! - The user's chronobiological profile (the local profile store)
//! - Planner policy (minimum slot, session caps, re-validation)
//! - The time zone used to read calendar days and hours
//!
//! Configuration is stored at `~/.config/timeweave/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::profile::{parse_hhmm, Chronotype, Profile};
use crate::scheduler::PlannerConfig;

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/timeweave/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// IANA zone name (e.g. "Europe/Madrid"); system local time when unset.
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub profile: Profile,
    #[serde(default)]
    pub planner: PlannerConfig,
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => Self::parse_number(value)
                        .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?,
                    // Unset optional: numbers stay numbers, anything else is text.
                    serde_json::Value::Null => Self::parse_number(value)
                        .unwrap_or_else(|| serde_json::Value::String(value.into())),
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn parse_number(value: &str) -> Option<serde_json::Value> {
        if let Ok(n) = value.parse::<i64>() {
            Some(serde_json::Value::Number(n.into()))
        } else if let Ok(n) = value.parse::<f64>() {
            serde_json::Number::from_f64(n).map(serde_json::Value::Number)
        } else {
            None
        }
    }

    /// Reject values that would deserialize but make no sense.
    fn check_value(key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        match key {
            "profile.chronotype" => {
                value
                    .parse::<Chronotype>()
                    .map_err(|e| invalid(e.to_string()))?;
            }
            "profile.wakeup_time" => {
                parse_hhmm(value).map_err(|e| invalid(e.to_string()))?;
            }
            "profile.sleep_duration" => {
                let hours: f64 = value.parse().map_err(|_| invalid("not a number".into()))?;
                if !(hours.is_finite() && hours > 0.0 && hours < 24.0) {
                    return Err(invalid("expected hours between 0 and 24".into()));
                }
            }
            "planner.min_slot_minutes"
            | "planner.peak_session_minutes"
            | "planner.off_peak_session_minutes" => {
                let minutes: i64 = value
                    .parse()
                    .map_err(|_| invalid("expected whole minutes".into()))?;
                if minutes <= 0 {
                    return Err(invalid("must be positive".into()));
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from a specific file, writing defaults there if it is missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key in memory. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        Self::check_value(key, value)?;
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Set a config value by key and save.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.set_value(key, value)?;
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.planner.min_slot_minutes, 45);
    }

    #[test]
    fn full_config_roundtrip() {
        let cfg = Config {
            timezone: Some("Europe/Madrid".into()),
            profile: Profile::new(Chronotype::Wolf, "09:30", 9.0),
            planner: PlannerConfig::default(),
        };
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        assert!(toml_str.contains("chronotype = \"wolf\""));
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn partial_file_uses_defaults() {
        let parsed: Config = toml::from_str(
            r#"
            [profile]
            chronotype = "lion"

            [planner]
            peak_session_minutes = 120
            "#,
        )
        .unwrap();
        assert_eq!(parsed.profile.chronotype, Some(Chronotype::Lion));
        assert!(parsed.profile.wakeup_time.is_none());
        assert_eq!(parsed.planner.peak_session_minutes, 120);
        assert_eq!(parsed.planner.off_peak_session_minutes, 60);
        assert!(parsed.timezone.is_none());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("planner.min_slot_minutes").as_deref(), Some("45"));
        assert_eq!(
            cfg.get("planner.revalidate_before_persist").as_deref(),
            Some("true")
        );
        assert_eq!(cfg.get("profile.chronotype").as_deref(), Some("null"));
        assert!(cfg.get("planner.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_fills_unset_profile_fields() {
        let mut cfg = Config::default();
        cfg.set_value("profile.chronotype", "wolf").unwrap();
        cfg.set_value("profile.wakeup_time", "08:15").unwrap();
        cfg.set_value("profile.sleep_duration", "7.5").unwrap();
        cfg.set_value("timezone", "America/Bogota").unwrap();

        assert_eq!(cfg.profile, Profile::new(Chronotype::Wolf, "08:15", 7.5));
        assert_eq!(cfg.timezone.as_deref(), Some("America/Bogota"));

        cfg.set_value("profile.sleep_duration", "9").unwrap();
        assert_eq!(cfg.profile.sleep_duration, Some(9.0));
    }

    #[test]
    fn set_rejects_bad_profile_values() {
        let mut cfg = Config::default();
        assert!(cfg.set_value("profile.chronotype", "owl").is_err());
        assert!(cfg.set_value("profile.wakeup_time", "7am").is_err());
        assert!(cfg.set_value("profile.sleep_duration", "0").is_err());
        assert!(cfg.set_value("planner.min_slot_minutes", "-5").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn set_json_value_by_path_rejects_unknown_key() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        let result = Config::set_json_value_by_path(&mut json, "planner.nonexistent_key", "value");
        assert!(matches!(result, Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_json_value_by_path_rejects_invalid_type() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        let result =
            Config::set_json_value_by_path(&mut json, "planner.revalidate_before_persist", "nope");
        assert!(result.is_err());
    }

    #[test]
    fn load_from_writes_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());

        std::fs::write(&path, "profile = 3").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }
}
