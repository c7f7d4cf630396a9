//! Runtime configuration loaded from the process environment.

use std::env;
use std::path::PathBuf;

/// Artefact path used when `CYTO_MODEL_PATH` is unset.
pub const DEFAULT_MODEL_PATH: &str = "models/cancer_prediction_model.json";
/// Listen address used when `CYTO_BIND` is unset.
pub const DEFAULT_BIND: &str = "127.0.0.1:5000";

/// Output format of the log subscriber.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Snapshot of configuration values consumed by the service.
#[derive(Clone, Debug)]
pub struct AppCfg {
    pub model_path: PathBuf,
    pub bind_addr: String,
    pub log_filter: String,
    pub log_format: LogFormat,
}

impl AppCfg {
    /// Create a configuration snapshot from the process environment.
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create a snapshot from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_or = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let log_format = match env_or("CYTO_LOG_FORMAT", "text")
            .to_ascii_lowercase()
            .as_str()
        {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Self {
            model_path: PathBuf::from(env_or("CYTO_MODEL_PATH", DEFAULT_MODEL_PATH)),
            bind_addr: env_or("CYTO_BIND", DEFAULT_BIND),
            log_filter: env_or("CYTO_LOG", "info"),
            log_format,
        }
    }
}

impl Default for AppCfg {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn cfg_from(pairs: &[(&str, &str)]) -> AppCfg {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppCfg::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = AppCfg::default();
        assert_eq!(cfg.model_path, PathBuf::from(DEFAULT_MODEL_PATH));
        assert_eq!(cfg.bind_addr, DEFAULT_BIND);
        assert_eq!(cfg.log_filter, "info");
        assert_eq!(cfg.log_format, LogFormat::Text);
    }

    #[test]
    fn environment_overrides_defaults() {
        let cfg = cfg_from(&[
            ("CYTO_MODEL_PATH", "/srv/models/wbc.json"),
            ("CYTO_BIND", "0.0.0.0:8080"),
            ("CYTO_LOG", "cytocheck=debug"),
            ("CYTO_LOG_FORMAT", "JSON"),
        ]);
        assert_eq!(cfg.model_path, PathBuf::from("/srv/models/wbc.json"));
        assert_eq!(cfg.bind_addr, "0.0.0.0:8080");
        assert_eq!(cfg.log_filter, "cytocheck=debug");
        assert_eq!(cfg.log_format, LogFormat::Json);
    }

    #[test]
    fn blank_values_fall_back() {
        let cfg = cfg_from(&[("CYTO_MODEL_PATH", "   "), ("CYTO_LOG_FORMAT", "xml")]);
        assert_eq!(cfg.model_path, PathBuf::from(DEFAULT_MODEL_PATH));
        assert_eq!(cfg.log_format, LogFormat::Text);
    }
}
