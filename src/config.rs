use crate::core::error::ConfigError;
use crate::core::sequencer::RetreatFloor;
use crate::flows::personal_info::SessionOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const LOG_ENV: &str = "SUBSTEP_LOG";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub draft_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub bank_account_id: u64,
    pub log_filter: Option<String>,
    pub return_after_edit: bool,
    pub retreat_floor: RetreatFloor,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            draft_path: None,
            output_path: None,
            bank_account_id: 0,
            log_filter: None,
            return_after_edit: false,
            retreat_floor: SessionOptions::default().retreat_floor,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// An empty document yields the defaults.
    pub fn parse(raw: &str) -> Result<Self, serde_yaml::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// `SUBSTEP_LOG` wins over the file, which wins over `info`.
    pub fn log_filter(&self, env_value: Option<String>) -> String {
        env_value
            .filter(|value| !value.trim().is_empty())
            .or_else(|| self.log_filter.clone())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            return_after_edit: self.return_after_edit,
            retreat_floor: self.retreat_floor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AppConfig;
    use crate::core::error::ConfigError;
    use crate::core::sequencer::RetreatFloor;
    use std::path::{Path, PathBuf};

    #[test]
    fn empty_document_is_default() {
        assert_eq!(AppConfig::parse("").expect("parse"), AppConfig::default());
    }

    #[test]
    fn parses_all_fields() {
        let config = AppConfig::parse(
            "draft_path: draft.json\n\
             output_path: out.json\n\
             bank_account_id: 42\n\
             log_filter: debug\n\
             return_after_edit: true\n\
             retreat_floor: first\n",
        )
        .expect("parse");

        assert_eq!(config.draft_path, Some(PathBuf::from("draft.json")));
        assert_eq!(config.bank_account_id, 42);
        assert_eq!(config.retreat_floor, RetreatFloor::First);
        assert!(config.session_options().return_after_edit);
    }

    #[test]
    fn default_floor_lets_back_reach_the_first_step() {
        assert_eq!(AppConfig::default().retreat_floor, RetreatFloor::First);
        let config = AppConfig::parse("retreat_floor: start_index\n").expect("parse");
        assert_eq!(config.session_options().retreat_floor, RetreatFloor::StartIndex);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(AppConfig::parse("colour: blue\n").is_err());
    }

    #[test]
    fn log_filter_precedence() {
        let mut config = AppConfig::default();
        assert_eq!(config.log_filter(None), "info");
        config.log_filter = Some("warn".to_string());
        assert_eq!(config.log_filter(None), "warn");
        assert_eq!(config.log_filter(Some("trace".to_string())), "trace");
        assert_eq!(config.log_filter(Some(" ".to_string())), "warn");
    }

    #[test]
    fn missing_file_reports_path() {
        let path = Path::new("/nonexistent/substep.yaml");
        match AppConfig::load(path) {
            Err(ConfigError::Io { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("unexpected {other:?}"),
        }
    }
}
