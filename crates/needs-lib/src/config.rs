use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use needs_spec::{AttachmentLimits, CategoryRules, FlowKind};

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000/";
pub const DEFAULT_PUBLIC_MOUNT: &str = "/objects/uploads";

/// Errors raised while loading or encoding configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to encode config: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Collaborator endpoints. Paths are joined onto `base_url`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: Url,
    pub questions_path: String,
    pub upload_path: String,
    pub submit_path: String,
    pub staff_submit_path: String,
    pub timeout_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_API_URL).expect("default API url is valid"),
            questions_path: "api/questions".into(),
            upload_path: "api/objects/upload".into(),
            submit_path: "api/needs-assessments".into(),
            staff_submit_path: "api/staff/needs-assessments".into(),
            timeout_secs: 30,
            token: None,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn submit_path(&self, flow: FlowKind) -> &str {
        match flow {
            FlowKind::Client => &self.submit_path,
            FlowKind::Staff => &self.staff_submit_path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Prefix of the stable links derived from upload targets.
    pub public_mount: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            public_mount: DEFAULT_PUBLIC_MOUNT.into(),
        }
    }
}

/// Where the UI is sent after submission or an authorization failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub login_path: String,
    pub client_success_path: String,
    pub staff_success_path: String,
    pub redirect_delay_ms: u64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            login_path: "/login".into(),
            client_success_path: "/".into(),
            staff_success_path: "/needs-assessments".into(),
            redirect_delay_ms: 500,
        }
    }
}

impl NavigationConfig {
    pub fn success_path(&self, flow: FlowKind) -> &str {
        match flow {
            FlowKind::Client => &self.client_success_path,
            FlowKind::Staff => &self.staff_success_path,
        }
    }

    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }
}

/// Effective configuration of a needs-assessment session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeedsConfig {
    pub questionnaire: CategoryRules,
    pub attachments: AttachmentLimits,
    pub storage: StorageConfig,
    pub api: ApiConfig,
    pub navigation: NavigationConfig,
}

impl NeedsConfig {
    pub fn from_toml_str(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw, path)
    }

    /// Explicit path first, then the per-user config file, then defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_path(path);
        }
        match default_config_path() {
            Some(path) if path.is_file() => {
                tracing::debug!(path = %path.display(), "loading user config");
                Self::from_path(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// `<config dir>/needs-assessment/config.toml` for the current user.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("pl", "rental", "needs-assessment")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let raw = r#"
            [attachments]
            max_files = 3

            [questionnaire.aliases]
            "Zagęszczarki" = "Zagęszczarka"
        "#;
        let config = NeedsConfig::from_toml_str(raw, Path::new("inline.toml")).expect("parse");
        assert_eq!(config.attachments.max_files, 3);
        assert_eq!(
            config.attachments.max_file_size,
            needs_spec::DEFAULT_MAX_FILE_SIZE
        );
        assert_eq!(
            config.questionnaire.aliases.get("Zagęszczarki").map(String::as_str),
            Some("Zagęszczarka")
        );
        assert_eq!(
            config.questionnaire.accessory_suffix,
            needs_spec::DEFAULT_ACCESSORY_SUFFIX
        );
        assert_eq!(config.storage.public_mount, DEFAULT_PUBLIC_MOUNT);
    }

    #[test]
    fn round_trips_through_toml() {
        let config = NeedsConfig::default();
        let raw = config.to_toml_string().expect("encode");
        let parsed = NeedsConfig::from_toml_str(&raw, Path::new("roundtrip.toml")).expect("parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = NeedsConfig::load(Some(&dir.path().join("absent.toml"))).expect_err("missing");
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn flow_selects_submit_path() {
        let api = ApiConfig::default();
        assert_eq!(api.submit_path(FlowKind::Staff), "api/staff/needs-assessments");
        assert_eq!(api.submit_path(FlowKind::Client), "api/needs-assessments");
    }
}
