//! Configuration
//!
//! Values are resolved as defaults, then the TOML config file, then
//! command-line flags and environment variables.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::api::{DEFAULT_API_BASE, DEFAULT_PAGE_SIZE};
use crate::error::ConfigError;
use crate::persist::FileStore;
use crate::state::{FetchOrdering, ViewSettings};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Directory holding stored preferences.
    #[serde(default = "FileStore::default_dir")]
    pub data_dir: PathBuf,

    /// Log destination; `<data_dir>/pokeview.log` when unset.
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Drop fetch results that are not from the latest issued request.
    #[serde(default)]
    pub strict_ordering: bool,

    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            page_size: default_page_size(),
            data_dir: FileStore::default_dir(),
            log_file: None,
            log_level: default_log_level(),
            strict_ordering: false,
            request_timeout_secs: None,
        }
    }
}

/// Command-line and environment overrides, flattened into the binary's args.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Config file (TOML)
    #[arg(long, env = "POKEVIEW_CONFIG")]
    pub config: Option<PathBuf>,

    /// Catalog endpoint
    #[arg(long, env = "POKEVIEW_API_BASE")]
    pub api_base: Option<String>,

    /// Entries per page
    #[arg(long, env = "POKEVIEW_PAGE_SIZE", value_parser = clap::value_parser!(u32).range(1..))]
    pub page_size: Option<u32>,

    /// Directory for favorites and theme
    #[arg(long, env = "POKEVIEW_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log file path
    #[arg(long, env = "POKEVIEW_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Log filter (overridden by RUST_LOG)
    #[arg(long, env = "POKEVIEW_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Only apply results of the most recent request
    #[arg(long, env = "POKEVIEW_STRICT_ORDERING")]
    pub strict_ordering: bool,

    /// Per-request timeout in seconds
    #[arg(long, env = "POKEVIEW_REQUEST_TIMEOUT")]
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    /// Read the config file, falling back to defaults.
    ///
    /// An explicit `path` must exist. Without one, the platform config
    /// location is used when a file is present there.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve the full configuration from command-line arguments.
    pub fn resolve(args: &ConfigArgs) -> Result<Self, ConfigError> {
        let mut config = Self::load(args.config.as_deref())?;
        config.apply(args);
        Ok(config)
    }

    pub fn apply(&mut self, args: &ConfigArgs) {
        if let Some(api_base) = &args.api_base {
            self.api_base = api_base.clone();
        }
        if let Some(page_size) = args.page_size {
            self.page_size = page_size;
        }
        if let Some(data_dir) = &args.data_dir {
            self.data_dir = data_dir.clone();
        }
        if let Some(log_file) = &args.log_file {
            self.log_file = Some(log_file.clone());
        }
        if let Some(log_level) = &args.log_level {
            self.log_level = log_level.clone();
        }
        if args.strict_ordering {
            self.strict_ordering = true;
        }
        if let Some(secs) = args.request_timeout_secs {
            self.request_timeout_secs = Some(secs);
        }
    }

    pub fn ordering(&self) -> FetchOrdering {
        if self.strict_ordering {
            FetchOrdering::LatestIssued
        } else {
            FetchOrdering::LastResolved
        }
    }

    pub fn view_settings(&self) -> ViewSettings {
        ViewSettings::new(&self.api_base, self.page_size, self.ordering())
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join("pokeview.log"))
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs_next::config_dir().map(|dir| dir.join("pokeview").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::parse("", Path::new("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.page_size, 24);
        assert_eq!(config.ordering(), FetchOrdering::LastResolved);
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
api_base = "http://localhost:9000/pokemon"
page_size = 12
data_dir = "/tmp/pokeview-test"
strict_ordering = true
request_timeout_secs = 5
"#
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();

        assert_eq!(config.api_base, "http://localhost:9000/pokemon");
        assert_eq!(config.page_size, 12);
        assert_eq!(config.ordering(), FetchOrdering::LatestIssued);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(
            config.log_path(),
            PathBuf::from("/tmp/pokeview-test/pokeview.log")
        );
        assert_eq!(
            config.view_settings().start_cursor,
            "http://localhost:9000/pokemon?limit=12&offset=0"
        );
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let err = Config::parse("page_size = \"many\"", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn args_override_file() {
        let mut config = Config {
            page_size: 12,
            ..Config::default()
        };
        config.apply(&ConfigArgs {
            page_size: Some(48),
            log_level: Some("debug".into()),
            strict_ordering: true,
            ..ConfigArgs::default()
        });
        assert_eq!(config.page_size, 48);
        assert_eq!(config.log_level, "debug");
        assert!(config.strict_ordering);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
    }
}
