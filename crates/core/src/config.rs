use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TraceDeckError};

pub const DEFAULT_SOURCE_URL: &str = "http://127.0.0.1:8099";
pub const DEFAULT_API_PREFIX: &str = "api/frontend";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub source_url: String,
    pub api_prefix: String,
    /// Snapshot file to read instead of talking to `source_url`.
    pub source_file: Option<PathBuf>,
    pub source_headers: Vec<(String, String)>,
    pub request_timeout: Duration,
    pub track_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            source_file: None,
            source_headers: Vec::new(),
            request_timeout: Duration::from_secs(10),
            track_width: 48,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut cfg = Self::default();
        let config_path = config_file_path();
        if let Some(file_overrides) = load_file_overrides(&config_path)? {
            apply_overrides(&mut cfg, file_overrides, "config file")?;
        }
        let env_overrides = load_env_overrides()?;
        apply_overrides(&mut cfg, env_overrides, "environment")?;
        Ok(cfg)
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigOverrides {
    source_url: Option<String>,
    api_prefix: Option<String>,
    source_file: Option<PathBuf>,
    source_headers: Option<String>,
    request_timeout: Option<String>,
    track_width: Option<usize>,
}

fn config_file_path() -> PathBuf {
    if let Ok(path) = env::var("TRACEDECK_CONFIG") {
        return PathBuf::from(path);
    }

    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    let config_home = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(home).join(".config"));
    config_home.join("tracedeck/config.toml")
}

fn load_file_overrides(path: &Path) -> Result<Option<ConfigOverrides>> {
    if !path.exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(path)
        .map_err(|e| TraceDeckError::Config(format!("failed reading {}: {e}", path.display())))?;
    let parsed: ConfigOverrides = toml::from_str(&raw)
        .map_err(|e| TraceDeckError::Config(format!("failed parsing {}: {e}", path.display())))?;
    Ok(Some(parsed))
}

fn load_env_overrides() -> Result<ConfigOverrides> {
    let track_width = match env::var("TRACEDECK_TRACK_WIDTH") {
        Ok(v) => Some(v.parse::<usize>().map_err(|e| {
            TraceDeckError::Config(format!("bad TRACEDECK_TRACK_WIDTH in environment: {e}"))
        })?),
        Err(_) => None,
    };

    Ok(ConfigOverrides {
        source_url: env::var("TRACEDECK_SOURCE_URL").ok(),
        api_prefix: env::var("TRACEDECK_API_PREFIX").ok(),
        source_file: env::var("TRACEDECK_SOURCE_FILE").ok().map(PathBuf::from),
        source_headers: env::var("TRACEDECK_SOURCE_HEADERS").ok(),
        request_timeout: env::var("TRACEDECK_REQUEST_TIMEOUT").ok(),
        track_width,
    })
}

fn apply_overrides(cfg: &mut Config, overrides: ConfigOverrides, source: &str) -> Result<()> {
    if let Some(v) = overrides.source_url {
        cfg.source_url = v;
    }
    if let Some(v) = overrides.api_prefix {
        cfg.api_prefix = v;
    }
    if let Some(v) = overrides.source_file {
        cfg.source_file = Some(v);
    }
    if let Some(v) = overrides.source_headers {
        cfg.source_headers = parse_headers(&v).map_err(|e| {
            TraceDeckError::Config(format!("bad source_headers in {source}: {e} (value={v})"))
        })?;
    }
    if let Some(v) = overrides.request_timeout {
        cfg.request_timeout = humantime::parse_duration(&v).map_err(|e| {
            TraceDeckError::Config(format!("bad request_timeout in {source}: {e} (value={v})"))
        })?;
    }
    if let Some(v) = overrides.track_width {
        if v == 0 {
            return Err(TraceDeckError::Config(format!(
                "bad track_width in {source}: must be positive"
            )));
        }
        cfg.track_width = v;
    }
    Ok(())
}

/// Parses `key=value,key2=value2`.
pub fn parse_headers(raw: &str) -> Result<Vec<(String, String)>> {
    let mut out = Vec::new();
    for entry in raw.split(',') {
        let trimmed = entry.trim();
        if trimmed.is_empty() {
            continue;
        }
        let Some((key, value)) = trimmed.split_once('=') else {
            return Err(TraceDeckError::Config(
                "header entries must use key=value syntax".to_string(),
            ));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(TraceDeckError::Config(
                "header key cannot be empty".to_string(),
            ));
        }
        out.push((key.to_string(), value.trim().to_string()));
    }
    Ok(out)
}
