use crate::error::{ConfigParseSnafu, ConfigReadSnafu, Error, Result};
use log::warn;
use secrecy::SecretString;
use serde::Deserialize;
use snafu::ResultExt;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_PATH_ENV: &str = "DAPLA_CONFIG";
const AUTHTOKEN_ENV: &str = "DAPLA_AUTHTOKEN";
const JUPYTER_ENV: &str = "DAPLA_JUPYTER";
const DEBUG_ENV: &str = "DAPLA_DEBUG";
const API_ENV_PREFIX: &str = "DAPLA_API_";

fn env_value(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

fn env_flag(key: &str, get: &dyn Fn(&str) -> Option<String>) -> Option<bool> {
    get(key).map(|raw| matches!(raw.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}

/// Environment variable that overrides the URL of API `name`,
/// e.g. `data-maintenance` -> `DAPLA_API_DATA_MAINTENANCE`.
pub fn api_env_key(name: &str) -> String {
    format!(
        "{API_ENV_PREFIX}{}",
        name.replace('-', "_").to_ascii_uppercase()
    )
}

/// On-disk configuration file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConfigFile {
    pub debug: Option<bool>,
    pub jupyter: Option<bool>,
    pub authtoken: Option<String>,
    pub apis: BTreeMap<String, String>,
}

impl ConfigFile {
    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        toml::from_str(content).context(ConfigParseSnafu { path })
    }

    /// Read the file at `path`. A missing file yields `None` unless `required`.
    pub fn load(path: &Path, required: bool) -> Result<Option<Self>> {
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(path, &content).map(Some),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound && !required => {
                log::debug!("config file {} not found, using defaults", path.display());
                Ok(None)
            }
            Err(source) => Err(source).context(ConfigReadSnafu { path }),
        }
    }
}

/// Settings taken from the command line; `None`/`false` defers to other sources.
#[derive(Debug, Clone, Default)]
pub struct ConfigRequest {
    pub config_path: Option<PathBuf>,
    pub authtoken: Option<SecretString>,
    pub jupyter: bool,
    pub debug: bool,
    pub api_overrides: Vec<(String, String)>,
}

/// Effective configuration after merging flags, environment and file.
#[derive(Debug, Clone, Default)]
pub struct ResolvedConfig {
    pub config_path: PathBuf,
    pub config_loaded: bool,
    pub debug: bool,
    pub jupyter: bool,
    pub authtoken: Option<SecretString>,
    pub apis: BTreeMap<String, String>,
}

pub fn resolve(request: ConfigRequest) -> Result<ResolvedConfig> {
    resolve_from_source(request, &env_value)
}

fn resolve_from_source(
    request: ConfigRequest,
    get: &dyn Fn(&str) -> Option<String>,
) -> Result<ResolvedConfig> {
    let explicit = request
        .config_path
        .clone()
        .or_else(|| get(CONFIG_PATH_ENV).map(PathBuf::from));
    let required = explicit.is_some();
    let config_path = explicit.unwrap_or_else(default_config_path);

    let file = ConfigFile::load(&config_path, required)?;
    let config_loaded = file.is_some();
    let file = file.unwrap_or_default();

    let debug = request.debug || env_flag(DEBUG_ENV, get).or(file.debug).unwrap_or(false);
    let jupyter = request.jupyter || env_flag(JUPYTER_ENV, get).or(file.jupyter).unwrap_or(false);

    let authtoken = request.authtoken.or_else(|| {
        get(AUTHTOKEN_ENV)
            .or(file.authtoken.filter(|t| !t.trim().is_empty()))
            .map(|t| SecretString::new(t.into()))
    });

    let mut apis = file.apis;
    for name in super::apis::KNOWN_APIS {
        if let Some(url) = get(&api_env_key(name)) {
            apis.insert(name.to_string(), url);
        }
    }
    for (name, url) in request.api_overrides {
        apis.insert(name, url);
    }

    Ok(ResolvedConfig {
        config_path,
        config_loaded,
        debug,
        jupyter,
        authtoken,
        apis,
    })
}

/// Parse a `name=value` command-line pair.
pub fn parse_key_value(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{raw}'")),
    }
}

pub fn default_config_path() -> PathBuf {
    directories::BaseDirs::new()
        .map(|base_dirs| {
            base_dirs
                .home_dir()
                .join(".config")
                .join("dapla-cli")
                .join("config.toml")
        })
        .unwrap_or_else(|| {
            warn!("unable to determine home directory, looking for config in current directory");
            env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join("dapla-cli.toml")
        })
}

impl ResolvedConfig {
    pub fn ensure_api(&self, name: &str) -> Result<&str> {
        self.apis
            .get(name)
            .map(String::as_str)
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| Error::MissingApiUrl {
                api: name.to_string(),
            })
    }
}
