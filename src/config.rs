use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";
const FALLBACK_CONFIG_PATH: &str = "configs/config.yaml";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_WORKERS: usize = 4;

/// Errors encountered while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        /// Path that was opened.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The configuration file is not valid YAML for the expected keys.
    #[error("Failed to parse configuration file {path}: {source}")]
    Parse {
        /// Path that was parsed.
        path: PathBuf,
        /// Underlying YAML failure.
        #[source]
        source: serde_yaml::Error,
    },
    /// No API key was supplied by the file or the environment.
    #[error("FLOWKIT_API_KEY is missing in the configuration")]
    MissingApiKey,
    /// A value could not be parsed.
    #[error("Invalid value for configuration key: {0}")]
    InvalidValue(String),
    /// Only one of the TLS certificate and key paths was provided.
    #[error("FLOWKIT_SSL_CERT_FILE and FLOWKIT_SSL_KEY_FILE must be set together")]
    IncompleteTls,
}

/// Runtime configuration for the Flowkit service.
///
/// Built once at startup and handed to the components that need it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Secret expected in the `api-key` header.
    pub api_key: String,
    /// Interface the HTTP server binds to.
    pub host: String,
    /// Port the HTTP server binds to.
    pub port: u16,
    /// Number of runtime worker threads.
    pub workers: usize,
    /// Certificate and key for HTTPS; plain HTTP when absent.
    pub tls: Option<TlsConfig>,
}

/// PEM-encoded certificate chain and private key locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsConfig {
    /// Certificate chain file.
    pub cert_path: PathBuf,
    /// Private key file.
    pub key_path: PathBuf,
}

/// Keys accepted in the YAML configuration file.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(rename = "FLOWKIT_API_KEY")]
    api_key: Option<String>,
    #[serde(rename = "FLOWKIT_HOST")]
    host: Option<String>,
    #[serde(rename = "FLOWKIT_PORT")]
    port: Option<u16>,
    #[serde(rename = "FLOWKIT_WORKERS")]
    workers: Option<usize>,
    #[serde(rename = "FLOWKIT_SSL_CERT_FILE")]
    ssl_cert_file: Option<PathBuf>,
    #[serde(rename = "FLOWKIT_SSL_KEY_FILE")]
    ssl_key_file: Option<PathBuf>,
}

impl Config {
    /// Configuration with defaults for everything but the API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            workers: DEFAULT_WORKERS,
            tls: None,
        }
    }

    /// Load configuration from the YAML file and environment variables.
    ///
    /// Call after `.env` has been loaded so its values count as environment variables.
    /// The file is `path` when given, else `FLOWKIT_CONFIG_PATH`, else `config.yaml` with
    /// `configs/config.yaml` as a fallback. A missing file is tolerated; environment variables
    /// override file values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| load_env_optional("FLOWKIT_CONFIG_PATH").map(PathBuf::from));
        let file = match explicit {
            Some(path) => Some(read_file(&path)?.ok_or_else(|| ConfigError::Read {
                source: std::io::ErrorKind::NotFound.into(),
                path,
            })?),
            None => match read_file(Path::new(DEFAULT_CONFIG_PATH))? {
                Some(file) => Some(file),
                None => {
                    tracing::debug!(
                        "Configuration file not found at {DEFAULT_CONFIG_PATH}; trying {FALLBACK_CONFIG_PATH}"
                    );
                    read_file(Path::new(FALLBACK_CONFIG_PATH))?
                }
            },
        };
        let config = Self::from_sources(file.unwrap_or_default(), load_env_optional)?;
        tracing::debug!(
            host = %config.host,
            port = config.port,
            workers = config.workers,
            tls = config.tls.is_some(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Parse configuration from YAML text, with no environment overrides.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let file = parse_file(Path::new("<inline>"), yaml)?;
        Self::from_sources(file, |_| None)
    }

    fn from_sources(
        file: FileConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let api_key = lookup("FLOWKIT_API_KEY")
            .or(file.api_key)
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;
        let host = lookup("FLOWKIT_HOST")
            .or(file.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_override(&lookup, "FLOWKIT_PORT")?
            .or(file.port)
            .unwrap_or(DEFAULT_PORT);
        let workers = parse_override(&lookup, "FLOWKIT_WORKERS")?
            .or(file.workers)
            .unwrap_or(DEFAULT_WORKERS);
        if workers == 0 {
            return Err(ConfigError::InvalidValue("FLOWKIT_WORKERS".into()));
        }

        let cert = lookup("FLOWKIT_SSL_CERT_FILE")
            .map(PathBuf::from)
            .or(file.ssl_cert_file);
        let key = lookup("FLOWKIT_SSL_KEY_FILE")
            .map(PathBuf::from)
            .or(file.ssl_key_file);
        let tls = match (cert, key) {
            (Some(cert_path), Some(key_path)) => Some(TlsConfig {
                cert_path,
                key_path,
            }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteTls),
        };

        Ok(Self {
            api_key,
            host,
            port,
            workers,
            tls,
        })
    }
}

fn read_file(path: &Path) -> Result<Option<FileConfig>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => parse_file(path, &contents).map(Some),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn parse_file(path: &Path, contents: &str) -> Result<FileConfig, ConfigError> {
    if contents.trim().is_empty() {
        return Ok(FileConfig::default());
    }
    serde_yaml::from_str(contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_override<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    lookup(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key.to_string()))
        })
        .transpose()
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
