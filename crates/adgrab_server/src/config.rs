use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use log::LevelFilter;
use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("headless extraction requested but this build lacks the `headless` feature")]
    HeadlessUnavailable,
    #[error("failed to build http client: {0}")]
    Client(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractMode {
    /// Parse the HTML returned by a plain GET.
    Static,
    /// Render the page in headless Chromium and parse the DOM snapshot.
    Headless,
}

impl FromStr for ExtractMode {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "static" | "http" => Ok(ExtractMode::Static),
            "headless" | "browser" => Ok(ExtractMode::Headless),
            other => Err(format!("expected `static` or `headless`, got `{other}`")),
        }
    }
}

/// Process configuration, read once at startup from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
    pub extract_mode: ExtractMode,
    pub page_timeout: Duration,
    pub image_timeout: Duration,
    pub max_archive_bytes: u64,
    pub log_level: LevelFilter,
    pub log_file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            extract_mode: ExtractMode::Static,
            page_timeout: Duration::from_secs(15),
            image_timeout: Duration::from_secs(20),
            max_archive_bytes: 200 * 1024 * 1024,
            log_level: LevelFilter::Info,
            log_file: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(raw) = get("PORT") {
            config.port = parse("PORT", &raw)?;
        }
        if let Some(raw) = get("ADGRAB_BIND") {
            config.bind = parse("ADGRAB_BIND", &raw)?;
        }
        if let Some(raw) = get("ADGRAB_EXTRACT_MODE") {
            config.extract_mode = parse("ADGRAB_EXTRACT_MODE", &raw)?;
        }
        if let Some(raw) = get("ADGRAB_PAGE_TIMEOUT_SECS") {
            config.page_timeout = parse_secs("ADGRAB_PAGE_TIMEOUT_SECS", &raw)?;
        }
        if let Some(raw) = get("ADGRAB_IMAGE_TIMEOUT_SECS") {
            config.image_timeout = parse_secs("ADGRAB_IMAGE_TIMEOUT_SECS", &raw)?;
        }
        if let Some(raw) = get("ADGRAB_MAX_ARCHIVE_MB") {
            let mb: u64 = parse("ADGRAB_MAX_ARCHIVE_MB", &raw)?;
            config.max_archive_bytes = mb.saturating_mul(1024 * 1024);
        }
        if let Some(raw) = get("ADGRAB_LOG") {
            config.log_level =
                engine_logging::parse_level_filter(&raw).ok_or_else(|| ConfigError::Invalid {
                    key: "ADGRAB_LOG",
                    value: raw.clone(),
                    reason: "unknown log level".to_string(),
                })?;
        }
        config.log_file = get("ADGRAB_LOG_FILE").map(PathBuf::from);

        Ok(config)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

fn parse<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
{
    raw.trim().parse::<T>().map_err(|err| ConfigError::Invalid {
        key,
        value: raw.to_string(),
        reason: err.to_string(),
    })
}

fn parse_secs(key: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    let secs: u64 = parse(key, raw)?;
    if secs == 0 {
        return Err(ConfigError::Invalid {
            key,
            value: raw.to_string(),
            reason: "timeout must be at least one second".to_string(),
        });
    }
    Ok(Duration::from_secs(secs))
}
