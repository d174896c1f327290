//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, builder::BoolishValueParser};
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "spurgo";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3100;
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_EDGE_ENDPOINT: &str = "https://teo.tencentcloudapi.com";
const DEFAULT_EDGE_TIMEOUT_SECS: u64 = 10;

/// Command-line arguments for the spurgo binary.
#[derive(Debug, Parser)]
#[command(name = "spurgo", version, about = "Edge-cache purge sidecar")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "SPURGO_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the webhook and admin HTTP service.
    Serve(Box<ServeArgs>),
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Override the site base URL used for the purge-host fallback.
    #[arg(long = "site-base-url", value_name = "URL")]
    pub site_base_url: Option<String>,

    /// Override the data directory holding settings and history.
    #[arg(long = "data-dir", value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Override the edge purge API endpoint; an empty value disables purging.
    #[arg(long = "edge-endpoint", value_name = "URL")]
    pub edge_endpoint: Option<String>,

    /// Override the edge request timeout.
    #[arg(long = "edge-timeout-seconds", value_name = "SECONDS")]
    pub edge_timeout_seconds: Option<u64>,

    /// Toggle URL encoding of purge targets.
    #[arg(
        long = "edge-encode-urls",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub edge_encode_urls: Option<bool>,

    /// Override the admin bearer token.
    #[arg(long = "admin-token", env = "SPURGO_ADMIN_TOKEN", value_name = "TOKEN")]
    pub admin_token: Option<String>,
}

/// Fully-resolved deployment settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub site: SiteSettings,
    pub storage: StorageSettings,
    pub edge: EdgeClientSettings,
    pub admin: AdminSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub addr: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct SiteSettings {
    /// Public base URL of the site whose content is being purged; its host is
    /// the fallback target for first-publish purges.
    pub base_url: Option<Url>,
}

#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct EdgeClientSettings {
    /// `None` disables the remote client entirely.
    pub endpoint: Option<String>,
    pub timeout: Duration,
    pub encode_urls: bool,
}

#[derive(Debug, Clone)]
pub struct AdminSettings {
    pub token: Option<String>,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix("SPURGO").separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    match cli.command.as_ref() {
        Some(Command::Serve(args)) => raw.apply_serve_overrides(&args.overrides),
        None => raw.apply_serve_overrides(&ServeOverrides::default()),
    }

    Settings::from_raw(raw)
}

/// Resolve configuration using the supplied CLI arguments, returning both for
/// downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    server: RawServerSettings,
    logging: RawLoggingSettings,
    site: RawSiteSettings,
    storage: RawStorageSettings,
    edge: RawEdgeSettings,
    admin: RawAdminSettings,
}

impl RawSettings {
    fn apply_serve_overrides(&mut self, overrides: &ServeOverrides) {
        if let Some(host) = overrides.server_host.as_ref() {
            self.server.host = Some(host.clone());
        }
        if let Some(port) = overrides.server_port {
            self.server.port = Some(port);
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
        if let Some(base_url) = overrides.site_base_url.as_ref() {
            self.site.base_url = Some(base_url.clone());
        }
        if let Some(data_dir) = overrides.data_dir.as_ref() {
            self.storage.data_dir = Some(data_dir.clone());
        }
        if let Some(endpoint) = overrides.edge_endpoint.as_ref() {
            self.edge.endpoint = Some(endpoint.clone());
        }
        if let Some(timeout) = overrides.edge_timeout_seconds {
            self.edge.timeout_seconds = Some(timeout);
        }
        if let Some(encode) = overrides.edge_encode_urls {
            self.edge.encode_urls = Some(encode);
        }
        if let Some(token) = overrides.admin_token.as_ref() {
            self.admin.token = Some(token.clone());
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            server,
            logging,
            site,
            storage,
            edge,
            admin,
        } = raw;

        Ok(Self {
            server: build_server_settings(server)?,
            logging: build_logging_settings(logging)?,
            site: build_site_settings(site)?,
            storage: build_storage_settings(storage),
            edge: build_edge_settings(edge)?,
            admin: build_admin_settings(admin),
        })
    }
}

fn build_server_settings(server: RawServerSettings) -> Result<ServerSettings, LoadError> {
    let host = server.host.unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = server.port.unwrap_or(DEFAULT_PORT);
    if port == 0 {
        return Err(LoadError::invalid(
            "server.port",
            "port must be greater than zero",
        ));
    }

    let candidate = format!("{host}:{port}");
    let addr = candidate
        .parse()
        .map_err(|err| LoadError::invalid("server.addr", format!("invalid address `{candidate}`: {err}")))?;

    Ok(ServerSettings { addr })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_site_settings(site: RawSiteSettings) -> Result<SiteSettings, LoadError> {
    let base_url = match site.base_url {
        Some(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                let url = Url::parse(trimmed).map_err(|err| {
                    LoadError::invalid("site.base_url", format!("failed to parse: {err}"))
                })?;
                if url.host_str().is_none() {
                    return Err(LoadError::invalid(
                        "site.base_url",
                        "URL must include a host",
                    ));
                }
                Some(url)
            }
        }
        None => None,
    };

    Ok(SiteSettings { base_url })
}

fn build_storage_settings(storage: RawStorageSettings) -> StorageSettings {
    StorageSettings {
        data_dir: storage
            .data_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
    }
}

fn build_edge_settings(edge: RawEdgeSettings) -> Result<EdgeClientSettings, LoadError> {
    // An explicitly empty endpoint disables the remote client; absence keeps
    // the vendor default.
    let endpoint = match edge.endpoint {
        Some(value) => {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        None => Some(DEFAULT_EDGE_ENDPOINT.to_string()),
    };

    let timeout_seconds = edge.timeout_seconds.unwrap_or(DEFAULT_EDGE_TIMEOUT_SECS);
    if timeout_seconds == 0 {
        return Err(LoadError::invalid(
            "edge.timeout_seconds",
            "must be greater than zero",
        ));
    }

    Ok(EdgeClientSettings {
        endpoint,
        timeout: Duration::from_secs(timeout_seconds),
        encode_urls: edge.encode_urls.unwrap_or(true),
    })
}

fn build_admin_settings(admin: RawAdminSettings) -> AdminSettings {
    let token = admin.token.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    });
    AdminSettings { token }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawServerSettings {
    host: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSiteSettings {
    base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawStorageSettings {
    data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawEdgeSettings {
    endpoint: Option<String>,
    timeout_seconds: Option<u64>,
    encode_urls: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawAdminSettings {
    token: Option<String>,
}
