use clap::{Parser, builder::BoolishValueParser};
use earnings_core::source::alphavantage::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use earnings_core::source::AlphaVantageConfig;
use earnings_mcp::server::McpHttpServerConfig;
use earnings_trigger::{DEFAULT_TRIGGER_ADDR, TriggerServerConfig};
use std::error::Error;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_TRIGGER_TIMEOUT_SECS: u64 = 30;

const ENV_FILE_VAR: &str = "EARNINGS_ENV_FILE";
/// Set by the function host when running in production.
const HOSTED_MARKER_VAR: &str = "WEBSITE_INSTANCE_ID";

#[derive(Parser, Debug)]
#[command(name = "earnings-mcpd", version, about = "Earnings MCP daemon.")]
#[allow(clippy::struct_excessive_bools)]
struct CliArgs {
    #[arg(long, env = "ALPHAVANTAGE_API_KEY", hide_env_values = true)]
    alphavantage_api_key: Option<String>,

    #[arg(long, env = "ALPHAVANTAGE_BASE_URL", default_value = DEFAULT_BASE_URL)]
    alphavantage_base_url: String,

    #[arg(
        long,
        env = "ALPHAVANTAGE_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    alphavantage_timeout_secs: u64,

    #[arg(
        long = "stdio",
        env = "EARNINGS_ENABLE_STDIO",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    enable_stdio: bool,

    #[arg(
        long,
        env = "EARNINGS_MCP_SERVE",
        default_value_t = true,
        value_parser = BoolishValueParser::new()
    )]
    mcp_serve: bool,

    #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
    host: IpAddr,

    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    #[arg(
        long,
        env = "EARNINGS_MCP_STATELESS",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    mcp_stateless: bool,

    #[arg(
        long,
        env = "EARNINGS_TRIGGER_SERVE",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    trigger_serve: bool,

    #[arg(long, env = "EARNINGS_TRIGGER_ADDR", default_value = DEFAULT_TRIGGER_ADDR)]
    trigger_addr: SocketAddr,

    #[arg(
        long,
        env = "EARNINGS_TRIGGER_TIMEOUT_SECS",
        default_value_t = DEFAULT_TRIGGER_TIMEOUT_SECS
    )]
    trigger_timeout_secs: u64,
}

/// Runtime configuration loaded from CLI arguments and environment variables.
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct EarningsConfig {
    pub alphavantage: AlphaVantageConfig,
    pub enable_stdio: bool,
    pub mcp_serve: bool,
    pub mcp_http: McpHttpServerConfig,
    pub trigger_serve: bool,
    pub trigger: TriggerServerConfig,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidSetting { name: &'static str, value: String },
    NoTransport,
    EnvFile { path: PathBuf, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSetting { name, value } => {
                write!(f, "invalid {name} value: {value}")
            }
            Self::NoTransport => write!(
                f,
                "no transport enabled (set EARNINGS_MCP_SERVE, EARNINGS_ENABLE_STDIO or EARNINGS_TRIGGER_SERVE)"
            ),
            Self::EnvFile { path, message } => {
                write!(f, "failed to load env file {}: {message}", path.display())
            }
        }
    }
}

impl Error for ConfigError {}

impl EarningsConfig {
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::try_from(args)
    }
}

impl TryFrom<CliArgs> for EarningsConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.alphavantage_base_url.trim().is_empty() {
            return Err(ConfigError::InvalidSetting {
                name: "ALPHAVANTAGE_BASE_URL",
                value: args.alphavantage_base_url,
            });
        }
        if args.alphavantage_timeout_secs == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "ALPHAVANTAGE_TIMEOUT_SECS",
                value: args.alphavantage_timeout_secs.to_string(),
            });
        }
        if args.trigger_timeout_secs == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "EARNINGS_TRIGGER_TIMEOUT_SECS",
                value: args.trigger_timeout_secs.to_string(),
            });
        }
        if !(args.mcp_serve || args.enable_stdio || args.trigger_serve) {
            return Err(ConfigError::NoTransport);
        }

        let alphavantage = AlphaVantageConfig::new(args.alphavantage_api_key)
            .with_base_url(args.alphavantage_base_url)
            .with_timeout(Duration::from_secs(args.alphavantage_timeout_secs));
        let mcp_http = McpHttpServerConfig::new(SocketAddr::new(args.host, args.port))
            .with_stateful_mode(!args.mcp_stateless);
        let trigger = TriggerServerConfig::new(args.trigger_addr)
            .with_request_timeout(Duration::from_secs(args.trigger_timeout_secs));

        Ok(Self {
            alphavantage,
            enable_stdio: args.enable_stdio,
            mcp_serve: args.mcp_serve,
            mcp_http,
            trigger_serve: args.trigger_serve,
            trigger,
        })
    }
}

/// Loads the first env file that exists, without overriding variables
/// already set in the process environment.
///
/// An explicit `EARNINGS_ENV_FILE` must exist.
pub fn load_env_file() -> Result<Option<PathBuf>, ConfigError> {
    let explicit = std::env::var_os(ENV_FILE_VAR).map(PathBuf::from);
    let hosted = std::env::var_os(HOSTED_MARKER_VAR).is_some();

    if let Some(path) = &explicit
        && !path.is_file()
    {
        return Err(ConfigError::EnvFile {
            path: path.clone(),
            message: "file not found".to_string(),
        });
    }

    let Some(path) = env_file_candidates(explicit, hosted)
        .into_iter()
        .find(|path| path.is_file())
    else {
        return Ok(None);
    };
    dotenvy::from_path(&path).map_err(|err| ConfigError::EnvFile {
        path: path.clone(),
        message: err.to_string(),
    })?;
    Ok(Some(path))
}

fn env_file_candidates(explicit: Option<PathBuf>, hosted: bool) -> Vec<PathBuf> {
    if let Some(path) = explicit {
        return vec![path];
    }
    let config_dir = Path::new("config");
    let profile = if hosted { ".env.prod" } else { ".env.dev" };
    vec![config_dir.join(profile), PathBuf::from(".env")]
}
