use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "autosplit.toml",
    "config/autosplit.toml",
    "crates/config/autosplit.toml",
    "../autosplit.toml",
    "../config/autosplit.toml",
    "../crates/config/autosplit.toml",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    pub realtime: RealtimeConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            database: DatabaseConfig::default(),
            realtime: RealtimeConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub address: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://autosplit.db".to_string(),
            max_connections: 10,
        }
    }
}

/// Tuning for the per-group realtime channels and the summary read path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Capacity of each connected session's outbound event queue. A session
    /// that falls this many events behind is disconnected rather than
    /// backpressuring the room.
    #[serde(default = "RealtimeConfig::default_session_queue_capacity")]
    pub session_queue_capacity: usize,
    /// How long a summary read waits before its single retry when the
    /// caller asked for a ledger version the first read did not observe.
    #[serde(default = "RealtimeConfig::default_summary_retry_delay_ms")]
    pub summary_retry_delay_ms: u64,
}

impl RealtimeConfig {
    const fn default_session_queue_capacity() -> usize {
        64
    }

    const fn default_summary_retry_delay_ms() -> u64 {
        200
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            session_queue_capacity: Self::default_session_queue_capacity(),
            summary_retry_delay_ms: Self::default_summary_retry_delay_ms(),
        }
    }
}

/// Load the application configuration by combining defaults, files, and
/// environment overrides.
///
/// ```
/// use autosplit_config::load;
///
/// std::env::remove_var("AUTOSPLIT_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.http.address.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let mut builder = config::Config::builder();
    builder = builder
        .set_default("http.address", defaults.http.address.clone())
        .unwrap()
        .set_default("http.port", i64::from(defaults.http.port))
        .unwrap()
        .set_default("database.url", defaults.database.url.clone())
        .unwrap()
        .set_default(
            "database.max_connections",
            i64::from(defaults.database.max_connections),
        )
        .unwrap()
        .set_default(
            "realtime.session_queue_capacity",
            defaults.realtime.session_queue_capacity as i64,
        )
        .unwrap()
        .set_default(
            "realtime.summary_retry_delay_ms",
            i64::try_from(defaults.realtime.summary_retry_delay_ms).unwrap_or(i64::MAX),
        )
        .unwrap();

    let environment_overrides = config::Environment::with_prefix("AUTOSPLIT").separator("__");

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("AUTOSPLIT_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via AUTOSPLIT_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    debug!(?config, "loaded backend configuration");
    Ok(config)
}
