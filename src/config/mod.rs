use crate::http::HttpConfig;
use anyhow::{Context, Result};
use serde::Deserialize;

/// Environment variable overriding `http.timeout_secs`.
pub const ENV_HTTP_TIMEOUT: &str = "WAKFLO_HTTP_TIMEOUT_SECS";
/// Environment variable overriding `http.user_agent`.
pub const ENV_USER_AGENT: &str = "WAKFLO_USER_AGENT";
/// Environment variable overriding `log.filter`.
pub const ENV_LOG: &str = "WAKFLO_LOG";

/// Complete connector runtime configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WakfloConfig {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "wakflo=info,wakflo_connectors=info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl WakfloConfig {
    /// Loads `path` if given, otherwise defaults; then applies env overrides.
    pub fn from_env_or_default(path: Option<&str>) -> Result<Self> {
        let mut config = match path {
            Some(path) => load_config(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Applies `WAKFLO_*` environment variables on top of the loaded values.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(raw) = std::env::var(ENV_HTTP_TIMEOUT) {
            self.http.timeout_secs = raw
                .trim()
                .parse()
                .with_context(|| format!("{} must be a number of seconds", ENV_HTTP_TIMEOUT))?;
        }
        if let Ok(agent) = std::env::var(ENV_USER_AGENT) {
            if !agent.trim().is_empty() {
                self.http.user_agent = agent;
            }
        }
        if let Ok(filter) = std::env::var(ENV_LOG) {
            if !filter.trim().is_empty() {
                self.log.filter = filter;
            }
        }
        Ok(())
    }
}

/// Load configuration from TOML file
pub fn load_config(path: &str) -> Result<WakfloConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path))?;
    let config: WakfloConfig =
        toml::from_str(&contents).with_context(|| format!("Failed to parse config file {}", path))?;
    Ok(config)
}

/// Initializes the global tracing subscriber (binaries only).
pub fn init_tracing(log: &LogConfig) {
    let filter = tracing_subscriber::EnvFilter::try_new(&log.filter)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_log_filter()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    // Serialize all env-var-mutating tests; the process env is shared.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_default_config() {
        let config = WakfloConfig::default();
        assert_eq!(config.http.timeout_secs, 30);
        assert!(config.http.user_agent.starts_with("wakflo-connectors/"));
        assert_eq!(config.log.filter, "wakflo=info,wakflo_connectors=info");
    }

    #[test]
    fn test_load_config_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[http]\ntimeout_secs = 5").unwrap();

        let config = load_config(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.http.timeout_secs, 5);
        assert!(config.http.user_agent.starts_with("wakflo-connectors/"));
        assert_eq!(config.log.filter, default_log_filter());
    }

    #[test]
    fn test_load_config_full() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[http]\ntimeout_secs = 10\nuser_agent = \"acme/1.0\"\n\n[log]\nfilter = \"debug\""
        )
        .unwrap();

        let config = load_config(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.http.timeout_secs, 10);
        assert_eq!(config.http.user_agent, "acme/1.0");
        assert_eq!(config.log.filter, "debug");
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config("/nonexistent/wakflo.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/wakflo.toml"));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[http\ntimeout_secs = ").unwrap();
        assert!(load_config(file.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let _lock = ENV_LOCK.lock().unwrap();
        std::env::set_var(ENV_HTTP_TIMEOUT, "7");
        std::env::set_var(ENV_USER_AGENT, "ci-agent");
        std::env::set_var(ENV_LOG, "wakflo=debug");

        let config = WakfloConfig::from_env_or_default(None).unwrap();
        assert_eq!(config.http.timeout_secs, 7);
        assert_eq!(config.http.user_agent, "ci-agent");
        assert_eq!(config.log.filter, "wakflo=debug");

        std::env::remove_var(ENV_HTTP_TIMEOUT);
        std::env::remove_var(ENV_USER_AGENT);
        std::env::remove_var(ENV_LOG);
    }

    #[test]
    fn test_env_override_invalid_timeout() {
        let _lock = ENV_LOCK.lock().unwrap();
        std::env::set_var(ENV_HTTP_TIMEOUT, "soon");

        let err = WakfloConfig::from_env_or_default(None).unwrap_err();
        assert!(err.to_string().contains(ENV_HTTP_TIMEOUT));

        std::env::remove_var(ENV_HTTP_TIMEOUT);
    }
}
