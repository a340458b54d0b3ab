use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Deployment stage, used to pick logging defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Environment-driven settings for the clearance service.
///
/// Recognized variables: `APP_ENV`, `APP_HOST`, `APP_PORT`,
/// `APP_LOG_LEVEL`, and `APP_SEED_DEMO`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub demo: DemoConfig,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_flag(key: &str) -> bool {
    matches!(
        env::var(key)
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
            .as_str(),
        "1" | "true" | "yes" | "on"
    )
}

impl AppConfig {
    /// Read configuration from the process environment, after loading any
    /// `.env` file in the working directory.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port = env_or("APP_PORT", "3000");
        let port = port
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort { value: port })?;

        Ok(Self {
            environment: AppEnvironment::parse(&env_or("APP_ENV", "development")),
            server: ServerConfig {
                host: env_or("APP_HOST", "127.0.0.1"),
                port,
            },
            telemetry: TelemetryConfig {
                log_level: env_or("APP_LOG_LEVEL", "info"),
            },
            demo: DemoConfig {
                seed_on_start: env_flag("APP_SEED_DEMO"),
            },
        })
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// `localhost` is accepted as an alias for the IPv4 loopback address;
    /// anything else must be a literal IP.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = match self.host.trim() {
            host if host.eq_ignore_ascii_case("localhost") => IpAddr::V4(Ipv4Addr::LOCALHOST),
            host => host.parse().map_err(|source| ConfigError::InvalidHost {
                value: host.to_string(),
                source,
            })?,
        };
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls; the level is expanded by `telemetry::init`.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Demo-data controls for the service binary.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    /// Preload the fixture roster at startup, same as `serve --seed`.
    pub seed_on_start: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("APP_PORT '{value}' is not a valid port number")]
    InvalidPort { value: String },
    #[error("APP_HOST '{value}' is not an IP address or 'localhost'")]
    InvalidHost {
        value: String,
        source: std::net::AddrParseError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    // Process environment is shared; serialize the tests that touch it.
    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "APP_SEED_DEMO",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(!config.demo.seed_on_start);
    }

    #[test]
    fn rejects_non_numeric_port() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_PORT", "registrar");
        let result = AppConfig::load();
        env::remove_var("APP_PORT");
        assert!(matches!(result, Err(ConfigError::InvalidPort { .. })));
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        env::remove_var("APP_HOST");
        assert_eq!(addr, SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000));
    }

    #[test]
    fn seed_demo_flag_accepts_common_truthy_spellings() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        for value in ["1", "true", "YES", "on"] {
            env::set_var("APP_SEED_DEMO", value);
            let config = AppConfig::load().expect("config loads");
            assert!(config.demo.seed_on_start, "value {value:?} should enable");
        }
        env::set_var("APP_SEED_DEMO", "0");
        let config = AppConfig::load().expect("config loads");
        assert!(!config.demo.seed_on_start);
        env::remove_var("APP_SEED_DEMO");
    }
}
