use crate::config::TelemetryConfig;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("invalid log filter '{value}'")]
    Filter { value: String, source: ParseError },
    #[error("tracing subscriber failed to initialize")]
    Init(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Expand the configured level into filter directives. A bare level such as
/// `debug` applies to the clearance crates only, with everything else capped
/// at `warn`; a string containing `=` or `,` is already a full filter and is
/// passed through untouched.
fn directives(log_level: &str) -> String {
    let log_level = log_level.trim();
    if log_level.contains(['=', ',']) {
        log_level.to_string()
    } else {
        format!("warn,clearance={log_level},clearance_api={log_level}")
    }
}

/// Install the global subscriber. `RUST_LOG` wins when set; otherwise the
/// configured level is expanded via [`directives`].
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let value = directives(&config.log_level);
            EnvFilter::try_new(&value)
                .map_err(|source| TelemetryError::Filter { value, source })?
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Init)
}
