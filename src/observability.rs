//! Observability hooks for the arithmetic and cast engines.
//!
//! Records go through the `log` facade. `init_logging` installs an
//! `env_logger` backend once per process; library code never installs a
//! logger on its own.

use std::fs::OpenOptions;
use std::str::FromStr;
use std::sync::Once;

use log::LevelFilter;

use crate::config::LoggingConfig;
use crate::error::{MaskArrayError, Result};

/// Logs a structured key-value event at `debug` level under the
/// `maskarray::metric` target.
///
/// # Example
/// ```
/// use maskarray::log_metric;
/// let len = 4;
/// log_metric!("event"="binary_op", "op"="add", "len"=&len);
/// ```
#[macro_export]
macro_rules! log_metric {
    ($($key:literal = $value:expr),+ $(,)?) => {
        if $crate::__log::log_enabled!(target: "maskarray::metric", $crate::__log::Level::Debug) {
            // Collect each pair as a JSON string fragment
            let mut parts = Vec::new();
            $(
                parts.push(format!("\"{}\": \"{}\"", $key, $value));
            )+
            $crate::__log::debug!(target: "maskarray::metric", "MASKARRAY_METRIC: {{ {} }}", parts.join(", "));
        }
    };
}

static INIT_LOGGER: Once = Once::new();

/// Installs the process-wide `env_logger` backend described by `config`.
///
/// Only the first successful call has an effect; later calls are no-ops.
///
/// # Errors
/// Returns `InvalidArgument` for an unknown level name, and an `InternalError`
/// if the log file cannot be opened in append mode.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let level = LevelFilter::from_str(&config.level).map_err(|_| {
        MaskArrayError::InvalidArgument(format!("unknown log level '{}'", config.level))
    })?;

    let target = match &config.log_file {
        Some(filename) => Some(
            OpenOptions::new()
                .append(true)
                .create(true)
                .open(filename)
                .map_err(|e| {
                    MaskArrayError::InternalError(format!(
                        "could not open log file '{}': {}",
                        filename, e
                    ))
                })?,
        ),
        None => None,
    };

    INIT_LOGGER.call_once(move || {
        let mut builder = env_logger::Builder::new();

        builder.is_test(false);
        builder.filter_level(level);

        // Custom formatter: just print the level and message
        builder.format(|buf, record| {
            use std::io::Write;
            writeln!(buf, "[{}] {}", record.level(), record.args())?;
            buf.flush()?;
            Ok(())
        });

        if let Some(file) = target {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }

        let _ = builder.try_init();
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_level_is_rejected() {
        let config = LoggingConfig {
            level: "chatty".to_string(),
            log_file: None,
        };
        assert!(matches!(
            init_logging(&config),
            Err(MaskArrayError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_repeated_init_is_harmless() {
        let config = LoggingConfig::default();
        init_logging(&config).unwrap();
        init_logging(&config).unwrap();
        log_metric!("event" = "test", "value" = 1);
    }
}
