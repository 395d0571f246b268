use mosaic_common::logging::{init_logging_from_config, LoggingInitConfig};
use mosaic_config::LoggingConfig;

/// Default prefix of log files when the config names none.
const DEFAULT_LOG_PREFIX: &str = "mosaic";

/// Sets up logging for a bridge service from its `[logging]` section.
pub fn init_logging(service_base_name: &str, config: &LoggingConfig) -> anyhow::Result<()> {
    init_logging_from_config(LoggingInitConfig {
        service_base_name,
        service_label: config.service_label.as_deref(),
        log_dir: config.log_dir.as_ref(),
        log_file_prefix: config.log_file_prefix.as_deref(),
        json_format: config.json_format,
        default_log_prefix: DEFAULT_LOG_PREFIX,
    })?;
    Ok(())
}
