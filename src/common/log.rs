//! Logging setup and the structured event helper used by the services.

use tracing_subscriber::EnvFilter;

use crate::common::config::{AppCfg, LogFormat};
use crate::common::error::ErrorCode;
use crate::common::time;

/// Boxed error returned when a global subscriber is already installed.
pub type InitError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Install the global subscriber described by `cfg`.
pub fn init(cfg: &AppCfg) -> Result<(), InitError> {
    let filter = EnvFilter::try_new(&cfg.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    match cfg.log_format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    }
}

/// Emit one outcome record carrying the module, event name, stable code and latency.
pub fn event(module: &'static str, event: &'static str, code: ErrorCode, dur_ms: u128) {
    let dur_ms = time::clamp_ms(dur_ms);
    match code {
        ErrorCode::Ok => tracing::info!(module, ev = event, code = code as u32, dur_ms, "outcome"),
        _ => tracing::warn!(module, ev = event, code = code as u32, dur_ms, "outcome"),
    }
}
