use std::sync::OnceLock;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{AppConfig, LogFormat};
use crate::core::{AppError, Result};

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `LOG_LEVEL` when set. Calling this twice is a no-op.
pub fn init_tracing(config: &AppConfig) -> Result<()> {
    if TRACING_INIT.get().is_some() {
        return Ok(());
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "stockroom={level},actix_web=info,sqlx=warn",
            level = config.log_level
        ))
    });

    let registry = tracing_subscriber::registry().with(env_filter);
    let installed = match config.log_format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(false).pretty())
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().with_target(true).json())
            .try_init(),
    };
    installed.map_err(|e| AppError::Configuration(format!("Failed to initialize tracing: {}", e)))?;

    TRACING_INIT.set(()).ok();
    tracing::info!(
        env = %config.env,
        version = env!("CARGO_PKG_VERSION"),
        "tracing initialized"
    );
    Ok(())
}
