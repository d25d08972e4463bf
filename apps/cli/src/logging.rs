use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Console logging for the sync binary.
///
/// `RUST_LOG` wins when set; otherwise `verbose` picks debug over info.
pub fn setup_logging(verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(verbose))
        .try_init()?;

    tracing::debug!("Logging initialized: verbose={}", verbose);
    Ok(())
}
