//! Log output.
//!
//! A single global `fmt` subscriber filtered by an `EnvFilter`, writing text or
//! JSON lines depending on the logging configuration.

use tower::BoxError;
use tracing::Subscriber;
use tracing_subscriber::EnvFilter;

use crate::configuration::LogFormat;
use crate::configuration::Logging;

pub type BoxSubscriber = Box<dyn Subscriber + Send + Sync>;

/// Builds the subscriber described by `logging` without installing it.
pub fn make_subscriber(logging: &Logging) -> Result<BoxSubscriber, BoxError> {
    let builder = tracing_subscriber::fmt::fmt().with_env_filter(EnvFilter::try_new(&logging.level)?);
    Ok(match logging.format {
        LogFormat::Text => Box::new(builder.finish()),
        LogFormat::Json => Box::new(builder.json().finish()),
    })
}

/// Installs the subscriber described by `logging` as the global default.
///
/// Fails if a global subscriber is already set.
pub fn init(logging: &Logging) -> Result<(), BoxError> {
    tracing::subscriber::set_global_default(make_subscriber(logging)?)?;
    Ok(())
}
