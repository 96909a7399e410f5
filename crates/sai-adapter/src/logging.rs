//! Tracing subscriber setup.

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Install the global fmt subscriber.
///
/// Verbose mode lowers the max level to DEBUG, which enables the
/// payload-level log lines. Returns an error if a subscriber is already
/// installed.
pub fn init_tracing(verbose: bool) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
}
