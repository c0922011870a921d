//! Logging for the `coinview` binary. Everything goes to stderr so the
//! rendered table on stdout stays clean when piped.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

const APP_TARGET: &str = "coinview";

/// Level for this crate's own events. Excluded-record warnings stay
/// visible without `--verbose`.
fn app_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    }
}

/// Our events at `app_level`; dependencies (reqwest, hyper) only at ERROR
/// unless verbose.
fn app_targets(verbose: bool) -> Targets {
    let dependencies = if verbose {
        LevelFilter::INFO
    } else {
        LevelFilter::ERROR
    };
    Targets::new()
        .with_target(APP_TARGET, app_level(verbose))
        .with_default(dependencies)
}

/// Installs the global subscriber. `RUST_LOG` narrows output further.
pub fn init_logging(verbose: bool) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(app_level(verbose).into())
        .from_env_lossy();
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .without_time();

    if let Err(e) = tracing_subscriber::registry()
        .with(fmt_layer)
        .with(app_targets(verbose))
        .with(env_filter)
        .try_init()
    {
        eprintln!("Logging is unavailable: {e}");
    }
}
