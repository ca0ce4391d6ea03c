use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable single-line output for terminals.
    Compact,
    /// One JSON object per line.
    Json,
}

/// `RUST_LOG` wins when set; otherwise the crate logs at info, or debug when verbose.
fn default_filter(verbose: bool) -> EnvFilter {
    let directives = if verbose {
        "info,job_skill_radar=debug,skill_radar=debug"
    } else {
        "warn,job_skill_radar=info,skill_radar=info"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives))
}

pub fn init_logger(format: LogFormat, verbose: bool) {
    let layer = fmt::layer()
        .with_target(verbose)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let registry = tracing_subscriber::registry().with(default_filter(verbose));
    match format {
        LogFormat::Compact => registry.with(layer.compact()).init(),
        LogFormat::Json => registry.with(layer.json()).init(),
    }
}
