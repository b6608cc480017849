use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Crates that log every request or parsed node at debug; kept at warn unless
/// `RUST_LOG` says otherwise.
const QUIET_TARGETS: &[&str] = &["hyper", "reqwest", "rustls", "warp", "html5ever", "selectors"];

/// `RUST_LOG` when set, else `log_level` for the bot with the HTTP and HTML stacks quieted.
pub fn build_filter(log_level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let mut directives = vec![log_level.trim().to_string()];
    directives.extend(QUIET_TARGETS.iter().map(|target| format!("{}=warn", target)));

    EnvFilter::try_new(directives.join(",")).unwrap_or_else(|e| {
        eprintln!("Invalid LOG_LEVEL \"{}\" ({}), using info", log_level, e);
        EnvFilter::new("info")
    })
}

pub fn init_logging(log_level: &str) {
    tracing_subscriber::registry()
        .with(build_filter(log_level))
        .with(fmt::layer().with_target(false))
        .init();

    tracing::info!("🪵 Logging at {} (RUST_LOG overrides)", log_level);
}
