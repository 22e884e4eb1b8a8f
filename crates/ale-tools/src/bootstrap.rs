use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a CLI level name (`DEBUG`, `INFO`, `WARNING`, `ERROR`, `CRITICAL`) to
/// a `tracing` filter directive. Unknown names pass through lower-cased.
pub fn tracing_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        other => other.to_lowercase(),
    }
}

/// Initialise the global `tracing` subscriber on stderr.
///
/// `RUST_LOG`, when set, takes precedence over `log_level`. Falls back to
/// `"warn"` if the resulting directive does not parse.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(tracing_directive(log_level)))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let subscriber = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()?;

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_directive_maps_level_names() {
        assert_eq!(tracing_directive("DEBUG"), "debug");
        assert_eq!(tracing_directive("info"), "info");
        assert_eq!(tracing_directive("WARNING"), "warn");
        assert_eq!(tracing_directive("ERROR"), "error");
        assert_eq!(tracing_directive("CRITICAL"), "error");
    }

    #[test]
    fn test_tracing_directive_passes_unknown_through() {
        assert_eq!(tracing_directive("TRACE"), "trace");
    }
}
