//! Tracing setup for the gif-search server
//!
//! Logs go to stderr; stdout carries the MCP protocol.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Crates that log at `info` unless `RUST_LOG` says otherwise
///
/// The server crate logs tool calls and startup; the core crate logs
/// provider requests and session transitions. Both are needed to follow
/// one search end to end.
const DEFAULT_TARGETS: &[&str] = &["gif_search_mcp", "gif_search_core"];

/// Initialize tracing to stderr
///
/// Set `LOG_FORMAT=json` for structured JSON output. Default is
/// human-readable text without ANSI colors.
pub fn init_tracing() -> anyhow::Result<()> {
    let mut filter = EnvFilter::from_default_env();
    for target in DEFAULT_TARGETS {
        filter = filter.add_directive(format!("{}=info", target).parse()?);
    }

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .init();
    }

    Ok(())
}
