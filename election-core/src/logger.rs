//! Logging helpers, mirroring the teacher crate's `logging` feature: a
//! terminal logger builder when the feature is enabled, and a silent
//! fallback that keeps the engine's API identical either way.

/// Builds a terminal-backed `slog::Logger` tagged with `rank`, the Rust
/// analogue of prefixing every log line with the participant's identity.
#[cfg(feature = "logging")]
pub fn terminal_logger(rank: crate::types::Rank) -> slog::Logger {
    use slog::{o, Drain};

    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    slog::Logger::root(drain, o!("rank" => rank))
}

/// A logger that discards everything, used when the `logging` feature is
/// disabled so `ElectionEngine::new` never has to special-case its absence.
#[cfg(not(feature = "logging"))]
pub fn terminal_logger(rank: crate::types::Rank) -> slog::Logger {
    slog::Logger::root(slog::Discard, slog::o!("rank" => rank))
}
