// src/logging.rs
//!
//! Tracing subscriber setup for headless use. Embedding shells that install
//! their own subscriber skip this.

use tracing_subscriber::EnvFilter;

/// Install a `fmt` subscriber filtered by `RUST_LOG`, else `default_directive`
/// (e.g. `"hostfs=info"`). Returns false if a global subscriber already exists.
pub fn init(default_directive: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_second_init_is_noop() {
        let _ = super::init("hostfs=debug");
        assert!(!super::init("hostfs=debug"));
    }
}
