//! Logging setup based on `tracing-subscriber`.

/// Default filter used by [`init`].
pub const DEFAULT_FILTER: &str = "info,drawlist_render=debug,drawlist_core=debug";

/// Install a formatting subscriber with the default filter.
///
/// `RUST_LOG` is not consulted; use [`init_with_filter`] for custom directives.
pub fn init() {
    init_with_filter(DEFAULT_FILTER);
}

/// Install a formatting subscriber with the given `EnvFilter` directives.
///
/// Calling this more than once is harmless, later calls are ignored.
pub fn init_with_filter(filter: &str) {
    let result = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .try_init();

    if result.is_err() {
        tracing::trace!("Global subscriber already installed, keeping it");
    }
}
