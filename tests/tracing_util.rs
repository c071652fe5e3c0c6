use tracing_subscriber::EnvFilter;

/// Scoped tracing subscriber for tests.
///
/// Installs a thread-local fmt subscriber honoring `RUST_LOG`; the
/// subscriber is dropped with the guard so tests do not leak output into
/// each other.
pub struct TestTracing {
    _guard: tracing::subscriber::DefaultGuard,
}

impl TestTracing {
    pub fn init() -> Self {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        Self { _guard: guard }
    }
}
