use tracing_subscriber::EnvFilter;

/// Installs the global subscriber used by `msk` and by applications that
/// embed the client. Logs go to stderr so command output on stdout stays
/// parseable. `RUST_LOG` wins; otherwise `debug` (the config file's
/// `debug` switch) lowers the client's level from info to debug. Later
/// calls are no-ops.
pub fn init_tracing(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    let env_filter = std::env::var("RUST_LOG")
        .map(EnvFilter::new)
        .unwrap_or_else(|_| EnvFilter::new(format!("mindsetkit_client={level},msk={level}")));
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
