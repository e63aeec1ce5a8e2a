//! Logging initialization and utilities

/// Initialize the logging system
///
/// Uses env_logger with default filter level of `info`.
/// Override with RUST_LOG environment variable.
///
/// # Example
/// ```
/// voxsculpt::core::logging::init();
/// log::info!("Sculpting started");
/// ```
pub fn init() {
    // try_init so repeated calls (doc tests, CLI re-entry) don't panic
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).try_init();
}
