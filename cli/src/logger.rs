use indicatif::MultiProgress;
use indicatif_log_bridge::LogWrapper;
use std::sync::OnceLock;

/// Set up log levels, formatting, and other configurations for the logger
pub struct Logger {
    multi_progress: MultiProgress,
}

static LOGGER: OnceLock<Logger> = OnceLock::new();

impl Logger {
    pub fn init() -> &'static Self {
        LOGGER.get_or_init(|| {
            let logger = env_logger::Builder::from_env(
                // No logs shown by default, only human-friendly messages
                // Enable logs output with "export RUST_LOG=info" in terminal
                env_logger::Env::default().default_filter_or("off"),
            )
            .build();

            let level = logger.filter();
            let multi_progress = MultiProgress::new();

            // Fails only if another logger is already set, keep that one
            if LogWrapper::new(multi_progress.clone(), logger)
                .try_init()
                .is_ok()
            {
                log::set_max_level(level);
            }

            Self { multi_progress }
        })
    }

    /// Progress bars must be added here so log lines do not tear them
    pub fn multi_progress() -> &'static MultiProgress {
        &Self::init().multi_progress
    }
}
