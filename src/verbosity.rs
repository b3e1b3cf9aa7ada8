//! Verbosity levels and logging setup.
//!
//! The `-v` count from the command line becomes a [`Verbosity`] value that is
//! handed to collaborators and used to configure the `tracing` subscriber.

use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    #[default]
    Concise,
    Verbose,
    Debug,
}

impl Verbosity {
    pub fn from_count(count: u32) -> Self {
        match count {
            0 => Verbosity::Concise,
            1 => Verbosity::Verbose,
            _ => Verbosity::Debug,
        }
    }

    fn filter_directive(self) -> &'static str {
        match self {
            Verbosity::Concise => "warn",
            Verbosity::Verbose => "info",
            Verbosity::Debug => "debug",
        }
    }
}

/// Installs the stderr subscriber. `RUST_LOG` takes precedence when set.
pub fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.filter_directive()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init();
}
