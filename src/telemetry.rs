//! Tracing setup for the binary.
//!
//! Filtering follows `RUST_LOG` when it is set and parses, otherwise the
//! builder's fallback directive.

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::subscriber::set_global_default;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::{EnvFilter, Registry};

/// Where formatted events go.
#[derive(Debug, Clone)]
pub enum LogSink {
    Stderr,
    File(PathBuf),
    /// The terminal UI owns the screen and no file was requested.
    Disabled,
}

/// Builder for the process-wide `tracing` subscriber.
#[derive(Debug)]
pub struct TracingSubscriber {
    rust_log_fallback: String,
    sink: LogSink,
}

impl Default for TracingSubscriber {
    fn default() -> Self {
        Self {
            rust_log_fallback: "info".into(),
            sink: LogSink::Stderr,
        }
    }
}

impl TracingSubscriber {
    /// Logs at `info` to stderr unless configured otherwise.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter directive used when `RUST_LOG` is unset or malformed.
    #[must_use]
    pub fn rust_log_fallback(mut self, value: impl AsRef<str>) -> Self {
        self.rust_log_fallback = value.as_ref().into();
        self
    }

    /// Where formatted events are written.
    #[must_use]
    pub fn sink(mut self, value: LogSink) -> Self {
        self.sink = value;
        self
    }

    /// Installs the global subscriber. Does nothing for [`LogSink::Disabled`].
    pub fn set_global_default(self) -> io::Result<()> {
        // depends on RUST_LOG env var, falls back when unset or malformed
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.rust_log_fallback))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let result = match self.sink {
            LogSink::Disabled => return Ok(()),
            LogSink::Stderr => set_global_default(
                Registry::default().with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(io::stderr)
                        .with_filter(env_filter),
                ),
            ),
            LogSink::File(path) => {
                let file = File::create(&path)?;
                set_global_default(
                    Registry::default().with(
                        tracing_subscriber::fmt::layer()
                            .with_ansi(false)
                            .with_writer(Mutex::new(file))
                            .with_filter(env_filter),
                    ),
                )
            }
        };

        result.map_err(io::Error::other)
    }
}
