//! Shared tracing configuration for tessera.
//!
//! Hosts embedding the kernels, and the workspace's own tests, install their
//! `tracing` subscriber through here so log shape and filtering stay the same
//! everywhere.

use std::env;
pub use tracing::{debug, error, info, trace, warn};

use tracing::Subscriber;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt as tracing_fmt, EnvFilter, Registry};

/// How the shared subscriber should behave.
#[derive(Clone, Debug)]
pub struct TracingConfig {
    /// Filter directives (e.g. `tessera_session=debug,info`). When absent,
    /// `RUST_LOG` is consulted and then [`default_directive`](Self::default_directive).
    pub directives: Option<String>,
    /// Fallback directive when nothing else resolves.
    pub default_directive: String,
    /// Show event targets (module paths).
    pub include_targets: bool,
    /// ANSI colouring; ignored for JSON output.
    pub ansi: bool,
    /// Span lifecycle events to emit. `CLOSE` reports kernel timings.
    pub span_events: FmtSpan,
    pub output: TracingOutput,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self::for_local()
    }
}

impl TracingConfig {
    /// Pretty, coloured output for a developer terminal.
    pub fn for_local() -> Self {
        Self {
            directives: None,
            default_directive: "info".to_string(),
            include_targets: true,
            ansi: true,
            span_events: FmtSpan::NONE,
            output: TracingOutput::Pretty,
        }
    }

    /// JSON without colour codes, for CI and log collectors.
    pub fn for_ci() -> Self {
        Self {
            ansi: false,
            output: TracingOutput::Json,
            ..Self::for_local()
        }
    }

    /// Compact output with a close event per instrumented kernel call, so
    /// each line carries the span's busy/idle time.
    pub fn for_profiling() -> Self {
        Self {
            directives: Some("tessera_core=debug,info".to_string()),
            ansi: false,
            span_events: FmtSpan::CLOSE,
            output: TracingOutput::Compact,
            ..Self::for_local()
        }
    }

    /// Preset selected by environment hints.
    ///
    /// # Environment Variables
    ///
    /// - `TESSERA_TRACING_PROFILE` - `local` (default), `ci`, or `profiling`
    /// - `TESSERA_TRACING_DIRECTIVES` - Overrides filter directives
    /// - `TESSERA_TRACING_FORMAT` - `pretty`, `compact`, or `json`
    pub fn from_env() -> Self {
        let profile = env::var("TESSERA_TRACING_PROFILE")
            .unwrap_or_else(|_| "local".to_string())
            .to_ascii_lowercase();

        let mut config = match profile.trim() {
            "ci" => Self::for_ci(),
            "profiling" => Self::for_profiling(),
            _ => Self::for_local(),
        };

        if let Ok(directives) = env::var("TESSERA_TRACING_DIRECTIVES") {
            if !directives.trim().is_empty() {
                config.directives = Some(directives);
            }
        }

        if let Ok(format) = env::var("TESSERA_TRACING_FORMAT") {
            if let Some(parsed) = TracingOutput::from_env_value(&format) {
                config.output = parsed;
                if config.output == TracingOutput::Json {
                    config.ansi = false;
                }
            }
        }

        config
    }

    fn resolve_filter(&self) -> Result<EnvFilter, TracingSetupError> {
        match &self.directives {
            Some(directives) => {
                EnvFilter::try_new(directives).map_err(|err| TracingSetupError::InvalidFilter(err.to_string()))
            }
            None => Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.default_directive))),
        }
    }
}

/// Output format of the formatter layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TracingOutput {
    Compact,
    Pretty,
    Json,
}

impl TracingOutput {
    fn from_env_value(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Some(Self::Compact),
            "pretty" => Some(Self::Pretty),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Failures while configuring the subscriber.
#[derive(Debug, thiserror::Error)]
pub enum TracingSetupError {
    #[error("invalid tracing directive: {0}")]
    InvalidFilter(String),

    /// Usually means a global subscriber is already installed.
    #[error("failed to install global tracing subscriber: {0}")]
    SubscriberInit(#[from] tracing_subscriber::util::TryInitError),
}

/// Build a subscriber from `config` without installing it.
pub fn build_subscriber(config: &TracingConfig) -> Result<impl Subscriber + Send + Sync, TracingSetupError> {
    let (filter, fmt_layer) = subscriber_layers(config)?;
    Ok(Registry::default().with(fmt_layer).with(filter))
}

/// Filter and formatter layers, for hosts composing their own subscriber.
pub fn subscriber_layers(
    config: &TracingConfig,
) -> Result<(EnvFilter, Box<dyn Layer<Registry> + Send + Sync>), TracingSetupError> {
    let filter = config.resolve_filter()?;
    let span_events = config.span_events.clone();

    let layer: Box<dyn Layer<Registry> + Send + Sync> = match config.output {
        TracingOutput::Compact => Box::new(
            tracing_fmt::layer()
                .compact()
                .with_target(config.include_targets)
                .with_ansi(config.ansi)
                .with_span_events(span_events),
        ),
        TracingOutput::Pretty => Box::new(
            tracing_fmt::layer()
                .pretty()
                .with_target(config.include_targets)
                .with_ansi(config.ansi)
                .with_span_events(span_events),
        ),
        TracingOutput::Json => Box::new(
            tracing_fmt::layer()
                .json()
                .with_target(config.include_targets)
                .with_ansi(false)
                .with_span_events(span_events),
        ),
    };

    Ok((filter, layer))
}

/// Install the configured subscriber as the process-wide default.
pub fn init_global_tracing(config: &TracingConfig) -> Result<(), TracingSetupError> {
    build_subscriber(config)?.try_init()?;
    Ok(())
}

/// Install a test-friendly subscriber once per process.
///
/// Output goes through the test harness capture. Repeated calls, including
/// ones racing from parallel tests, are no-ops.
pub fn init_test_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEYS: [&str; 4] = [
        "TESSERA_TRACING_PROFILE",
        "TESSERA_TRACING_DIRECTIVES",
        "TESSERA_TRACING_FORMAT",
        "RUST_LOG",
    ];

    fn reset_env() {
        for key in KEYS {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn rejects_invalid_directive() {
        reset_env();
        let config = TracingConfig {
            directives: Some("=::invalid".to_string()),
            ..TracingConfig::default()
        };
        assert!(matches!(build_subscriber(&config), Err(TracingSetupError::InvalidFilter(_))));
    }

    #[test]
    #[serial]
    fn builds_every_output() {
        reset_env();
        for output in [TracingOutput::Compact, TracingOutput::Pretty, TracingOutput::Json] {
            let config = TracingConfig {
                output,
                ..TracingConfig::default()
            };
            assert!(build_subscriber(&config).is_ok());
        }
    }

    #[test]
    #[serial]
    fn from_env_respects_profile_and_format() {
        reset_env();
        env::set_var("TESSERA_TRACING_PROFILE", "ci");
        env::set_var("TESSERA_TRACING_FORMAT", "compact");
        env::set_var("TESSERA_TRACING_DIRECTIVES", "tessera_session=debug");

        let config = TracingConfig::from_env();
        assert_eq!(config.directives.as_deref(), Some("tessera_session=debug"));
        assert!(!config.ansi);
        assert_eq!(config.output, TracingOutput::Compact);

        reset_env();
    }

    #[test]
    #[serial]
    fn from_env_ignores_unknown_values() {
        reset_env();
        env::set_var("TESSERA_TRACING_PROFILE", "staging");
        env::set_var("TESSERA_TRACING_FORMAT", "xml");
        env::set_var("TESSERA_TRACING_DIRECTIVES", "   ");

        let config = TracingConfig::from_env();
        assert_eq!(config.output, TracingOutput::Pretty);
        assert!(config.ansi);
        assert!(config.directives.is_none());

        reset_env();
    }

    #[test]
    #[serial]
    fn json_format_disables_ansi() {
        reset_env();
        env::set_var("TESSERA_TRACING_FORMAT", "JSON");
        let config = TracingConfig::from_env();
        assert_eq!(config.output, TracingOutput::Json);
        assert!(!config.ansi);
        reset_env();
    }

    #[test]
    fn profiling_preset_reports_span_close() {
        let config = TracingConfig::for_profiling();
        assert_eq!(config.span_events, FmtSpan::CLOSE);
        assert!(config.directives.is_some());
    }
}
