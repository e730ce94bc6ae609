use std::panic;
use std::path::PathBuf;
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

pub const ENV_LOG_DIR: &str = "CM_LOG_DIR";
pub const ENV_LOG_INCLUDE_BACKTRACE: &str = "CM_LOG_INCLUDE_BACKTRACE";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Logging knobs read from the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogSettings {
    /// Directory for daily-rotated `<app>.log` files; stderr when unset.
    pub log_dir: Option<PathBuf>,
    /// Also run the default panic hook (prints the backtrace).
    pub include_backtrace: bool,
}

impl LogSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            log_dir: lookup(ENV_LOG_DIR)
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
            include_backtrace: lookup(ENV_LOG_INCLUDE_BACKTRACE)
                .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }
}

/// Route panics through `tracing` with file/line context.
/// Installed once per process; later calls are no-ops.
pub fn install_tracing_panic_hook(app_name: &'static str, settings: &LogSettings) {
    static INSTALLED: OnceLock<()> = OnceLock::new();
    let include_backtrace = settings.include_backtrace;

    INSTALLED.get_or_init(|| {
        let default_hook = panic::take_hook();

        panic::set_hook(Box::new(move |info| {
            let location = info
                .location()
                .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()));
            let message = info
                .payload()
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| info.payload().downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "panic payload not string".into());

            tracing::error!(
                application = app_name,
                location = location.as_deref().unwrap_or("unknown"),
                panic_message = %message,
                "panic captured"
            );

            if include_backtrace {
                default_hook(info);
            }
        }));
    });
}

fn rotating_file_writer(app_name: &'static str, settings: &LogSettings) -> Option<BoxMakeWriter> {
    let dir = settings.log_dir.as_ref()?;
    if let Err(err) = std::fs::create_dir_all(dir) {
        tracing::warn!(error = %err, "failed to create CM_LOG_DIR; falling back to stderr");
        return None;
    }

    let appender = tracing_appender::rolling::daily(dir, format!("{app_name}.log"));
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(guard);
    Some(BoxMakeWriter::new(non_blocking))
}

/// Initialize the global subscriber. `RUST_LOG` filters (default `info`).
///
/// Logs go to stderr so stdout stays free for command output, or to
/// `<CM_LOG_DIR>/<app>.log` with daily rotation when that is set.
pub fn init_tracing_subscriber(app_name: &'static str, settings: &LogSettings) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);

    if let Some(writer) = rotating_file_writer(app_name, settings) {
        let _ = builder.with_ansi(false).with_writer(writer).try_init();
    } else {
        let _ = builder.with_writer(std::io::stderr).try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_default_to_stderr_without_backtrace() {
        let settings = LogSettings::from_lookup(|_| None);
        assert_eq!(settings, LogSettings::default());
    }

    #[test]
    fn settings_read_dir_and_backtrace_flag() {
        let settings = LogSettings::from_lookup(|key| match key {
            ENV_LOG_DIR => Some("/var/log/civic-match".into()),
            ENV_LOG_INCLUDE_BACKTRACE => Some("TRUE".into()),
            _ => None,
        });

        assert_eq!(settings.log_dir, Some(PathBuf::from("/var/log/civic-match")));
        assert!(settings.include_backtrace);
    }

    #[test]
    fn blank_log_dir_is_ignored() {
        let settings = LogSettings::from_lookup(|key| (key == ENV_LOG_DIR).then(|| "  ".to_string()));
        assert!(settings.log_dir.is_none());
    }
}
