//! Logging infrastructure for arbor.
//!
//! Structured file logging with daily rotation into platform-standard
//! directories. The terminal belongs to the UI, so nothing is written to it.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use directories::ProjectDirs;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;

/// Prefix shared by every log file the appender writes.
const LOG_FILE_PREFIX: &str = "arbor";

const RETENTION_DAYS: u64 = 7;

/// Result of initializing the logging system.
pub struct LoggingContext {
    /// Guard that must be held for the application lifetime to ensure logs are flushed.
    pub _guard: WorkerGuard,
    /// The session ID for this arbor invocation.
    pub session_id: String,
    /// The directory where logs are written.
    pub log_directory: PathBuf,
}

/// Error that occurred during logging initialization.
#[derive(Debug)]
pub struct LoggingError {
    pub message: String,
}

impl std::fmt::Display for LoggingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for LoggingError {}

/// Generates a 6-character random hex session ID.
fn generate_session_id() -> String {
    use rand::Rng;
    let mut rng = rand::rng();
    let bytes: [u8; 3] = rng.random();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Platform log directory.
///
/// macOS: `~/Library/Logs/arbor/`, elsewhere the project state directory
/// (`~/.local/state/arbor/` on Linux).
fn log_directory() -> Option<PathBuf> {
    if cfg!(target_os = "macos") {
        return dirs::home_dir().map(|home| home.join("Library").join("Logs").join("arbor"));
    }
    let project_dirs = ProjectDirs::from("dev", "arbor", "arbor")?;
    project_dirs
        .state_dir()
        .map(Path::to_path_buf)
        .or_else(|| Some(project_dirs.data_local_dir().join("logs")))
}

/// `RUST_LOG` wins over the configured level; an unparsable level falls back to `info`.
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initializes the logging system.
///
/// `level` is the configured `logging.level` (already overridden by
/// `ARBOR_LOG` when set). The returned `WorkerGuard` must be held for the
/// application lifetime.
pub fn init(level: &str) -> Result<LoggingContext, LoggingError> {
    let session_id = generate_session_id();

    let log_dir = log_directory().ok_or_else(|| LoggingError {
        message: "Failed to determine log directory".to_string(),
    })?;

    fs::create_dir_all(&log_dir).map_err(|e| LoggingError {
        message: format!("Failed to create log directory: {}", e),
    })?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_span_events(FmtSpan::NONE)
        .with_target(true);

    tracing_subscriber::registry()
        .with(build_filter(level))
        .with(fmt_layer)
        .try_init()
        .map_err(|e| LoggingError {
            message: format!("Failed to install log subscriber: {}", e),
        })?;

    info!(session_id = %session_id, version = env!("CARGO_PKG_VERSION"), "session_start");

    Ok(LoggingContext {
        _guard: guard,
        session_id,
        log_directory: log_dir,
    })
}

/// Rotated files look like `arbor.2026-10-17`.
fn is_rotated_log(file_name: &str) -> bool {
    file_name
        .strip_prefix(LOG_FILE_PREFIX)
        .is_some_and(|rest| rest.starts_with('.') && rest.len() > 1)
}

/// Cleans up log files older than the retention period.
///
/// Returns the number of files deleted. Errors are logged at WARN level but
/// don't prevent app startup.
pub fn cleanup_old_logs(log_dir: &Path) -> u32 {
    let retention = Duration::from_secs(RETENTION_DAYS * 24 * 60 * 60);
    cleanup_logs_older_than(log_dir, retention, SystemTime::now())
}

fn cleanup_logs_older_than(log_dir: &Path, retention: Duration, now: SystemTime) -> u32 {
    let entries = match fs::read_dir(log_dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(error = %e, "Failed to read log directory for cleanup");
            return 0;
        }
    };

    let mut deleted_count = 0u32;

    for entry in entries.filter_map(Result::ok) {
        let path = entry.path();

        let file_name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) if is_rotated_log(name) => name.to_string(),
            _ => continue,
        };

        let modified = match fs::metadata(&path).and_then(|m| m.modified()) {
            Ok(t) => t,
            Err(e) => {
                warn!(file = %file_name, error = %e, "Failed to read modification time for log file");
                continue;
            }
        };

        // Files stamped in the future are left alone.
        let Ok(age) = now.duration_since(modified) else {
            continue;
        };

        if age > retention {
            match fs::remove_file(&path) {
                Ok(()) => {
                    debug!(file = %file_name, age_days = age.as_secs() / 86400, "Deleted old log file");
                    deleted_count += 1;
                }
                Err(e) => {
                    warn!(file = %file_name, error = %e, "Failed to delete old log file");
                }
            }
        }
    }

    if deleted_count > 0 {
        debug!(count = deleted_count, "Log cleanup completed");
    }
    deleted_count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_is_six_hex_chars() {
        let id = generate_session_id();
        assert_eq!(id.len(), 6);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_rotated_log_names() {
        assert!(is_rotated_log("arbor.2026-10-17"));
        assert!(!is_rotated_log("arbor"));
        assert!(!is_rotated_log("arbor."));
        assert!(!is_rotated_log("arborist.log"));
        assert!(!is_rotated_log("notes.txt"));
    }

    #[test]
    fn test_cleanup_removes_only_expired_arbor_logs() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("arbor.2026-01-01"), "old").unwrap();
        fs::write(dir.path().join("notes.txt"), "keep").unwrap();

        // Pretend a week and a day has passed since the files were written.
        let later = SystemTime::now() + Duration::from_secs(8 * 24 * 60 * 60);
        let deleted =
            cleanup_logs_older_than(dir.path(), Duration::from_secs(7 * 24 * 60 * 60), later);

        assert_eq!(deleted, 1);
        assert!(!dir.path().join("arbor.2026-01-01").exists());
        assert!(dir.path().join("notes.txt").exists());
    }

    #[test]
    fn test_cleanup_keeps_recent_logs() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("arbor.2026-10-17"), "today").unwrap();

        assert_eq!(cleanup_old_logs(dir.path()), 0);
        assert!(dir.path().join("arbor.2026-10-17").exists());
    }

    #[test]
    fn test_cleanup_missing_directory_is_harmless() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(cleanup_old_logs(&dir.path().join("missing")), 0);
    }
}
