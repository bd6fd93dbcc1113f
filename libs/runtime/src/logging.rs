use std::{
    io::{IsTerminal, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};
use parking_lot::Mutex;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{filter::Targets, fmt};

use crate::config::{LoggingConfig, Section};

const DEFAULT_SECTION: &str = "default";
const DEFAULT_MAX_SIZE_MB: u64 = 10;
const DEFAULT_MAX_BACKUPS: usize = 3;

// -------- level helpers --------

/// `None` means the output is switched off. Unknown names fall back to info.
fn parse_level(s: &str) -> Option<LevelFilter> {
    match s.trim().to_ascii_lowercase().as_str() {
        "trace" => Some(LevelFilter::TRACE),
        "debug" => Some(LevelFilter::DEBUG),
        "info" => Some(LevelFilter::INFO),
        "warn" => Some(LevelFilter::WARN),
        "error" => Some(LevelFilter::ERROR),
        "off" | "none" => None,
        _ => Some(LevelFilter::INFO),
    }
}

/// True if `target` is `prefix` itself or one of its submodules.
fn matches_target_prefix(target: &str, prefix: &str) -> bool {
    target
        .strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

// -------- rotating file writers --------

#[derive(Clone)]
struct RotatingFile(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.lock().flush()
    }
}

/// Writer for one record; `None` drops the bytes.
struct RoutedWriter(Option<RotatingFile>);

impl Write for RoutedWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.0 {
            Some(file) => file.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.0 {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

/// Picks a log file per record by target; the longest matching subsystem
/// prefix wins, anything else goes to the default file.
#[derive(Clone, Default)]
struct FileRouter {
    default: Option<RotatingFile>,
    by_prefix: Vec<(String, RotatingFile)>,
}

impl FileRouter {
    fn route(&self, target: &str) -> Option<RotatingFile> {
        self.by_prefix
            .iter()
            .filter(|(prefix, _)| matches_target_prefix(target, prefix))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, file)| file.clone())
            .or_else(|| self.default.clone())
    }

    fn is_empty(&self) -> bool {
        self.default.is_none() && self.by_prefix.is_empty()
    }
}

impl<'a> fmt::MakeWriter<'a> for FileRouter {
    type Writer = RoutedWriter;

    fn make_writer(&'a self) -> Self::Writer {
        RoutedWriter(self.default.clone())
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        RoutedWriter(self.route(meta.target()))
    }
}

/// Relative log paths live under `base_dir` (the home dir).
fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

fn open_rotating_file(section: &Section, log_path: &Path) -> std::io::Result<RotatingFile> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let max_bytes = section.max_size_mb.unwrap_or(DEFAULT_MAX_SIZE_MB) * 1024 * 1024;
    let limit = match (section.max_backups, section.max_age_days) {
        (None, Some(days)) => FileLimit::Age(chrono::Duration::days(i64::from(days))),
        (backups, _) => FileLimit::MaxFiles(backups.unwrap_or(DEFAULT_MAX_BACKUPS)),
    };

    let rot = FileRotate::new(
        log_path,
        AppendTimestamp::default(limit),
        ContentLimit::BytesSurpassed(max_bytes as usize),
        Compression::None,
        #[cfg(unix)]
        None,
    );
    Ok(RotatingFile(Arc::new(Mutex::new(rot))))
}

// -------- plan --------

/// Filters and writers derived from a `LoggingConfig`.
struct LogPlan {
    console: Targets,
    file: Targets,
    router: FileRouter,
}

fn plan(cfg: &LoggingConfig, base_dir: &Path) -> LogPlan {
    let default = cfg.get(DEFAULT_SECTION);
    let mut subsystems: Vec<(&String, &Section)> = cfg
        .iter()
        .filter(|(name, _)| name.as_str() != DEFAULT_SECTION)
        .collect();
    subsystems.sort_by(|a, b| a.0.cmp(b.0));

    let level_or_off = |s: &str| parse_level(s).unwrap_or(LevelFilter::OFF);

    let mut console = Targets::new().with_default(
        default
            .map(|s| level_or_off(&s.console_level))
            .unwrap_or(LevelFilter::OFF),
    );
    for (name, section) in &subsystems {
        console = console.with_target(name.as_str(), level_or_off(&section.console_level));
    }

    let mut router = FileRouter::default();
    let mut file = Targets::new().with_default(LevelFilter::OFF);

    if let Some(section) = default.filter(|s| !s.file.trim().is_empty()) {
        let path = resolve_log_path(&section.file, base_dir);
        match open_rotating_file(section, &path) {
            Ok(writer) => {
                router.default = Some(writer);
                file = file.with_default(level_or_off(&section.file_level));
            }
            Err(e) => eprintln!("Failed to open log file '{}': {}", path.display(), e),
        }
    }

    for (name, section) in &subsystems {
        if section.file.trim().is_empty() {
            // without its own file the subsystem falls back to the default file
            continue;
        }
        let path = resolve_log_path(&section.file, base_dir);
        match open_rotating_file(section, &path) {
            Ok(writer) => {
                router.by_prefix.push((name.to_string(), writer));
                file = file.with_target(name.as_str(), level_or_off(&section.file_level));
            }
            Err(e) => eprintln!(
                "Failed to open log file for subsystem '{}': {} ({})",
                name,
                path.display(),
                e
            ),
        }
    }

    LogPlan {
        console,
        file,
        router,
    }
}

// -------- public init --------

/// Install the global subscriber.
///
/// Console output goes to stderr in plain text; file output is JSON, one
/// rotating file per configured subsystem plus the default file. Relative
/// file paths are resolved against `base_dir`. Calling this twice is a no-op.
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry};

    // Bridge `log` records (sqlx) before the subscriber goes in.
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        let _ = fmt()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .try_init();
        return;
    }

    let LogPlan {
        console,
        file,
        router,
    } = plan(cfg, base_dir);

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_filter(console);

    let file_layer = (!router.is_empty()).then(|| {
        fmt::layer()
            .json()
            .with_ansi(false)
            .with_target(true)
            .with_level(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_writer(router)
            .with_filter(file)
    });

    let _ = Registry::default()
        .with(console_layer)
        .with(file_layer)
        .try_init();
}

// =================== tests ===================
