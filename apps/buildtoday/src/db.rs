use anyhow::{anyhow, Context, Result};
use runtime::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

const DEFAULT_MAX_CONNS: u32 = 10;
const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Sqlite,
    Postgres,
}

/// Detect the backend from the URL scheme.
pub fn detect_from_dsn(cfg: &DatabaseConfig) -> Result<Backend> {
    let raw = cfg.url.trim();
    if raw.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }

    let url = Url::parse(raw).map_err(|e| anyhow!("Invalid database DSN '{}': {}", raw, e))?;

    match url.scheme() {
        "sqlite" | "sqlite3" => Ok(Backend::Sqlite),
        "postgres" | "postgresql" => Ok(Backend::Postgres),
        other => Err(anyhow!("Unsupported database type: {}", other)),
    }
}

fn is_memory_dsn(dsn: &str) -> bool {
    dsn.eq_ignore_ascii_case("sqlite::memory:") || dsn.eq_ignore_ascii_case("sqlite://:memory:")
}

/// Rewrite a sqlite DSN to an absolute path under `base_dir`.
/// - "sqlite::memory:" is kept as-is.
/// - `sqlite3://` is accepted and rewritten to `sqlite://`.
/// - Backslashes become forward slashes.
/// - `mode=rwc` is added unless a mode is given, so a fresh install creates the file.
pub fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path, create_dirs: bool) -> Result<String> {
    if is_memory_dsn(dsn) {
        return Ok("sqlite::memory:".to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .or_else(|| dsn.strip_prefix("sqlite3://"))
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// or sqlite3:// (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }

    if create_dirs {
        if let Some(dir) = p.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
    }

    let mut params: Vec<&str> = query
        .map(|q| q.split('&').filter(|kv| !kv.is_empty()).collect())
        .unwrap_or_default();
    if !params.iter().any(|kv| kv.starts_with("mode=")) {
        params.push("mode=rwc");
    }

    Ok(format!(
        "sqlite://{}?{}",
        p.to_string_lossy().replace('\\', "/"),
        params.join("&")
    ))
}

/// Open the configured database. Relative sqlite paths resolve against `base_dir`.
pub async fn connect(cfg: &DatabaseConfig, base_dir: &Path) -> Result<DatabaseConnection> {
    let backend = detect_from_dsn(cfg)?;

    let dsn = match backend {
        Backend::Sqlite => absolutize_sqlite_dsn(cfg.url.trim(), base_dir, true)?,
        Backend::Postgres => cfg.url.trim().to_string(),
    };

    let mut opts = ConnectOptions::new(dsn.clone());
    opts.max_connections(cfg.max_conns.unwrap_or(DEFAULT_MAX_CONNS))
        .acquire_timeout(Duration::from_secs(5));

    if backend == Backend::Sqlite {
        // every in-memory connection would otherwise be its own database
        if is_memory_dsn(&dsn) {
            opts.max_connections(1);
        }
        let busy = Duration::from_millis(u64::from(
            cfg.busy_timeout_ms.unwrap_or(DEFAULT_BUSY_TIMEOUT_MS),
        ));
        opts.map_sqlx_sqlite_opts(move |o| o.busy_timeout(busy));
    }

    tracing::info!(?backend, "Connecting to database: {}", redact(&dsn));
    Database::connect(opts)
        .await
        .with_context(|| format!("Failed to connect to {}", redact(&dsn)))
}

/// Hide the password part of a DSN for logs and errors.
fn redact(dsn: &str) -> String {
    match Url::parse(dsn) {
        Ok(mut url) if url.password().is_some() => {
            let _ = url.set_password(Some("***"));
            url.to_string()
        }
        _ => dsn.to_string(),
    }
}
