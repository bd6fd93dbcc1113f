use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

/// Resolve the application home directory to an absolute path.
///
/// * `None` (or blank) falls back to `<user home>/<default_subdir>`.
/// * A leading `~` is expanded to the user's home directory.
/// * Relative paths are anchored at the current working directory.
///
/// With `create`, the directory is created if missing.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf> {
    let path = match configured.as_deref().map(str::trim) {
        None | Some("") => user_home()?.join(default_subdir),
        Some(raw) => expand(raw)?,
    };

    let path = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .context("current directory is not accessible")?
            .join(path)
    };

    if create {
        std::fs::create_dir_all(&path)
            .with_context(|| format!("failed to create home dir {}", path.display()))?;
    }

    Ok(path)
}

fn expand(raw: &str) -> Result<PathBuf> {
    if raw == "~" {
        return user_home();
    }
    if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        return Ok(user_home()?.join(rest));
    }
    if raw.starts_with('~') {
        // ~otheruser is not supported
        bail!("cannot expand '{raw}': only '~' for the current user is supported");
    }
    Ok(Path::new(raw).to_path_buf())
}

fn user_home() -> Result<PathBuf> {
    dirs::home_dir().context("could not determine the user's home directory")
}
