use std::path::{Path, PathBuf};

use crate::source::Environment;

/////////////////////////////////////////////////////////////////////////////////////////

/// Expands a leading `~` using the `HOME` variable of the environment.
pub fn expand_home(raw: &str, env: &dyn Environment) -> PathBuf {
    let raw = raw.trim();

    if raw == "~" {
        if let Some(home) = env.var("HOME") {
            return PathBuf::from(home);
        }
    } else if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = env.var("HOME") {
            return Path::new(&home).join(rest);
        }
    }

    PathBuf::from(raw)
}

/// Requires the path to be a directory if it exists, optionally creating it.
pub fn check_directory(path: &Path, ensure_exists: bool) -> Result<(), String> {
    if path.exists() && !path.is_dir() {
        return Err(format!("path `{}` is not a directory", path.display()));
    }

    if ensure_exists {
        std::fs::create_dir_all(path)
            .map_err(|e| format!("cannot create directory `{}`: {e}", path.display()))?;
    }

    Ok(())
}

/////////////////////////////////////////////////////////////////////////////////////////
