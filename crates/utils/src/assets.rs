use std::{
    env,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;

const PROJECT_ROOT: &str = env!("CARGO_MANIFEST_DIR");
const DATA_DIR_ENV: &str = "MOODTUNE_DATA_DIR";
const PREFERENCES_PATH_ENV: &str = "MOODTUNE_PREFERENCES_PATH";

/// File name of the learned-preferences document inside the data directory.
pub const PREFERENCES_FILE: &str = "user_preferences.json";

/// Where MoodTune keeps its state.
///
/// `MOODTUNE_DATA_DIR` wins; debug builds use `dev_data/` at the workspace
/// root; release builds use the platform data directory.
pub fn data_dir() -> PathBuf {
    resolve_data_dir(env::var(DATA_DIR_ENV).ok().as_deref(), cfg!(debug_assertions))
}

fn resolve_data_dir(custom_dir: Option<&str>, debug_build: bool) -> PathBuf {
    if let Some(custom_dir) = custom_dir.filter(|dir| !dir.trim().is_empty()) {
        return PathBuf::from(custom_dir);
    }

    if debug_build {
        return Path::new(PROJECT_ROOT).join("../../dev_data");
    }

    // ✔ macOS → ~/Library/Application Support/dev.moodtune.moodtune
    // ✔ Linux → ~/.local/share/moodtune   (respects XDG_DATA_HOME)
    match ProjectDirs::from("dev", "moodtune", "moodtune") {
        Some(dirs) => dirs.data_dir().to_path_buf(),
        None => {
            tracing::warn!("No home directory available - keeping data in the working directory");
            PathBuf::from(".")
        }
    }
}

/// Path of the preferences document (`MOODTUNE_PREFERENCES_PATH` overrides).
pub fn preferences_path() -> PathBuf {
    match env::var(PREFERENCES_PATH_ENV) {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => data_dir().join(PREFERENCES_FILE),
    }
}

/// Create the parent directory of `path` if it is missing.
pub fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            std::fs::create_dir_all(parent)?;
            tracing::info!("Created data directory: {}", parent.display());
            Ok(())
        }
        _ => Ok(()),
    }
}
