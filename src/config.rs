//! Application paths: config and data directories.
//!
//! Resolution order: CLI `--config-dir` override, then the
//! `DEBRIEF_CONFIG_DIR` environment variable, then the platform defaults
//! from `dirs-next`.

use std::path::{Path, PathBuf};

const APP_DIR: &str = "debrief";

/// Resolved application directories.
#[derive(Clone, Debug)]
pub struct PathConfig {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl PathConfig {
    pub fn from_env_and_cli(cli_override: Option<PathBuf>) -> Self {
        if let Some(dir) = cli_override
            .or_else(|| std::env::var_os("DEBRIEF_CONFIG_DIR").map(PathBuf::from))
        {
            return Self {
                config_dir: dir.clone(),
                data_dir: dir,
            };
        }
        Self {
            config_dir: dirs_next::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR),
            data_dir: dirs_next::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR),
        }
    }
}

/// Path of a file in the config directory.
pub fn config_file(name: &str, paths: &PathConfig) -> PathBuf {
    paths.config_dir.join(name)
}

/// Path of a file in the data directory.
pub fn data_file(name: &str, paths: &PathConfig) -> PathBuf {
    paths.data_dir.join(name)
}

/// Create the application directories if missing.
pub fn ensure_dirs(paths: &PathConfig) -> std::io::Result<()> {
    std::fs::create_dir_all(&paths.config_dir)?;
    if paths.data_dir != paths.config_dir {
        std::fs::create_dir_all(&paths.data_dir)?;
    }
    Ok(())
}

/// True if `path` looks like a session document this app can open.
pub fn is_session_document(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override_wins() {
        let paths = PathConfig::from_env_and_cli(Some(PathBuf::from("/tmp/custom")));
        assert_eq!(paths.config_dir, PathBuf::from("/tmp/custom"));
        assert_eq!(config_file("debrief.json", &paths), PathBuf::from("/tmp/custom/debrief.json"));
    }

    #[test]
    fn test_session_document_detection() {
        assert!(is_session_document(Path::new("run42.session.json")));
        assert!(is_session_document(Path::new("UPPER.JSON")));
        assert!(!is_session_document(Path::new("movie.mp4")));
        assert!(!is_session_document(Path::new("noext")));
    }
}
