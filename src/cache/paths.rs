// Cache path utilities.
// Locates the per-user files bindscope keeps between runs.

use std::path::PathBuf;

use directories::ProjectDirs;

/// Get the base cache directory (~/.cache/bindscope on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "bindscope").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Path to the session state file.
pub fn state_path() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("state.json"))
}

/// Path to the trace log written while the TUI owns the terminal.
pub fn log_path() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("bindscope.log"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_share_cache_dir() {
        // ProjectDirs can be unavailable in minimal environments (no HOME).
        let Some(dir) = cache_dir() else {
            return;
        };
        assert_eq!(state_path(), Some(dir.join("state.json")));
        assert_eq!(log_path(), Some(dir.join("bindscope.log")));
    }
}
