use std::path::PathBuf;

use dirs_next::{config_dir, home_dir};

/// Name of the per-user directory holding LeadDash state.
pub const APP_DIR_NAME: &str = "leaddash";

pub fn expand_tilde(path: &str) -> PathBuf {
    let p = path.trim();
    if p == "~" {
        return home_dir().unwrap_or_else(|| PathBuf::from("~"));
    }
    if let Some(rest) = p.strip_prefix("~/") {
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    if let Some(rest) = p.strip_prefix("~\\") {
        // Windows-style
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    PathBuf::from(p)
}

/// Resolve `file_name` inside the LeadDash config directory, honoring an
/// environment variable override when it is set and non-empty.
pub fn app_file_path(env_var: &str, file_name: &str) -> PathBuf {
    if let Ok(path) = std::env::var(env_var)
        && !path.trim().is_empty()
    {
        return expand_tilde(&path);
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
        .join(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaves_plain_paths_alone() {
        assert_eq!(expand_tilde(" /tmp/storage.json "), PathBuf::from("/tmp/storage.json"));
        assert_eq!(expand_tilde("relative/file.json"), PathBuf::from("relative/file.json"));
    }

    #[test]
    fn expands_home_prefix() {
        if let Some(home) = home_dir() {
            assert_eq!(expand_tilde("~"), home);
            assert_eq!(expand_tilde("~/x/y.json"), home.join("x/y.json"));
        }
    }

    #[test]
    fn env_override_wins_over_config_dir() {
        temp_env::with_var("LEADDASH_TEST_PATH", Some("/tmp/override.json"), || {
            assert_eq!(app_file_path("LEADDASH_TEST_PATH", "ignored.json"), PathBuf::from("/tmp/override.json"));
        });
        temp_env::with_var("LEADDASH_TEST_PATH", Some("   "), || {
            let resolved = app_file_path("LEADDASH_TEST_PATH", "fallback.json");
            assert!(resolved.ends_with("leaddash/fallback.json"));
        });
    }
}
