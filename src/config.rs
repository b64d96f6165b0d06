//! User configuration (`config.toml`).

use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    backend_url: Option<String>,
    download_dir: Option<PathBuf>,
    log_file: Option<PathBuf>,
    request_timeout_secs: Option<u64>,
}

/// Resolved settings with defaults filled in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the sheet backend, without trailing slash
    pub backend_url: String,
    /// Where exported and downloaded files are written
    pub download_dir: PathBuf,
    /// Log destination
    pub log_file: PathBuf,
    /// Per-request timeout, `None` waits indefinitely
    pub request_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            download_dir: PathBuf::from("."),
            log_file: default_log_path(),
            request_timeout: None,
        }
    }
}

impl Config {
    fn from_file(file: ConfigFile) -> Self {
        let defaults = Config::default();
        Config {
            backend_url: file
                .backend_url
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty())
                .unwrap_or(defaults.backend_url),
            download_dir: file.download_dir.unwrap_or(defaults.download_dir),
            log_file: file.log_file.unwrap_or(defaults.log_file),
            request_timeout: file
                .request_timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "sheetdesk")
}

fn user_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}

fn default_log_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join("sheetdesk.log"))
        .unwrap_or_else(|| PathBuf::from("sheetdesk.log"))
}

/// Load the configuration from `explicit` or the user config dir.
///
/// Never fails: problems are reported as warnings and defaults are used.
pub fn load_config(explicit: Option<&Path>) -> (Config, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let config_path = explicit.map(Path::to_path_buf).or_else(user_config_path);

    let Some(path) = config_path else {
        return (Config::default(), warnings);
    };

    if !path.exists() {
        if explicit.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (Config::default(), warnings);
    }

    let file = match std::fs::metadata(&path) {
        Ok(meta) if meta.len() > MAX_CONFIG_FILE_BYTES => {
            warnings.push(format!(
                "Refusing to read {}: file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_CONFIG_FILE_BYTES
            ));
            None
        }
        Ok(_) => match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<ConfigFile>(&content) {
                Ok(parsed) => Some(parsed),
                Err(err) => {
                    warnings.push(format!("Failed to parse {}: {}", path.display(), err));
                    None
                }
            },
            Err(err) => {
                warnings.push(format!("Failed to read {}: {}", path.display(), err));
                None
            }
        },
        Err(err) => {
            warnings.push(format!(
                "Failed to read metadata for {}: {}",
                path.display(),
                err
            ));
            None
        }
    };

    let config = file.map(Config::from_file).unwrap_or_default();
    (config, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config(tag: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "sheetdesk_config_{}_{}_{}.toml",
            tag,
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos(),
        ));
        std::fs::write(&path, content).unwrap();
        path
    }

    struct Cleanup(PathBuf);
    impl Drop for Cleanup {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.0);
        }
    }

    #[test]
    fn test_full_config_file() {
        let path = temp_config(
            "full",
            r#"
backend_url = "https://sheets.example.com/"
download_dir = "/tmp/sheets"
log_file = "/tmp/sheetdesk-test.log"
request_timeout_secs = 15
"#,
        );
        let _cleanup = Cleanup(path.clone());

        let (config, warnings) = load_config(Some(&path));
        assert!(warnings.is_empty(), "{:?}", warnings);
        assert_eq!(config.backend_url, "https://sheets.example.com");
        assert_eq!(config.download_dir, PathBuf::from("/tmp/sheets"));
        assert_eq!(config.log_file, PathBuf::from("/tmp/sheetdesk-test.log"));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let path = temp_config("partial", "download_dir = \"out\"\n");
        let _cleanup = Cleanup(path.clone());

        let (config, warnings) = load_config(Some(&path));
        assert!(warnings.is_empty());
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
        assert_eq!(config.download_dir, PathBuf::from("out"));
        assert_eq!(config.request_timeout, None);
    }

    #[test]
    fn test_unknown_field_warns_and_falls_back() {
        let path = temp_config("unknown", "colour = \"blue\"\n");
        let _cleanup = Cleanup(path.clone());

        let (config, warnings) = load_config(Some(&path));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("Failed to parse"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_missing_explicit_file_warns() {
        let path = std::env::temp_dir().join("sheetdesk_config_definitely_missing.toml");
        let (config, warnings) = load_config(Some(&path));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("not found"));
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
    }

    #[test]
    fn test_zero_timeout_means_none() {
        let path = temp_config("timeout", "request_timeout_secs = 0\n");
        let _cleanup = Cleanup(path.clone());
        let (config, _) = load_config(Some(&path));
        assert_eq!(config.request_timeout, None);
    }
}
