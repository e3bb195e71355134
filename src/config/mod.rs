use std::env;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct ConfigFile {
    /// Directory containing `data/<name>.json`, or an http(s) base URL.
    #[serde(alias = "base_url")]
    pub data_source: Option<String>,
    pub page: Option<String>,
    pub output: Option<String>,
    pub output_format: Option<String>,
    pub timeout: Option<u64>,
    pub workers: Option<usize>,
    pub no_color: Option<bool>,
    pub quiet: Option<bool>,
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
        .or_else(|| {
            let drive = env::var_os("HOMEDRIVE")?;
            let path = env::var_os("HOMEPATH")?;
            Some(PathBuf::from(drive).join(path))
        })
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(home_dir()?.join(".storedash").join("config.yml"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn parse_config(contents: &str) -> Result<ConfigFile, String> {
    if contents.trim().is_empty() {
        return Ok(ConfigFile::default());
    }
    serde_yaml::from_str::<ConfigFile>(contents).map_err(|e| e.to_string())
}

pub fn load_config(path: &PathBuf, allow_missing: bool) -> Result<ConfigFile, String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => parse_config(&contents)
            .map_err(|e| format!("failed to parse config '{}': {e}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("config file not found '{}'", path.display()))
        }
        Err(e) => Err(format!("failed to read config '{}': {e}", path.display())),
    }
}

fn default_config_yaml() -> String {
    r#"# Storedash config
#
# Location (default):
#   ~/.storedash/config.yml

# Where data/<name>.json lives: a directory or an http(s) base URL
data_source: ./
# data_source: https://example.com/dashboard/

# Page to render, including its query string
page: index.html
# page: order-detail.html?id=1

# Output (optional, stdout when unset)
# output: ./index.html
output_format: html

# Loading
timeout: 10
workers: 2

# Console
no_color: false
quiet: false
"#
    .to_string()
}

pub fn ensure_default_config_file(path: &PathBuf) -> Result<bool, String> {
    if path.exists() {
        return Ok(false);
    }
    let parent = path
        .parent()
        .ok_or_else(|| format!("invalid config path '{}'", path.display()))?;
    std::fs::create_dir_all(parent).map_err(|e| {
        format!(
            "failed to create config directory '{}': {e}",
            parent.display()
        )
    })?;
    let contents = default_config_yaml();
    std::fs::write(path, contents)
        .map_err(|e| format!("failed to write config file '{}': {e}", path.display()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_yaml_parses() {
        let cfg = parse_config(&default_config_yaml()).unwrap();
        assert_eq!(cfg.data_source.as_deref(), Some("./"));
        assert_eq!(cfg.page.as_deref(), Some("index.html"));
        assert_eq!(cfg.timeout, Some(10));
        assert_eq!(cfg.output, None);
    }

    #[test]
    fn base_url_alias_maps_to_data_source() {
        let cfg = parse_config("base_url: http://localhost:8000/\n").unwrap();
        assert_eq!(cfg.data_source.as_deref(), Some("http://localhost:8000/"));
    }

    #[test]
    fn empty_config_is_default() {
        let cfg = parse_config("  \n").unwrap();
        assert!(cfg.page.is_none());
    }

    #[test]
    fn missing_file_allowed_only_when_asked() {
        let path = PathBuf::from("/definitely/not/here/storedash.yml");
        assert!(load_config(&path, true).is_ok());
        assert!(load_config(&path, false).is_err());
    }
}
