use std::path::PathBuf;

/// Login name of the user running the probe. Part of the cache identity so
/// two users checking the same schema keep separate baselines.
pub fn invoking_user() -> String {
    ["USER", "LOGNAME", "USERNAME"]
        .iter()
        .filter_map(std::env::var_os)
        .map(|v| v.to_string_lossy().into_owned())
        .find(|v| !v.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

pub fn temp_dir() -> PathBuf {
    std::env::temp_dir()
}

/// Default config file location (~/.config/tablestat/config.toml on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "tablestat")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}
