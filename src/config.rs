//! 桥接配置
//!
//! 读取优先级：
//! 1. `$NBRIDGE_CONFIG` 指向的 JSON 文件
//! 2. `~/.config/notification-bridge/config.json`（平台对应的配置目录）
//! 3. 内置默认值
//!
//! 之后环境变量 `NBRIDGE_API_LEVEL` 覆盖 `api_level`。

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::notification::platform::PlatformCapabilities;

/// 默认 API level
pub const DEFAULT_API_LEVEL: u32 = 34;

/// Environment variable pointing at a config file
pub const CONFIG_ENV: &str = "NBRIDGE_CONFIG";

/// Environment variable overriding the API level
pub const API_LEVEL_ENV: &str = "NBRIDGE_API_LEVEL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// OS API level, decides which platform features are used
    pub api_level: u32,
    /// 点击通知内容时是否把宿主应用切到前台
    pub foreground_on_activation: bool,
    /// 分组摘要的正文；为空时沿用首个子通知的标题和正文
    pub summary_text: Option<String>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            api_level: DEFAULT_API_LEVEL,
            foreground_on_activation: true,
            summary_text: None,
        }
    }
}

impl BridgeConfig {
    /// 从指定文件读取
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: BridgeConfig = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        debug!(path = %path.display(), api_level = config.api_level, "Loaded bridge config");
        Ok(config)
    }

    /// 默认配置文件路径
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("notification-bridge").join("config.json"))
    }

    /// 按优先级自动加载
    pub fn auto_load() -> Result<Self> {
        let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let mut config = match explicit {
            Some(path) => Self::load(&path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(raw) = std::env::var(API_LEVEL_ENV) {
            match raw.trim().parse::<u32>() {
                Ok(level) => self.api_level = level,
                Err(_) => warn!(value = %raw, "Ignoring invalid {}", API_LEVEL_ENV),
            }
        }
    }

    pub fn capabilities(&self) -> PlatformCapabilities {
        PlatformCapabilities::for_api_level(self.api_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::default();
        assert_eq!(config.api_level, DEFAULT_API_LEVEL);
        assert!(config.foreground_on_activation);
        assert!(config.summary_text.is_none());
        assert!(config.capabilities().channels);
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"api_level": 24}}"#).unwrap();

        let config = BridgeConfig::load(file.path()).unwrap();
        assert_eq!(config.api_level, 24);
        assert!(config.foreground_on_activation);
        assert!(!config.capabilities().channels);
        assert!(config.capabilities().inline_reply);
    }

    #[test]
    fn test_load_full_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"api_level": 30, "foreground_on_activation": false, "summary_text": "New messages"}}"#
        )
        .unwrap();

        let config = BridgeConfig::load(file.path()).unwrap();
        assert!(!config.foreground_on_activation);
        assert_eq!(config.summary_text.as_deref(), Some("New messages"));
    }

    #[test]
    fn test_load_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = BridgeConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid config"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = BridgeConfig::load(Path::new("/nonexistent/nbridge.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }
}
