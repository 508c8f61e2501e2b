use crate::history::storage::DEFAULT_MAX_ENTRIES;
use crate::{CourierError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// 配置文件名
pub const CONFIG_FILE: &str = "courier.toml";

/// `courier.toml` 的内容，所有字段都有默认值
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CourierConfig {
    pub log_level: String,
    pub history: HistoryConfig,
    pub workspace: WorkspaceConfig,
}

impl Default for CourierConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            history: HistoryConfig::default(),
            workspace: WorkspaceConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub enabled: bool,
    /// 为空时使用 `.courier`；环境变量 `COURIER_HISTORY_DIR` 优先
    pub dir: Option<PathBuf>,
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: None,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    pub path: PathBuf,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".courier").join("workspace.json"),
        }
    }
}

/// 配置文件加载器
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<CourierConfig> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| CourierError::Config(format!("{}: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| CourierError::Config(format!("{}: {}", path.display(), e)))
    }

    /// 查找顺序：当前目录及其父目录，然后 `~/.config/courier/`
    ///
    /// 找不到配置文件时返回默认配置；找到但无法解析时报错。
    pub fn find_and_load() -> Result<CourierConfig> {
        match Self::locate() {
            Some(path) => Self::load_from_path(path),
            None => Ok(CourierConfig::default()),
        }
    }

    pub fn locate() -> Option<PathBuf> {
        std::env::current_dir()
            .ok()
            .and_then(|dir| Self::search_ancestors(&dir))
            .or_else(Self::user_config_path)
    }

    fn search_ancestors(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILE))
            .find(|path| path.is_file())
    }

    fn user_config_path() -> Option<PathBuf> {
        let path = dirs::home_dir()?
            .join(".config")
            .join("courier")
            .join(CONFIG_FILE);
        path.is_file().then_some(path)
    }
}
