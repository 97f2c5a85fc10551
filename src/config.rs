use crate::error::{JsicError, Result};
use jsic_common::{PageRange, Verbosity};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 目次（分類項目名一覧）のページ範囲
    pub index_pages: PageRange,
    /// 本文（説明及び内容例示）のページ範囲
    pub detail_pages: PageRange,
    pub default_format: Verbosity,
    pub output: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default_config())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| JsicError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("jsic-parser").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            // 令和5年改定版の掲載ページ
            index_pages: PageRange { start: 51, end: 102 },
            detail_pages: PageRange { start: 105, end: 534 },
            default_format: Verbosity::Full,
            output: PathBuf::from("jsic.json"),
        }
    }
}
