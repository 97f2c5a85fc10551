use thiserror::Error;

#[derive(Error, Debug)]
pub enum JsicError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("ページ範囲が不正です: {start}-{end}")]
    InvalidPageRange { start: u32, end: u32 },

    #[error("ページ範囲 {start}-{end} にページがありません")]
    NoPagesInRange { start: u32, end: u32 },

    #[error("ページが見つかりません: {0}")]
    PageNotFound(u32),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] jsic_common::Error),
}

pub type Result<T> = std::result::Result<T, JsicError>;
