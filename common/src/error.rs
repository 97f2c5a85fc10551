//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid page range: {start}-{end}")]
    InvalidPageRange { start: u32, end: u32 },

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_page_range() {
        let error = Error::InvalidPageRange { start: 102, end: 51 };
        assert_eq!(format!("{}", error), "Invalid page range: 102-51");
    }

    #[test]
    fn test_error_display_parse() {
        let error = Error::Parse("ページ範囲の形式が不正です".to_string());
        assert_eq!(format!("{}", error), "Parse error: ページ範囲の形式が不正です");
    }

    #[test]
    fn test_error_debug() {
        let error = Error::Parse("テスト".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("Parse"));
        assert!(debug.contains("テスト"));
    }
}
