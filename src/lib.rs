//! jsic-parser
//!
//! 日本標準産業分類の抽出済みテキストを読み込み、分類階層のJSONを生成する

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod reader;

pub use error::{JsicError, Result};
