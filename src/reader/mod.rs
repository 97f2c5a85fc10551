//! 抽出済みテキストの読み込み
//!
//! ## 入力形式
//! - 改ページ（`\x0c`）区切りの1ファイル（pdftotext の出力）
//! - 1ページ1ファイルの `*.txt` を置いたフォルダ（ファイル名末尾の数字がページ番号）
//!
//! ## 処理フロー
//! 1. ページごとにページ番号のノイズ（「- 51 -」）を除去
//! 2. 指定範囲のページを改行で連結して行に分割
//! 3. 補正表を適用

mod corrections;

pub use corrections::{apply_corrections, Correction, CORRECTIONS};

use crate::error::{JsicError, Result};
use jsic_common::PageRange;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use walkdir::WalkDir;

const PAGE_SEPARATOR: char = '\x0c';

lazy_static::lazy_static! {
    static ref PAGE_NOISE_RE: Regex = Regex::new(r"-\s*\d+\s*-").unwrap();
    static ref PAGE_NUMBER_RE: Regex = Regex::new(r"(\d+)\D*$").unwrap();
}

/// ページ番号付きのテキスト文書
#[derive(Debug, Clone, Default)]
pub struct Document {
    pages: BTreeMap<u32, String>,
}

impl Document {
    /// ファイルまたはフォルダから読み込む
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(JsicError::FileNotFound(path.display().to_string()));
        }

        let document = if path.is_dir() {
            Self::from_page_files(path)?
        } else {
            Self::from_text(&std::fs::read_to_string(path)?)
        };
        tracing::debug!("{} ページを読み込み: {}", document.total_pages(), path.display());
        Ok(document)
    }

    /// 改ページ区切りのテキストから作る（ページ番号は1始まり）
    pub fn from_text(text: &str) -> Self {
        let mut segments: Vec<&str> = text.split(PAGE_SEPARATOR).collect();
        // 末尾の改ページの後ろは空ページにしない
        if segments.len() > 1 && segments.last().is_some_and(|s| s.trim().is_empty()) {
            segments.pop();
        }
        Self::from_pages(segments)
    }

    /// ページ本文の列から作る（ページ番号は1始まり）
    pub fn from_pages<S: AsRef<str>>(pages: impl IntoIterator<Item = S>) -> Self {
        let pages = pages
            .into_iter()
            .zip(1u32..)
            .map(|(text, number)| (number, remove_page_noise(text.as_ref())))
            .collect();
        Self { pages }
    }

    fn from_page_files(folder: &Path) -> Result<Self> {
        let mut pages = BTreeMap::new();

        for entry in WalkDir::new(folder)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || path.extension().map_or(true, |ext| ext != "txt") {
                continue;
            }

            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            let Some(number) = page_number_from_stem(&stem) else {
                tracing::warn!("ページ番号のないファイルをスキップ: {}", path.display());
                continue;
            };

            let text = std::fs::read_to_string(path)?;
            pages.insert(number, remove_page_noise(&text));
        }

        Ok(Self { pages })
    }

    pub fn total_pages(&self) -> usize {
        self.pages.len()
    }

    /// 1ページ分のテキスト
    pub fn read_page(&self, number: u32) -> Result<&str> {
        self.pages
            .get(&number)
            .map(String::as_str)
            .ok_or(JsicError::PageNotFound(number))
    }

    /// 指定範囲（両端を含む）を行の列として読む
    pub fn read_pages(&self, start: u32, end: u32) -> Result<Vec<String>> {
        if start < 1 || end < start {
            return Err(JsicError::InvalidPageRange { start, end });
        }

        let texts: Vec<&str> = self
            .pages
            .range(start..=end)
            .map(|(_, text)| text.as_str())
            .collect();
        if texts.is_empty() {
            return Err(JsicError::NoPagesInRange { start, end });
        }

        Ok(texts.join("\n").lines().map(apply_corrections).collect())
    }

    pub fn read_range(&self, range: PageRange) -> Result<Vec<String>> {
        self.read_pages(range.start, range.end)
    }
}

/// ページ番号のノイズ（「- 51 -」）を除去
fn remove_page_noise(text: &str) -> String {
    PAGE_NOISE_RE.replace_all(text, "").into_owned()
}

/// ファイル名の最後の数字列をページ番号とする（page-051 → 51）
fn page_number_from_stem(stem: &str) -> Option<u32> {
    PAGE_NUMBER_RE.captures(stem)?.get(1)?.as_str().parse().ok()
}
