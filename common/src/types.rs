//! 分類エントリの型定義
//!
//! - IndexEntry: 目次（分類項目名一覧）から得たエントリ
//! - DetailEntry: 本文（説明及び内容例示）から得たエントリ
//! - ExcludedExample: 除外例とその分類先コード
//! - PageRange: 読み込むページ範囲（「51-102」形式）

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 分類階層（大分類 ⊃ 中分類 ⊃ 小分類 ⊃ 細分類）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// 大分類（英字1文字）
    Major,
    /// 中分類（数字2桁）
    Middle,
    /// 小分類（数字3桁）
    Minor,
    /// 細分類（数字4桁）
    Detail,
}

impl Tier {
    /// 数字コードの桁数から小分類/細分類を判定
    pub fn from_leaf_code(code: &str) -> Self {
        if code.chars().count() == 3 {
            Tier::Minor
        } else {
            Tier::Detail
        }
    }

    /// 一つ上の階層
    pub fn parent(self) -> Option<Tier> {
        match self {
            Tier::Major => None,
            Tier::Middle => Some(Tier::Major),
            Tier::Minor => Some(Tier::Middle),
            Tier::Detail => Some(Tier::Minor),
        }
    }

    /// コードがこの階層の形式に合っているか
    pub fn accepts_code(self, code: &str) -> bool {
        let is_digits = |len: usize| code.len() == len && code.bytes().all(|b| b.is_ascii_digit());
        match self {
            Tier::Major => code.len() == 1 && matches!(code.as_bytes()[0], b'A'..=b'T'),
            Tier::Middle => is_digits(2),
            Tier::Minor => is_digits(3),
            Tier::Detail => is_digits(4),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Major => "major",
            Tier::Middle => "middle",
            Tier::Minor => "minor",
            Tier::Detail => "detail",
        }
    }

    /// 日本語の階層名
    pub fn label(self) -> &'static str {
        match self {
            Tier::Major => "大分類",
            Tier::Middle => "中分類",
            Tier::Minor => "小分類",
            Tier::Detail => "細分類",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 目次から得た分類エントリ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    #[serde(rename = "type")]
    pub tier: Tier,
    pub code: String,
    /// 日本語名
    pub name: String,
    /// 英語名
    #[serde(default)]
    pub name_en: String,
}

impl IndexEntry {
    pub fn new(
        tier: Tier,
        code: impl Into<String>,
        name: impl Into<String>,
        name_en: impl Into<String>,
    ) -> Self {
        Self {
            tier,
            code: code.into(),
            name: name.into(),
            name_en: name_en.into(),
        }
    }
}

/// 除外例（×で始まる業態）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedExample {
    pub name: String,
    /// 分類先のコード（［0953］など）
    pub codes: Vec<String>,
}

/// 本文から得た分類エントリ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailEntry {
    #[serde(rename = "type")]
    pub tier: Tier,
    pub code: String,
    pub name: String,
    /// 説明文（空白・改行を除去して連結）
    #[serde(default)]
    pub description: String,
    /// ○で始まる含まれる業態
    #[serde(default)]
    pub included_examples: Vec<String>,
    /// ×で始まる除外される業態
    #[serde(default)]
    pub excluded_examples: Vec<ExcludedExample>,
}

/// 階層ごとの件数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TierStats {
    pub major: usize,
    pub middle: usize,
    pub minor: usize,
    pub detail: usize,
}

impl TierStats {
    /// 階層の列から件数を集計
    pub fn count(tiers: impl IntoIterator<Item = Tier>) -> Self {
        let mut stats = Self::default();
        for tier in tiers {
            match tier {
                Tier::Major => stats.major += 1,
                Tier::Middle => stats.middle += 1,
                Tier::Minor => stats.minor += 1,
                Tier::Detail => stats.detail += 1,
            }
        }
        stats
    }

    pub fn total(&self) -> usize {
        self.major + self.middle + self.minor + self.detail
    }
}

/// ページ範囲（両端を含む、1始まり）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
}

impl PageRange {
    pub fn new(start: u32, end: u32) -> Result<Self> {
        if start < 1 || end < start {
            return Err(Error::InvalidPageRange { start, end });
        }
        Ok(Self { start, end })
    }
}

impl FromStr for PageRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parse = |part: &str| {
            part.trim()
                .parse::<u32>()
                .map_err(|_| Error::Parse(format!("ページ番号が不正です: {}", s)))
        };
        match s.split_once('-') {
            Some((start, end)) => Self::new(parse(start)?, parse(end)?),
            None => {
                let page = parse(s)?;
                Self::new(page, page)
            }
        }
    }
}

impl TryFrom<String> for PageRange {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<PageRange> for String {
    fn from(range: PageRange) -> Self {
        range.to_string()
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
