//! 目次（分類項目名一覧）パーサー
//!
//! 目次ページの行を順に読み、大・中・小・細分類のエントリを出現順に生成する。
//!
//! ## 状態遷移
//! - `SkippingPreamble`: 最初の大分類見出しまでの行はすべて読み飛ばす
//! - `Scanning`: 見出し行・コード行で新しいエントリを開き、それ以外の行は継続行として扱う
//!
//! 継続行が追記されるのは直前に開いたエントリだけ。

use crate::normalize::{
    clean_english_name, clean_native_name, fullwidth_latin_to_ascii, halfwidth_alpha,
    halfwidth_digits, strip_cross_reference,
};
use crate::types::{IndexEntry, Tier};
use regex::Regex;

lazy_static::lazy_static! {
    // 大分類Ａ－... / 大分類A-...
    static ref MAJOR_RE: Regex = Regex::new(r"大分類([A-TＡ-Ｔ])[－-]").unwrap();
    // 中分類01 / 中分類 01
    static ref MIDDLE_RE: Regex = Regex::new(r"中分類\s*(\d{2})").unwrap();
    // 行頭の3桁・4桁コード
    static ref LEAF_RE: Regex = Regex::new(r"^(\d{3,4})\s+").unwrap();
    // 末尾の点線リーダーとページ番号
    static ref PAGE_SUFFIX_RE: Regex = Regex::new(r"[･\s]+(\d+)\s*$").unwrap();
    static ref DOT_LEADER_RE: Regex = Regex::new(r"[･]{2,}").unwrap();
    // 英語名: 大文字・引用符・アクセント付きラテン文字で始まる
    static ref ENGLISH_RE: Regex = Regex::new(
        r#"[A-Z"'\x{2018}\x{2019}\x{201C}\x{C0}-\x{FF}][A-Za-z0-9\s,.\-\x{2013}&()'\x{2018}\x{2019}"\x{201C}\x{201D}\x{C0}-\x{FF}\x{FF08}\x{FF09}\x{FF0C}\x{FF0D}]+"#
    ).unwrap();
    // 継続行用: 小文字始まりも許す
    static ref ENGLISH_LOWERCASE_RE: Regex = Regex::new(
        r#"[A-Za-z"'\x{2018}\x{2019}\x{201C}\x{C0}-\x{FF}][A-Za-z0-9\s,.\-\x{2013}&()'\x{2018}\x{2019}"\x{201C}\x{201D}\x{C0}-\x{FF}\x{FF08}\x{FF09}\x{FF0C}\x{FF0D}]+"#
    ).unwrap();
    static ref ENGLISH_ONLY_LINE_RE: Regex = Regex::new(r"^[a-zA-Z][a-zA-Z\s,.\-&()]+$").unwrap();
    static ref ENGLISH_PARENTHESIZED_LINE_RE: Regex =
        Regex::new(r"^\([a-zA-Z\s,.\-&]+\)$").unwrap();
    static ref TRAILING_DIGITS_RE: Regex = Regex::new(r"\s*\d+\s*$").unwrap();
    static ref TRAILING_QUOTES_RE: Regex = Regex::new(r#"["'\x{201C}\x{201D}]+$"#).unwrap();
    static ref MAJOR_CODE_PREFIX_RE: Regex = Regex::new(r"^[A-Z]-").unwrap();
}

/// パーサーの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexState {
    /// 最初の大分類見出しより前
    SkippingPreamble,
    /// 分類一覧の読み取り中
    Scanning,
}

/// 1行の分類結果
#[derive(Debug, Clone, PartialEq, Eq)]
enum IndexLine {
    /// 大分類・中分類の見出し、またはコード行
    Header(IndexEntry),
    /// 名前の続き（ページ番号なし）
    Continuation(String),
    /// 読み飛ばす行（前置き、またはどの見出しにも当たらないページ番号付きの行）
    Ignored,
}

/// 目次パーサー
#[derive(Debug)]
pub struct IndexScanner {
    state: IndexState,
    open: Option<IndexEntry>,
    entries: Vec<IndexEntry>,
}

impl Default for IndexScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexScanner {
    pub fn new() -> Self {
        Self {
            state: IndexState::SkippingPreamble,
            open: None,
            entries: Vec::new(),
        }
    }

    pub fn state(&self) -> IndexState {
        self.state
    }

    /// 1行を読み込む
    pub fn push_line(&mut self, raw: &str) {
        let line = raw.trim();
        if line.is_empty() {
            return;
        }

        match self.classify(line) {
            IndexLine::Header(entry) => {
                if entry.tier == Tier::Major && self.state == IndexState::SkippingPreamble {
                    tracing::debug!("目次の前置きを終了: 大分類{}", entry.code);
                    self.state = IndexState::Scanning;
                }
                self.open_entry(entry);
            }
            IndexLine::Continuation(text) => self.append_continuation(&text),
            IndexLine::Ignored => {}
        }
    }

    /// 読み取りを終了し、後処理済みのエントリを返す
    pub fn finish(mut self) -> Vec<IndexEntry> {
        self.flush();
        self.entries.into_iter().map(finalize_entry).collect()
    }

    fn classify(&self, line: &str) -> IndexLine {
        if let Some(caps) = MAJOR_RE.captures(line) {
            let code = caps[1].chars().map(halfwidth_alpha).collect::<String>();
            let (name, name_en) = extract_major_names(line);
            return IndexLine::Header(IndexEntry::new(Tier::Major, code, name, name_en));
        }

        if self.state == IndexState::SkippingPreamble {
            return IndexLine::Ignored;
        }

        if let Some(caps) = MIDDLE_RE.captures(line) {
            let code = halfwidth_digits(&caps[1]);
            let (name, name_en) = extract_middle_names(line);
            return IndexLine::Header(IndexEntry::new(Tier::Middle, code, name, name_en));
        }

        if let Some(caps) = LEAF_RE.captures(line) {
            let code = halfwidth_digits(&caps[1]);
            let tier = Tier::from_leaf_code(&code);
            let remaining = &line[caps[0].len()..];
            let (mut name, name_en) = split_bilingual(remaining, false);
            if tier == Tier::Minor {
                name = strip_cross_reference(&name);
            }
            return IndexLine::Header(IndexEntry::new(tier, code, name, name_en));
        }

        if PAGE_SUFFIX_RE.is_match(line) {
            return IndexLine::Ignored;
        }

        IndexLine::Continuation(line.to_string())
    }

    /// 開いているエントリを確定し、新しいエントリを開く
    fn open_entry(&mut self, entry: IndexEntry) {
        self.flush();
        self.open = Some(entry);
    }

    fn flush(&mut self) {
        if let Some(entry) = self.open.take() {
            self.entries.push(entry);
        }
    }

    fn append_continuation(&mut self, line: &str) {
        let Some(entry) = self.open.as_mut() else {
            return;
        };

        if is_english_only_line(line) {
            append_english(&mut entry.name_en, line);
            return;
        }

        let (name, name_en) = split_bilingual(line, true);
        entry.name.push_str(&name);
        append_english(&mut entry.name_en, &name_en);
    }
}

/// 目次の行リストをパースする
///
/// # Examples
/// ```
/// use jsic_common::parse_index_lines;
///
/// let entries = parse_index_lines(&["大分類Ａ－農業、林業 A-AGRICULTURE AND FORESTRY ･･････ 99"]);
/// assert_eq!(entries[0].code, "A");
/// assert_eq!(entries[0].name_en, "AGRICULTURE AND FORESTRY");
/// ```
pub fn parse_index_lines<S: AsRef<str>>(lines: &[S]) -> Vec<IndexEntry> {
    let mut scanner = IndexScanner::new();
    for line in lines {
        scanner.push_line(line.as_ref());
    }
    scanner.finish()
}

fn finalize_entry(mut entry: IndexEntry) -> IndexEntry {
    if entry.tier == Tier::Minor {
        entry.name = strip_cross_reference(&entry.name);
    }
    entry.name = clean_native_name(&entry.name);
    if entry.tier == Tier::Minor {
        entry.name = strip_cross_reference(&entry.name);
    }
    if !entry.name_en.is_empty() {
        entry.name_en = clean_english_name(&entry.name_en);
    }
    entry
}

fn append_english(target: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(text);
}

fn is_english_only_line(line: &str) -> bool {
    ENGLISH_ONLY_LINE_RE.is_match(line) || ENGLISH_PARENTHESIZED_LINE_RE.is_match(line)
}

fn strip_page_suffix(line: &str) -> String {
    let without_page = PAGE_SUFFIX_RE.replace(line, "");
    DOT_LEADER_RE.replace_all(&without_page, "").into_owned()
}

/// 大分類行から名前を抽出
///
/// 例: "大分類Ａ－農業、林業 A-AGRICULTURE AND FORESTRY ･･････ 99"
fn extract_major_names(line: &str) -> (String, String) {
    let line = strip_page_suffix(line);
    let Some(found) = MAJOR_RE.find(&line) else {
        return (String::new(), String::new());
    };

    let (name, name_en) = split_bilingual(line[found.end()..].trim(), false);
    let name_en = MAJOR_CODE_PREFIX_RE.replace(&name_en, "").trim().to_string();
    (name, name_en)
}

/// 中分類行から名前を抽出
///
/// 例: "中分類01 農業 01 AGRICULTURE ･･････ 101"
fn extract_middle_names(line: &str) -> (String, String) {
    let line = strip_page_suffix(line);
    match MIDDLE_RE.find(&line) {
        Some(found) => split_bilingual(line[found.end()..].trim(), false),
        None => (String::new(), String::new()),
    }
}

/// 日本語断片の末尾にある分類番号や引用符の残骸を除去
fn native_fragment(fragment: &str) -> Option<String> {
    let fragment = TRAILING_DIGITS_RE.replace(fragment.trim(), "");
    let fragment = TRAILING_QUOTES_RE.replace(fragment.trim(), "");
    let fragment = fragment.trim();
    if fragment.is_empty() || fragment.chars().all(|c| c.is_ascii_digit()) {
        None
    } else {
        Some(fragment.to_string())
    }
}

/// 日本語と英語が混在した文字列を (日本語名, 英語名) に分ける
///
/// 日本語の断片は区切りなしで、英語の断片は半角スペースで連結する。
pub fn split_bilingual(text: &str, allow_lowercase_english: bool) -> (String, String) {
    let text = strip_page_suffix(text);
    let text = text.trim();
    if text.is_empty() {
        return (String::new(), String::new());
    }

    let text = fullwidth_latin_to_ascii(text);
    let pattern: &Regex = if allow_lowercase_english {
        &*ENGLISH_LOWERCASE_RE
    } else {
        &*ENGLISH_RE
    };

    let mut native_parts = Vec::new();
    let mut english_parts = Vec::new();
    let mut last_end = 0;

    for found in pattern.find_iter(&text) {
        if found.start() > last_end {
            native_parts.extend(native_fragment(&text[last_end..found.start()]));
        }
        english_parts.push(found.as_str().trim());
        last_end = found.end();
    }
    if last_end < text.len() {
        native_parts.extend(native_fragment(&text[last_end..]));
    }

    (native_parts.concat(), english_parts.join(" "))
}
