//! 本文（説明及び内容例示）パーサー
//!
//! 本文ページの行から分類エントリを生成し、説明文・含まれる例（○）・除外例（×）を付与する。
//!
//! ## 状態遷移
//! - `Idle`: 大分類・中分類見出しの直後
//! - `Overview`: 「総説」以降。見出しエントリの説明文と例示を集める
//! - `ClassificationList`: 「小分類 細分類」以降。コード行ごとに小分類・細分類エントリを開く
//!
//! 大分類・中分類見出しはどの状態でも新しいエントリを開き、状態を `Idle` に戻す。

use crate::normalize::{
    clean_native_name, collapse_whitespace, halfwidth_alpha, halfwidth_digits,
    strip_cross_reference,
};
use crate::types::{DetailEntry, ExcludedExample, Tier};
use regex::Regex;

/// 含まれる例の行頭記号
pub const INCLUDED_MARKER: char = '○';
/// 除外例の行頭記号
pub const EXCLUDED_MARKER: char = '×';
/// 例示の区切り記号
pub const EXAMPLE_SEPARATOR: char = '；';
/// 例示の継続行を打ち切る行頭キーワード
pub const SECTION_KEYWORDS: &[&str] = &["大分類", "中分類", "小分類", "総", "番 号"];
/// コード行でも本文中の参照とみなす書き出し
pub const CONNECTIVE_PREFIXES: &[&str] = &["又は", "に、", "に分類", "を除く", "に設け"];
/// 説明文の書き出し（名前の継続行ではない）
pub const DESCRIPTION_OPENERS: &[&str] = &["主として", "この"];
/// 名前の継続行とみなす最大文字数
pub const NAME_CONTINUATION_MAX_CHARS: usize = 10;
/// 名前として完結しているとみなす語尾
pub const COMPLETE_NAME_SUFFIXES: &[&str] = &[
    "業", "所", "類", "品", "等", "他", "外", "製造業", "工事業", "サービス業",
];

lazy_static::lazy_static! {
    static ref MAJOR_RE: Regex = Regex::new(r"^大分類([A-TＡ-Ｔ])[－\-―](.+)$").unwrap();
    static ref MIDDLE_RE: Regex = Regex::new(r"^中分類([\d０-９]{2})[－\-―](.+)$").unwrap();
    // 複数の中分類を並べた参照（「、10－」など）
    static ref MIDDLE_REFERENCE_RE: Regex = Regex::new(r"、[\d０-９]{2}[－-]").unwrap();
    static ref OVERVIEW_RE: Regex = Regex::new(r"^総\s*説\s*$").unwrap();
    static ref TABLE_HEADER_RE: Regex = Regex::new(r"^小分類\s+細分類").unwrap();
    static ref LEAF_RE: Regex = Regex::new(r"^([\d０-９]{3,4})\s+(.+)$").unwrap();
    static ref FILLER_RE: Regex = Regex::new(r"^[番号\s]+$").unwrap();
    static ref CODE_REFERENCE_RE: Regex = Regex::new(r"\d{2,4}").unwrap();
    static ref BRACKETED_NAME_RE: Regex = Regex::new(r"^(.+?)[［\[〔]").unwrap();
}

/// パーサーの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Idle,
    Overview,
    ClassificationList,
}

/// 見出しレベルでの1行の分類
#[derive(Debug, Clone, PartialEq, Eq)]
enum DetailLine {
    Major { code: String, name: String },
    Middle { code: String, name: String },
    /// 他の分類への参照として現れた見出し
    CrossReference,
    OverviewMarker,
    TableHeader,
    /// 状態に応じて解釈する本文行
    Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExampleKind {
    Included,
    Excluded,
}

impl ExampleKind {
    fn of(line: &str) -> Option<Self> {
        if line.starts_with(INCLUDED_MARKER) {
            Some(ExampleKind::Included)
        } else if line.starts_with(EXCLUDED_MARKER) {
            Some(ExampleKind::Excluded)
        } else {
            None
        }
    }
}

/// 組み立て中のエントリ
#[derive(Debug)]
struct EntryBuilder {
    tier: Tier,
    code: String,
    name: String,
    description: Vec<String>,
    /// 記号ごとのブロック（記号は除去済み、継続行は区切りなしで連結）
    included: Vec<String>,
    excluded: Vec<String>,
}

impl EntryBuilder {
    fn new(tier: Tier, code: String, name: String) -> Self {
        Self {
            tier,
            code,
            name,
            description: Vec::new(),
            included: Vec::new(),
            excluded: Vec::new(),
        }
    }

    fn push_example(&mut self, kind: ExampleKind, block: String) {
        match kind {
            ExampleKind::Included => self.included.push(block),
            ExampleKind::Excluded => self.excluded.push(block),
        }
    }

    fn finish(self) -> DetailEntry {
        DetailEntry {
            tier: self.tier,
            code: self.code,
            name: self.name,
            description: collapse_whitespace(&self.description.join("\n")),
            included_examples: split_examples(&self.included).map(str::to_string).collect(),
            excluded_examples: split_examples(&self.excluded).map(parse_excluded_example).collect(),
        }
    }
}

/// 本文パーサー
#[derive(Debug)]
pub struct DetailScanner<'a> {
    lines: Vec<&'a str>,
    section: Section,
    open: Option<EntryBuilder>,
    entries: Vec<DetailEntry>,
}

impl<'a> DetailScanner<'a> {
    pub fn new<S: AsRef<str>>(lines: &'a [S]) -> Self {
        Self {
            lines: lines.iter().map(|l| l.as_ref().trim()).collect(),
            section: Section::Idle,
            open: None,
            entries: Vec::new(),
        }
    }

    /// 全行を読み、後処理済みのエントリを返す
    pub fn run(mut self) -> Vec<DetailEntry> {
        let mut pos = 0;
        while pos < self.lines.len() {
            pos = self.step(pos);
        }
        self.flush();

        self.entries.into_iter().map(finalize_entry).collect()
    }

    /// 1行（と、それに続けて読み込んだ継続行）を処理し、次の行位置を返す
    fn step(&mut self, pos: usize) -> usize {
        let line = self.lines[pos];
        if line.is_empty() {
            return pos + 1;
        }

        match classify(line) {
            DetailLine::Major { code, name } => self.open_heading(Tier::Major, code, name),
            DetailLine::Middle { code, name } => self.open_heading(Tier::Middle, code, name),
            DetailLine::CrossReference => {}
            DetailLine::OverviewMarker => self.enter(Section::Overview),
            DetailLine::TableHeader => {
                if self.section == Section::Overview && self.open.is_some() {
                    self.flush();
                }
                self.enter(Section::ClassificationList);
            }
            DetailLine::Content => match self.section {
                Section::Overview => return self.overview_line(pos),
                Section::ClassificationList => return self.list_line(pos),
                Section::Idle => {}
            },
        }

        pos + 1
    }

    fn enter(&mut self, section: Section) {
        if self.section != section {
            tracing::debug!("セクション切替: {:?} -> {:?}", self.section, section);
        }
        self.section = section;
    }

    fn open_heading(&mut self, tier: Tier, code: String, name: String) {
        self.flush();
        self.open = Some(EntryBuilder::new(tier, code, name));
        self.section = Section::Idle;
    }

    fn flush(&mut self) {
        if let Some(builder) = self.open.take() {
            self.entries.push(builder.finish());
        }
    }

    /// 総説内の行: 説明文または例示
    fn overview_line(&mut self, pos: usize) -> usize {
        let line = self.lines[pos];
        if self.open.is_none() || FILLER_RE.is_match(line) {
            return pos + 1;
        }
        self.body_line(pos)
    }

    /// 分類一覧内の行: コード行なら新しいエントリ、それ以外は説明文または例示
    fn list_line(&mut self, pos: usize) -> usize {
        let line = self.lines[pos];

        if let Some(caps) = LEAF_RE.captures(line) {
            let name = caps[2].trim();
            if CONNECTIVE_PREFIXES.iter().any(|p| name.starts_with(p)) {
                if let Some(open) = self.open.as_mut() {
                    open.description.push(line.to_string());
                }
                return pos + 1;
            }

            let code = halfwidth_digits(&caps[1]);
            let mut name = name.to_string();
            let mut next = pos + 1;
            if let Some(following) = self.lines.get(next) {
                if continues_name(&name, following) {
                    name.push_str(following);
                    next += 1;
                }
            }

            self.flush();
            self.open = Some(EntryBuilder::new(Tier::from_leaf_code(&code), code, name));
            return next;
        }

        if self.open.is_none() {
            return pos + 1;
        }
        self.body_line(pos)
    }

    fn body_line(&mut self, pos: usize) -> usize {
        let line = self.lines[pos];
        let Some(kind) = ExampleKind::of(line) else {
            if let Some(open) = self.open.as_mut() {
                open.description.push(line.to_string());
            }
            return pos + 1;
        };

        let (continuation, next) =
            collect_continuation(&self.lines, pos + 1, is_example_terminator);
        let mut block: String = line.chars().skip(1).collect();
        for part in continuation {
            block.push_str(part);
        }
        if let Some(open) = self.open.as_mut() {
            open.push_example(kind, block);
        }
        next
    }
}

/// 本文の行リストをパースする
pub fn parse_detail_lines<S: AsRef<str>>(lines: &[S]) -> Vec<DetailEntry> {
    DetailScanner::new(lines).run()
}

fn classify(line: &str) -> DetailLine {
    if let Some(caps) = MAJOR_RE.captures(line) {
        let name = caps[2].trim();
        if name.contains('［')
            || name.contains('〔')
            || name.ends_with("に分類される。")
            || name.ends_with("に分類される")
        {
            return DetailLine::CrossReference;
        }
        return DetailLine::Major {
            code: caps[1].chars().map(halfwidth_alpha).collect(),
            name: name.to_string(),
        };
    }

    if let Some(caps) = MIDDLE_RE.captures(line) {
        let name = caps[2].trim();
        if MIDDLE_REFERENCE_RE.is_match(name) || name.contains('［') || name.contains('〔') {
            return DetailLine::CrossReference;
        }
        return DetailLine::Middle {
            code: halfwidth_digits(&caps[1]),
            name: name.to_string(),
        };
    }

    if OVERVIEW_RE.is_match(line) {
        return DetailLine::OverviewMarker;
    }
    if TABLE_HEADER_RE.is_match(line) {
        return DetailLine::TableHeader;
    }
    DetailLine::Content
}

/// `start` 以降の行を終端条件に当たるまで集める
///
/// 空行は読み飛ばす。戻り値は集めた行と、次に処理すべき行位置。
fn collect_continuation<'a>(
    lines: &[&'a str],
    start: usize,
    is_terminator: impl Fn(&str) -> bool,
) -> (Vec<&'a str>, usize) {
    let mut collected = Vec::new();
    let mut next = start;

    for (offset, &line) in lines[start.min(lines.len())..].iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        if is_terminator(line) {
            break;
        }
        collected.push(line);
        next = start + offset + 1;
    }

    (collected, next)
}

fn is_example_terminator(line: &str) -> bool {
    ExampleKind::of(line).is_some()
        || LEAF_RE.is_match(line)
        || SECTION_KEYWORDS.iter().any(|k| line.starts_with(k))
}

/// 次の行が新しいブロック（コード行・例示・説明文・見出し）の始まりか
fn starts_new_block(line: &str) -> bool {
    LEAF_RE.is_match(line)
        || ExampleKind::of(line).is_some()
        || DESCRIPTION_OPENERS.iter().any(|p| line.starts_with(p))
        || ["大分類", "中分類", "小分類"].iter().any(|k| line.starts_with(k))
        || OVERVIEW_RE.is_match(line)
}

/// コード行の名前が次の行に続いているか
///
/// - 開き括弧が閉じていない: 次の行が新しいブロックでなければ続き
/// - 次の行が短い: 名前が完結した語尾で終わっていなければ続き
pub fn continues_name(name: &str, next: &str) -> bool {
    if next.is_empty() || starts_new_block(next) {
        return false;
    }
    if name.contains('（') && !name.contains('）') {
        return true;
    }
    next.chars().count() <= NAME_CONTINUATION_MAX_CHARS
        && !name.is_empty()
        && !COMPLETE_NAME_SUFFIXES.iter().any(|s| name.ends_with(s))
}

fn split_examples(blocks: &[String]) -> impl Iterator<Item = &str> {
    blocks
        .iter()
        .flat_map(|block| block.split(EXAMPLE_SEPARATOR))
        .map(str::trim)
        .filter(|item| !item.is_empty())
}

/// 除外例1件を名前と分類先コードに分ける
///
/// 「米菓製造業［0953］」→ name: 米菓製造業, codes: ["0953"]
fn parse_excluded_example(item: &str) -> ExcludedExample {
    let codes: Vec<String> = CODE_REFERENCE_RE
        .find_iter(item)
        .map(|m| halfwidth_digits(m.as_str()))
        .collect();

    let name = BRACKETED_NAME_RE
        .captures(item)
        .map(|caps| caps[1].trim().to_string())
        .unwrap_or_else(|| item.trim().to_string());

    if codes.is_empty() {
        tracing::warn!("除外例のコードが見つかりません: {}", item);
    }

    ExcludedExample { name, codes }
}

fn finalize_entry(mut entry: DetailEntry) -> DetailEntry {
    entry.name = clean_native_name(&entry.name);
    if entry.tier == Tier::Minor {
        entry.name = strip_cross_reference(&entry.name);
    }
    entry
}
