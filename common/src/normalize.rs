//! 文字種の正規化
//!
//! - 全角英字 ↔ 半角英字の変換
//! - 括弧・中黒・長音の表記統一
//! - 全角英字の直後に日本語が続く略語（「ＰＨＳ電話機」など）は変換しない

use regex::Regex;

lazy_static::lazy_static! {
    /// 小分類名末尾の中分類参照（例:「（01農業）」）
    static ref CROSS_REFERENCE_FULL_RE: Regex = Regex::new(r"（\d{2}[^）)]*）$").unwrap();
    static ref CROSS_REFERENCE_HALF_RE: Regex = Regex::new(r"（\d{2}[^）)]*\)$").unwrap();
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
    static ref OPEN_PAREN_SPACE_RE: Regex = Regex::new(r"\(\s+").unwrap();
    static ref CLOSE_PAREN_SPACE_RE: Regex = Regex::new(r"\s+\)").unwrap();
}

/// ひらがな・カタカナ・CJK統合漢字か
pub fn is_native_script(c: char) -> bool {
    matches!(c, '\u{3040}'..='\u{309F}' | '\u{30A0}'..='\u{30FF}' | '\u{4E00}'..='\u{9FFF}')
}

fn is_fullwidth_alpha(c: char) -> bool {
    matches!(c, 'Ａ'..='Ｚ' | 'ａ'..='ｚ')
}

fn shift(c: char, from: char, to: char) -> char {
    char::from_u32(c as u32 - from as u32 + to as u32).unwrap_or(c)
}

/// 全角英字1文字を半角に変換（英字以外はそのまま）
pub fn halfwidth_alpha(c: char) -> char {
    match c {
        'Ａ'..='Ｚ' => shift(c, 'Ａ', 'A'),
        'ａ'..='ｚ' => shift(c, 'ａ', 'a'),
        _ => c,
    }
}

/// 全角数字を半角に変換
pub fn halfwidth_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '０'..='９' => shift(c, '０', '0'),
            _ => c,
        })
        .collect()
}

/// 英語名抽出の前処理として全角英字・全角ピリオドを半角に変換
///
/// 全角英字の連続の直後に日本語が続く場合、その連続は略語の一部とみなして残す。
/// 「Ｈead offices」は「Head offices」になり、「ＰＨＳ電話機」はそのまま。
pub fn fullwidth_latin_to_ascii(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut result = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if is_fullwidth_alpha(c) {
            let mut end = i;
            while end < chars.len() && is_fullwidth_alpha(chars[end]) {
                end += 1;
            }
            let keep = end < chars.len() && is_native_script(chars[end]);
            for &run_char in &chars[i..end] {
                result.push(if keep { run_char } else { halfwidth_alpha(run_char) });
            }
            i = end;
            continue;
        }

        result.push(if c == '．' { '.' } else { c });
        i += 1;
    }

    result
}

/// 日本語名の正規化
///
/// 空白除去、括弧を全角、中黒を「・」、全角ハイフンを長音「ー」、半角英字を全角に統一する。
/// 正規化済みの文字列に再適用しても変化しない。
pub fn clean_native_name(name: &str) -> String {
    name.chars()
        .filter(|&c| c != ' ' && c != '　')
        .map(|c| match c {
            '(' => '（',
            ')' => '）',
            '･' => '・',
            '－' => 'ー',
            'A'..='Z' => shift(c, 'A', 'Ａ'),
            'a'..='z' => shift(c, 'a', 'ａ'),
            _ => c,
        })
        .collect()
}

/// 英語名の正規化（記号をASCIIに統一）
pub fn clean_english_name(name: &str) -> String {
    let ascii: String = name
        .chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            '，' => ',',
            '－' | '\u{2013}' | '\u{2015}' => '-',
            '（' => '(',
            '）' => ')',
            _ => c,
        })
        .collect();

    let ascii = OPEN_PAREN_SPACE_RE.replace_all(&ascii, "(");
    CLOSE_PAREN_SPACE_RE.replace_all(&ascii, ")").into_owned()
}

/// 小分類名末尾の中分類参照を除去
///
/// 「管理、補助的経済活動を行う事業所（01農業）」→「管理、補助的経済活動を行う事業所」。
/// 「（園芸サービス業を除く）」のように数字で始まらない括弧は残す。
pub fn strip_cross_reference(name: &str) -> String {
    let stripped = CROSS_REFERENCE_FULL_RE.replace(name, "");
    let stripped = stripped.trim();
    CROSS_REFERENCE_HALF_RE.replace(stripped, "").trim().to_string()
}

/// 空白・改行をすべて除去して連結
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, "").into_owned()
}
