//! 抽出テキストの既知の誤りの補正表
//!
//! 1行ずつ、表の順に完全一致の部分文字列を置換する。

/// 補正1件
#[derive(Debug, Clone, Copy)]
pub struct Correction {
    pub pattern: &'static str,
    pub replacement: &'static str,
    pub description: &'static str,
}

pub const CORRECTIONS: &[Correction] = &[
    Correction {
        pattern: "定期観光バス業；［4311］",
        replacement: "定期観光バス業［4311］",
        description: "除外例のコード直前の余分な区切り記号",
    },
    Correction {
        pattern: "醸造酒類製造業（果実酒、清酒を除く。）",
        replacement: "醸造酒類製造業（果実酒、清酒を除く）",
        description: "括弧内の余分な句点",
    },
    Correction {
        pattern: "Ｈead offices primarily engaged in managerial operations",
        replacement: "Head offices primarily engaged in managerial operations",
        description: "英語名先頭の全角英字",
    },
];

/// 1行に補正表を適用
pub fn apply_corrections(line: &str) -> String {
    CORRECTIONS.iter().fold(line.to_string(), |text, correction| {
        if text.contains(correction.pattern) {
            tracing::debug!("補正: {}", correction.description);
            text.replace(correction.pattern, correction.replacement)
        } else {
            text
        }
    })
}
