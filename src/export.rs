//! JSON出力と結果レポート

use crate::error::Result;
use jsic_common::{Discrepancy, DiscrepancyKind, MergeReport, TierStats};
use serde::Serialize;
use std::path::Path;

/// 整形済みJSON（2スペースインデント、日本語はエスケープしない）で書き出す
pub fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// 階層ごとの件数を1行にまとめる
pub fn format_stats(label: &str, stats: &TierStats) -> String {
    format!(
        "{}: 大分類 {} / 中分類 {} / 小分類 {} / 細分類 {} (計 {})",
        label,
        stats.major,
        stats.middle,
        stats.minor,
        stats.detail,
        stats.total()
    )
}

/// 食い違い1件の表示
pub fn format_discrepancy(d: &Discrepancy) -> String {
    let label = d.tier.label();
    match d.kind() {
        DiscrepancyKind::OnlyInDetail => format!(
            "本文のみ: {} {} {}",
            label,
            d.code,
            d.detail_name.as_deref().unwrap_or_default()
        ),
        DiscrepancyKind::OnlyInIndex => format!(
            "目次のみ: {} {} {}",
            label,
            d.code,
            d.index_name.as_deref().unwrap_or_default()
        ),
        DiscrepancyKind::NameMismatch => format!(
            "名称不一致: {} {} 目次「{}」/ 本文「{}」",
            label,
            d.code,
            d.index_name.as_deref().unwrap_or_default(),
            d.detail_name.as_deref().unwrap_or_default()
        ),
    }
}

pub fn print_stats(label: &str, stats: &TierStats) {
    println!("{}", format_stats(label, stats));
}

/// マージ結果の食い違いを表示
pub fn print_report(report: &MergeReport) {
    if report.discrepancies.is_empty() {
        println!("✔ すべてのコードと名称が一致");
    } else {
        println!("食い違い {} 件:", report.discrepancies.len());
        for d in &report.discrepancies {
            println!("  - {}", format_discrepancy(d));
        }
    }

    if !report.orphans.is_empty() {
        println!("親分類が見つからず除外: {}", report.orphans.join(", "));
    }
    if !report.duplicate_codes.is_empty() {
        println!("本文で重複したコード: {}", report.duplicate_codes.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsic_common::Tier;

    fn discrepancy(index_name: Option<&str>, detail_name: Option<&str>) -> Discrepancy {
        Discrepancy {
            code: "0111".into(),
            tier: Tier::Detail,
            index_name: index_name.map(String::from),
            detail_name: detail_name.map(String::from),
        }
    }

    #[test]
    fn test_format_stats() {
        let stats = TierStats { major: 20, middle: 99, minor: 530, detail: 1460 };
        assert_eq!(
            format_stats("目次", &stats),
            "目次: 大分類 20 / 中分類 99 / 小分類 530 / 細分類 1460 (計 2109)"
        );
    }

    #[test]
    fn test_format_discrepancy() {
        assert_eq!(
            format_discrepancy(&discrepancy(Some("水稲作"), Some("水稲作業"))),
            "名称不一致: 細分類 0111 目次「水稲作」/ 本文「水稲作業」"
        );
        assert_eq!(
            format_discrepancy(&discrepancy(None, Some("水稲作"))),
            "本文のみ: 細分類 0111 水稲作"
        );
        assert_eq!(
            format_discrepancy(&discrepancy(Some("水稲作"), None)),
            "目次のみ: 細分類 0111 水稲作"
        );
    }

    #[test]
    fn test_write_json_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("entries.json");
        write_json(&vec!["農業"], &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[\n  \"農業\"\n]");
    }
}
