//! 解析パイプライン
//!
//! ## 処理フロー
//! 1. 目次ページと本文ページを読み込む
//! 2. 目次パーサーと本文パーサーを並列に実行（互いに独立）
//! 3. コードで突き合わせて階層を構築

use crate::error::Result;
use crate::reader::Document;
use jsic_common::{
    parse_detail_lines, parse_index_lines, DetailEntry, HierarchyBuilder, IndexEntry, MergeReport,
    PageRange, Taxonomy, TierStats, Verbosity,
};

/// 一括処理の設定
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    pub index_pages: PageRange,
    pub detail_pages: PageRange,
    pub verbosity: Verbosity,
}

/// 一括処理の結果
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub index_entries: Vec<IndexEntry>,
    pub detail_entries: Vec<DetailEntry>,
    pub taxonomy: Taxonomy,
    pub report: MergeReport,
}

impl PipelineOutput {
    pub fn index_stats(&self) -> TierStats {
        TierStats::count(self.index_entries.iter().map(|e| e.tier))
    }

    pub fn detail_stats(&self) -> TierStats {
        TierStats::count(self.detail_entries.iter().map(|e| e.tier))
    }
}

/// 目次ページを解析
pub fn scan_index(document: &Document, pages: PageRange) -> Result<Vec<IndexEntry>> {
    let lines = document.read_range(pages)?;
    Ok(parse_index_lines(&lines))
}

/// 本文ページを解析
pub fn scan_detail(document: &Document, pages: PageRange) -> Result<Vec<DetailEntry>> {
    let lines = document.read_range(pages)?;
    Ok(parse_detail_lines(&lines))
}

/// 読み込みから階層構築まで一括実行
pub fn run(document: &Document, options: &PipelineOptions) -> Result<PipelineOutput> {
    let (index_entries, detail_entries) = rayon::join(
        || scan_index(document, options.index_pages),
        || scan_detail(document, options.detail_pages),
    );
    let index_entries = index_entries?;
    let detail_entries = detail_entries?;
    tracing::info!(
        "目次 {} 件, 本文 {} 件を抽出",
        index_entries.len(),
        detail_entries.len()
    );

    let (taxonomy, report) =
        HierarchyBuilder::new(options.verbosity).build(&index_entries, &detail_entries);
    tracing::info!(
        "食い違い {} 件, 親なし {} 件, 重複 {} 件",
        report.discrepancies.len(),
        report.orphans.len(),
        report.duplicate_codes.len()
    );

    Ok(PipelineOutput {
        index_entries,
        detail_entries,
        taxonomy,
        report,
    })
}
