//! JSIC Common Library
//!
//! 日本標準産業分類のテキストを解析し、分類階層を構築するコア処理

pub mod types;
pub mod error;
pub mod normalize;
pub mod index;
pub mod detail;
pub mod hierarchy;

pub use types::{DetailEntry, ExcludedExample, IndexEntry, PageRange, Tier, TierStats};
pub use error::{Error, Result};
pub use index::{parse_index_lines, IndexScanner, IndexState};
pub use detail::{parse_detail_lines, DetailScanner};
pub use hierarchy::{
    merge_and_build, Discrepancy, DiscrepancyKind, HierarchyBuilder, MergeReport, Taxonomy,
    Verbosity,
};
