//! 分類階層の構築
//!
//! 目次パーサーと本文パーサーの結果をコードで突き合わせ、
//! 大分類 → 中分類 → 小分類 → 細分類 の入れ子構造を組み立てる。
//! 名前の不一致や片方にしかないコードは `Discrepancy` として報告する。

use crate::types::{DetailEntry, ExcludedExample, IndexEntry, Tier};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// 出力する項目の詳しさ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// コードと日本語名のみ
    #[serde(rename = "simple", alias = "minimal")]
    Minimal,
    /// コード・日本語名・英語名
    #[serde(rename = "en", alias = "bilingual")]
    Bilingual,
    /// 説明文・例示を含む全項目
    #[default]
    Full,
}

impl FromStr for Verbosity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(Verbosity::Full),
            "simple" | "minimal" => Ok(Verbosity::Minimal),
            "en" | "bilingual" => Ok(Verbosity::Bilingual),
            _ => Err(format!("Unknown format: {}. Use full, simple, or en", s)),
        }
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verbosity::Full => write!(f, "full"),
            Verbosity::Minimal => write!(f, "simple"),
            Verbosity::Bilingual => write!(f, "en"),
        }
    }
}

/// 出力ノードの項目
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeFields {
    pub code: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub included_examples: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excluded_examples: Option<Vec<ExcludedExample>>,
}

impl NodeFields {
    fn bare(code: &str, name: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            name_en: None,
            description: None,
            included_examples: None,
            excluded_examples: None,
        }
    }

    fn with_detail(mut self, detail: &DetailEntry) -> Self {
        self.description = non_empty(&detail.description).map(str::to_string);
        self.included_examples = Some(detail.included_examples.clone()).filter(|v| !v.is_empty());
        self.excluded_examples = Some(detail.excluded_examples.clone()).filter(|v| !v.is_empty());
        self
    }
}

fn non_empty(text: &str) -> Option<&str> {
    Some(text).filter(|t| !t.is_empty())
}

/// 大分類ノード
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MajorCategory {
    #[serde(flatten)]
    pub fields: NodeFields,
    pub middle_categories: Vec<MiddleCategory>,
}

/// 中分類ノード
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MiddleCategory {
    #[serde(flatten)]
    pub fields: NodeFields,
    pub minor_categories: Vec<MinorCategory>,
}

/// 小分類ノード（細分類がなくても `detail_categories` は空配列で出力する）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MinorCategory {
    #[serde(flatten)]
    pub fields: NodeFields,
    pub detail_categories: Vec<NodeFields>,
}

/// 階層全体
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Taxonomy {
    pub major_categories: Vec<MajorCategory>,
}

impl Taxonomy {
    /// 現在開いている（最後に追加された）ノードの下に追加する
    ///
    /// 親が開いていなければ追加せず `false` を返す。
    fn attach_to_open(&mut self, tier: Tier, fields: NodeFields) -> bool {
        match tier {
            Tier::Major => {
                self.major_categories.push(MajorCategory {
                    fields,
                    middle_categories: Vec::new(),
                });
                true
            }
            Tier::Middle => match self.major_categories.last_mut() {
                Some(major) => {
                    major.middle_categories.push(MiddleCategory {
                        fields,
                        minor_categories: Vec::new(),
                    });
                    true
                }
                None => false,
            },
            Tier::Minor => match self.open_middle() {
                Some(middle) => {
                    middle.minor_categories.push(MinorCategory {
                        fields,
                        detail_categories: Vec::new(),
                    });
                    true
                }
                None => false,
            },
            Tier::Detail => match self.open_middle().and_then(|m| m.minor_categories.last_mut()) {
                Some(minor) => {
                    minor.detail_categories.push(fields);
                    true
                }
                None => false,
            },
        }
    }

    fn open_middle(&mut self) -> Option<&mut MiddleCategory> {
        self.major_categories.last_mut()?.middle_categories.last_mut()
    }

    /// 親コードを指定して追加する
    fn attach_under(&mut self, tier: Tier, parent_code: Option<&str>, fields: NodeFields) -> bool {
        if tier == Tier::Major {
            return self.attach_to_open(tier, fields);
        }
        let Some(parent_code) = parent_code else {
            return false;
        };

        let majors = self.major_categories.iter_mut();
        match tier {
            Tier::Major => false,
            Tier::Middle => majors
                .filter(|major| major.fields.code == parent_code)
                .next_back()
                .map(|major| {
                    major.middle_categories.push(MiddleCategory {
                        fields,
                        minor_categories: Vec::new(),
                    })
                })
                .is_some(),
            Tier::Minor => majors
                .flat_map(|major| major.middle_categories.iter_mut())
                .filter(|middle| middle.fields.code == parent_code)
                .last()
                .map(|middle| {
                    middle.minor_categories.push(MinorCategory {
                        fields,
                        detail_categories: Vec::new(),
                    })
                })
                .is_some(),
            Tier::Detail => majors
                .flat_map(|major| major.middle_categories.iter_mut())
                .flat_map(|middle| middle.minor_categories.iter_mut())
                .filter(|minor| minor.fields.code == parent_code)
                .last()
                .map(|minor| minor.detail_categories.push(fields))
                .is_some(),
        }
    }
}

/// 目次と本文の食い違い
///
/// 片方の名前が `None` ならもう一方にしか存在しないコード、両方あれば名前の不一致。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discrepancy {
    pub code: String,
    #[serde(rename = "type")]
    pub tier: Tier,
    pub index_name: Option<String>,
    pub detail_name: Option<String>,
}

/// 食い違いの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscrepancyKind {
    OnlyInIndex,
    OnlyInDetail,
    NameMismatch,
}

impl Discrepancy {
    pub fn kind(&self) -> DiscrepancyKind {
        match (&self.index_name, &self.detail_name) {
            (Some(_), None) => DiscrepancyKind::OnlyInIndex,
            (None, _) => DiscrepancyKind::OnlyInDetail,
            (Some(_), Some(_)) => DiscrepancyKind::NameMismatch,
        }
    }
}

/// マージ結果の報告
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    pub discrepancies: Vec<Discrepancy>,
    /// 親が見つからず階層に入らなかったコード
    pub orphans: Vec<String>,
    /// 同じパーサーの出力に2回以上現れたコード（最初の出現を採用）
    pub duplicate_codes: Vec<String>,
}

/// 目次と本文のエントリから階層を組み立てる
#[derive(Debug, Clone, Copy, Default)]
pub struct HierarchyBuilder {
    verbosity: Verbosity,
}

impl HierarchyBuilder {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    /// 目次の順序に従って階層を構築する
    ///
    /// 本文にしかないエントリは、本文内で直前に開いていた親の下に追加する。
    /// 目次・本文とも、同じ階層・コードが2回以上現れたら最初の出現だけを使う。
    pub fn build(
        &self,
        index_entries: &[IndexEntry],
        detail_entries: &[DetailEntry],
    ) -> (Taxonomy, MergeReport) {
        let mut report = MergeReport::default();
        let mut tree = Taxonomy::default();

        let mut detail_by_key: HashMap<(Tier, &str), &DetailEntry> = HashMap::new();
        let mut duplicates: HashSet<usize> = HashSet::new();
        for (pos, entry) in detail_entries.iter().enumerate() {
            let key = (entry.tier, entry.code.as_str());
            if detail_by_key.contains_key(&key) {
                tracing::warn!("本文に重複したコード: {} ({})", entry.code, entry.tier);
                report.duplicate_codes.push(entry.code.clone());
                duplicates.insert(pos);
                continue;
            }
            detail_by_key.insert(key, entry);
        }

        let mut index_keys: HashSet<(Tier, &str)> = HashSet::new();
        for entry in index_entries {
            if !index_keys.insert((entry.tier, entry.code.as_str())) {
                tracing::warn!("目次に重複したコード: {} ({})", entry.code, entry.tier);
                report.duplicate_codes.push(entry.code.clone());
                continue;
            }

            let detail = detail_by_key.get(&(entry.tier, entry.code.as_str())).copied();
            report.discrepancies.extend(compare(entry, detail));

            if !tree.attach_to_open(entry.tier, self.index_fields(entry, detail)) {
                tracing::warn!("親分類が見つからないため除外: {} ({})", entry.code, entry.tier);
                report.orphans.push(entry.code.clone());
            }
        }

        // 本文にしかないエントリ
        let mut open_codes: HashMap<Tier, &str> = HashMap::new();
        for (pos, entry) in detail_entries.iter().enumerate() {
            let parent_code = entry.tier.parent().and_then(|p| open_codes.get(&p).copied());
            open_codes.retain(|tier, _| *tier < entry.tier);
            open_codes.insert(entry.tier, entry.code.as_str());

            if duplicates.contains(&pos)
                || index_keys.contains(&(entry.tier, entry.code.as_str()))
            {
                continue;
            }

            report.discrepancies.push(Discrepancy {
                code: entry.code.clone(),
                tier: entry.tier,
                index_name: None,
                detail_name: Some(entry.name.clone()),
            });
            if !tree.attach_under(entry.tier, parent_code, self.detail_only_fields(entry)) {
                tracing::warn!("親分類が見つからないため除外: {} ({})", entry.code, entry.tier);
                report.orphans.push(entry.code.clone());
            }
        }

        tracing::debug!(
            "階層構築完了: 大分類 {} 件, 食い違い {} 件",
            tree.major_categories.len(),
            report.discrepancies.len()
        );
        (tree, report)
    }

    /// 目次にあるエントリの出力項目（名前は目次を優先）
    fn index_fields(&self, index: &IndexEntry, detail: Option<&DetailEntry>) -> NodeFields {
        let mut fields = NodeFields::bare(&index.code, &index.name);
        match self.verbosity {
            Verbosity::Minimal => {}
            Verbosity::Bilingual => {
                fields.name_en = non_empty(&index.name_en).map(str::to_string);
            }
            Verbosity::Full => {
                fields.name_en = Some(index.name_en.clone());
                if let Some(detail) = detail {
                    fields = fields.with_detail(detail);
                }
            }
        }
        fields
    }

    /// 本文にしかないエントリの出力項目（英語名なし）
    fn detail_only_fields(&self, detail: &DetailEntry) -> NodeFields {
        let fields = NodeFields::bare(&detail.code, &detail.name);
        match self.verbosity {
            Verbosity::Full => fields.with_detail(detail),
            Verbosity::Minimal | Verbosity::Bilingual => fields,
        }
    }
}

fn compare(index: &IndexEntry, detail: Option<&DetailEntry>) -> Option<Discrepancy> {
    if detail.is_some_and(|d| d.name == index.name) {
        return None;
    }
    Some(Discrepancy {
        code: index.code.clone(),
        tier: index.tier,
        index_name: Some(index.name.clone()),
        detail_name: detail.map(|d| d.name.clone()),
    })
}

/// 目次と本文の結果をマージして階層を構築する
pub fn merge_and_build(
    index_entries: &[IndexEntry],
    detail_entries: &[DetailEntry],
    verbosity: Verbosity,
) -> (Taxonomy, MergeReport) {
    HierarchyBuilder::new(verbosity).build(index_entries, detail_entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(tier: Tier, code: &str, name: &str, name_en: &str) -> IndexEntry {
        IndexEntry::new(tier, code, name, name_en)
    }

    fn detail(tier: Tier, code: &str, name: &str, description: &str) -> DetailEntry {
        DetailEntry {
            tier,
            code: code.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            included_examples: Vec::new(),
            excluded_examples: Vec::new(),
        }
    }

    fn sample_index() -> Vec<IndexEntry> {
        vec![
            index(Tier::Major, "A", "農業、林業", "AGRICULTURE AND FORESTRY"),
            index(Tier::Middle, "01", "農業", "AGRICULTURE"),
            index(Tier::Minor, "011", "耕種農業", "Crop farming"),
            index(Tier::Detail, "0111", "水稲作", "Rice farming"),
            index(Tier::Minor, "012", "畜産農業", "Livestock farming"),
        ]
    }

    fn sample_detail() -> Vec<DetailEntry> {
        let mut rice = detail(Tier::Detail, "0111", "水稲作", "主として水稲を栽培する事業所をいう。");
        rice.included_examples = vec!["水稲作".into(), "陸稲作".into()];
        rice.excluded_examples = vec![ExcludedExample {
            name: "米菓製造業".into(),
            codes: vec!["0953".into()],
        }];
        vec![
            detail(Tier::Major, "A", "農業、林業", "農業及び林業を営む事業所"),
            detail(Tier::Middle, "01", "農業", ""),
            detail(Tier::Minor, "011", "耕種農業", "耕種を行う事業所"),
            rice,
            detail(Tier::Minor, "012", "畜産農業", ""),
        ]
    }

    fn all_codes(tree: &Taxonomy) -> Vec<String> {
        let mut codes = Vec::new();
        for major in &tree.major_categories {
            codes.push(major.fields.code.clone());
            for middle in &major.middle_categories {
                codes.push(middle.fields.code.clone());
                for minor in &middle.minor_categories {
                    codes.push(minor.fields.code.clone());
                    codes.extend(minor.detail_categories.iter().map(|d| d.code.clone()));
                }
            }
        }
        codes
    }

    #[test]
    fn test_full_merge_builds_nested_tree() {
        let (tree, report) = merge_and_build(&sample_index(), &sample_detail(), Verbosity::Full);
        assert!(report.discrepancies.is_empty());
        assert_eq!(all_codes(&tree), vec!["A", "01", "011", "0111", "012"]);

        let middle = &tree.major_categories[0].middle_categories[0];
        assert_eq!(middle.minor_categories.len(), 2);
        let rice = &middle.minor_categories[0].detail_categories[0];
        assert_eq!(rice.name_en.as_deref(), Some("Rice farming"));
        assert_eq!(rice.description.as_deref(), Some("主として水稲を栽培する事業所をいう。"));
        assert_eq!(rice.included_examples.as_ref().map(Vec::len), Some(2));
        assert_eq!(
            rice.excluded_examples.as_ref().map(|v| v[0].codes.clone()),
            Some(vec!["0953".to_string()])
        );

        // 空の説明文は出力しない
        assert_eq!(middle.fields.description, None);
    }

    #[test]
    fn test_empty_detail_categories_are_serialized() {
        let (tree, _) = merge_and_build(&sample_index(), &sample_detail(), Verbosity::Full);
        let json = serde_json::to_value(&tree).unwrap();
        let livestock = &json["major_categories"][0]["middle_categories"][0]["minor_categories"][1];
        assert_eq!(livestock["code"], "012");
        assert_eq!(livestock["detail_categories"], serde_json::json!([]));
        assert!(livestock.get("description").is_none());
    }

    #[test]
    fn test_name_mismatch_uses_index_name() {
        let mut details = sample_detail();
        details[3].name = "水稲作業".to_string();
        let (tree, report) = merge_and_build(&sample_index(), &details, Verbosity::Full);

        assert_eq!(
            report.discrepancies,
            vec![Discrepancy {
                code: "0111".into(),
                tier: Tier::Detail,
                index_name: Some("水稲作".into()),
                detail_name: Some("水稲作業".into()),
            }]
        );
        assert_eq!(report.discrepancies[0].kind(), DiscrepancyKind::NameMismatch);
        let rice = &tree.major_categories[0].middle_categories[0].minor_categories[0]
            .detail_categories[0];
        assert_eq!(rice.name, "水稲作");
    }

    #[test]
    fn test_detail_only_entry_is_reported_and_placed() {
        let mut details = sample_detail();
        details.insert(4, detail(Tier::Detail, "0119", "その他の耕種農業", "他に分類されない耕種"));
        let (tree, report) = merge_and_build(&sample_index(), &details, Verbosity::Full);

        assert_eq!(report.discrepancies.len(), 1);
        let d = &report.discrepancies[0];
        assert_eq!(d.kind(), DiscrepancyKind::OnlyInDetail);
        assert_eq!(d.index_name, None);
        assert_eq!(d.detail_name.as_deref(), Some("その他の耕種農業"));

        let crop = &tree.major_categories[0].middle_categories[0].minor_categories[0];
        assert_eq!(crop.detail_categories.len(), 2);
        let other = &crop.detail_categories[1];
        assert_eq!(other.code, "0119");
        assert_eq!(other.name_en, None);
        assert_eq!(other.description.as_deref(), Some("他に分類されない耕種"));
    }

    #[test]
    fn test_index_only_entry_is_reported() {
        let details: Vec<DetailEntry> = sample_detail()
            .into_iter()
            .filter(|d| d.code != "012")
            .collect();
        let (tree, report) = merge_and_build(&sample_index(), &details, Verbosity::Full);

        assert_eq!(report.discrepancies.len(), 1);
        assert_eq!(report.discrepancies[0].kind(), DiscrepancyKind::OnlyInIndex);
        assert_eq!(report.discrepancies[0].detail_name, None);

        let livestock = &tree.major_categories[0].middle_categories[0].minor_categories[1];
        assert_eq!(livestock.fields.name_en.as_deref(), Some("Livestock farming"));
        assert_eq!(livestock.fields.description, None);
    }

    #[test]
    fn test_minimal_output_has_no_optional_keys() {
        let (tree, _) = merge_and_build(&sample_index(), &sample_detail(), Verbosity::Minimal);
        let json = serde_json::to_string(&tree).unwrap();
        for key in ["name_en", "description", "included_examples", "excluded_examples"] {
            assert!(!json.contains(key), "{} が出力されている", key);
        }
        assert!(json.contains("detail_categories"));
    }

    #[test]
    fn test_bilingual_output() {
        let mut entries = sample_index();
        entries[4].name_en.clear();
        let (tree, _) = merge_and_build(&entries, &sample_detail(), Verbosity::Bilingual);
        let json = serde_json::to_value(&tree).unwrap();
        let middle = &json["major_categories"][0]["middle_categories"][0];
        assert_eq!(middle["name_en"], "AGRICULTURE");
        assert!(middle.get("description").is_none());
        assert!(middle["minor_categories"][1].get("name_en").is_none());
    }

    #[test]
    fn test_orphaned_child_is_dropped() {
        let entries = vec![
            index(Tier::Minor, "011", "耕種農業", "Crop farming"),
            index(Tier::Major, "A", "農業、林業", "AGRICULTURE AND FORESTRY"),
            index(Tier::Detail, "0111", "水稲作", "Rice farming"),
        ];
        let (tree, report) = merge_and_build(&entries, &[], Verbosity::Minimal);
        assert_eq!(tree.major_categories.len(), 1);
        assert!(tree.major_categories[0].middle_categories.is_empty());
        assert_eq!(report.orphans, vec!["011", "0111"]);
    }

    #[test]
    fn test_new_major_closes_deeper_levels() {
        let entries = vec![
            index(Tier::Major, "A", "農業、林業", ""),
            index(Tier::Middle, "01", "農業", ""),
            index(Tier::Minor, "011", "耕種農業", ""),
            index(Tier::Major, "B", "漁業", ""),
            index(Tier::Detail, "0311", "遠洋漁業", ""),
        ];
        let (tree, report) = merge_and_build(&entries, &[], Verbosity::Minimal);
        assert_eq!(tree.major_categories.len(), 2);
        assert_eq!(report.orphans, vec!["0311"]);
    }

    #[test]
    fn test_duplicate_detail_code_first_wins() {
        let mut details = sample_detail();
        details.push(detail(Tier::Detail, "0111", "水稲作", "重複した説明"));
        let (tree, report) = merge_and_build(&sample_index(), &details, Verbosity::Full);

        assert_eq!(report.duplicate_codes, vec!["0111"]);
        assert!(report.discrepancies.is_empty());
        let rice = &tree.major_categories[0].middle_categories[0].minor_categories[0]
            .detail_categories[0];
        assert_eq!(rice.description.as_deref(), Some("主として水稲を栽培する事業所をいう。"));
        assert_eq!(all_codes(&tree).iter().filter(|c| *c == "0111").count(), 1);
    }

    #[test]
    fn test_duplicate_index_code_first_wins() {
        let mut entries = sample_index();
        entries.insert(4, index(Tier::Detail, "0111", "米作農業（再）", ""));
        let (tree, report) = merge_and_build(&entries, &sample_detail(), Verbosity::Full);

        assert_eq!(report.duplicate_codes, vec!["0111"]);
        assert!(report.discrepancies.is_empty());
        let crop = &tree.major_categories[0].middle_categories[0].minor_categories[0];
        assert_eq!(crop.detail_categories.len(), 1);
        assert_eq!(crop.detail_categories[0].name, "水稲作");
        assert_eq!(all_codes(&tree).iter().filter(|c| *c == "0111").count(), 1);
    }

    #[test]
    fn test_detail_only_chain_nests_under_new_major() {
        let mut details = sample_detail();
        details.extend([
            detail(Tier::Major, "T", "分類不能の産業", ""),
            detail(Tier::Middle, "99", "分類不能の産業", ""),
            detail(Tier::Minor, "999", "分類不能の産業", ""),
            detail(Tier::Detail, "9999", "分類不能の産業", "主として分類できない事業所"),
        ]);
        let (tree, report) = merge_and_build(&sample_index(), &details, Verbosity::Full);

        assert!(report.orphans.is_empty());
        let kinds: Vec<DiscrepancyKind> = report.discrepancies.iter().map(|d| d.kind()).collect();
        assert_eq!(kinds, vec![DiscrepancyKind::OnlyInDetail; 4]);

        assert_eq!(tree.major_categories.len(), 2);
        let major = &tree.major_categories[1];
        assert_eq!(major.fields.code, "T");
        assert_eq!(major.fields.name_en, None);
        let middle = &major.middle_categories[0];
        assert_eq!(middle.fields.code, "99");
        let minor = &middle.minor_categories[0];
        assert_eq!(minor.fields.code, "999");
        assert_eq!(minor.detail_categories[0].code, "9999");
        assert_eq!(
            minor.detail_categories[0].description.as_deref(),
            Some("主として分類できない事業所")
        );
    }

    #[test]
    fn test_detail_only_middle_under_index_major() {
        let mut details = sample_detail();
        details.extend([
            detail(Tier::Middle, "02", "林業", ""),
            detail(Tier::Minor, "021", "育林業", ""),
        ]);
        let (tree, report) = merge_and_build(&sample_index(), &details, Verbosity::Minimal);

        assert!(report.orphans.is_empty());
        let major = &tree.major_categories[0];
        let middles: Vec<&str> = major
            .middle_categories
            .iter()
            .map(|m| m.fields.code.as_str())
            .collect();
        assert_eq!(middles, vec!["01", "02"]);
        let forestry = &major.middle_categories[1];
        assert_eq!(forestry.minor_categories.len(), 1);
        assert_eq!(forestry.minor_categories[0].fields.code, "021");
        assert!(forestry.minor_categories[0].detail_categories.is_empty());
    }

    #[test]
    fn test_detail_only_child_without_open_parent_is_orphan() {
        let details = vec![detail(Tier::Minor, "999", "分類不能の産業", "")];
        let (tree, report) = merge_and_build(&[], &details, Verbosity::Full);

        assert!(tree.major_categories.is_empty());
        assert_eq!(report.orphans, vec!["999"]);
        assert_eq!(report.discrepancies.len(), 1);
    }

    #[test]
    fn test_every_code_is_merged_or_reported() {
        let mut details = sample_detail();
        details[3].name = "水稲作業".to_string();
        details.push(detail(Tier::Minor, "019", "その他の農業", ""));
        let mut entries = sample_index();
        entries.push(index(Tier::Minor, "013", "農業サービス業", "Agricultural services"));

        let (tree, report) = merge_and_build(&entries, &details, Verbosity::Full);
        let merged = all_codes(&tree);
        let reported: Vec<&str> = report.discrepancies.iter().map(|d| d.code.as_str()).collect();

        for code in entries.iter().map(|e| &e.code).chain(details.iter().map(|d| &d.code)) {
            assert!(
                merged.contains(code) || reported.contains(&code.as_str()),
                "コード {} が失われた",
                code
            );
        }
        assert!(merged.contains(&"019".to_string()));
    }

    #[test]
    fn test_verbosity_from_str() {
        assert_eq!("full".parse::<Verbosity>().unwrap(), Verbosity::Full);
        assert_eq!("simple".parse::<Verbosity>().unwrap(), Verbosity::Minimal);
        assert_eq!("MINIMAL".parse::<Verbosity>().unwrap(), Verbosity::Minimal);
        assert_eq!("en".parse::<Verbosity>().unwrap(), Verbosity::Bilingual);
        assert!("xml".parse::<Verbosity>().is_err());
        assert_eq!(Verbosity::Bilingual.to_string(), "en");
    }

    #[test]
    fn test_verbosity_serde_matches_display() {
        for verbosity in [Verbosity::Full, Verbosity::Minimal, Verbosity::Bilingual] {
            let json = serde_json::to_string(&verbosity).unwrap();
            assert_eq!(json, format!("\"{}\"", verbosity));
            assert_eq!(serde_json::from_str::<Verbosity>(&json).unwrap(), verbosity);
        }
        // 別名でも読み込める
        assert_eq!(serde_json::from_str::<Verbosity>(r#""minimal""#).unwrap(), Verbosity::Minimal);
        assert_eq!(
            serde_json::from_str::<Verbosity>(r#""bilingual""#).unwrap(),
            Verbosity::Bilingual
        );
    }

    #[test]
    fn test_discrepancy_serializes_nulls() {
        let d = Discrepancy {
            code: "0119".into(),
            tier: Tier::Detail,
            index_name: None,
            detail_name: Some("その他の耕種農業".into()),
        };
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(
            json,
            r#"{"code":"0119","type":"detail","index_name":null,"detail_name":"その他の耕種農業"}"#
        );
    }
}
