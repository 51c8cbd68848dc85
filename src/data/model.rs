use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Split – a named dataset partition
// ---------------------------------------------------------------------------

/// A dataset partition. Ordering follows the canonical `test, train, val`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Test,
    Train,
    Val,
}

impl Split {
    /// All splits in report order.
    pub const ALL: [Split; 3] = [Split::Test, Split::Train, Split::Val];

    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Test => "test",
            Split::Train => "train",
            Split::Val => "val",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Split {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "test" => Ok(Split::Test),
            "train" => Ok(Split::Train),
            "val" => Ok(Split::Val),
            other => Err(format!("unknown split '{other}' (expected test, train or val)")),
        }
    }
}

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Category prefix of a composite identifier: everything before the first
/// underscore, or the whole identifier when there is none.
pub fn category_of(identifier: &str) -> &str {
    identifier
        .split_once('_')
        .map_or(identifier, |(category, _)| category)
}

/// Join key between the inventory and the caption table.
pub fn composite_id(category: &str, local_id: &str) -> String {
    format!("{category}_{local_id}")
}

// ---------------------------------------------------------------------------
// CaptionTable – identifier → caption
// ---------------------------------------------------------------------------

/// Captions keyed by composite identifier, with the set of categories they
/// reference. Built once by the loader.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptionTable {
    captions: BTreeMap<String, String>,
    categories: BTreeSet<String>,
}

impl CaptionTable {
    /// Build from `(identifier, caption)` pairs. Later duplicates overwrite
    /// earlier ones.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut captions = BTreeMap::new();
        let mut categories = BTreeSet::new();
        for (identifier, caption) in pairs {
            categories.insert(category_of(&identifier).to_string());
            captions.insert(identifier, caption);
        }
        CaptionTable {
            captions,
            categories,
        }
    }

    pub fn len(&self) -> usize {
        self.captions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.captions.is_empty()
    }

    pub fn get(&self, identifier: &str) -> Option<&str> {
        self.captions.get(identifier).map(String::as_str)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.captions.contains_key(identifier)
    }

    /// Identifier → caption, sorted by identifier.
    pub fn captions(&self) -> &BTreeMap<String, String> {
        &self.captions
    }

    /// Category ids referenced by the table.
    pub fn categories(&self) -> &BTreeSet<String> {
        &self.categories
    }
}

// ---------------------------------------------------------------------------
// Inventory – what the dataset contains on disk
// ---------------------------------------------------------------------------

/// Category id → sorted local instance ids.
pub type CategoryInstances = BTreeMap<String, Vec<String>>;

/// Instances present in the dataset, grouped by split and category.
///
/// Every scanned split has an entry, possibly empty. A category with no
/// instances in a split is absent from that split's map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    pub splits: BTreeMap<Split, CategoryInstances>,
    pub categories: BTreeSet<String>,
    /// Splits whose `complete` subtree did not exist.
    pub missing_splits: Vec<Split>,
}

impl Inventory {
    /// Build from explicit per-split contents. Category set is derived.
    pub fn from_splits(splits: BTreeMap<Split, CategoryInstances>) -> Self {
        let categories = splits
            .values()
            .flat_map(|categories| categories.keys().cloned())
            .collect();
        Inventory {
            splits,
            categories,
            missing_splits: Vec::new(),
        }
    }

    /// Total number of instances across every split.
    pub fn instance_count(&self) -> usize {
        self.splits
            .values()
            .flat_map(|categories| categories.values())
            .map(Vec::len)
            .sum()
    }

    /// Composite identifiers of every instance in any split.
    pub fn composite_ids(&self) -> BTreeSet<String> {
        self.splits
            .values()
            .flat_map(|categories| categories.iter())
            .flat_map(|(category, ids)| ids.iter().map(move |id| composite_id(category, id)))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Counts – summable coverage figures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub total: usize,
    pub with_caption: usize,
    pub without_caption: usize,
}

impl Counts {
    /// Percentage of instances with a caption; 0 for an empty group.
    pub fn coverage_percent(&self) -> f64 {
        percent(self.with_caption, self.total)
    }

    /// Percentage of instances without a caption; 0 for an empty group.
    pub fn missing_percent(&self) -> f64 {
        percent(self.without_caption, self.total)
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

impl Add for Counts {
    type Output = Counts;

    fn add(self, rhs: Counts) -> Counts {
        Counts {
            total: self.total + rhs.total,
            with_caption: self.with_caption + rhs.with_caption,
            without_caption: self.without_caption + rhs.without_caption,
        }
    }
}

impl Sum for Counts {
    fn sum<I: Iterator<Item = Counts>>(iter: I) -> Counts {
        iter.fold(Counts::default(), Add::add)
    }
}

impl<'a> Sum<&'a Counts> for Counts {
    fn sum<I: Iterator<Item = &'a Counts>>(iter: I) -> Counts {
        iter.copied().sum()
    }
}

// ---------------------------------------------------------------------------
// Reconciliation records
// ---------------------------------------------------------------------------

/// Partition of one split/category's instances by caption presence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryRecord {
    /// Local ids whose composite key has a caption, in scan order.
    pub with_caption: Vec<String>,
    /// Local ids whose composite key has no caption, in scan order.
    pub without_caption: Vec<String>,
}

impl CategoryRecord {
    pub fn counts(&self) -> Counts {
        Counts {
            total: self.with_caption.len() + self.without_caption.len(),
            with_caption: self.with_caption.len(),
            without_caption: self.without_caption.len(),
        }
    }
}

/// Output of the reconciler. Aggregates are always folded from the
/// per-category records and never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationResult {
    /// split → category → record.
    pub splits: BTreeMap<Split, BTreeMap<String, CategoryRecord>>,
    /// category → composite ids that have a caption but no instance.
    pub caption_only: BTreeMap<String, Vec<String>>,
}

impl ReconciliationResult {
    /// Counts for one split; zero if the split was not scanned.
    pub fn split_counts(&self, split: Split) -> Counts {
        self.splits
            .get(&split)
            .map(|categories| categories.values().map(CategoryRecord::counts).sum())
            .unwrap_or_default()
    }

    /// Counts for one category, summed across splits.
    pub fn category_counts(&self, category: &str) -> Counts {
        self.splits
            .values()
            .filter_map(|categories| categories.get(category))
            .map(CategoryRecord::counts)
            .sum()
    }

    /// Counts for one category within one split.
    pub fn category_split_counts(&self, split: Split, category: &str) -> Counts {
        self.splits
            .get(&split)
            .and_then(|categories| categories.get(category))
            .map(CategoryRecord::counts)
            .unwrap_or_default()
    }

    pub fn grand_counts(&self) -> Counts {
        self.splits.keys().map(|split| self.split_counts(*split)).sum()
    }

    /// Number of captions with no matching instance.
    pub fn caption_only_total(&self) -> usize {
        self.caption_only.values().map(Vec::len).sum()
    }

    /// Every category that appears in at least one split, sorted.
    pub fn categories(&self) -> BTreeSet<&str> {
        self.splits
            .values()
            .flat_map(|categories| categories.keys().map(String::as_str))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// CategoryOverlap – category sets on both sides
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryOverlap {
    pub common: BTreeSet<String>,
    /// Categories referenced only by the caption table.
    pub captions_only: BTreeSet<String>,
    /// Categories present only in the inventory.
    pub inventory_only: BTreeSet<String>,
}

impl CategoryOverlap {
    pub fn new(caption_categories: &BTreeSet<String>, inventory_categories: &BTreeSet<String>) -> Self {
        CategoryOverlap {
            common: caption_categories
                .intersection(inventory_categories)
                .cloned()
                .collect(),
            captions_only: caption_categories
                .difference(inventory_categories)
                .cloned()
                .collect(),
            inventory_only: inventory_categories
                .difference(caption_categories)
                .cloned()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_of_splits_on_first_underscore() {
        assert_eq!(category_of("02691156_abc_def"), "02691156");
        assert_eq!(category_of("widget"), "widget");
        assert_eq!(category_of("_lead"), "");
    }

    #[test]
    fn duplicate_identifiers_keep_last_caption() {
        let table = CaptionTable::from_pairs(vec![
            ("01_a".to_string(), "first".to_string()),
            ("01_a".to_string(), "second".to_string()),
        ]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("01_a"), Some("second"));
    }

    #[test]
    fn empty_counts_have_zero_coverage() {
        let counts = Counts::default();
        assert_eq!(counts.coverage_percent(), 0.0);
        assert_eq!(counts.missing_percent(), 0.0);
    }

    #[test]
    fn split_parses_case_insensitively() {
        assert_eq!("Train".parse::<Split>(), Ok(Split::Train));
        assert_eq!(" val ".parse::<Split>(), Ok(Split::Val));
        assert!("validation".parse::<Split>().is_err());
    }

    #[test]
    fn overlap_partitions_category_sets() {
        let captions: BTreeSet<String> = ["01", "02"].iter().map(|s| s.to_string()).collect();
        let inventory: BTreeSet<String> = ["02", "03"].iter().map(|s| s.to_string()).collect();
        let overlap = CategoryOverlap::new(&captions, &inventory);
        assert_eq!(overlap.common.iter().collect::<Vec<_>>(), ["02"]);
        assert_eq!(overlap.captions_only.iter().collect::<Vec<_>>(), ["01"]);
        assert_eq!(overlap.inventory_only.iter().collect::<Vec<_>>(), ["03"]);
    }
}
