use std::collections::BTreeMap;

use super::model::{
    CaptionTable, CategoryRecord, Inventory, ReconciliationResult, category_of, composite_id,
};

/// Match the inventory against the caption table.
///
/// Per split and category, local ids are partitioned by whether their
/// composite key has a caption (scan order kept). Captions whose key is not
/// found anywhere in the inventory are grouped by their category prefix.
pub fn reconcile(inventory: &Inventory, captions: &CaptionTable) -> ReconciliationResult {
    let splits = inventory
        .splits
        .iter()
        .map(|(split, categories)| {
            let records = categories
                .iter()
                .map(|(category, ids)| (category.clone(), partition(category, ids, captions)))
                .collect();
            (*split, records)
        })
        .collect();

    let present = inventory.composite_ids();
    let mut caption_only: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for identifier in captions.captions().keys() {
        if !present.contains(identifier) {
            caption_only
                .entry(category_of(identifier).to_string())
                .or_default()
                .push(identifier.clone());
        }
    }

    ReconciliationResult {
        splits,
        caption_only,
    }
}

fn partition(category: &str, ids: &[String], captions: &CaptionTable) -> CategoryRecord {
    let (with_caption, without_caption): (Vec<String>, Vec<String>) = ids
        .iter()
        .cloned()
        .partition(|id| captions.contains(&composite_id(category, id)));
    CategoryRecord {
        with_caption,
        without_caption,
    }
}
