use std::io::{self, Write};

use crate::data::model::{CaptionTable, CategoryOverlap, Counts, Inventory, ReconciliationResult, Split};

use super::thousands;

const RULE_WIDTH: usize = 80;

// ---------------------------------------------------------------------------
// Detailed report
// ---------------------------------------------------------------------------

/// Write the full comparison report: overall figures, per-split coverage,
/// the per-category table, and the categories found on only one side.
pub fn write_detailed_report<W: Write>(
    out: &mut W,
    result: &ReconciliationResult,
    captions: &CaptionTable,
    inventory: &Inventory,
) -> io::Result<()> {
    let overlap = CategoryOverlap::new(captions.categories(), &inventory.categories);

    writeln!(out)?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "DATASET vs CAPTIONS ANALYSIS REPORT")?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;

    writeln!(out, "\nOVERALL STATISTICS:")?;
    writeln!(out, "  - Total captions in table: {}", thousands(captions.len()))?;
    writeln!(out, "  - Categories in table: {}", captions.categories().len())?;
    writeln!(out, "  - Categories in dataset: {}", inventory.categories.len())?;
    writeln!(out, "  - Common categories: {}", overlap.common.len())?;
    writeln!(out, "  - Categories only in table: {}", overlap.captions_only.len())?;
    writeln!(out, "  - Categories only in dataset: {}", overlap.inventory_only.len())?;
    writeln!(
        out,
        "  - Captions without dataset instances: {}",
        thousands(result.caption_only_total())
    )?;

    writeln!(out, "\nSTATISTICS BY SPLIT:")?;
    for &split in result.splits.keys() {
        writeln!(out, "\n  {} SPLIT:", split.as_str().to_uppercase())?;
        write_counts(out, &result.split_counts(split))?;
    }
    writeln!(out, "\n  OVERALL:")?;
    write_counts(out, &result.grand_counts())?;

    write_category_table(out, result)?;

    if !result.caption_only.is_empty() {
        writeln!(out, "\nCATEGORIES WITH CAPTIONS BUT NO DATASET INSTANCES:")?;
        for (category, ids) in &result.caption_only {
            writeln!(out, "    {category}: {} captions", ids.len())?;
        }
    }

    if !overlap.inventory_only.is_empty() {
        writeln!(out, "\nCATEGORIES IN DATASET BUT NOT IN CAPTION TABLE:")?;
        for category in &overlap.inventory_only {
            writeln!(
                out,
                "    {category}: {} instances",
                result.category_counts(category).total
            )?;
        }
    }

    Ok(())
}

fn write_counts<W: Write>(out: &mut W, counts: &Counts) -> io::Result<()> {
    writeln!(out, "    - Total instances: {}", thousands(counts.total))?;
    writeln!(
        out,
        "    - With captions: {} ({:.1}%)",
        thousands(counts.with_caption),
        counts.coverage_percent()
    )?;
    writeln!(
        out,
        "    - Without captions: {} ({:.1}%)",
        thousands(counts.without_caption),
        counts.missing_percent()
    )
}

fn write_category_table<W: Write>(out: &mut W, result: &ReconciliationResult) -> io::Result<()> {
    writeln!(out, "\nDETAILED BREAKDOWN BY CATEGORY:")?;
    writeln!(
        out,
        "{:<12} {:<8} {:<8} {:<8} {:<8} {:<12} {:<12}",
        "Category", "Test", "Train", "Val", "Total", "With Caption", "Missing"
    )?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;

    for category in result.categories() {
        let per_split = Split::ALL.map(|split| result.category_split_counts(split, category).total);
        let counts = result.category_counts(category);
        if counts.total == 0 {
            continue;
        }
        writeln!(
            out,
            "{:<12} {:<8} {:<8} {:<8} {:<8} {:<12} {:<12}",
            category,
            per_split[0],
            per_split[1],
            per_split[2],
            counts.total,
            counts.with_caption,
            counts.without_caption
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::data::reconcile::reconcile;

    fn render(inventory: &Inventory, captions: &CaptionTable) -> String {
        let result = reconcile(inventory, captions);
        let mut buf = Vec::new();
        write_detailed_report(&mut buf, &result, captions, inventory).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn reports_counts_and_one_sided_categories() {
        let captions = CaptionTable::from_pairs(vec![
            ("01_a".to_string(), "chair".to_string()),
            ("09_z".to_string(), "boat".to_string()),
        ]);
        let mut train = BTreeMap::new();
        train.insert("01".to_string(), vec!["a".to_string(), "b".to_string()]);
        train.insert("05".to_string(), vec!["c".to_string()]);
        let mut splits = BTreeMap::new();
        splits.insert(Split::Train, train);
        splits.insert(Split::Val, BTreeMap::new());
        let inventory = Inventory::from_splits(splits);

        let text = render(&inventory, &captions);
        assert!(text.contains("TRAIN SPLIT:"));
        assert!(text.contains("With captions: 1 (33.3%)"));
        assert!(text.contains("09: 1 captions"));
        assert!(text.contains("05: 1 instances"));
        assert!(text.contains("Captions without dataset instances: 1"));
    }

    #[test]
    fn empty_split_prints_zero_percent() {
        let mut splits = BTreeMap::new();
        splits.insert(Split::Val, BTreeMap::new());
        let inventory = Inventory::from_splits(splits);
        let captions = CaptionTable::from_pairs(vec![("01_a".to_string(), "x".to_string())]);

        let text = render(&inventory, &captions);
        assert!(text.contains("VAL SPLIT:"));
        assert!(text.contains("With captions: 0 (0.0%)"));
    }
}
