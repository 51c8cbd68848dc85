use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::data::model::{CaptionTable, Counts, ReconciliationResult, Split, composite_id};

const RULE: &str = "==================================================";

/// File listing the captions that matched no instance.
pub const CAPTION_ONLY_FILE: &str = "captions_without_instances.txt";

/// Machine-readable per-split counts.
pub const SUMMARY_FILE: &str = "summary.json";

/// Listing of uncaptioned instances for one split.
pub fn uncaptioned_file_name(split: Split) -> String {
    format!("without_captions_{split}.txt")
}

#[derive(Serialize)]
struct SplitSummary {
    split: Split,
    #[serde(flatten)]
    counts: Counts,
    coverage_percent: f64,
}

#[derive(Serialize)]
struct Summary {
    splits: Vec<SplitSummary>,
    overall: Counts,
    captions_without_instances: usize,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Write the per-split uncaptioned listings, the caption-only listing (when
/// there is anything to list) and `summary.json` into `output_dir`.
///
/// Returns the paths written.
pub fn save_detailed_results(result: &ReconciliationResult, output_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("creating output directory {}", output_dir.display()))?;

    let mut written = Vec::new();

    for (&split, categories) in &result.splits {
        let path = output_dir.join(uncaptioned_file_name(split));
        write_file(&path, |out| {
            writeln!(out, "Instances without captions - {split} split")?;
            writeln!(out, "{RULE}\n")?;
            for (category, record) in categories {
                if record.without_caption.is_empty() {
                    continue;
                }
                writeln!(
                    out,
                    "Category {category} ({} instances):",
                    record.without_caption.len()
                )?;
                for id in &record.without_caption {
                    writeln!(out, "  {}", composite_id(category, id))?;
                }
                writeln!(out)?;
            }
            Ok(())
        })?;
        written.push(path);
    }

    if !result.caption_only.is_empty() {
        let path = output_dir.join(CAPTION_ONLY_FILE);
        write_file(&path, |out| {
            writeln!(out, "Captions without corresponding dataset instances")?;
            writeln!(out, "{RULE}\n")?;
            for (category, ids) in &result.caption_only {
                writeln!(out, "Category {category} ({} captions):", ids.len())?;
                for id in ids {
                    writeln!(out, "  {id}")?;
                }
                writeln!(out)?;
            }
            Ok(())
        })?;
        written.push(path);
    }

    let path = output_dir.join(SUMMARY_FILE);
    write_file(&path, |out| {
        serde_json::to_writer_pretty(&mut *out, &summarize(result))?;
        writeln!(out)?;
        Ok(())
    })?;
    written.push(path);

    log::info!("Detailed results saved to {}", output_dir.display());
    Ok(written)
}

// ---------------------------------------------------------------------------
// Caption table as JSON
// ---------------------------------------------------------------------------

/// Default JSON destination for a caption CSV: same path, `.json` extension.
pub fn json_output_path(input: &Path) -> PathBuf {
    input.with_extension("json")
}

/// Write the table as a pretty-printed `identifier → caption` object.
/// Non-ASCII text is written verbatim.
pub fn save_captions_json(table: &CaptionTable, output: &Path) -> Result<()> {
    write_file(output, |out| {
        serde_json::to_writer_pretty(&mut *out, table.captions())?;
        writeln!(out)?;
        Ok(())
    })
}

fn summarize(result: &ReconciliationResult) -> Summary {
    let splits = result
        .splits
        .keys()
        .map(|&split| {
            let counts = result.split_counts(split);
            SplitSummary {
                split,
                counts,
                coverage_percent: counts.coverage_percent(),
            }
        })
        .collect();
    Summary {
        splits,
        overall: result.grand_counts(),
        captions_without_instances: result.caption_only_total(),
    }
}

fn write_file<F>(path: &Path, body: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);
    body(&mut out).with_context(|| format!("writing {}", path.display()))?;
    out.flush()
        .with_context(|| format!("flushing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::data::model::Inventory;
    use crate::data::reconcile::reconcile;

    fn sample_result() -> ReconciliationResult {
        let captions = CaptionTable::from_pairs(vec![
            ("01_a".to_string(), "x".to_string()),
            ("02_z".to_string(), "y".to_string()),
        ]);
        let mut train = BTreeMap::new();
        train.insert("01".to_string(), vec!["a".to_string(), "b".to_string()]);
        let mut splits = BTreeMap::new();
        splits.insert(Split::Train, train);
        splits.insert(Split::Test, BTreeMap::new());
        reconcile(&Inventory::from_splits(splits), &captions)
    }

    #[test]
    fn writes_listings_per_split_and_orphans() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/results");
        let written = save_detailed_results(&sample_result(), &out).unwrap();
        assert_eq!(written.len(), 4);

        let train = fs::read_to_string(out.join("without_captions_train.txt")).unwrap();
        assert!(train.starts_with("Instances without captions - train split\n"));
        assert!(train.contains("Category 01 (1 instances):\n  01_b\n"));

        let test = fs::read_to_string(out.join("without_captions_test.txt")).unwrap();
        assert!(!test.contains("Category"));

        let orphans = fs::read_to_string(out.join(CAPTION_ONLY_FILE)).unwrap();
        assert!(orphans.contains("Category 02 (1 captions):\n  02_z\n"));

        let summary: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join(SUMMARY_FILE)).unwrap()).unwrap();
        assert_eq!(summary["overall"]["total"], 2);
        assert_eq!(summary["splits"][1]["split"], "train");
        assert_eq!(summary["captions_without_instances"], 1);
    }

    #[test]
    fn skips_orphan_listing_when_nothing_is_orphaned() {
        let dir = tempfile::tempdir().unwrap();
        let result = ReconciliationResult::default();
        let written = save_detailed_results(&result, dir.path()).unwrap();
        assert_eq!(written, [dir.path().join(SUMMARY_FILE)]);
        assert!(!dir.path().join(CAPTION_ONLY_FILE).exists());
    }

    #[test]
    fn json_path_swaps_extension() {
        assert_eq!(
            json_output_path(Path::new("data/Cap3D_automated_ShapeNet.csv")),
            PathBuf::from("data/Cap3D_automated_ShapeNet.json")
        );
        assert_eq!(json_output_path(Path::new("captions")), PathBuf::from("captions.json"));
    }

    #[test]
    fn captions_json_keeps_non_ascii_text() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("captions.json");
        let table = CaptionTable::from_pairs(vec![
            ("02_b".to_string(), "chaise bleue, très jolie".to_string()),
            ("01_a".to_string(), "椅子".to_string()),
        ]);
        save_captions_json(&table, &output).unwrap();

        let text = fs::read_to_string(&output).unwrap();
        assert!(text.contains("\"01_a\": \"椅子\""));
        assert!(text.contains("très jolie"));
        assert!(!text.contains("\\u"));
        assert!(text.find("01_a").unwrap() < text.find("02_b").unwrap());

        let parsed: BTreeMap<String, String> = serde_json::from_str(&text).unwrap();
        assert_eq!(&parsed, table.captions());
    }
}
