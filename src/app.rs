use std::io::Write;

use anyhow::{Context, Result, bail};

use crate::config::RunConfig;
use crate::data::loader::load_captions;
use crate::data::reconcile::reconcile;
use crate::data::scanner::scan_instances;
use crate::report::export::save_detailed_results;
use crate::report::quick::write_quick_summary;
use crate::report::summary::write_detailed_report;

// ---------------------------------------------------------------------------
// One audit run
// ---------------------------------------------------------------------------

/// Load, scan, reconcile, then report to `out` and optionally export.
pub fn run<W: Write>(config: &RunConfig, out: &mut W) -> Result<()> {
    let captions = load_captions(&config.csv_path);
    let inventory = scan_instances(&config.dataset_root, &config.splits, &config.extension)
        .context("scanning dataset")?;

    // An empty table also covers a load failure.
    if captions.is_empty() {
        bail!(
            "Failed to load data from {}. Please check file paths.",
            config.csv_path.display()
        );
    }

    log::info!("Analyzing missing captions");
    let result = reconcile(&inventory, &captions);

    if config.quick {
        write_quick_summary(out, &result, &captions)?;
    } else {
        write_detailed_report(out, &result, &captions, &inventory)?;
    }
    out.flush()?;

    if config.save_results {
        let written = save_detailed_results(&result, &config.output_dir)?;
        for path in written {
            log::debug!("wrote {}", path.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use super::*;
    use crate::data::model::Split;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn end_to_end_report_and_export() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("dataset");
        touch(&root, "train/complete/01/a001.pcd");
        touch(&root, "train/complete/01/a003.pcd");
        let csv_path = dir.path().join("captions.csv");
        fs::write(&csv_path, "01_a001,a red chair\n01_a002,a blue chair\n").unwrap();

        let config = RunConfig {
            csv_path,
            dataset_root: root,
            output_dir: dir.path().join("out"),
            save_results: true,
            ..Default::default()
        };
        let mut buf = Vec::new();
        run(&config, &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("TRAIN SPLIT:"));
        assert!(text.contains("With captions: 1 (50.0%)"));
        assert!(text.contains("VAL SPLIT:"));
        let listing = fs::read_to_string(config.output_dir.join("without_captions_train.txt")).unwrap();
        assert!(listing.contains("01_a003"));
        assert!(config.splits.contains(&Split::Val));
    }

    #[test]
    fn empty_caption_table_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig {
            csv_path: dir.path().join("missing.csv"),
            dataset_root: dir.path().to_path_buf(),
            ..Default::default()
        };
        let err = run(&config, &mut Vec::<u8>::new()).unwrap_err();
        assert!(err.to_string().contains("Failed to load data"));
    }
}
