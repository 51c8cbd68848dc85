use std::path::PathBuf;

use crate::data::model::Split;
use crate::data::scanner::DEFAULT_EXTENSION;

pub const DEFAULT_CSV_PATH: &str = "data/PCN/Cap3D_automated_ShapeNet.csv";
pub const DEFAULT_DATASET_ROOT: &str = "data/PCN";
pub const DEFAULT_OUTPUT_DIR: &str = "analysis_results";

// ---------------------------------------------------------------------------
// Run configuration
// ---------------------------------------------------------------------------

/// Everything one audit run needs, independent of how it was parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Caption table (two-column CSV).
    pub csv_path: PathBuf,
    /// Dataset root holding `<split>/complete/<category>/` trees.
    pub dataset_root: PathBuf,
    /// Where plain-text listings go when `save_results` is set.
    pub output_dir: PathBuf,
    pub save_results: bool,
    /// Print the short coverage summary instead of the full report.
    pub quick: bool,
    /// Splits to scan, in report order.
    pub splits: Vec<Split>,
    /// Point-cloud file extension, without the dot.
    pub extension: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            dataset_root: PathBuf::from(DEFAULT_DATASET_ROOT),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            save_results: false,
            quick: false,
            splits: Split::ALL.to_vec(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl RunConfig {
    /// Sort and dedup the split list; strip a leading dot from the extension.
    pub fn normalized(mut self) -> Self {
        self.splits.sort();
        self.splits.dedup();
        if let Some(stripped) = self.extension.strip_prefix('.') {
            self.extension = stripped.to_string();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_orders_splits_and_trims_extension() {
        let config = RunConfig {
            splits: vec![Split::Val, Split::Test, Split::Val],
            extension: ".ply".to_string(),
            ..Default::default()
        }
        .normalized();
        assert_eq!(config.splits, [Split::Test, Split::Val]);
        assert_eq!(config.extension, "ply");
    }
}
