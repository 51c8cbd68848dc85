use std::io;
use std::path::PathBuf;

use clap::Parser;

use caption_audit::config::{DEFAULT_CSV_PATH, DEFAULT_DATASET_ROOT, DEFAULT_OUTPUT_DIR};
use caption_audit::data::scanner::DEFAULT_EXTENSION;
use caption_audit::{RunConfig, Split};

/// Compare dataset instances with a caption table
#[derive(Parser, Debug)]
#[command(name = "caption-audit")]
#[command(version, about = "Find dataset instances without captions and captions without instances", long_about = None)]
struct Args {
    /// Path to the caption CSV file
    #[arg(long = "csv-path", default_value = DEFAULT_CSV_PATH)]
    csv_path: PathBuf,

    /// Path to the dataset root directory
    #[arg(long = "dataset-root", default_value = DEFAULT_DATASET_ROOT)]
    dataset_root: PathBuf,

    /// Directory to save detailed results
    #[arg(long = "output-dir", default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Save detailed results to files
    #[arg(long = "save-results")]
    save_results: bool,

    /// Print a short coverage summary instead of the full report
    #[arg(short = 'q', long = "quick")]
    quick: bool,

    /// Splits to scan (comma separated)
    #[arg(long = "splits", value_delimiter = ',', default_values_t = Split::ALL.to_vec())]
    splits: Vec<Split>,

    /// Extension of point-cloud data files
    #[arg(long = "extension", default_value = DEFAULT_EXTENSION)]
    extension: String,

    /// Verbose output
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> RunConfig {
        RunConfig {
            csv_path: self.csv_path,
            dataset_root: self.dataset_root,
            output_dir: self.output_dir,
            save_results: self.save_results,
            quick: self.quick,
            splits: self.splits,
            extension: self.extension,
        }
        .normalized()
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    caption_audit::init_logging(args.verbose);

    let config = args.into_config();
    log::debug!("{config:?}");

    let stdout = io::stdout();
    caption_audit::app::run(&config, &mut stdout.lock())
}
