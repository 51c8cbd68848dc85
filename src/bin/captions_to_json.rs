use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use caption_audit::data::loader::try_load_captions;
use caption_audit::report::export::{json_output_path, save_captions_json};

/// Convert a caption CSV into a JSON object of identifier → caption
#[derive(Parser, Debug)]
#[command(name = "captions-to-json")]
#[command(version, long_about = None)]
struct Args {
    /// Caption CSV file
    #[arg(default_value = "Cap3D_automated_ShapeNet.csv")]
    input: PathBuf,

    /// Output JSON file (defaults to the input path with a .json extension)
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    caption_audit::init_logging(false);
    let args = Args::parse();
    let output = args.output.unwrap_or_else(|| json_output_path(&args.input));

    let table = try_load_captions(&args.input)?;
    save_captions_json(&table, &output)?;

    log::info!("Wrote {} captions to {}", table.len(), output.display());
    Ok(())
}
