use std::io::{self, Write};

use crate::data::model::{CaptionTable, ReconciliationResult};

use super::thousands;

/// Short coverage overview: grand totals, one line per split, caption count.
pub fn write_quick_summary<W: Write>(
    out: &mut W,
    result: &ReconciliationResult,
    captions: &CaptionTable,
) -> io::Result<()> {
    writeln!(out, "Dataset Caption Coverage Summary")?;
    writeln!(out, "{}", "=".repeat(50))?;

    let grand = result.grand_counts();
    writeln!(out, "Total instances: {}", thousands(grand.total))?;
    writeln!(
        out,
        "With captions: {} ({:.1}%)",
        thousands(grand.with_caption),
        grand.coverage_percent()
    )?;
    writeln!(
        out,
        "Without captions: {} ({:.1}%)",
        thousands(grand.without_caption),
        grand.missing_percent()
    )?;
    writeln!(out)?;

    for &split in result.splits.keys() {
        let counts = result.split_counts(split);
        writeln!(
            out,
            "{}: {}/{} ({:.1}%)",
            capitalize(split.as_str()),
            thousands(counts.with_caption),
            thousands(counts.total),
            counts.coverage_percent()
        )?;
    }

    writeln!(out, "\nTotal captions in table: {}", thousands(captions.len()))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
