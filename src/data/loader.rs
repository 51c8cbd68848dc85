use std::io::Read;
use std::path::Path;

use crate::error::AuditError;

use super::model::CaptionTable;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the caption table, returning an empty table when the source cannot
/// be read.
///
/// The failure is logged; callers detect it with [`CaptionTable::is_empty`].
/// A valid but empty source is indistinguishable from a failed load.
pub fn load_captions(path: &Path) -> CaptionTable {
    log::info!("Loading caption data from {}", path.display());
    match try_load_captions(path) {
        Ok(table) => {
            log::info!(
                "Loaded {} captions for {} categories",
                table.len(),
                table.categories().len()
            );
            table
        }
        Err(e) => {
            log::error!("{e}");
            CaptionTable::default()
        }
    }
}

/// Load the caption table, reporting [`AuditError::SourceUnreadable`] on
/// failure.
pub fn try_load_captions(path: &Path) -> Result<CaptionTable, AuditError> {
    let unreadable = |source| AuditError::SourceUnreadable {
        path: path.to_path_buf(),
        source,
    };
    let reader = reader_builder().from_path(path).map_err(unreadable)?;
    read_captions(reader).map_err(unreadable)
}

/// Parse a caption table from any byte stream.
pub fn captions_from_reader<R: Read>(rdr: R) -> Result<CaptionTable, csv::Error> {
    read_captions(reader_builder().from_reader(rdr))
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// Layout: no header row, first field is the composite identifier, second is
/// the caption, further fields are ignored. Quoted fields may contain commas.
fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(false).flexible(true);
    builder
}

fn read_captions<R: Read>(mut reader: csv::Reader<R>) -> Result<CaptionTable, csv::Error> {
    let mut pairs = Vec::new();
    for result in reader.records() {
        let record = result?;
        // Rows shorter than two fields are skipped.
        if let (Some(identifier), Some(caption)) = (record.get(0), record.get(1)) {
            pairs.push((identifier.trim().to_string(), caption.trim().to_string()));
        }
    }
    Ok(CaptionTable::from_pairs(pairs))
}
