use std::path::Path;

use walkdir::WalkDir;

use crate::error::AuditError;

use super::model::{CategoryInstances, Inventory, Split};

/// Subdirectory of each split that holds the complete point clouds.
pub const COMPLETE_DIR: &str = "complete";

/// Default extension of point-cloud data files.
pub const DEFAULT_EXTENSION: &str = "pcd";

/// Enumerate instances under `root/<split>/complete/<category>/<id>.<extension>`.
///
/// A split without its `complete` directory is logged as a warning and
/// contributes an empty map. Ids and categories come back sorted.
pub fn scan_instances(root: &Path, splits: &[Split], extension: &str) -> Result<Inventory, AuditError> {
    log::info!("Scanning dataset at {}", root.display());

    let mut inventory = Inventory::default();

    for &split in splits {
        let complete = root.join(split.as_str()).join(COMPLETE_DIR);
        if !complete.is_dir() {
            let warning = AuditError::MissingInventoryRoot {
                split,
                path: complete,
            };
            log::warn!("{warning}");
            inventory.splits.insert(split, CategoryInstances::new());
            inventory.missing_splits.push(split);
            continue;
        }

        log::info!("Processing {split} split");
        let categories = scan_split(&complete, extension)?;
        for (category, ids) in &categories {
            log::debug!("  Category {category}: {} instances", ids.len());
            inventory.categories.insert(category.clone());
        }
        inventory.splits.insert(split, categories);
    }

    log::info!(
        "Found {} categories and {} instances",
        inventory.categories.len(),
        inventory.instance_count()
    );
    Ok(inventory)
}

fn scan_split(complete: &Path, extension: &str) -> Result<CategoryInstances, AuditError> {
    let mut categories = CategoryInstances::new();
    let walker = WalkDir::new(complete)
        .min_depth(1)
        .max_depth(2)
        .follow_links(true)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|err| walk_error(complete, err))?;
        // Depth 1 is a category directory, depth 2 a data file inside it.
        if entry.depth() != 2 || !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        let (Some(category), Some(id)) = (
            path.parent().and_then(Path::file_name),
            path.file_stem(),
        ) else {
            continue;
        };
        if category.to_str().is_none() || id.to_str().is_none() {
            log::warn!("Non UTF-8 name in {}, using a lossy id", path.display());
        }
        categories
            .entry(category.to_string_lossy().into_owned())
            .or_default()
            .push(id.to_string_lossy().into_owned());
    }

    // Directories without data files never get an entry.
    for ids in categories.values_mut() {
        ids.sort();
    }
    Ok(categories)
}

fn walk_error(complete: &Path, err: walkdir::Error) -> AuditError {
    let path = err.path().unwrap_or(complete).to_path_buf();
    AuditError::Io {
        path,
        source: err.into(),
    }
}
