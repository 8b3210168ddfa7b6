use std::path::PathBuf;

use arbsync::{ResourceStore, check_renamable};

use crate::project::Project;
use crate::validation::{validate_keys, validate_rename_keys};

/// Renames keys in every ARB file and in the history.
pub fn run_rename_keys_command(
    config: Option<PathBuf>,
    old_keys: Vec<String>,
    new_keys: Vec<String>,
) -> Result<(), String> {
    validate_rename_keys(&old_keys, &new_keys)?;
    let project = Project::open(config.as_deref())?;
    check_renamable(&project.source, &old_keys, &new_keys).map_err(|e| e.to_string())?;

    let mut renamed = 0;
    for path in project.arb_files()? {
        let count = project
            .store
            .rename_keys(&path, &old_keys, &new_keys)
            .map_err(|e| e.to_string())?;
        if count > 0 {
            println!("  {}: {} keys renamed", path.display(), count);
        }
        renamed += count;
    }
    project
        .history()?
        .rename_keys(&old_keys, &new_keys)
        .map_err(|e| e.to_string())?;

    println!("✅ Renamed {} keys", renamed);
    Ok(())
}

/// Deletes keys from every ARB file and from the history.
pub fn run_delete_keys_command(config: Option<PathBuf>, keys: Vec<String>) -> Result<(), String> {
    validate_keys(&keys)?;
    let project = Project::open(config.as_deref())?;

    let mut deleted = 0;
    for path in project.arb_files()? {
        let count = project
            .store
            .delete_keys(&path, &keys)
            .map_err(|e| e.to_string())?;
        if count > 0 {
            println!("  {}: {} keys deleted", path.display(), count);
        }
        deleted += count;
    }
    project
        .history()?
        .delete_keys(&keys)
        .map_err(|e| e.to_string())?;

    println!("✅ Deleted {} keys", deleted);
    Ok(())
}
