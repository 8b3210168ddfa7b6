use std::path::PathBuf;

use arbsync::{InvalidType, Validator, findings};

use crate::project::Project;

/// Decodes HTML entities left behind by the provider in every target file.
pub fn run_decode_entities_command(config: Option<PathBuf>, languages: Vec<String>) -> Result<(), String> {
    let project = Project::open(config.as_deref())?;
    let languages = project.target_languages(&languages)?;
    let validator = Validator::new(&project.store, &project.layout);
    let targets = validator
        .load_targets(&languages)
        .map_err(|e| e.to_string())?;

    let found: Vec<_> = findings(&project.source, &targets)
        .filter(|f| f.invalid_type == InvalidType::UndecodedEntityExists)
        .collect();
    if found.is_empty() {
        println!("No undecoded HTML entities found.");
        return Ok(());
    }

    let decoded = validator
        .decode_all_entities(&found)
        .map_err(|e| e.to_string())?;
    println!("✅ Decoded HTML entities in {} values", decoded);
    Ok(())
}
