use std::path::PathBuf;

use arbsync::ResourceStore;

use crate::project::Project;
use crate::validation::validate_arb_path;

/// Fills the translation cache from target files that are already translated.
pub fn run_create_cache_command(config: Option<PathBuf>, files: Vec<PathBuf>) -> Result<(), String> {
    let project = Project::open(config.as_deref())?;
    let files = if files.is_empty() {
        project.arb_files()?
    } else {
        for file in &files {
            validate_arb_path(file)?;
        }
        files
    };

    let mut targets = Vec::new();
    for path in files {
        if path == project.layout.source_path {
            continue;
        }
        let code = project
            .layout
            .language_code_for_path(&path)
            .map_err(|e| e.to_string())?;
        targets.push(project.store.load(&path, &code).map_err(|e| e.to_string())?);
    }
    if targets.is_empty() {
        println!("No target ARB files found.");
        return Ok(());
    }

    let mut cache = project.cache()?;
    let count = cache
        .rebuild_from(&project.source, &targets)
        .map_err(|e| e.to_string())?;
    println!(
        "✅ Cached {} translations from {} files into {}",
        count,
        targets.len(),
        cache.path().display()
    );
    Ok(())
}
