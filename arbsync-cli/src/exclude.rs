use std::path::PathBuf;

use crate::project::Project;

#[derive(Debug, Clone, Default)]
pub struct ExcludeOptions {
    pub config: Option<PathBuf>,
    pub keys: Vec<String>,
    pub all: bool,
}

/// Lists source changes since the last sync, or marks some of them as
/// translated so the next sync keeps the current target values.
pub fn run_exclude_command(options: ExcludeOptions) -> Result<(), String> {
    let project = Project::open(options.config.as_deref())?;
    let mut history = project.history()?;
    let changes = history.compare(&project.source);
    if changes.is_empty() {
        println!("There are no changes in {}.", project.source.file_name());
        return Ok(());
    }

    let keys: Vec<String> = if options.all {
        changes.iter().map(|c| c.key.clone()).collect()
    } else if options.keys.is_empty() {
        println!("Changes since the last translation:");
        for change in &changes {
            match &change.history_value {
                Some(previous) => println!("  {}: {} → {}", change.key, previous, change.source_value),
                None => println!("  {}: {} (new)", change.key, change.source_value),
            }
        }
        println!("\nPass --key <KEY> (or --all) to exclude changes from translation.");
        return Ok(());
    } else {
        options.keys
    };

    let excluded = history
        .exclude(&project.source, &keys)
        .map_err(|e| e.to_string())?;
    println!(
        "✅ {} items excluded from translation. (Keys missing from a target file will still be translated.)",
        excluded
    );
    Ok(())
}
