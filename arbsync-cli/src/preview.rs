use std::path::PathBuf;

use arbsync::compute_statistics;
use serde_json::json;

use crate::project::Project;

#[derive(Debug, Clone, Default)]
pub struct PreviewOptions {
    pub config: Option<PathBuf>,
    pub languages: Vec<String>,
    pub json: bool,
}

/// Shows what `translate` would do, without translating or writing anything.
pub fn run_preview_command(options: PreviewOptions) -> Result<(), String> {
    let project = Project::open(options.config.as_deref())?;
    let languages = project.target_languages(&options.languages)?;
    let cache = project.cache()?;
    // Preview never creates the history file.
    let history = if project.workspace.history_path().exists() {
        project.history()?.get().clone()
    } else {
        arbsync::History::default()
    };

    let statistics = compute_statistics(
        &project.store,
        &cache,
        &project.layout,
        &project.source,
        &languages,
        &history,
    )
    .map_err(|e| e.to_string())?;

    if options.json {
        let body = json!({
            "source": project.layout.source_path,
            "languages": statistics.values().collect::<Vec<_>>(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&body).map_err(|e| e.to_string())?
        );
        return Ok(());
    }

    println!("=== Translation preview ===");
    println!("Source: {}", project.layout.source_path.display());
    for statistic in statistics.values() {
        let file_name = statistic
            .file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let marker = if statistic.translation_required { "•" } else { " " };
        println!("{} {}: {}", marker, file_name, statistic.describe());
    }
    let required = statistics.values().filter(|s| s.translation_required).count();
    println!("\n{} of {} languages need translation", required, statistics.len());
    Ok(())
}
