use std::path::PathBuf;

use arbsync::{ValidationFinding, Validator, findings};
use serde_json::json;

use crate::project::Project;

#[derive(Debug, Clone, Default)]
pub struct ValidateOptions {
    pub config: Option<PathBuf>,
    pub languages: Vec<String>,
    pub json: bool,
    /// Exit with an error when anything is found.
    pub strict: bool,
}

pub fn run_validate_command(options: ValidateOptions) -> Result<(), String> {
    let project = Project::open(options.config.as_deref())?;
    let languages = project.target_languages(&options.languages)?;
    let validator = Validator::new(&project.store, &project.layout);
    let targets = validator
        .load_targets(&languages)
        .map_err(|e| e.to_string())?;
    let found: Vec<ValidationFinding> = findings(&project.source, &targets).collect();

    if options.json {
        let body = json!({
            "files_checked": targets.len(),
            "findings": found,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&body).map_err(|e| e.to_string())?
        );
    } else {
        print_findings(&found, targets.len());
    }

    if options.strict && !found.is_empty() {
        return Err(format!("Validation failed: {} problems found", found.len()));
    }
    Ok(())
}

fn print_findings(found: &[ValidationFinding], files_checked: usize) {
    if found.is_empty() {
        println!("✅ {} files checked, no problems found", files_checked);
        return;
    }

    let mut current: Option<&PathBuf> = None;
    for finding in found {
        if current != Some(&finding.target_path) {
            println!("\n{}", finding.target_path.display());
            current = Some(&finding.target_path);
        }
        println!("  {}: {}", finding.key, finding.invalid_type);
        println!(
            "    source: {:?} (params: {}, brackets: {})",
            finding.source.value, finding.source.param_count, finding.source.bracket_count
        );
    }
    println!("\n❌ {} problems found in {} files", found.len(), files_checked);
}
