use std::path::PathBuf;

use arbsync::{
    CancelFlag, Error, ProviderSet, TranslationProvider, TranslationType, Translator, compute_statistics,
};
use tracing::{debug, info};

use crate::console::ConsoleNotifier;
use crate::google::{FreeGoogleTranslator, PaidGoogleTranslator};
use crate::project::Project;

#[derive(Debug, Clone, Default)]
pub struct TranslateOptions {
    pub config: Option<PathBuf>,
    pub translation_type: TranslationType,
    pub languages: Vec<String>,
    /// Skip languages the preview reports as up to date.
    pub only_required: bool,
}

fn providers(api_key: Option<String>) -> Result<ProviderSet, Error> {
    let free: Box<dyn TranslationProvider> = Box::new(FreeGoogleTranslator::new()?);
    let paid = match api_key {
        Some(key) => Some(Box::new(PaidGoogleTranslator::new(key)?) as Box<dyn TranslationProvider>),
        None => None,
    };
    Ok(ProviderSet::new(free, paid))
}

pub async fn run_translate_command(options: TranslateOptions) -> Result<(), String> {
    let project = Project::open(options.config.as_deref())?;
    let mut languages = project.target_languages(&options.languages)?;
    let providers = providers(project.workspace.api_key()).map_err(|e| e.to_string())?;
    providers
        .select(options.translation_type)
        .map_err(|e| e.to_string())?;

    let mut history = project.history()?;
    let mut cache = project.cache()?;

    if options.only_required {
        let statistics = compute_statistics(
            &project.store,
            &cache,
            &project.layout,
            &project.source,
            &languages,
            history.get(),
        )
        .map_err(|e| e.to_string())?;
        languages.retain(|code| statistics.get(code).is_some_and(|s| s.translation_required));
        if languages.is_empty() {
            println!("All target languages are up to date.");
            return Ok(());
        }
        debug!("Translating only {:?}", languages);
    }

    let cancel = CancelFlag::new();
    let handle = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("Cancelling after the current language...");
            handle.cancel();
        }
    });

    let run = Translator::new(&project.store, &mut cache, &project.layout, ConsoleNotifier)
        .translate_all(
            &providers,
            options.translation_type,
            &project.source,
            &mut history,
            &languages,
            &cancel,
        )
        .await
        .map_err(|e| e.to_string())?;

    for (code, statistic) in &run.statistics {
        println!("  {}: {}", code, statistic);
    }
    info!(processed = run.processed, cancelled = run.cancelled, "translation finished");

    if run.failures.is_empty() {
        Ok(())
    } else {
        let failed: Vec<_> = run
            .failures
            .iter()
            .map(|f| format!("{} ({})", f.language_code, f.error))
            .collect();
        Err(format!("Translation failed for: {}", failed.join(", ")))
    }
}
