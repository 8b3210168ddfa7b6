use std::path::PathBuf;

use arbsync::TranslationType;
use arbsync_cli::{
    check::{ValidateOptions, run_validate_command},
    config::{DEFAULT_CONFIG_FILE, InitOptions, run_init_command},
    create_cache::run_create_cache_command,
    decode::run_decode_entities_command,
    exclude::{ExcludeOptions, run_exclude_command},
    keys::{run_delete_keys_command, run_rename_keys_command},
    preview::{PreviewOptions, run_preview_command},
    translate::{TranslateOptions, run_translate_command},
    validation::validate_language_code,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the config file (defaults to ./arbsync.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    commands: Commands,
}

/// Which Google Translate endpoint to use.
#[derive(Debug, Clone, Copy, PartialEq, Default, clap::ValueEnum)]
enum TranslationTypeArg {
    /// Free endpoint, roughly 100 requests per hour
    #[default]
    Free,
    /// Cloud Translation API, needs an API key
    Paid,
}

impl From<TranslationTypeArg> for TranslationType {
    fn from(value: TranslationTypeArg) -> Self {
        match value {
            TranslationTypeArg::Free => TranslationType::Free,
            TranslationTypeArg::Paid => TranslationType::Paid,
        }
    }
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a config file for the current project.
    Init {
        /// Source ARB file (detected when omitted)
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Target language codes (defaults to sibling ARB files)
        #[arg(short, long, value_delimiter = ',')]
        lang: Vec<String>,
    },

    /// Show what a translation run would change.
    Preview {
        /// Only these language codes
        #[arg(short, long, value_delimiter = ',')]
        lang: Vec<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Translate the source ARB file into every target language.
    Translate {
        /// Translation endpoint
        #[arg(short = 't', long = "type", value_enum, default_value_t)]
        translation_type: TranslationTypeArg,

        /// Only these language codes
        #[arg(short, long, value_delimiter = ',')]
        lang: Vec<String>,

        /// Skip languages that are already up to date
        #[arg(long)]
        only_required: bool,
    },

    /// Compare target files with the source and report suspicious translations.
    Validate {
        /// Only these language codes
        #[arg(short, long, value_delimiter = ',')]
        lang: Vec<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Exit with an error when problems are found
        #[arg(long)]
        strict: bool,
    },

    /// Decode HTML entities left in translated values.
    DecodeEntities {
        /// Only these language codes
        #[arg(short, long, value_delimiter = ',')]
        lang: Vec<String>,
    },

    /// List source changes, or keep current translations for some of them.
    Exclude {
        /// Keys to exclude from the next translation
        #[arg(short, long)]
        key: Vec<String>,

        /// Exclude every change
        #[arg(long, conflicts_with = "key")]
        all: bool,
    },

    /// Build the translation cache from existing target files.
    CreateCache {
        /// Target ARB files (defaults to every ARB file next to the source)
        #[arg(short, long)]
        file: Vec<PathBuf>,
    },

    /// Rename keys in every ARB file.
    RenameKeys {
        /// Keys to rename
        #[arg(long, required = true, num_args = 1..)]
        old: Vec<String>,

        /// New names, in the same order
        #[arg(long, required = true, num_args = 1..)]
        new: Vec<String>,
    },

    /// Delete keys from every ARB file.
    DeleteKeys {
        /// Keys to delete
        #[arg(required = true)]
        keys: Vec<String>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn validate_languages(languages: &[String]) -> Result<(), String> {
    languages.iter().try_for_each(|l| validate_language_code(l))
}

fn run_translate(options: TranslateOptions) -> Result<(), String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start async runtime: {}", e))?;
    runtime.block_on(run_translate_command(options))
}

fn run(args: Args) -> Result<(), String> {
    let config = args.config;
    match args.commands {
        Commands::Init { source, lang } => {
            validate_languages(&lang)?;
            run_init_command(InitOptions {
                config_path: config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE)),
                source,
                languages: lang,
            })
        }
        Commands::Preview { lang, json } => {
            validate_languages(&lang)?;
            run_preview_command(PreviewOptions {
                config,
                languages: lang,
                json,
            })
        }
        Commands::Translate {
            translation_type,
            lang,
            only_required,
        } => {
            validate_languages(&lang)?;
            run_translate(TranslateOptions {
                config,
                translation_type: translation_type.into(),
                languages: lang,
                only_required,
            })
        }
        Commands::Validate { lang, json, strict } => {
            validate_languages(&lang)?;
            run_validate_command(ValidateOptions {
                config,
                languages: lang,
                json,
                strict,
            })
        }
        Commands::DecodeEntities { lang } => {
            validate_languages(&lang)?;
            run_decode_entities_command(config, lang)
        }
        Commands::Exclude { key, all } => run_exclude_command(ExcludeOptions {
            config,
            keys: key,
            all,
        }),
        Commands::CreateCache { file } => run_create_cache_command(config, file),
        Commands::RenameKeys { old, new } => run_rename_keys_command(config, old, new),
        Commands::DeleteKeys { keys } => run_delete_keys_command(config, keys),
    }
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}
