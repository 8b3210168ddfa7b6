//! `arbsync.toml` loading and the `init` template.

use std::path::{Path, PathBuf};

use arbsync::{ArbLayout, Error, language_by_code};
use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "arbsync.toml";
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";
const DEFAULT_HISTORY_PATH: &str = ".arbsync/history.json";
const DEFAULT_CACHE_PATH: &str = ".arbsync/cache.json";
const DEFAULT_PREFIX: &str = "intl_";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub source_arb_file_path: Option<PathBuf>,
    pub target_language_codes: Vec<String>,
    pub google_api_key: Option<String>,
    pub arb_file_prefix: Option<String>,
    pub custom_arb_file_names: IndexMap<String, String>,
    pub history_path: Option<PathBuf>,
    pub cache_path: Option<PathBuf>,
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

/// A loaded config plus the directory its relative paths are resolved against.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub config: Config,
    pub root: PathBuf,
}

impl Workspace {
    /// Loads `path`, or `arbsync.toml` in the working directory.
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        let text = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::ConfigNotFound(format!(
                "{} (run `arbsync init` to create one)",
                path.display()
            )),
            _ => Error::Io(e),
        })?;
        let config = Config::from_toml(&text)
            .map_err(|e| Error::invalid_arguments(format!("invalid config {}: {}", path.display(), e)))?;
        let root = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        debug!("Loaded config from {}", path.display());
        Ok(Workspace { config, root })
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    pub fn source_path(&self) -> Result<PathBuf, Error> {
        match &self.config.source_arb_file_path {
            Some(path) if !path.as_os_str().is_empty() => Ok(self.resolve(path)),
            _ => Err(Error::SourcePathRequired),
        }
    }

    pub fn layout(&self) -> Result<ArbLayout, Error> {
        Ok(ArbLayout::new(self.source_path()?)
            .with_prefix(self.config.arb_file_prefix.clone())
            .with_custom_file_names(self.config.custom_arb_file_names.clone()))
    }

    pub fn history_path(&self) -> PathBuf {
        self.resolve(
            self.config
                .history_path
                .as_deref()
                .unwrap_or(Path::new(DEFAULT_HISTORY_PATH)),
        )
    }

    pub fn cache_path(&self) -> PathBuf {
        self.resolve(
            self.config
                .cache_path
                .as_deref()
                .unwrap_or(Path::new(DEFAULT_CACHE_PATH)),
        )
    }

    /// `GOOGLE_API_KEY` when set, otherwise the configured key. Empty keys count as absent.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .or_else(|| self.config.google_api_key.clone())
            .filter(|key| !key.trim().is_empty())
    }

    /// The selected languages, or every configured language when none is selected.
    pub fn target_languages(&self, selection: &[String]) -> Result<Vec<String>, Error> {
        let languages = if selection.is_empty() {
            self.config.target_language_codes.clone()
        } else {
            selection.to_vec()
        };
        if languages.is_empty() {
            return Err(Error::TargetLanguagesRequired);
        }
        for code in &languages {
            language_by_code(code)?;
        }
        Ok(languages)
    }
}

/// Options of `arbsync init`.
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    pub config_path: PathBuf,
    pub source: Option<PathBuf>,
    pub languages: Vec<String>,
}

/// Writes a config template. Refuses to overwrite an existing file.
pub fn run_init_command(options: InitOptions) -> Result<(), String> {
    if options.config_path.exists() {
        return Err(format!(
            "{} already exists, edit it instead",
            options.config_path.display()
        ));
    }
    let root = match options.config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let source = match options.source {
        Some(source) => source,
        None => find_source_arb(&root)?,
    };
    let source_on_disk = if source.is_absolute() { source.clone() } else { root.join(&source) };
    if !source_on_disk.is_file() {
        return Err(format!("Source ARB file does not exist: {}", source.display()));
    }

    let file_name = source
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    let prefix = file_name.starts_with(DEFAULT_PREFIX).then(|| DEFAULT_PREFIX.to_string());
    let layout = ArbLayout::new(&source_on_disk).with_prefix(prefix.clone());
    let source_language = layout.source_language().map_err(|e| e.to_string())?;

    let languages = if options.languages.is_empty() {
        sibling_languages(&layout, source_language.language_code)
    } else {
        for code in &options.languages {
            language_by_code(code).map_err(|e| e.to_string())?;
        }
        options.languages
    };

    let text = render_template(&source, prefix.as_deref(), &languages);
    std::fs::write(&options.config_path, text).map_err(|e| format!("Failed to write config: {}", e))?;
    println!("✅ Wrote {}", options.config_path.display());
    if languages.is_empty() {
        println!("   Add target languages to `target_language_codes` before translating.");
    }
    Ok(())
}

fn render_template(source: &Path, prefix: Option<&str>, languages: &[String]) -> String {
    let quoted: Vec<String> = languages.iter().map(|l| format!("\"{}\"", l)).collect();
    let mut text = String::new();
    text.push_str("# arbsync configuration\n");
    text.push_str(&format!(
        "source_arb_file_path = \"{}\"\n",
        source.display().to_string().replace('\\', "/")
    ));
    text.push_str(&format!("target_language_codes = [{}]\n", quoted.join(", ")));
    text.push_str("# Required for `arbsync translate --type paid`. GOOGLE_API_KEY takes precedence.\n");
    text.push_str("google_api_key = \"\"\n");
    match prefix {
        Some(prefix) => text.push_str(&format!("arb_file_prefix = \"{}\"\n", prefix)),
        None => text.push_str("# arb_file_prefix = \"intl_\"\n"),
    }
    text.push_str(&format!("# history_path = \"{}\"\n", DEFAULT_HISTORY_PATH));
    text.push_str(&format!("# cache_path = \"{}\"\n", DEFAULT_CACHE_PATH));
    text.push_str("\n# File names for languages that do not follow `{prefix}{code}.arb`.\n");
    text.push_str("[custom_arb_file_names]\n");
    text.push_str("# zh_CN = \"intl_zh_hans\"\n");
    text
}

/// Finds the only `.arb` candidate under `root`, skipping hidden and build directories.
fn find_source_arb(root: &Path) -> Result<PathBuf, String> {
    let mut found = Vec::new();
    collect_arb_files(root, &mut found).map_err(|e| format!("Failed to search for ARB files: {}", e))?;
    found.sort();

    let english: Vec<_> = found
        .iter()
        .filter(|p| {
            let name = p.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            name == "en.arb" || name == "intl_en.arb" || name == "app_en.arb"
        })
        .cloned()
        .collect();
    let candidates = if english.is_empty() { found } else { english };

    match candidates.as_slice() {
        [] => Err("No ARB file found. Pass --source <path>".to_string()),
        [single] => Ok(single.strip_prefix(root).unwrap_or(single).to_path_buf()),
        many => Err(format!(
            "Several ARB files found, pass --source with one of:\n{}",
            many.iter()
                .map(|p| format!("  {}", p.display()))
                .collect::<Vec<_>>()
                .join("\n")
        )),
    }
}

fn collect_arb_files(dir: &Path, found: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        if path.is_dir() {
            if name.starts_with('.') || matches!(name, "build" | "target" | "node_modules") {
                continue;
            }
            collect_arb_files(&path, found)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some("arb") {
            found.push(path);
        }
    }
    Ok(())
}

/// Language codes of the ARB files next to the source, source excluded.
fn sibling_languages(layout: &ArbLayout, source_code: &str) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(layout.directory()) else {
        return Vec::new();
    };
    let mut codes: Vec<String> = entries
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("arb"))
        .filter_map(|p| layout.language_code_for_path(&p).ok())
        .filter(|code| code != source_code)
        .collect();
    codes.sort();
    codes
}
