use std::path::Path;

use arbsync::{LOCALE_KEY, language_by_code};

/// Validate file path exists and is a regular file
pub fn validate_file_path(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Err(format!("File does not exist: {}", path.display()));
    }

    if !path.is_file() {
        return Err(format!("Path is not a file: {}", path.display()));
    }

    Ok(())
}

/// Validate that a file name ends with `.arb`
pub fn validate_arb_path(path: &Path) -> Result<(), String> {
    validate_file_path(path)?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("arb") => Ok(()),
        _ => Err(format!("Not an ARB file: {}", path.display())),
    }
}

/// Validate a language code against the supported language catalog
pub fn validate_language_code(lang: &str) -> Result<(), String> {
    if lang.is_empty() {
        return Err("Language code cannot be empty".to_string());
    }
    language_by_code(lang).map(|_| ()).map_err(|e| e.to_string())
}

/// Validate a list of keys given on the command line
pub fn validate_keys(keys: &[String]) -> Result<(), String> {
    if keys.is_empty() {
        return Err("At least one key is required".to_string());
    }
    for key in keys {
        if key.trim().is_empty() {
            return Err("Keys cannot be empty".to_string());
        }
        if key == LOCALE_KEY {
            return Err(format!("{} cannot be renamed or deleted", LOCALE_KEY));
        }
    }
    Ok(())
}

/// Validate the two lists of `rename-keys`
pub fn validate_rename_keys(old_keys: &[String], new_keys: &[String]) -> Result<(), String> {
    validate_keys(old_keys)?;
    validate_keys(new_keys)?;
    if old_keys.len() != new_keys.len() {
        return Err(format!(
            "--old has {} keys but --new has {}",
            old_keys.len(),
            new_keys.len()
        ));
    }
    if let Some(duplicate) = new_keys
        .iter()
        .enumerate()
        .find(|(i, key)| new_keys[..*i].contains(key))
        .map(|(_, key)| key)
    {
        return Err(format!("Duplicate new key: {}", duplicate));
    }
    Ok(())
}
