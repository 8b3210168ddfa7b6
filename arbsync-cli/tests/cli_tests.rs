use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn arbsync_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("arbsync"));
    cmd.current_dir(dir).env_remove("GOOGLE_API_KEY").env_remove("RUST_LOG");
    cmd
}

fn run(dir: &Path, args: &[&str]) -> Output {
    arbsync_cmd(dir).args(args).output().expect("Failed to execute command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "Command failed: {}",
        stderr(output)
    );
}

const SOURCE: &str = r#"{
  "@@locale": "en",
  "greeting": "Hello {name}",
  "@greeting": {"placeholders": {"name": {}}},
  "farewell": "Bye"
}"#;

const CONFIG: &str = r#"source_arb_file_path = "l10n/intl_en.arb"
target_language_codes = ["fr", "ko"]
arb_file_prefix = "intl_"
"#;

/// A project with `l10n/intl_en.arb`, a French target and a config.
fn project(fr: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("l10n")).unwrap();
    fs::write(dir.path().join("l10n/intl_en.arb"), SOURCE).unwrap();
    fs::write(dir.path().join("l10n/intl_fr.arb"), fr).unwrap();
    fs::write(dir.path().join("arbsync.toml"), CONFIG).unwrap();
    dir
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

const FULL_FR: &str = r#"{
  "@@locale": "fr",
  "greeting": "Bonjour {name}",
  "farewell": "Au revoir"
}"#;

#[test]
fn test_missing_config_fails() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["preview"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("configuration not found"));
}

#[test]
fn test_init_detects_source_and_languages() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("l10n")).unwrap();
    fs::write(dir.path().join("l10n/intl_en.arb"), SOURCE).unwrap();
    fs::write(dir.path().join("l10n/intl_fr.arb"), FULL_FR).unwrap();

    let output = run(dir.path(), &["init"]);
    assert_success(&output);

    let config = fs::read_to_string(dir.path().join("arbsync.toml")).unwrap();
    assert!(config.contains("source_arb_file_path = \"l10n/intl_en.arb\""));
    assert!(config.contains("target_language_codes = [\"fr\"]"));
    assert!(config.contains("arb_file_prefix = \"intl_\""));

    let again = run(dir.path(), &["init"]);
    assert!(!again.status.success());
    assert!(stderr(&again).contains("already exists"));
}

#[test]
fn test_preview_json_does_not_create_history() {
    let dir = project(
        r#"{
  "@@locale": "fr",
  "greeting": "Bonjour {name}"
}"#,
    );
    let output = run(dir.path(), &["preview", "--json"]);
    assert_success(&output);

    let body: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let languages = body["languages"].as_array().unwrap();
    assert_eq!(languages.len(), 2);

    let fr = &languages[0];
    assert_eq!(fr["language_code"], "fr");
    assert_eq!(fr["action"]["create"], 1);
    assert_eq!(fr["action"]["update"], 1);
    assert_eq!(fr["translation_required"], true);

    let ko = &languages[1];
    assert_eq!(ko["language_code"], "ko");
    assert_eq!(ko["action"]["create"], 2);

    assert!(!dir.path().join(".arbsync/history.json").exists());
    assert!(!dir.path().join("l10n/intl_ko.arb").exists());
}

#[test]
fn test_exclude_then_translate_only_required() {
    let dir = project(FULL_FR);

    let listing = run(dir.path(), &["exclude"]);
    assert_success(&listing);
    assert!(stdout(&listing).contains("greeting: Hello {name} (new)"));
    assert!(stdout(&listing).contains("farewell: Bye (new)"));

    let excluded = run(dir.path(), &["exclude", "--all"]);
    assert_success(&excluded);
    assert!(stdout(&excluded).contains("2 items excluded"));

    let history = read_json(&dir.path().join(".arbsync/history.json"));
    assert_eq!(history["data"]["greeting"], "Hello {name}");

    let preview = run(dir.path(), &["preview", "--lang", "fr"]);
    assert_success(&preview);
    assert!(stdout(&preview).contains("intl_fr.arb: No changes"));

    let translate = run(dir.path(), &["translate", "--lang", "fr", "--only-required"]);
    assert_success(&translate);
    assert!(stdout(&translate).contains("All target languages are up to date."));
}

#[test]
fn test_exclude_unknown_key_fails() {
    let dir = project(FULL_FR);
    let output = run(dir.path(), &["exclude", "--key", "missing"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("does not exist"));
}

#[test]
fn test_paid_translation_requires_api_key() {
    let dir = project(FULL_FR);
    let output = run(dir.path(), &["translate", "--type", "paid"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("API key"));

    assert!(!dir.path().join(".arbsync/history.json").exists());
    assert!(!dir.path().join("l10n/intl_ko.arb").exists());
}

#[test]
fn test_unknown_language_is_rejected() {
    let dir = project(FULL_FR);
    let output = run(dir.path(), &["preview", "--lang", "xx"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("invalid language code"));
}

#[test]
fn test_validate_and_decode_entities() {
    let dir = project(
        r#"{
  "@@locale": "fr",
  "greeting": "Bonjour {nom",
  "farewell": "Au revoir &amp; merci"
}"#,
    );

    let output = run(dir.path(), &["validate", "--json"]);
    assert_success(&output);
    let body: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(body["files_checked"], 1);
    let findings = body["findings"].as_array().unwrap();
    let kinds: Vec<_> = findings
        .iter()
        .map(|f| (f["key"].as_str().unwrap(), f["invalid_type"].as_str().unwrap()))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("greeting", "invalid_parameter_count"),
            ("farewell", "undecoded_entity_exists"),
        ]
    );

    let strict = run(dir.path(), &["validate", "--strict"]);
    assert!(!strict.status.success());
    assert!(stderr(&strict).contains("2 problems found"));

    let decode = run(dir.path(), &["decode-entities"]);
    assert_success(&decode);
    let fr = read_json(&dir.path().join("l10n/intl_fr.arb"));
    assert_eq!(fr["farewell"], "Au revoir & merci");

    let after = run(dir.path(), &["validate", "--json"]);
    let body: serde_json::Value = serde_json::from_str(&stdout(&after)).unwrap();
    assert_eq!(body["findings"].as_array().unwrap().len(), 1);
}

#[test]
fn test_create_cache_from_existing_translations() {
    let dir = project(FULL_FR);
    let output = run(dir.path(), &["create-cache"]);
    assert_success(&output);
    assert!(stdout(&output).contains("from 1 files"));

    let cache = fs::read_to_string(dir.path().join(".arbsync/cache.json")).unwrap();
    assert!(cache.contains("Bonjour {name}"));
    assert!(cache.contains("Au revoir"));
}

#[test]
fn test_rename_and_delete_keys() {
    let dir = project(FULL_FR);

    let rename = run(
        dir.path(),
        &["rename-keys", "--old", "greeting", "--new", "welcome"],
    );
    assert_success(&rename);
    for file in ["l10n/intl_en.arb", "l10n/intl_fr.arb"] {
        let json = read_json(&dir.path().join(file));
        assert!(json.get("welcome").is_some(), "{} was not renamed", file);
        assert!(json.get("greeting").is_none());
    }

    let delete = run(dir.path(), &["delete-keys", "farewell"]);
    assert_success(&delete);
    for file in ["l10n/intl_en.arb", "l10n/intl_fr.arb"] {
        let json = read_json(&dir.path().join(file));
        assert!(json.get("farewell").is_none(), "{} still has farewell", file);
    }

    let locale = run(dir.path(), &["delete-keys", "@@locale"]);
    assert!(!locale.status.success());
}

#[test]
fn test_rename_onto_existing_key_is_rejected() {
    let dir = project(FULL_FR);
    let output = run(
        dir.path(),
        &["rename-keys", "--old", "greeting", "--new", "farewell"],
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("key 'farewell' already exists"));

    for file in ["l10n/intl_en.arb", "l10n/intl_fr.arb"] {
        let json = read_json(&dir.path().join(file));
        assert!(json.get("greeting").is_some(), "{} was modified", file);
        assert!(json.get("farewell").is_some(), "{} was modified", file);
    }
}

#[test]
fn test_rename_missing_key_is_rejected() {
    let dir = project(FULL_FR);
    let output = run(
        dir.path(),
        &["rename-keys", "--old", "missing", "--new", "welcome"],
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("key 'missing' does not exist"));
    assert!(!dir.path().join(".arbsync/history.json").exists());
}
