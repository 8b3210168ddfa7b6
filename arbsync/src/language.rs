//! Supported languages and the mapping between ARB file names and language codes.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::{error::Error, types::file_name_of};

const ARB_EXTENSION: &str = ".arb";

/// A language the translation provider supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Language {
    /// Code passed to the provider (e.g. `zh-CN`, `iw`).
    pub provider_code: &'static str,
    /// Human readable name.
    pub name: &'static str,
    /// Code used in ARB file names and `@@locale` (e.g. `zh_CN`, `he`).
    pub language_code: &'static str,
}

const fn lang(provider_code: &'static str, name: &'static str, language_code: &'static str) -> Language {
    Language {
        provider_code,
        name,
        language_code,
    }
}

pub const SUPPORTED_LANGUAGES: &[Language] = &[
    lang("af", "Afrikaans", "af"),
    lang("sq", "Albanian", "sq"),
    lang("am", "Amharic", "am"),
    lang("ar", "Arabic", "ar"),
    lang("hy", "Armenian", "hy"),
    lang("as", "Assamese", "as"),
    lang("ay", "Aymara", "ay"),
    lang("az", "Azerbaijani", "az"),
    lang("bm", "Bambara", "bm"),
    lang("eu", "Basque", "eu"),
    lang("be", "Belarusian", "be"),
    lang("bn", "Bengali", "bn"),
    lang("bho", "Bhojpuri", "bho"),
    lang("bs", "Bosnian", "bs"),
    lang("bg", "Bulgarian", "bg"),
    lang("ca", "Catalan", "ca"),
    lang("ceb", "Cebuano", "ceb"),
    lang("zh-CN", "Chinese Simplified", "zh_CN"),
    lang("zh-TW", "Chinese Traditional", "zh_TW"),
    lang("co", "Corsican", "co"),
    lang("hr", "Croatian", "hr"),
    lang("cs", "Czech", "cs"),
    lang("da", "Danish", "da"),
    lang("dv", "Dhivehi", "dv"),
    lang("doi", "Dogri", "doi"),
    lang("nl", "Dutch", "nl"),
    lang("en", "English", "en"),
    lang("eo", "Esperanto", "eo"),
    lang("et", "Estonian", "et"),
    lang("ee", "Ewe", "ee"),
    lang("fi", "Finnish", "fi"),
    lang("fr", "French", "fr"),
    lang("fy", "Frisian", "fy"),
    lang("gl", "Galician", "gl"),
    lang("ka", "Georgian", "ka"),
    lang("de", "German", "de"),
    lang("el", "Greek", "el"),
    lang("gn", "Guarani", "gn"),
    lang("gu", "Gujarati", "gu"),
    lang("ht", "Haitian Creole", "ht"),
    lang("ha", "Hausa", "ha"),
    lang("haw", "Hawaiian", "haw"),
    lang("iw", "Hebrew", "he"),
    lang("hi", "Hindi", "hi"),
    lang("hmn", "Hmong", "hmn"),
    lang("hu", "Hungarian", "hu"),
    lang("is", "Icelandic", "is"),
    lang("ig", "Igbo", "ig"),
    lang("ilo", "Ilocano", "ilo"),
    lang("id", "Indonesian", "id"),
    lang("ga", "Irish", "ga"),
    lang("it", "Italian", "it"),
    lang("ja", "Japanese", "ja"),
    lang("jw", "Javanese", "jw"),
    lang("kn", "Kannada", "kn"),
    lang("kk", "Kazakh", "kk"),
    lang("km", "Khmer", "km"),
    lang("rw", "Kinyarwanda", "rw"),
    lang("gom", "Konkani", "gom"),
    lang("ko", "Korean", "ko"),
    lang("kri", "Krio", "kri"),
    lang("ku", "Kurdish", "ku"),
    lang("ckb", "Kurdish", "ckb"),
    lang("ky", "Kyrgyz", "ky"),
    lang("lo", "Lao", "lo"),
    lang("la", "Latin", "la"),
    lang("lv", "Latvian", "lv"),
    lang("ln", "Lingala", "ln"),
    lang("lt", "Lithuanian", "lt"),
    lang("lg", "Luganda", "lg"),
    lang("lb", "Luxembourgish", "lb"),
    lang("mk", "Macedonian", "mk"),
    lang("mai", "Maithili", "mai"),
    lang("mg", "Malagasy", "mg"),
    lang("ms", "Malay", "ms"),
    lang("ml", "Malayalam", "ml"),
    lang("mt", "Maltese", "mt"),
    lang("mi", "Maori", "mi"),
    lang("mr", "Marathi", "mr"),
    lang("mni-Mtei", "Meiteilon", "mni"),
    lang("lus", "Mizo", "lus"),
    lang("mn", "Mongolian", "mn"),
    lang("my", "Myanmar", "my"),
    lang("ne", "Nepali", "ne"),
    lang("no", "Norwegian", "no"),
    lang("ny", "Nyanja", "ny"),
    lang("or", "Odia", "or"),
    lang("om", "Oromo", "om"),
    lang("ps", "Pashto", "ps"),
    lang("fa", "Persian", "fa"),
    lang("pl", "Polish", "pl"),
    lang("pt", "Portuguese", "pt"),
    lang("pa", "Punjabi", "pa"),
    lang("qu", "Quechua", "qu"),
    lang("ro", "Romanian", "ro"),
    lang("ru", "Russian", "ru"),
    lang("sm", "Samoan", "sm"),
    lang("sa", "Sanskrit", "sa"),
    lang("gd", "Scots Gaelic", "gd"),
    lang("nso", "Sepedi", "nso"),
    lang("sr", "Serbian", "sr"),
    lang("st", "Sesotho", "st"),
    lang("sn", "Shona", "sn"),
    lang("sd", "Sindhi", "sd"),
    lang("si", "Sinhala", "si"),
    lang("sk", "Slovak", "sk"),
    lang("sl", "Slovenian", "sl"),
    lang("so", "Somali", "so"),
    lang("es", "Spanish", "es"),
    lang("su", "Sundanese", "su"),
    lang("sw", "Swahili", "sw"),
    lang("sv", "Swedish", "sv"),
    lang("tl", "Tagalog", "tl"),
    lang("tg", "Tajik", "tg"),
    lang("ta", "Tamil", "ta"),
    lang("tt", "Tatar", "tt"),
    lang("te", "Telugu", "te"),
    lang("th", "Thai", "th"),
    lang("ti", "Tigrinya", "ti"),
    lang("ts", "Tsonga", "ts"),
    lang("tr", "Turkish", "tr"),
    lang("tk", "Turkmen", "tk"),
    lang("ak", "Twi", "ak"),
    lang("uk", "Ukrainian", "uk"),
    lang("ur", "Urdu", "ur"),
    lang("ug", "Uyghur", "ug"),
    lang("uz", "Uzbek", "uz"),
    lang("vi", "Vietnamese", "vi"),
    lang("cy", "Welsh", "cy"),
    lang("xh", "Xhosa", "xh"),
    lang("yi", "Yiddish", "yi"),
    lang("yo", "Yoruba", "yo"),
    lang("zu", "Zulu", "zu"),
];

/// Looks up a supported language by its ARB language code.
pub fn language_by_code(language_code: &str) -> Result<&'static Language, Error> {
    SUPPORTED_LANGUAGES
        .iter()
        .find(|l| l.language_code == language_code)
        .ok_or_else(|| Error::InvalidLanguageCode(language_code.to_string()))
}

/// How ARB files are named next to the source file.
///
/// File names are `{prefix}{language_code}.arb` unless a custom file name is
/// configured for the language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArbLayout {
    pub source_path: PathBuf,
    pub prefix: Option<String>,
    /// Language code → file name (with or without the `.arb` extension).
    pub custom_file_names: IndexMap<String, String>,
}

impl ArbLayout {
    pub fn new(source_path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            prefix: None,
            custom_file_names: IndexMap::new(),
        }
    }

    pub fn with_prefix(mut self, prefix: Option<String>) -> Self {
        self.prefix = prefix.filter(|p| !p.is_empty());
        self
    }

    pub fn with_custom_file_names(mut self, names: IndexMap<String, String>) -> Self {
        self.custom_file_names = names;
        self
    }

    /// Directory holding every ARB file.
    pub fn directory(&self) -> &Path {
        self.source_path.parent().unwrap_or_else(|| Path::new(""))
    }

    pub fn source_language(&self) -> Result<&'static Language, Error> {
        self.language_for_path(&self.source_path)
    }

    pub fn language_for_path(&self, path: &Path) -> Result<&'static Language, Error> {
        let code = self.language_code_for_path(path)?;
        language_by_code(&code)
    }

    /// Resolves the language code of an ARB file from its name.
    pub fn language_code_for_path(&self, path: &Path) -> Result<String, Error> {
        let file_name = file_name_of(path);
        let stem = file_name.strip_suffix(ARB_EXTENSION).unwrap_or(&file_name);

        if let Some((code, _)) = self
            .custom_file_names
            .iter()
            .find(|(_, name)| name.strip_suffix(ARB_EXTENSION).unwrap_or(name) == stem)
        {
            return Ok(code.clone());
        }

        let code = match self.prefix.as_deref() {
            Some(prefix) => stem.strip_prefix(prefix),
            None => Some(stem),
        };
        match code {
            Some(code) if language_by_code(code).is_ok() => Ok(code.to_string()),
            _ => Err(Error::InvalidArbFileName(path.display().to_string())),
        }
    }

    /// Path of the ARB file for `language_code`, next to the source file.
    pub fn path_for_language(&self, language_code: &str) -> Result<PathBuf, Error> {
        if let Some(name) = self.custom_file_names.get(language_code) {
            let file_name = if name.ends_with(ARB_EXTENSION) {
                name.clone()
            } else {
                format!("{}{}", name, ARB_EXTENSION)
            };
            return Ok(self.directory().join(file_name));
        }

        let language = language_by_code(language_code)?;
        let prefix = self.prefix.as_deref().unwrap_or_default();
        Ok(self
            .directory()
            .join(format!("{}{}{}", prefix, language.language_code, ARB_EXTENSION)))
    }
}
