//! Placeholder protection for machine translation.
//!
//! Providers mangle ICU placeholders such as `{name}`: they translate the
//! name, reorder braces or add spaces. Before a string is sent out, every
//! `{...}` is swapped for a glyph the provider leaves alone, and after the
//! response comes back the glyphs are swapped back.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::Error;

lazy_static! {
    /// Non-greedy `{...}` with at least one character inside.
    pub(crate) static ref PLACEHOLDER_REGEX: Regex = Regex::new(r"\{(.+?)\}").unwrap();
}

/// Glyphs substituted for placeholders, in order of appearance.
pub const PLACEHOLDER_GLYPHS: [&str; 11] = [
    "0️⃣", "1️⃣", "2️⃣", "3️⃣", "4️⃣", "5️⃣", "6️⃣", "7️⃣", "8️⃣", "9️⃣", "🔟",
];

/// Escaped apostrophes the provider puts in place of `'`.
///
/// Other entities are left for the validator, which reports them as
/// undecoded and can repair them in place.
const ENTITY_ARTIFACTS: [(&str, &str); 2] = [("&#39;", "'"), ("&#x27;", "'")];

/// Result of [`encode`]: the text to send and how to restore it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Encoded {
    /// Glyph → original placeholder text, in order of appearance.
    pub dictionary: Vec<(&'static str, String)>,
    pub text: String,
}

/// Number of `{...}` placeholders in `value`.
pub fn count_params(value: &str) -> usize {
    PLACEHOLDER_REGEX.find_iter(value).count()
}

/// Replaces the Nth placeholder of `text` with the Nth glyph.
///
/// Fails with [`Error::PlaceholderLimit`] when `text` has more placeholders
/// than there are glyphs.
pub fn encode(text: &str) -> Result<Encoded, Error> {
    let found = count_params(text);
    if found > PLACEHOLDER_GLYPHS.len() {
        return Err(Error::PlaceholderLimit {
            max: PLACEHOLDER_GLYPHS.len(),
            found,
        });
    }

    let mut dictionary = Vec::with_capacity(found);
    let mut encoded = String::with_capacity(text.len());
    let mut last = 0;
    for (glyph, m) in PLACEHOLDER_GLYPHS.iter().zip(PLACEHOLDER_REGEX.find_iter(text)) {
        encoded.push_str(&text[last..m.start()]);
        encoded.push_str(glyph);
        dictionary.push((*glyph, m.as_str().to_string()));
        last = m.end();
    }
    encoded.push_str(&text[last..]);

    Ok(Encoded {
        dictionary,
        text: encoded,
    })
}

/// Restores placeholders in a translated string and turns escaped
/// apostrophes back into `'`.
///
/// `decode(&encode(text)?.dictionary, &encode(text)?.text)` gives back `text`
/// unless `text` already holds a glyph or an escaped apostrophe.
pub fn decode(dictionary: &[(&'static str, String)], translated: &str) -> String {
    let mut decoded = translated.to_string();
    for (glyph, original) in dictionary {
        decoded = decoded.replace(glyph, original);
    }
    for (artifact, literal) in ENTITY_ARTIFACTS {
        decoded = decoded.replace(artifact, literal);
    }
    decoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_replaces_in_order() {
        let encoded = encode("Hi {name}, you have {count} items").unwrap();
        assert_eq!(encoded.text, "Hi 0️⃣, you have 1️⃣ items");
        assert_eq!(
            encoded.dictionary,
            vec![("0️⃣", "{name}".to_string()), ("1️⃣", "{count}".to_string())]
        );
    }

    #[test]
    fn test_round_trip_with_identity_provider() {
        let text = "Hi {name}, you have {count} items";
        let encoded = encode(text).unwrap();
        assert_eq!(decode(&encoded.dictionary, &encoded.text), text);
    }

    #[test]
    fn test_decode_handles_reordered_glyphs() {
        let encoded = encode("{a} then {b}").unwrap();
        assert_eq!(decode(&encoded.dictionary, "1️⃣ puis 0️⃣"), "{b} puis {a}");
    }

    #[test]
    fn test_empty_braces_are_not_placeholders() {
        assert_eq!(count_params("{} and {x}"), 1);
        let encoded = encode("{}").unwrap();
        assert!(encoded.dictionary.is_empty());
        assert_eq!(encoded.text, "{}");
    }

    #[test]
    fn test_non_greedy_matching() {
        assert_eq!(count_params("{a}{b}{c}"), 3);
        assert_eq!(count_params("{count, plural, one{1} other{{count}}}"), 2);
    }

    #[test]
    fn test_limit_is_enforced() {
        let eleven: String = (0..11).map(|i| format!("{{p{}}} ", i)).collect();
        assert!(encode(&eleven).is_ok());

        let twelve: String = (0..12).map(|i| format!("{{p{}}} ", i)).collect();
        match encode(&twelve) {
            Err(Error::PlaceholderLimit { max, found }) => {
                assert_eq!(max, 11);
                assert_eq!(found, 12);
            }
            other => panic!("expected placeholder limit error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_restores_escaped_apostrophes() {
        let encoded = encode("It's {name}").unwrap();
        assert_eq!(decode(&encoded.dictionary, "C&#39;est 0️⃣"), "C'est {name}");
        assert_eq!(decode(&encoded.dictionary, "C&#x27;est 0️⃣"), "C'est {name}");
    }

    #[test]
    fn test_other_entities_survive_round_trip() {
        let text = "Tom &amp; {name} say &quot;hi&quot;";
        let encoded = encode(text).unwrap();
        assert_eq!(decode(&encoded.dictionary, &encoded.text), text);
    }

    #[test]
    fn test_text_without_placeholders_is_untouched() {
        let encoded = encode("Hello").unwrap();
        assert_eq!(encoded.text, "Hello");
        assert_eq!(decode(&encoded.dictionary, "Hello"), "Hello");
    }
}
