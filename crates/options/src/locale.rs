use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::error::{OptionsResult, UnsupportedLocaleSnafu};

/// Locale used when a requested tag cannot be resolved.
pub const DEFAULT_LOCALE: &str = "en";

/// Locales for which the element ships an actual translation file.
pub const TRANSLATED_LOCALES: &[&str] = &[
    "am", "ar", "bg-BG", "bn-BD", "bs-BA", "ca-ES", "cs-CZ", "da-DK", "de-DE", "el-GR", "es-419",
    "es-ES", "et-EE", "fi-FI", "fr-CA", "fr-FR", "gu-IN", "hi-IN", "hr-HR", "hu-HU", "hy-AM",
    "id-ID", "is-IS", "it-IT", "ja-JP", "ka-GE", "kk", "kn-IN", "ko-KR", "lt", "lv-LV", "mk-MK",
    "ml", "mn", "mr-IN", "ms-MY", "my-MM", "nb-NO", "nl-NL", "pa", "pl-PL", "pt-BR", "pt-PT",
    "ro-RO", "ru-RU", "sk-SK", "sl-SI", "so-SO", "sq-AL", "sr-RS", "sv-SE", "sw-TZ", "ta-IN",
    "te-IN", "th-TH", "tl", "tr-TR", "uk-UA", "ur", "vi-VN", "zh-CN", "zh-HK", "zh-TW",
];

// Bare language codes accepted on input and resolved to a translated locale.
const LANGUAGE_ALIASES: &[(&str, &str)] = &[
    ("bg", "bg-BG"),
    ("bn", "bn-BD"),
    ("bs", "bs-BA"),
    ("ca", "ca-ES"),
    ("cs", "cs-CZ"),
    ("da", "da-DK"),
    ("de", "de-DE"),
    ("el", "el-GR"),
    ("es", "es-ES"),
    ("et", "et-EE"),
    ("fi", "fi-FI"),
    ("fr", "fr-FR"),
    ("gu", "gu-IN"),
    ("hi", "hi-IN"),
    ("hr", "hr-HR"),
    ("hu", "hu-HU"),
    ("hy", "hy-AM"),
    ("id", "id-ID"),
    ("is", "is-IS"),
    ("it", "it-IT"),
    ("ja", "ja-JP"),
    ("ka", "ka-GE"),
    ("kn", "kn-IN"),
    ("ko", "ko-KR"),
    ("lv", "lv-LV"),
    ("mk", "mk-MK"),
    ("mr", "mr-IN"),
    ("ms", "ms-MY"),
    ("my", "my-MM"),
    ("nb", "nb-NO"),
    ("nl", "nl-NL"),
    ("pl", "pl-PL"),
    ("pt", "pt-PT"),
    ("ro", "ro-RO"),
    ("ru", "ru-RU"),
    ("sk", "sk-SK"),
    ("sl", "sl-SI"),
    ("so", "so-SO"),
    ("sq", "sq-AL"),
    ("sr", "sr-RS"),
    ("sv", "sv-SE"),
    ("sw", "sw-TZ"),
    ("ta", "ta-IN"),
    ("te", "te-IN"),
    ("th", "th-TH"),
    ("tr", "tr-TR"),
    ("uk", "uk-UA"),
    ("vi", "vi-VN"),
    ("zh", "zh-CN"),
    ("zh-Hant", "zh-TW"),
];

/// Validated UI locale tag.
///
/// Accepts every translated locale plus the bare language codes the element
/// resolves to one, plus `en`. Unknown tags are rejected at parse time; the
/// runtime fallback for anything that slips through is English.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    pub fn parse(raw: &str) -> OptionsResult<Self> {
        let tag = raw.trim();
        if Self::is_supported(tag) {
            Ok(Self(tag.to_string()))
        } else {
            UnsupportedLocaleSnafu {
                stage: "parse-locale",
                raw: raw.to_string(),
            }
            .fail()
        }
    }

    pub fn is_supported(tag: &str) -> bool {
        tag == DEFAULT_LOCALE
            || TRANSLATED_LOCALES.contains(&tag)
            || LANGUAGE_ALIASES.iter().any(|(alias, _)| *alias == tag)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolves this tag to the translated locale the element will load.
    ///
    /// Exact translated tags resolve to themselves; bare language codes map
    /// onto their translated counterpart; everything else lands on English.
    pub fn resolve_translated(&self) -> &'static str {
        if let Some(exact) = TRANSLATED_LOCALES.iter().find(|tag| **tag == self.0) {
            return exact;
        }
        if let Some((_, target)) = LANGUAGE_ALIASES.iter().find(|(alias, _)| *alias == self.0) {
            return target;
        }
        DEFAULT_LOCALE
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for Locale {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Locale::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_translated_tag_resolves_to_itself() {
        let locale = Locale::parse("fr-CA").unwrap();
        assert_eq!(locale.resolve_translated(), "fr-CA");
    }

    #[test]
    fn bare_language_code_resolves_to_translated_locale() {
        let locale = Locale::parse("fr").unwrap();
        assert_eq!(locale.resolve_translated(), "fr-FR");

        let locale = Locale::parse("zh-Hant").unwrap();
        assert_eq!(locale.resolve_translated(), "zh-TW");
    }

    #[test]
    fn english_is_supported_without_a_translation_file() {
        let locale = Locale::parse("en").unwrap();
        assert_eq!(locale.resolve_translated(), DEFAULT_LOCALE);
    }

    #[test]
    fn unknown_tag_is_rejected() {
        assert!(Locale::parse("tlh").is_err());
        assert!(Locale::parse("").is_err());
    }

    #[test]
    fn every_alias_targets_a_translated_locale() {
        for (alias, target) in LANGUAGE_ALIASES {
            assert!(
                TRANSLATED_LOCALES.contains(target),
                "alias '{alias}' points at unknown locale '{target}'"
            );
        }
    }
}
