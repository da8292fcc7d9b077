//! Translation dictionaries for labels, plan templates and user messages.
//!
//! Each supported language ships as a nested JSON tree embedded in the
//! binary at compile time. Keys are dotted paths (`labels.venue.indoor`).
//! A lookup miss never fails: the raw key is returned so the caller still
//! has something to display.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// Display language for labels, templates and messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Zh,
    En,
}

impl Language {
    /// All supported languages, default first.
    pub const ALL: [Language; 2] = [Language::Zh, Language::En];

    /// Short language code (`zh`, `en`).
    pub fn code(self) -> &'static str {
        match self {
            Self::Zh => "zh",
            Self::En => "en",
        }
    }

    /// Parse a code, falling back to the default language when it is not
    /// recognised.
    pub fn from_code_lossy(code: &str) -> Self {
        code.parse().unwrap_or_else(|err: LanguageParseError| {
            tracing::debug!("{err}; using {}", Language::default());
            Language::default()
        })
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = LanguageParseError;

    /// Accepts bare codes and region-tagged ones (`zh-CN`, `en_US`),
    /// case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let primary = s
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "zh" => Ok(Self::Zh),
            "en" => Ok(Self::En),
            _ => Err(LanguageParseError(s.to_owned())),
        }
    }
}

/// Error returned when parsing an unsupported language code.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unsupported language: {0:?} (expected zh or en)")]
pub struct LanguageParseError(pub String);

// ---------------------------------------------------------------------------
// Embedded dictionaries
// ---------------------------------------------------------------------------

static ZH_JSON: &str = include_str!("zh.json");
static EN_JSON: &str = include_str!("en.json");

static ZH_TREE: OnceLock<Value> = OnceLock::new();
static EN_TREE: OnceLock<Value> = OnceLock::new();

/// Parse an embedded dictionary once and cache it for the process lifetime.
///
/// # Panics
///
/// Panics if the embedded JSON is malformed. The files are compiled into the
/// binary, so a successful build with passing tests means they are valid.
fn tree_for(language: Language) -> &'static Value {
    let (cell, raw) = match language {
        Language::Zh => (&ZH_TREE, ZH_JSON),
        Language::En => (&EN_TREE, EN_JSON),
    };
    cell.get_or_init(|| {
        serde_json::from_str(raw)
            .unwrap_or_else(|e| panic!("embedded {language}.json is invalid: {e}"))
    })
}

// ---------------------------------------------------------------------------
// Dictionary
// ---------------------------------------------------------------------------

/// A resolved translation tree for one language.
#[derive(Debug, Clone, Copy)]
pub struct Dictionary {
    language: Language,
    tree: &'static Value,
}

impl Dictionary {
    /// Load the dictionary for `language`.
    pub fn load(language: Language) -> Self {
        Self {
            language,
            tree: tree_for(language),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Resolve a dotted key to the raw JSON node, if present.
    pub fn lookup(&self, key: &str) -> Option<&'static Value> {
        key.split('.')
            .try_fold(self.tree, |node, segment| node.get(segment))
    }

    /// Resolve a dotted key to a display string.
    ///
    /// A miss (or a non-string node) returns the key itself.
    pub fn text(&self, key: &str) -> String {
        match self.lookup(key).and_then(Value::as_str) {
            Some(s) => s.to_owned(),
            None => {
                tracing::debug!(language = %self.language, key, "translation key missing");
                key.to_owned()
            }
        }
    }

    /// Like [`Dictionary::text`] but returns `None` on a miss.
    pub fn try_text(&self, key: &str) -> Option<&'static str> {
        self.lookup(key).and_then(Value::as_str)
    }

    /// Resolve a dotted key to a list of strings. Empty on a miss.
    pub fn list(&self, key: &str) -> Vec<String> {
        match self.lookup(key).and_then(Value::as_array) {
            Some(items) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect(),
            None => {
                tracing::debug!(language = %self.language, key, "translation list missing");
                Vec::new()
            }
        }
    }

    /// Resolve `key` and substitute `{name}` placeholders from `args`.
    pub fn format(&self, key: &str, args: &[(&str, &str)]) -> String {
        interpolate(&self.text(key), args)
    }
}

/// Replace every `{name}` in `template` with the matching value in `args`.
///
/// Placeholders without a matching argument are left untouched.
pub fn interpolate(template: &str, args: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let name = &after[..close];
                match args.iter().find(|(k, _)| *k == name) {
                    Some((_, value)) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
