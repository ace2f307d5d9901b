//! Language registry: ISO 639 lookups and language map key validation.
//!
//! The registry indexes the embedded ISO 639-2 table by every code it
//! carries. It uses a singleton pattern with `OnceLock` so the table is
//! parsed once, on first access, and shared read-only thereafter.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::i18n::iso639::{self, Iso639Entry};

/// Codes withdrawn from ISO 639 that still show up in API data.
///
/// See <https://www.loc.gov/standards/iso639-2/php/code_changes.php>
pub const DEPRECATED_ISO_LANG_CODES: [&str; 10] =
    ["in", "iw", "jaw", "ji", "jw", "mo", "mol", "scc", "scr", "sh"];

/// Language map keys that are not ISO codes.
///
/// `def` marks values of unknown language. The empty key works around
/// malformed upstream records.
pub const NON_ISO_LANG_CODES: [&str; 2] = ["def", ""];

/// Two- and three-letter forms of a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalForms {
    /// ISO 639-1 code, absent for languages without one
    pub alpha2: Option<&'static str>,

    /// ISO 639-2 bibliographic code
    pub alpha3: &'static str,
}

/// Global ISO 639 registry.
pub struct LanguageRegistry {
    entries: Vec<Iso639Entry>,
    by_alpha2: HashMap<&'static str, usize>,
    by_alpha3: HashMap<&'static str, usize>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry::from_entries(iso639::entries()))
    }

    fn from_entries(entries: Vec<Iso639Entry>) -> Self {
        let mut by_alpha2 = HashMap::new();
        let mut by_alpha3 = HashMap::new();

        for (index, entry) in entries.iter().enumerate() {
            by_alpha3.insert(entry.alpha3, index);
            if let Some(terminologic) = entry.alpha3_terminologic {
                by_alpha3.insert(terminologic, index);
            }
            if let Some(alpha2) = entry.alpha2 {
                by_alpha2.insert(alpha2, index);
            }
        }

        Self {
            entries,
            by_alpha2,
            by_alpha3,
        }
    }

    /// Find an ISO 639 entry by code.
    ///
    /// Two-letter codes are matched against ISO 639-1, three-letter codes
    /// against both the bibliographic and terminologic ISO 639-2 codes.
    /// Matching is case-insensitive. Any other length finds nothing.
    pub fn find(&self, code: &str) -> Option<&Iso639Entry> {
        let code = code.to_ascii_lowercase();
        let index = match code.len() {
            2 => self.by_alpha2.get(code.as_str()),
            3 => self.by_alpha3.get(code.as_str()),
            _ => None,
        }?;
        self.entries.get(*index)
    }

    /// Whether `tag` may appear as a key of a language map.
    ///
    /// The tag is lowercased. Language codes are matched on the primary
    /// subtag (before the first hyphen), so `en-GB` and `EN` are both known;
    /// the `def` and empty markers only match the whole tag.
    pub fn is_known_tag(&self, tag: &str) -> bool {
        let tag = tag.to_lowercase();
        let primary = primary_subtag(&tag);

        NON_ISO_LANG_CODES.contains(&tag.as_str())
            || DEPRECATED_ISO_LANG_CODES.contains(&primary)
            || self.find(primary).is_some()
    }

    /// The alpha-2 and alpha-3 forms of a primary subtag, if it is an ISO code.
    pub fn canonical_forms(&self, primary: &str) -> Option<CanonicalForms> {
        self.find(primary).map(|entry| CanonicalForms {
            alpha2: entry.alpha2,
            alpha3: entry.alpha3,
        })
    }

    /// Number of languages in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty (only if the embedded data is broken).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The part of a language tag before the first hyphen.
pub fn primary_subtag(tag: &str) -> &str {
    tag.split('-').next().unwrap_or(tag)
}
