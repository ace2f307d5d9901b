//! Internationalization (i18n) support for multilingual API records.
//!
//! # Architecture
//!
//! - `iso639`: The embedded ISO 639-2 code table
//! - `registry`: Language tag validation and canonical code forms
//! - `locale`: The per-request (current, default) locale preference
//! - `lang_map`: Language map detection and locale-based resolution
//!
//! # Example
//!
//! ```rust,ignore
//! use europeana_catalog::i18n::{localize, LocalePreference};
//!
//! let prefs = LocalePreference::new("fr", "en");
//! let value = serde_json::json!({ "def": ["Image"], "en": ["Picture"] });
//!
//! assert_eq!(localize(&value, &prefs), serde_json::json!(["Picture"]));
//! ```

mod iso639;
pub mod lang_map;
mod locale;
mod registry;

pub use iso639::Iso639Entry;
pub use lang_map::{is_lang_map, localize};
pub use locale::LocalePreference;
pub use registry::{
    primary_subtag, CanonicalForms, LanguageRegistry, DEPRECATED_ISO_LANG_CODES,
    NON_ISO_LANG_CODES,
};
