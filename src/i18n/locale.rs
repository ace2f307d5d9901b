//! Locale preference: the (current, default) locale pair used to resolve
//! language maps.
//!
//! A preference is built per request by the caller and passed explicitly to
//! every resolving call. Nothing here is global.

use serde::{Deserialize, Serialize};

use crate::i18n::registry::primary_subtag;

/// The locales a language map should be resolved against, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalePreference {
    /// Locale requested for this call (e.g. "en", "en-GB")
    current: String,

    /// Locale to fall back to when the current one has no values
    default: String,
}

impl LocalePreference {
    /// Create a preference from a current and a default locale.
    ///
    /// Locales are not validated: a malformed tag simply matches no keys.
    pub fn new(current: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            current: current.into(),
            default: default.into(),
        }
    }

    /// A preference where the current locale is also the default.
    pub fn single(locale: impl Into<String>) -> Self {
        let locale = locale.into();
        Self::new(locale.clone(), locale)
    }

    /// Negotiate the current locale for a request.
    ///
    /// Precedence: explicit locale > first `Accept-Language` tag > default.
    /// Quality weights are dropped; the header's first entry wins.
    pub fn negotiate(
        explicit: Option<&str>,
        accept_language: Option<&str>,
        default: &str,
    ) -> Self {
        let explicit = explicit.map(str::trim).filter(|l| !l.is_empty());

        let from_header = accept_language.and_then(|header| {
            let first = header.split(',').next().unwrap_or("").trim();
            let tag = first.split(';').next().unwrap_or("").trim();
            (!tag.is_empty() && tag != "*").then_some(tag)
        });

        let current = explicit.or(from_header).unwrap_or(default);
        Self::new(current, default)
    }

    /// The current locale.
    pub fn current(&self) -> &str {
        &self.current
    }

    /// The default locale.
    pub fn default_locale(&self) -> &str {
        &self.default
    }

    /// Locales in the order they should be tried.
    pub fn cascade(&self) -> [&str; 2] {
        [self.current.as_str(), self.default.as_str()]
    }

    /// Primary subtag of the current locale ("en" for "en-GB").
    pub fn language(&self) -> &str {
        primary_subtag(&self.current)
    }
}

impl Default for LocalePreference {
    fn default() -> Self {
        Self::single("en")
    }
}
