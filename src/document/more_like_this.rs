//! "More like this" search queries built from a document's own metadata.

use std::sync::OnceLock;

use regex::Regex;

use crate::document::Document;
use crate::i18n::LocalePreference;

struct MltField {
    name: &'static str,
    paths: &'static [&'static str],
    boost: f32,
}

/// Metadata searched for similar items, with their query boosts.
const MLT_FIELDS: [MltField; 4] = [
    MltField {
        name: "title",
        paths: &["proxies.dcTitle"],
        boost: 0.3,
    },
    MltField {
        name: "who",
        paths: &["proxies.dcCreator"],
        boost: 0.5,
    },
    MltField {
        name: "what",
        paths: &["proxies.dcType", "proxies.dcSubject"],
        boost: 0.8,
    },
    MltField {
        name: "DATA_PROVIDER",
        paths: &["aggregations.edmDataProvider"],
        boost: 0.2,
    },
];

/// Names accepted by [`Document::more_like_this_query`].
pub const MLT_FIELD_NAMES: [&str; 4] = ["title", "who", "what", "DATA_PROVIDER"];

// Lucene query syntax characters
static SPECIAL_CHARS_REGEX: OnceLock<Regex> = OnceLock::new();

impl Document {
    /// Search query for items similar to this one.
    ///
    /// With `field`, only that metadata field is used. Returns `None` when
    /// no field has any terms (or `field` is not a known name).
    pub fn more_like_this_query(
        &self,
        field: Option<&str>,
        locale: &LocalePreference,
    ) -> Option<String> {
        let field_queries: Vec<String> = MLT_FIELDS
            .iter()
            .filter(|mlt| field.map_or(true, |name| name == mlt.name))
            .filter_map(|mlt| self.more_like_this_field_query(mlt, locale))
            .collect();

        if field_queries.is_empty() {
            return None;
        }

        let mut query = format!("({})", field_queries.join(" OR "));
        if let Some(id) = self.id() {
            query.push_str(&format!(" NOT europeana_id:\"{}\"", id));
        }
        Some(query)
    }

    fn more_like_this_field_query(
        &self,
        mlt: &MltField,
        locale: &LocalePreference,
    ) -> Option<String> {
        let terms = self.more_like_this_terms(mlt.paths, locale);
        if terms.is_empty() {
            return None;
        }

        let terms: Vec<String> = terms.iter().map(|t| escape_query_term(t)).collect();
        Some(format!("{}: ({})^{}", mlt.name, terms.join(" OR "), mlt.boost))
    }

    fn more_like_this_terms(&self, paths: &[&str], locale: &LocalePreference) -> Vec<String> {
        let mut terms: Vec<String> = Vec::new();
        for path in paths {
            for term in self.fetch(path, locale).strings() {
                let term = term.trim();
                if !term.is_empty() && !terms.iter().any(|t| t == term) {
                    terms.push(term.to_string());
                }
            }
        }
        terms
    }
}

/// Quote a term, escaping query syntax characters inside it.
fn escape_query_term(term: &str) -> String {
    let regex = SPECIAL_CHARS_REGEX
        .get_or_init(|| Regex::new(r#"([+\-&|!(){}\[\]^"~*?:\\/])"#).unwrap());
    format!("\"{}\"", regex.replace_all(term, r"\$1"))
}
