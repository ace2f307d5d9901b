//! ISO 639-2 language code table.
//!
//! The table is the Library of Congress ISO 639-2 code list, embedded at
//! compile time from `data/ISO-639-2.txt`. Each line holds four
//! pipe-separated fields:
//!
//! ```text
//! bibliographic alpha-3 | terminologic alpha-3 | alpha-2 | English name
//! ```
//!
//! The terminologic and alpha-2 columns are empty when the language has no
//! such code.

use tracing::warn;

const ISO_639_2: &str = include_str!("../../data/ISO-639-2.txt");

/// A single ISO 639-2 entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Iso639Entry {
    /// Bibliographic three-letter code (e.g. "fre")
    pub alpha3: &'static str,

    /// Terminologic three-letter code, when it differs (e.g. "fra")
    pub alpha3_terminologic: Option<&'static str>,

    /// ISO 639-1 two-letter code, if the language has one (e.g. "fr")
    pub alpha2: Option<&'static str>,

    /// English name of the language
    pub english_name: &'static str,
}

impl Iso639Entry {
    fn parse(line: &'static str) -> Option<Self> {
        let mut fields = line.split('|').map(str::trim);
        let alpha3 = fields.next().filter(|code| !code.is_empty())?;
        let alpha3_terminologic = fields.next().filter(|code| !code.is_empty());
        let alpha2 = fields.next().filter(|code| !code.is_empty());
        let english_name = fields.next()?;

        Some(Self {
            alpha3,
            alpha3_terminologic,
            alpha2,
            english_name,
        })
    }
}

/// Parse the embedded table, skipping blank and malformed lines.
pub(crate) fn entries() -> Vec<Iso639Entry> {
    ISO_639_2
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let entry = Iso639Entry::parse(line);
            if entry.is_none() {
                warn!("Skipping malformed ISO 639-2 line: {:?}", line);
            }
            entry
        })
        .collect()
}
