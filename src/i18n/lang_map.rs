//! Language maps: JSON objects keyed by language tag.
//!
//! The metadata API returns localizable fields as objects such as
//! `{"def": ["Image"], "en": ["Picture"]}`. An object only counts as a
//! language map when every one of its keys is a known tag; a single foreign
//! key makes it an ordinary nested record.
//!
//! Resolution picks values for the current locale, then the default locale,
//! and finally falls back to every value in the map, so a non-empty map
//! always resolves to something.

use serde_json::{Map, Value};

use crate::i18n::locale::LocalePreference;
use crate::i18n::registry::{primary_subtag, LanguageRegistry};

/// Whether `value` is a language map.
///
/// Non-objects are never language maps. The empty object is one, since all
/// of its (zero) keys are known.
pub fn is_lang_map(value: &Value) -> bool {
    match value {
        Value::Object(map) => {
            let registry = LanguageRegistry::get();
            map.keys().all(|key| registry.is_known_tag(key))
        }
        _ => false,
    }
}

/// Whether `value` is a language map or an array holding one.
pub fn contains_lang_map(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.iter().any(contains_lang_map),
        other => is_lang_map(other),
    }
}

/// Resolve language maps in `value` for the given locales.
///
/// A language map becomes an array of the selected values. Arrays are
/// resolved element by element (results are not merged across elements).
/// Anything else is returned unchanged.
pub fn localize(value: &Value, locale: &LocalePreference) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(|item| localize(item, locale)).collect()),
        Value::Object(map) if is_lang_map(value) => {
            let values = locale
                .cascade()
                .into_iter()
                .find_map(|tag| lang_map_value(map, tag))
                .unwrap_or_else(|| all_values(map));
            Value::Array(values)
        }
        other => other.clone(),
    }
}

/// Values of `lang_map` for a single locale, if any key matches it.
///
/// Values under all matching keys are flattened and de-duplicated, keeping
/// first occurrence order.
pub fn lang_map_value(lang_map: &Map<String, Value>, locale: &str) -> Option<Vec<Value>> {
    let keys = salient_keys(lang_map, locale);
    if keys.is_empty() {
        return None;
    }

    let mut values: Vec<Value> = Vec::new();
    for key in keys {
        for value in flatten(&lang_map[key]) {
            if !values.contains(&value) {
                values.push(value);
            }
        }
    }
    Some(values)
}

/// Keys of `lang_map` that match `locale`.
///
/// Exact matches win, tried in the order: full locale, alpha-2 code,
/// alpha-3 code. Without any exact match, every key carrying a sub-code of
/// the locale's language qualifies ("en" matches "en-GB").
pub fn salient_keys<'a>(lang_map: &'a Map<String, Value>, locale: &str) -> Vec<&'a str> {
    let iso_code = primary_subtag(locale);
    let forms = LanguageRegistry::get().canonical_forms(iso_code);

    let candidates = [
        Some(locale),
        forms.and_then(|f| f.alpha2),
        forms.map(|f| f.alpha3),
    ];

    let mut exact: Vec<&'a str> = Vec::new();
    for candidate in candidates.into_iter().flatten() {
        if let Some(key) = lang_map.keys().find(|key| key.as_str() == candidate) {
            if !exact.contains(&key.as_str()) {
                exact.push(key.as_str());
            }
        }
    }
    if !exact.is_empty() {
        return exact;
    }

    let prefix = format!("{}-", iso_code);
    lang_map
        .keys()
        .filter(|key| key.starts_with(&prefix))
        .map(String::as_str)
        .collect()
}

/// Every value in the map, in key order.
fn all_values(lang_map: &Map<String, Value>) -> Vec<Value> {
    lang_map.values().flat_map(flatten).collect()
}

/// Splice nested arrays into a flat list of values.
fn flatten(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.iter().flat_map(flatten).collect(),
        other => vec![other.clone()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn dc_type() -> Value {
        json!({ "def": ["Image"], "en": ["Picture"] })
    }

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    // ==================== is_lang_map Tests ====================

    #[test]
    fn test_non_objects_are_not_lang_maps() {
        for value in [json!(null), json!(0), json!(1), json!("xyz"), json!(["en"])] {
            assert!(!is_lang_map(&value), "{} is not a lang map", value);
        }
    }

    #[test]
    fn test_lang_map_with_iso_and_def_keys() {
        assert!(is_lang_map(&dc_type()));
        assert!(is_lang_map(&json!({ "en-GB": ["colour"], "fre": ["couleur"] })));
    }

    #[test]
    fn test_lang_map_with_deprecated_and_empty_keys() {
        assert!(is_lang_map(&json!({ "iw": ["a"], "": ["b"] })));
    }

    #[test]
    fn test_lang_map_keys_are_case_insensitive() {
        assert!(is_lang_map(&json!({ "EN": ["a"], "Def": ["b"] })));
    }

    #[test]
    fn test_single_foreign_key_disqualifies() {
        assert!(!is_lang_map(&json!({ "en": ["a"], "about": "/x" })));
    }

    #[test]
    fn test_record_is_not_lang_map() {
        let record = json!({
            "id": "/abc/123",
            "type": "IMAGE",
            "title": ["title1"]
        });
        assert!(!is_lang_map(&record));
        assert!(!is_lang_map(&json!({ "about": "/proxy/provider/abc/123" })));
    }

    #[test]
    fn test_empty_object_is_lang_map() {
        assert!(is_lang_map(&json!({})));
    }

    #[test]
    fn test_contains_lang_map() {
        assert!(contains_lang_map(&json!([{ "en": ["a"] }, "plain"])));
        assert!(!contains_lang_map(&json!(["a", "b"])));
        assert!(!contains_lang_map(&json!([{ "about": "/x" }])));
    }

    // ==================== salient_keys Tests ====================

    #[test]
    fn test_salient_keys_exact_locale() {
        let map = object(dc_type());
        assert_eq!(salient_keys(&map, "en"), vec!["en"]);
    }

    #[test]
    fn test_salient_keys_alpha3_form() {
        let map = object(json!({ "fre": ["Image"], "de": ["Bild"] }));
        assert_eq!(salient_keys(&map, "fr"), vec!["fre"]);
    }

    #[test]
    fn test_salient_keys_exact_tier_preference_order() {
        let map = object(json!({ "eng": ["c"], "en": ["b"], "en-GB": ["a"] }));
        assert_eq!(salient_keys(&map, "en-GB"), vec!["en-GB", "en", "eng"]);
    }

    #[test]
    fn test_salient_keys_sub_code_tier() {
        let map = object(json!({ "en-GB": ["colour"], "en-US": ["color"], "fr": ["couleur"] }));
        assert_eq!(salient_keys(&map, "en"), vec!["en-GB", "en-US"]);
    }

    #[test]
    fn test_salient_keys_unknown_locale() {
        let map = object(dc_type());
        assert!(salient_keys(&map, "zz").is_empty());
        assert!(salient_keys(&map, "not a locale").is_empty());
    }

    // ==================== lang_map_value Tests ====================

    #[test]
    fn test_lang_map_value_deduplicates() {
        let map = object(json!({ "en": ["Picture", "Photo"], "eng": ["Photo", "Image"] }));
        assert_eq!(
            lang_map_value(&map, "en"),
            Some(vec![json!("Picture"), json!("Photo"), json!("Image")])
        );
    }

    #[test]
    fn test_lang_map_value_scalar_values() {
        let map = object(json!({ "en": "Picture" }));
        assert_eq!(lang_map_value(&map, "en"), Some(vec![json!("Picture")]));
    }

    #[test]
    fn test_lang_map_value_no_match() {
        let map = object(dc_type());
        assert_eq!(lang_map_value(&map, "es"), None);
    }

    // ==================== localize Tests ====================

    #[test]
    fn test_localize_current_locale() {
        let prefs = LocalePreference::new("en", "fr");
        assert_eq!(localize(&dc_type(), &prefs), json!(["Picture"]));
    }

    #[test]
    fn test_localize_default_locale() {
        let prefs = LocalePreference::new("fr", "en");
        assert_eq!(localize(&dc_type(), &prefs), json!(["Picture"]));
    }

    #[test]
    fn test_localize_all_values_fallback() {
        let prefs = LocalePreference::new("fr", "es");
        assert_eq!(localize(&dc_type(), &prefs), json!(["Image", "Picture"]));
    }

    #[test]
    fn test_localize_single_language_map() {
        let prefs = LocalePreference::new("es", "en");
        assert_eq!(localize(&json!({ "en": ["object desc"] }), &prefs), json!(["object desc"]));

        let prefs = LocalePreference::new("es", "fr");
        assert_eq!(localize(&json!({ "en": ["object desc"] }), &prefs), json!(["object desc"]));
    }

    #[test]
    fn test_localize_region_locale_falls_back_to_language() {
        let prefs = LocalePreference::new("en-GB", "fr");
        assert_eq!(localize(&dc_type(), &prefs), json!(["Picture"]));
    }

    #[test]
    fn test_localize_array_element_wise() {
        let value = json!([dc_type(), { "fr": ["Photo"] }, "plain"]);
        let prefs = LocalePreference::new("en", "en");
        assert_eq!(localize(&value, &prefs), json!([["Picture"], ["Photo"], "plain"]));
    }

    #[test]
    fn test_localize_passes_through_non_lang_maps() {
        let prefs = LocalePreference::default();
        let record = json!({ "about": "/x" });
        assert_eq!(localize(&record, &prefs), record);
        assert_eq!(localize(&json!(1900), &prefs), json!(1900));
        assert_eq!(localize(&json!(null), &prefs), json!(null));
    }

    #[test]
    fn test_localize_empty_lang_map() {
        assert_eq!(localize(&json!({}), &LocalePreference::default()), json!([]));
    }

    #[test]
    fn test_localize_is_deterministic() {
        let prefs = LocalePreference::new("fr", "es");
        let value = dc_type();
        assert_eq!(localize(&value, &prefs), localize(&value, &prefs));
    }

    // ==================== Property Tests ====================

    fn known_tag() -> impl Strategy<Value = String> {
        prop_oneof![
            "(en|EN|fr|de|nl|eng|fre|fra|deu|pt|es|sh|iw|mol)(-[A-Z]{2})?",
            prop::sample::select(vec!["def", "DEF", ""]).prop_map(String::from),
        ]
    }

    fn lang_map() -> impl Strategy<Value = Value> {
        prop::collection::vec((known_tag(), prop::collection::vec("[a-z]{1,6}", 1..3)), 1..5)
            .prop_map(|entries| {
                Value::Object(
                    entries
                        .into_iter()
                        .map(|(tag, values)| (tag, json!(values)))
                        .collect(),
                )
            })
    }

    proptest! {
        #[test]
        fn prop_maps_of_known_tags_are_lang_maps(
            map in lang_map(),
            current in "(en|fr|de|it|en-GB|xx)",
            default in "(en|es|nl)",
        ) {
            prop_assert!(is_lang_map(&map));

            let resolved = localize(&map, &LocalePreference::new(&current, &default));
            let values = resolved.as_array().cloned().unwrap_or_default();
            prop_assert!(!values.is_empty());
            prop_assert!(values.iter().all(Value::is_string));
        }

        #[test]
        fn prop_foreign_key_breaks_lang_map(map in lang_map()) {
            let mut map = object(map);
            map.insert("about".to_string(), json!("/x"));
            prop_assert!(!is_lang_map(&Value::Object(map)));
        }
    }
}
