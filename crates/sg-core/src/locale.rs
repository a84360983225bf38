//! Locale-tagged values.
//!
//! Graph metadata and node descriptions are stored per locale and exported
//! under `<field>@<locale>` keys.

use std::collections::BTreeMap;

/// Locale used when the source does not tag a value.
pub const DEFAULT_LOCALE: &str = "it";

/// A value stored per locale tag. Iteration is ordered by locale.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Localized<T> {
    entries: BTreeMap<String, T>,
}

pub type LocalizedText = Localized<String>;

impl<T> Default for Localized<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T> Localized<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single value under `locale`.
    pub fn with(locale: impl Into<String>, value: T) -> Self {
        let mut out = Self::new();
        out.set(locale, value);
        out
    }

    /// Single value under the default locale.
    pub fn default_locale(value: T) -> Self {
        Self::with(DEFAULT_LOCALE, value)
    }

    pub fn set(&mut self, locale: impl Into<String>, value: T) -> Option<T> {
        self.entries.insert(locale.into(), value)
    }

    pub fn get(&self, locale: &str) -> Option<&T> {
        self.entries.get(locale)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<T: Clone + Default> Localized<T> {
    /// Value for `locale`, or `T::default()` when absent.
    pub fn get_or_default(&self, locale: &str) -> T {
        self.entries.get(locale).cloned().unwrap_or_default()
    }
}

/// Split an attribute key of the form `field@locale`.
///
/// A bare `field` is tagged with the default locale.
pub fn split_locale_key(key: &str) -> (&str, &str) {
    match key.split_once('@') {
        Some((field, locale)) if !locale.is_empty() => (field, locale),
        Some((field, _)) => (field, DEFAULT_LOCALE),
        None => (key, DEFAULT_LOCALE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn localized_get_and_default() {
        let mut name = LocalizedText::default_locale("Tempio".to_string());
        name.set("en", "Temple".to_string());
        assert_eq!(name.get("it").map(String::as_str), Some("Tempio"));
        assert_eq!(name.get_or_default("fr"), "");
        assert_eq!(name.len(), 2);
        let locales: Vec<&str> = name.iter().map(|(l, _)| l).collect();
        assert_eq!(locales, vec!["en", "it"]);
    }

    #[test]
    fn split_locale_keys() {
        assert_eq!(split_locale_key("description@en"), ("description", "en"));
        assert_eq!(split_locale_key("description"), ("description", "it"));
        assert_eq!(split_locale_key("description@"), ("description", "it"));
    }
}
