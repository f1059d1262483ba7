//! Localized text table.
//!
//! Lookup falls back from the requested language to the default one.
//! Callers fall back to the raw key when both miss.

use std::collections::HashMap;

use crate::infrastructure::ports::TextLookupPort;

/// `lang -> key -> text`.
#[derive(Debug, Clone, Default)]
pub struct TextTable {
    default_lang: String,
    tables: HashMap<String, HashMap<String, String>>,
}

impl TextTable {
    pub fn new(default_lang: impl Into<String>) -> Self {
        Self {
            default_lang: default_lang.into(),
            tables: HashMap::new(),
        }
    }

    /// Parse `{ "<lang>": { "<key>": "<text>" } }`.
    pub fn from_json(
        default_lang: impl Into<String>,
        json: &str,
    ) -> Result<Self, serde_json::Error> {
        let tables: HashMap<String, HashMap<String, String>> = serde_json::from_str(json)?;
        Ok(Self {
            default_lang: default_lang.into(),
            tables,
        })
    }

    pub fn insert(
        &mut self,
        lang: impl Into<String>,
        key: impl Into<String>,
        text: impl Into<String>,
    ) {
        self.tables
            .entry(lang.into())
            .or_default()
            .insert(key.into(), text.into());
    }

    pub fn with_entry(
        mut self,
        lang: impl Into<String>,
        key: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        self.insert(lang, key, text);
        self
    }

    fn get(&self, lang: &str, key: &str) -> Option<&String> {
        self.tables.get(lang).and_then(|table| table.get(key))
    }
}

impl TextLookupPort for TextTable {
    fn lookup(&self, lang: &str, key: &str) -> Option<String> {
        self.get(lang, key)
            .or_else(|| self.get(&self.default_lang, key))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requested_language_wins() {
        let table = TextTable::new("en")
            .with_entry("en", "s1.body", "Hello")
            .with_entry("fr", "s1.body", "Bonjour");

        assert_eq!(table.lookup("fr", "s1.body").as_deref(), Some("Bonjour"));
    }

    #[test]
    fn missing_translation_falls_back_to_default_language() {
        let table = TextTable::new("en").with_entry("en", "s1.body", "Hello");

        assert_eq!(table.lookup("de", "s1.body").as_deref(), Some("Hello"));
    }

    #[test]
    fn unknown_key_is_none() {
        let table = TextTable::new("en");

        assert_eq!(table.lookup("en", "nope"), None);
    }

    #[test]
    fn from_json_reads_nested_tables() {
        let table = TextTable::from_json("en", r#"{"en":{"a":"A"},"fr":{"a":"Á"}}"#)
            .expect("table should parse");

        assert_eq!(table.lookup("fr", "a").as_deref(), Some("Á"));
    }
}
