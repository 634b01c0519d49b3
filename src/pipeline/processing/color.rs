use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{PipelineError, Result};

/// Fixed color code to description table.
///
/// Entries here override whatever description the database carries for the
/// same code. Keys are normalized on construction so lookups only need to
/// normalize the incoming code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorMapping {
    entries: HashMap<String, String>,
}

impl ColorMapping {
    pub fn new<K, V, I>(entries: I) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let entries = entries
            .into_iter()
            .map(|(code, description)| (normalize(Some(code.as_ref())), description.into()))
            .collect();
        Self { entries }
    }

    /// Load a mapping stored as a flat JSON object of code to description
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!(
                "Failed to read color mapping file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let parsed: HashMap<String, String> = serde_json::from_str(content).map_err(|e| {
            PipelineError::Config(format!(
                "Color mapping must be a JSON object of strings: {}",
                e
            ))
        })?;
        Ok(Self::new(parsed))
    }

    /// Merge another mapping into this one; entries from `other` win.
    pub fn merged_with(mut self, other: ColorMapping) -> Self {
        self.entries.extend(other.entries);
        self
    }

    pub fn get(&self, code: &str) -> Option<&str> {
        self.entries.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolves product color codes into canonical color descriptions
#[derive(Debug, Clone, Default)]
pub struct ColorResolver {
    mapping: ColorMapping,
}

impl ColorResolver {
    pub fn new(mapping: ColorMapping) -> Self {
        Self { mapping }
    }

    /// Description for a product color.
    ///
    /// The fixed mapping is consulted first; the database description is the
    /// fallback. Both come back trimmed and uppercased, or empty when neither
    /// source has anything.
    pub fn resolve(&self, product_color_code: Option<&str>, database_description: Option<&str>) -> String {
        let code = normalize(product_color_code);
        match self.mapping.get(&code) {
            Some(mapped) if !mapped.trim().is_empty() => normalize(Some(mapped)),
            _ => normalize(database_description),
        }
    }
}

/// Trim and uppercase; absent text normalizes to an empty string.
pub fn normalize(text: Option<&str>) -> String {
    text.unwrap_or_default().trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> ColorResolver {
        ColorResolver::new(ColorMapping::new([("01", "preto "), (" 2b ", "Azul Marinho")]))
    }

    #[test]
    fn test_mapping_takes_precedence_over_database() {
        let resolver = resolver();
        assert_eq!(resolver.resolve(Some("01"), Some("BLACK")), "PRETO");
        assert_eq!(resolver.resolve(Some(" 01 "), None), "PRETO");
        assert_eq!(resolver.resolve(Some("2b"), Some("navy")), "AZUL MARINHO");
    }

    #[test]
    fn test_database_fallback_when_unmapped() {
        let resolver = resolver();
        assert_eq!(resolver.resolve(Some("99"), Some(" verde ")), "VERDE");
        assert_eq!(resolver.resolve(None, Some("rosa")), "ROSA");
    }

    #[test]
    fn test_both_absent_is_empty() {
        let resolver = resolver();
        assert_eq!(resolver.resolve(None, None), "");
        assert_eq!(resolver.resolve(Some("99"), None), "");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Some("  off white ")), "OFF WHITE");
        assert_eq!(normalize(None), "");
    }

    #[test]
    fn test_mapping_from_json() {
        let mapping = ColorMapping::from_json_str(r#"{"10": "Vermelho", "11": "Rosa"}"#).unwrap();
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.get("10"), Some("Vermelho"));

        let err = ColorMapping::from_json_str(r#"{"10": 5}"#).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[test]
    fn test_merged_mapping_prefers_later_entries() {
        let base = ColorMapping::new([("01", "PRETO"), ("02", "BRANCO")]);
        let merged = base.merged_with(ColorMapping::new([("02", "OFF WHITE")]));
        assert_eq!(merged.get("01"), Some("PRETO"));
        assert_eq!(merged.get("02"), Some("OFF WHITE"));
    }
}
