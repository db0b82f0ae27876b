//! Brand Profile and Layout selector
//!
//! The brand has its own lifecycle (the planner may replace it wholesale,
//! the user edits single fields) but goes through the same mutation and
//! undo machinery as the Content Document.

use serde::{Deserialize, Serialize};

/// Color palette. Values are CSS color strings; absence means the palette
/// step has not been authored yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Heading/body font choices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontPair {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandProfile {
    #[serde(default)]
    pub palette: Palette,
    #[serde(default)]
    pub fonts: FontPair,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

/// Website template. A closed set: adding a template is a compiler-checked
/// change, not a stringly-typed one.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Layout {
    #[default]
    Classic,
    Modern,
    Minimal,
    Bold,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Layout::Minimal).unwrap(), "\"minimal\"");
        let parsed: Layout = serde_json::from_str("\"bold\"").unwrap();
        assert_eq!(parsed, Layout::Bold);
    }

    #[test]
    fn layout_parses_from_str() {
        use std::str::FromStr;
        assert_eq!(Layout::from_str("modern").unwrap(), Layout::Modern);
        assert!(Layout::from_str("brutalist").is_err());
    }

    #[test]
    fn empty_brand_serializes_compactly() {
        let brand = BrandProfile::default();
        let json = serde_json::to_value(&brand).unwrap();
        assert_eq!(json["palette"], serde_json::json!({}));
        assert!(json.get("tone").is_none());
        assert!(json.get("values").is_none());
    }

    #[test]
    fn brand_roundtrips_through_json() {
        let brand = BrandProfile {
            palette: Palette {
                primary: Some("#1a2b3c".to_string()),
                ..Palette::default()
            },
            fonts: FontPair {
                heading: Some("Fraunces".to_string()),
                body: Some("Inter".to_string()),
            },
            tone: Some("warm".to_string()),
            values: vec!["honest".to_string(), "local".to_string()],
        };
        let round: BrandProfile =
            serde_json::from_str(&serde_json::to_string(&brand).unwrap()).unwrap();
        assert_eq!(round, brand);
    }
}
