//! Content Document - the nested editable representation of a website
//!
//! A document is a tree of named sections. Each section is either a record
//! of scalar/text fields (hero, about, cta, contact, seo) or an ordered list
//! of records (features, products, testimonials, process, faq). Absence of a
//! field always means "not yet authored", never an error.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top-level section keys in display order. The change-set reporter compares
/// exactly these keys between two documents; everything else is ignored.
pub const SECTION_KEYS: &[&str] = &[
    "hero",
    "about",
    "features",
    "products",
    "testimonials",
    "process",
    "faq",
    "cta",
    "contact",
    "seo",
    "images",
    "videos",
];

/// Section holding named media slots (`hero`, `about`, `product_<n>`).
pub const IMAGES_SECTION: &str = "images";

/// Section holding rendered video assets, keyed by style.
pub const VIDEOS_SECTION: &str = "videos";

/// The editable website content.
///
/// Wraps a JSON object so sections and fields stay optional and the planner
/// can hand back a complete replacement without a schema migration. Callers
/// never mutate a document in place: [`SiteDocument::set_path`] returns a
/// fresh copy, which is what keeps undo snapshots isolated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteDocument(pub Map<String, Value>);

impl SiteDocument {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Read the value at a dot-separated key path, if present.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let first = parts.next()?;
        let mut current = self.0.get(first)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }

    /// Replace the leaf at `path` with `value`, returning a new document.
    ///
    /// Missing or null intermediate keys are synthesized as empty records
    /// rather than rejected, so there is no error case. List-valued sections
    /// are replaced wholesale by callers (no array-element addressing here):
    /// read the list, build a new one, and set it at the section key.
    #[must_use]
    pub fn set_path(&self, path: &str, value: Value) -> Self {
        let mut root = self.0.clone();
        let parts: Vec<&str> = path.split('.').collect();
        set_in(&mut root, &parts, value);
        Self(root)
    }

    /// A top-level section, if authored.
    pub fn section(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The URL stored in a named image slot, if any.
    pub fn image_slot(&self, slot: &str) -> Option<&str> {
        self.get_path(&format!("{IMAGES_SECTION}.{slot}"))
            .and_then(Value::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The document as a JSON value (used for deep comparisons and wire
    /// payloads).
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

fn set_in(map: &mut Map<String, Value>, parts: &[&str], value: Value) {
    match parts {
        [] => {}
        [leaf] => {
            map.insert((*leaf).to_string(), value);
        }
        [head, rest @ ..] => {
            let entry = map
                .entry((*head).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                // A null or scalar in the middle of a path is overwritten by
                // a fresh record, same as a missing key.
                *entry = Value::Object(Map::new());
            }
            if let Some(child) = entry.as_object_mut() {
                set_in(child, rest, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> SiteDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn set_path_then_get_path_roundtrips() {
        let base = SiteDocument::new();
        let updated = base.set_path("hero.headline", json!("Fresh bread daily"));
        assert_eq!(
            updated.get_path("hero.headline"),
            Some(&json!("Fresh bread daily"))
        );
        // Input untouched
        assert!(base.is_empty());
    }

    #[test]
    fn set_path_preserves_siblings() {
        let base = doc(json!({
            "hero": {"headline": "Old", "subheadline": "Keep me"},
            "about": {"body": "Story"}
        }));
        let updated = base.set_path("hero.headline", json!("New"));
        assert_eq!(updated.get_path("hero.subheadline"), Some(&json!("Keep me")));
        assert_eq!(updated.get_path("about.body"), Some(&json!("Story")));
        assert_eq!(base.get_path("hero.headline"), Some(&json!("Old")));
    }

    #[test]
    fn set_path_synthesizes_missing_intermediates() {
        let updated = SiteDocument::new().set_path("seo.meta.title", json!("Bakery"));
        assert_eq!(updated.get_path("seo.meta.title"), Some(&json!("Bakery")));
    }

    #[test]
    fn set_path_replaces_null_intermediate() {
        let base = doc(json!({"contact": null}));
        let updated = base.set_path("contact.email", json!("hi@example.com"));
        assert_eq!(
            updated.get_path("contact.email"),
            Some(&json!("hi@example.com"))
        );
    }

    #[test]
    fn set_path_replaces_scalar_intermediate() {
        let base = doc(json!({"hero": "just a string"}));
        let updated = base.set_path("hero.headline", json!("Now a record"));
        assert_eq!(updated.get_path("hero.headline"), Some(&json!("Now a record")));
    }

    #[test]
    fn lists_are_replaced_wholesale() {
        let base = doc(json!({"products": [{"name": "Rye"}]}));
        let updated = base.set_path(
            "products",
            json!([{"name": "Rye"}, {"name": "Sourdough"}]),
        );
        let products = updated.section("products").unwrap().as_array().unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[1]["name"], json!("Sourdough"));
    }

    #[test]
    fn image_slot_reads_url() {
        let base = doc(json!({"images": {"hero": "https://cdn.example/hero.png"}}));
        assert_eq!(base.image_slot("hero"), Some("https://cdn.example/hero.png"));
        assert_eq!(base.image_slot("product_0"), None);
    }

    #[test]
    fn document_serializes_transparently() {
        let base = doc(json!({"hero": {"headline": "Hi"}}));
        let round: SiteDocument =
            serde_json::from_str(&serde_json::to_string(&base).unwrap()).unwrap();
        assert_eq!(round, base);
    }
}
