//! Change-set reporting
//!
//! After a planner-driven content edit, the editor highlights which
//! top-level sections changed. Comparison is deep value equality over the
//! fixed section list; the brand is compared as a single unit. This drives
//! UI highlighting only and has no effect on persistence or undo.

use site_types::{BrandProfile, SiteDocument, SECTION_KEYS};

/// Reported key for any brand difference.
pub const BRAND_KEY: &str = "brand";

pub fn changed_sections(
    before_content: &SiteDocument,
    after_content: &SiteDocument,
    before_brand: &BrandProfile,
    after_brand: &BrandProfile,
) -> Vec<String> {
    let mut changed: Vec<String> = SECTION_KEYS
        .iter()
        .filter(|key| before_content.section(key) != after_content.section(key))
        .map(|key| key.to_string())
        .collect();
    if before_brand != after_brand {
        changed.push(BRAND_KEY.to_string());
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use site_types::Palette;

    fn doc(value: serde_json::Value) -> SiteDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn single_field_edit_reports_only_its_section() {
        let before = doc(json!({
            "hero": {"headline": "Old", "subheadline": "Same"},
            "about": {"body": "Same"}
        }));
        let after = before.set_path("hero.headline", json!("New"));

        let brand = BrandProfile::default();
        assert_eq!(
            changed_sections(&before, &after, &brand, &brand),
            vec!["hero".to_string()]
        );
    }

    #[test]
    fn identical_documents_report_nothing() {
        let before = doc(json!({"faq": [{"q": "Hours?", "a": "7-3"}]}));
        let brand = BrandProfile::default();
        assert!(changed_sections(&before, &before.clone(), &brand, &brand).is_empty());
    }

    #[test]
    fn brand_is_reported_as_one_unit() {
        let content = SiteDocument::new();
        let before_brand = BrandProfile::default();
        let after_brand = BrandProfile {
            palette: Palette {
                accent: Some("#ff7f50".to_string()),
                ..Palette::default()
            },
            ..BrandProfile::default()
        };
        assert_eq!(
            changed_sections(&content, &content.clone(), &before_brand, &after_brand),
            vec![BRAND_KEY.to_string()]
        );
    }

    #[test]
    fn list_reorder_counts_as_a_change() {
        let before = doc(json!({"products": [{"name": "Rye"}, {"name": "Spelt"}]}));
        let after = doc(json!({"products": [{"name": "Spelt"}, {"name": "Rye"}]}));
        let brand = BrandProfile::default();
        assert_eq!(
            changed_sections(&before, &after, &brand, &brand),
            vec!["products".to_string()]
        );
    }

    #[test]
    fn newly_authored_section_is_reported() {
        let before = SiteDocument::new();
        let after = before.set_path("contact.email", json!("hi@example.com"));
        let brand = BrandProfile::default();
        assert_eq!(
            changed_sections(&before, &after, &brand, &brand),
            vec!["contact".to_string()]
        );
    }
}
