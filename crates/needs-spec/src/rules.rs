use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const DEFAULT_ACCESSORY_SUFFIX: &str = " - wyposażenie";

pub const DEFAULT_MANDATORY_CATEGORIES: &[&str] = &[
    "Informacje ogólne",
    "Miejsce i termin",
    "Warunki na miejscu",
];

/// Naming conventions of the external question catalog.
///
/// Accessory categories are detected by suffix and bound to a base category.
/// The alias table corrects base names that are spelled differently from the
/// category the accessory belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryRules {
    /// Always shown, always selected, in this order.
    pub mandatory_categories: Vec<String>,
    pub accessory_suffix: String,
    /// Stripped accessory base name -> stored category name.
    pub aliases: BTreeMap<String, String>,
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self {
            mandatory_categories: DEFAULT_MANDATORY_CATEGORIES
                .iter()
                .map(|name| name.to_string())
                .collect(),
            accessory_suffix: DEFAULT_ACCESSORY_SUFFIX.to_string(),
            aliases: BTreeMap::from([(
                "Maszty oświetleniowe".to_string(),
                "Maszt oświetleniowy".to_string(),
            )]),
        }
    }
}

impl CategoryRules {
    pub fn is_mandatory(&self, category: &str) -> bool {
        self.mandatory_categories
            .iter()
            .any(|mandatory| mandatory == category)
    }

    /// Position in the canonical mandatory order.
    pub fn mandatory_rank(&self, category: &str) -> Option<usize> {
        self.mandatory_categories
            .iter()
            .position(|mandatory| mandatory == category)
    }

    pub fn is_accessory(&self, category: &str) -> bool {
        !self.accessory_suffix.is_empty()
            && category.len() > self.accessory_suffix.len()
            && category.ends_with(&self.accessory_suffix)
    }

    /// Resolves the base category an accessory category belongs to.
    ///
    /// Returns `None` for categories that are not accessories.
    pub fn base_category(&self, category: &str) -> Option<String> {
        if !self.is_accessory(category) {
            return None;
        }
        let stripped = category[..category.len() - self.accessory_suffix.len()].trim_end();
        Some(
            self.aliases
                .get(stripped)
                .cloned()
                .unwrap_or_else(|| stripped.to_string()),
        )
    }

    /// Accessory name implied by the suffix convention alone.
    pub fn accessory_name(&self, base: &str) -> String {
        format!("{base}{}", self.accessory_suffix)
    }

    /// Whether `candidate` is an accessory bound to `base`.
    pub fn is_accessory_of(&self, candidate: &str, base: &str) -> bool {
        self.base_category(candidate)
            .is_some_and(|resolved| resolved == base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_suffix_to_find_base() {
        let rules = CategoryRules::default();
        assert_eq!(
            rules.base_category("Generator - wyposażenie").as_deref(),
            Some("Generator")
        );
        assert_eq!(rules.base_category("Generator"), None);
    }

    #[test]
    fn applies_alias_corrections() {
        let rules = CategoryRules::default();
        assert_eq!(
            rules
                .base_category("Maszty oświetleniowe - wyposażenie")
                .as_deref(),
            Some("Maszt oświetleniowy")
        );
        assert!(rules.is_accessory_of(
            "Maszty oświetleniowe - wyposażenie",
            "Maszt oświetleniowy"
        ));
        assert!(!rules.is_accessory_of(
            "Maszty oświetleniowe - wyposażenie",
            "Maszty oświetleniowe"
        ));
    }

    #[test]
    fn bare_suffix_is_not_an_accessory() {
        let rules = CategoryRules::default();
        assert!(!rules.is_accessory(DEFAULT_ACCESSORY_SUFFIX));
    }

    #[test]
    fn empty_suffix_disables_accessories() {
        let rules = CategoryRules {
            accessory_suffix: String::new(),
            ..CategoryRules::default()
        };
        assert!(!rules.is_accessory("Generator - wyposażenie"));
    }

    #[test]
    fn mandatory_rank_follows_configured_order() {
        let rules = CategoryRules::default();
        assert_eq!(rules.mandatory_rank("Informacje ogólne"), Some(0));
        assert_eq!(rules.mandatory_rank("Warunki na miejscu"), Some(2));
        assert_eq!(rules.mandatory_rank("Generator"), None);
    }
}
