//! FAQ content records.
//!
//! FAQ entries are static content shipped with the storefront; they are
//! grouped by category and searched with [`crate::filter::FaqFilter`].

use serde::{Deserialize, Serialize};

/// One question and answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqItem {
    /// Category slug, e.g. `ordering`, `printing`, `shipping`.
    pub category: String,
    pub question: String,
    pub answer: String,
}

/// A category of FAQ entries with its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqCategory {
    pub slug: String,
    pub name: String,
}

/// The full FAQ document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqContent {
    #[serde(default)]
    pub categories: Vec<FaqCategory>,
    #[serde(default)]
    pub items: Vec<FaqItem>,
}

impl FaqContent {
    /// Display name for a category slug, falling back to the slug itself.
    #[must_use]
    pub fn category_name<'a>(&'a self, slug: &'a str) -> &'a str {
        self.categories
            .iter()
            .find(|c| c.slug == slug)
            .map_or(slug, |c| c.name.as_str())
    }

    /// Entries whose category is not declared in `categories`.
    #[must_use]
    pub fn orphaned_items(&self) -> Vec<&FaqItem> {
        self.items
            .iter()
            .filter(|item| !self.categories.iter().any(|c| c.slug == item.category))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content() -> FaqContent {
        FaqContent {
            categories: vec![FaqCategory {
                slug: "shipping".to_string(),
                name: "Shipping & Delivery".to_string(),
            }],
            items: vec![
                FaqItem {
                    category: "shipping".to_string(),
                    question: "How long does delivery take?".to_string(),
                    answer: "2-4 working days.".to_string(),
                },
                FaqItem {
                    category: "misc".to_string(),
                    question: "Do you print on fabric?".to_string(),
                    answer: "Not yet.".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_category_name_lookup() {
        let faq = content();
        assert_eq!(faq.category_name("shipping"), "Shipping & Delivery");
        assert_eq!(faq.category_name("unknown"), "unknown");
    }

    #[test]
    fn test_orphaned_items() {
        let faq = content();
        let orphans = faq.orphaned_items();
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans.first().map(|i| i.category.as_str()), Some("misc"));
    }
}
