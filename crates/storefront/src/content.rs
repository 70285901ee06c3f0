//! Static content loaded from the `content/` directory at startup.
//!
//! Currently this is the FAQ (`content/faq.yaml`): a list of categories and
//! the questions filed under them. The document is parsed once and shared
//! read-only through [`ContentStore`].

use std::path::Path;
use std::sync::Arc;

use printshop_core::faq::{FaqCategory, FaqContent, FaqItem};

/// Content store that holds all loaded content in memory
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    faq: Arc<FaqContent>,
}

impl ContentStore {
    /// Load all content from the filesystem.
    ///
    /// A missing FAQ file yields an empty FAQ rather than an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the FAQ file exists but cannot be read or parsed.
    pub fn load(content_dir: &Path) -> Result<Self, ContentError> {
        let faq = Self::load_faq(&content_dir.join("faq.yaml"))?;
        Ok(Self { faq: Arc::new(faq) })
    }

    fn load_faq(path: &Path) -> Result<FaqContent, ContentError> {
        if !path.exists() {
            tracing::warn!("FAQ file does not exist: {:?}", path);
            return Ok(FaqContent::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|e| ContentError::Io(e.to_string()))?;
        let faq = parse_faq(&raw)?;

        for item in faq.orphaned_items() {
            tracing::warn!(
                category = %item.category,
                question = %item.question,
                "FAQ entry has an undeclared category"
            );
        }
        tracing::info!(
            categories = faq.categories.len(),
            items = faq.items.len(),
            "Loaded FAQ"
        );

        Ok(faq)
    }

    /// Build a store from an already parsed FAQ document.
    #[must_use]
    pub fn from_faq(faq: FaqContent) -> Self {
        Self { faq: Arc::new(faq) }
    }

    /// The whole FAQ document.
    #[must_use]
    pub fn faq(&self) -> &FaqContent {
        &self.faq
    }

    #[must_use]
    pub fn faq_categories(&self) -> &[FaqCategory] {
        &self.faq.categories
    }

    #[must_use]
    pub fn faq_items(&self) -> &[FaqItem] {
        &self.faq.items
    }
}

fn parse_faq(raw: &str) -> Result<FaqContent, ContentError> {
    let mut faq: FaqContent = serde_yaml::from_str(raw)
        .map_err(|e| ContentError::Parse(format!("Failed to parse FAQ: {e}")))?;

    for item in &mut faq.items {
        item.question = item.question.trim().to_string();
        item.answer = item.answer.trim().to_string();
    }
    faq.items
        .retain(|item| !item.question.is_empty() && !item.answer.is_empty());

    Ok(faq)
}

/// Content loading errors
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r"
categories:
  - slug: ordering
    name: Ordering
  - slug: shipping
    name: Shipping
items:
  - category: ordering
    question: '  How do I send my artwork? '
    answer: Put a link to your file in the order notes.
  - category: shipping
    question: How long does delivery take?
    answer: |
      Two to five working days after printing.
  - category: shipping
    question: ''
    answer: dropped
";

    #[test]
    fn test_parse_faq_trims_and_drops_blank_entries() {
        let faq = parse_faq(SAMPLE).unwrap();
        assert_eq!(faq.categories.len(), 2);
        assert_eq!(faq.items.len(), 2);
        assert_eq!(faq.items[0].question, "How do I send my artwork?");
        assert_eq!(
            faq.items[1].answer,
            "Two to five working days after printing."
        );
    }

    #[test]
    fn test_parse_faq_rejects_garbage() {
        assert!(matches!(
            parse_faq("items: [unclosed"),
            Err(ContentError::Parse(_))
        ));
    }

    #[test]
    fn test_load_missing_dir_is_empty() {
        let store = ContentStore::load(Path::new("/nonexistent/printshop-content")).unwrap();
        assert!(store.faq_items().is_empty());
    }

    #[test]
    fn test_bundled_faq_parses() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("content");
        let store = ContentStore::load(&dir).unwrap();
        assert!(!store.faq_items().is_empty());
        assert!(store.faq().orphaned_items().is_empty());
    }
}
