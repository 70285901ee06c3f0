//! In-memory list filters.
//!
//! Each filter is a single linear scan over records that were already
//! loaded for the page: a case-insensitive substring search plus an optional
//! exact match on a status or category. An empty (or whitespace-only)
//! search and an `all` selector both match everything.

use crate::faq::FaqItem;
use crate::types::OrderStatus;

/// Value used by list pages for "no restriction" in select boxes.
pub const ALL: &str = "all";

/// Normalize a search string: trim, lowercase, `None` when empty.
#[must_use]
pub fn normalize_search(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

/// Normalize a select value: trim, `None` for empty or [`ALL`].
#[must_use]
pub fn normalize_selector(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case(ALL))
        .map(str::to_owned)
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

// =============================================================================
// Orders
// =============================================================================

/// An order as seen by list filters.
pub trait OrderRecord {
    fn order_number(&self) -> &str;
    fn status(&self) -> OrderStatus;
    /// Other searchable text: product names, recipient, customer email.
    fn search_terms(&self) -> Vec<&str>;
}

/// Order history / admin order list filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    search: Option<String>,
    status: Option<OrderStatus>,
}

impl OrderFilter {
    /// Build a filter from raw query parameters.
    ///
    /// Unknown status values are treated as "all".
    #[must_use]
    pub fn from_query(search: Option<&str>, status: Option<&str>) -> Self {
        Self {
            search: normalize_search(search),
            status: normalize_selector(status).and_then(|s| s.parse().ok()),
        }
    }

    #[must_use]
    pub const fn status(&self) -> Option<OrderStatus> {
        self.status
    }

    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    #[must_use]
    pub fn matches<T: OrderRecord>(&self, order: &T) -> bool {
        if self.status.is_some_and(|status| order.status() != status) {
            return false;
        }
        match &self.search {
            None => true,
            Some(needle) => {
                contains_ci(order.order_number(), needle)
                    || order
                        .search_terms()
                        .into_iter()
                        .any(|term| contains_ci(term, needle))
            }
        }
    }

    /// Keep matching orders, preserving input order.
    #[must_use]
    pub fn apply<'a, T: OrderRecord>(&self, orders: &'a [T]) -> Vec<&'a T> {
        orders.iter().filter(|order| self.matches(*order)).collect()
    }
}

// =============================================================================
// FAQ
// =============================================================================

/// FAQ search/category filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaqFilter {
    search: Option<String>,
    category: Option<String>,
}

impl FaqFilter {
    #[must_use]
    pub fn from_query(search: Option<&str>, category: Option<&str>) -> Self {
        Self {
            search: normalize_search(search),
            category: normalize_selector(category),
        }
    }

    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    #[must_use]
    pub fn matches(&self, item: &FaqItem) -> bool {
        if self
            .category
            .as_deref()
            .is_some_and(|category| item.category != category)
        {
            return false;
        }
        self.search.as_deref().is_none_or(|needle| {
            contains_ci(&item.question, needle) || contains_ci(&item.answer, needle)
        })
    }

    #[must_use]
    pub fn apply<'a>(&self, items: &'a [FaqItem]) -> Vec<&'a FaqItem> {
        items.iter().filter(|item| self.matches(item)).collect()
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// A product as seen by catalog filters.
pub trait CatalogRecord {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn category_slug(&self) -> &str;
    fn is_active(&self) -> bool;
}

/// Catalog search with optional category and active-state restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    search: Option<String>,
    category: Option<String>,
    active: Option<bool>,
}

impl CatalogFilter {
    /// Build a filter from raw query parameters.
    ///
    /// `state` accepts `active`, `inactive` or `all`.
    #[must_use]
    pub fn from_query(search: Option<&str>, category: Option<&str>, state: Option<&str>) -> Self {
        let active = match normalize_selector(state).as_deref() {
            Some("active") => Some(true),
            Some("inactive") => Some(false),
            _ => None,
        };
        Self {
            search: normalize_search(search),
            category: normalize_selector(category),
            active,
        }
    }

    /// Restrict to active products (the storefront never shows inactive ones).
    #[must_use]
    pub const fn only_active(mut self) -> Self {
        self.active = Some(true);
        self
    }

    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    #[must_use]
    pub fn matches<T: CatalogRecord>(&self, product: &T) -> bool {
        if self.active.is_some_and(|active| product.is_active() != active) {
            return false;
        }
        if self
            .category
            .as_deref()
            .is_some_and(|category| product.category_slug() != category)
        {
            return false;
        }
        self.search.as_deref().is_none_or(|needle| {
            contains_ci(product.name(), needle) || contains_ci(product.description(), needle)
        })
    }

    #[must_use]
    pub fn apply<'a, T: CatalogRecord>(&self, products: &'a [T]) -> Vec<&'a T> {
        products.iter().filter(|p| self.matches(*p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Order {
        number: &'static str,
        status: OrderStatus,
        items: Vec<&'static str>,
    }

    impl OrderRecord for Order {
        fn order_number(&self) -> &str {
            self.number
        }

        fn status(&self) -> OrderStatus {
            self.status
        }

        fn search_terms(&self) -> Vec<&str> {
            self.items.clone()
        }
    }

    fn orders() -> Vec<Order> {
        vec![
            Order {
                number: "PS-20260101-0001",
                status: OrderStatus::Pending,
                items: vec!["Business Cards", "Flyers A5"],
            },
            Order {
                number: "PS-20260102-0002",
                status: OrderStatus::Shipped,
                items: vec!["Sticker Vinyl"],
            },
            Order {
                number: "PS-20260103-0003",
                status: OrderStatus::Completed,
                items: vec!["Flyers A4"],
            },
        ]
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let orders = orders();
        let filter = OrderFilter::from_query(Some("   "), Some("all"));
        assert_eq!(filter.apply(&orders).len(), 3);
    }

    #[test]
    fn test_order_search_is_case_insensitive_on_items() {
        let orders = orders();
        let filter = OrderFilter::from_query(Some("FLYERS"), None);
        let numbers: Vec<_> = filter.apply(&orders).iter().map(|o| o.number).collect();
        assert_eq!(numbers, vec!["PS-20260101-0001", "PS-20260103-0003"]);
    }

    #[test]
    fn test_order_search_by_number_and_status() {
        let orders = orders();
        let filter = OrderFilter::from_query(Some("0002"), Some("shipped"));
        assert_eq!(filter.apply(&orders).len(), 1);

        let filter = OrderFilter::from_query(Some("0002"), Some("pending"));
        assert!(filter.apply(&orders).is_empty());
    }

    #[test]
    fn test_unknown_status_means_all() {
        let filter = OrderFilter::from_query(None, Some("teleported"));
        assert_eq!(filter.status(), None);
    }

    fn faq() -> Vec<FaqItem> {
        vec![
            FaqItem {
                category: "ordering".to_string(),
                question: "Can I cancel my order?".to_string(),
                answer: "Yes, until printing starts.".to_string(),
            },
            FaqItem {
                category: "shipping".to_string(),
                question: "Which couriers do you use?".to_string(),
                answer: "JNE and SiCepat.".to_string(),
            },
        ]
    }

    #[test]
    fn test_faq_search_matches_question_or_answer() {
        let items = faq();
        assert_eq!(FaqFilter::from_query(Some("sicepat"), None).apply(&items).len(), 1);
        assert_eq!(FaqFilter::from_query(Some("cancel"), None).apply(&items).len(), 1);
        assert!(FaqFilter::from_query(Some("refund"), None).apply(&items).is_empty());
    }

    #[test]
    fn test_faq_category_filter() {
        let items = faq();
        let filtered = FaqFilter::from_query(None, Some("shipping")).apply(&items);
        assert_eq!(filtered.len(), 1);
        assert_eq!(FaqFilter::from_query(None, Some("ALL")).apply(&items).len(), 2);
    }

    struct Product {
        name: &'static str,
        category: &'static str,
        active: bool,
    }

    impl CatalogRecord for Product {
        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            ""
        }

        fn category_slug(&self) -> &str {
            self.category
        }

        fn is_active(&self) -> bool {
            self.active
        }
    }

    #[test]
    fn test_catalog_filter_state_and_category() {
        let products = vec![
            Product {
                name: "Business Cards",
                category: "cards",
                active: true,
            },
            Product {
                name: "Kraft Cards",
                category: "cards",
                active: false,
            },
            Product {
                name: "Roll Banner",
                category: "banners",
                active: true,
            },
        ];

        let storefront = CatalogFilter::from_query(Some("cards"), None, None).only_active();
        assert_eq!(storefront.apply(&products).len(), 1);

        let admin_inactive = CatalogFilter::from_query(None, Some("cards"), Some("inactive"));
        assert_eq!(admin_inactive.apply(&products).len(), 1);

        let everything = CatalogFilter::from_query(None, Some("all"), Some("all"));
        assert_eq!(everything.apply(&products).len(), 3);
    }
}
