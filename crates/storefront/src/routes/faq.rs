//! FAQ page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use printshop_core::faq::{FaqCategory, FaqItem};
use printshop_core::filter::FaqFilter;

use crate::filters;
use crate::routes::PageContext;
use crate::state::AppState;

/// FAQ query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct FaqQuery {
    pub q: Option<String>,
    pub category: Option<String>,
}

/// A category heading with the entries that matched.
pub struct FaqSection {
    pub name: String,
    pub items: Vec<FaqItem>,
}

/// FAQ page template.
#[derive(Template, WebTemplate)]
#[template(path = "faq.html")]
pub struct FaqTemplate {
    pub page: PageContext,
    pub categories: Vec<FaqCategory>,
    pub sections: Vec<FaqSection>,
    pub match_count: usize,
    pub search: String,
    pub selected_category: String,
}

/// Group matching entries under their category, in declared category order.
/// Entries with an undeclared category are collected last under their slug.
fn sections(categories: &[FaqCategory], matches: &[&FaqItem]) -> Vec<FaqSection> {
    let mut sections: Vec<FaqSection> = categories
        .iter()
        .map(|category| FaqSection {
            name: category.name.clone(),
            items: matches
                .iter()
                .filter(|item| item.category == category.slug)
                .map(|item| (*item).clone())
                .collect(),
        })
        .collect();

    for item in matches {
        if !categories.iter().any(|c| c.slug == item.category) {
            match sections.iter_mut().find(|s| s.name == item.category) {
                Some(section) => section.items.push((*item).clone()),
                None => sections.push(FaqSection {
                    name: item.category.clone(),
                    items: vec![(*item).clone()],
                }),
            }
        }
    }

    sections.retain(|s| !s.items.is_empty());
    sections
}

/// Display the FAQ, filtered by search text and category.
#[instrument(skip(state, page))]
pub async fn index(
    State(state): State<AppState>,
    page: PageContext,
    Query(query): Query<FaqQuery>,
) -> impl IntoResponse {
    let faq = state.content().faq();
    let filter = FaqFilter::from_query(query.q.as_deref(), query.category.as_deref());
    let matches = filter.apply(&faq.items);

    FaqTemplate {
        page,
        categories: faq.categories.clone(),
        match_count: matches.len(),
        sections: sections(&faq.categories, &matches),
        search: filter.search().unwrap_or_default().to_string(),
        selected_category: filter.category().unwrap_or_default().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(category: &str, question: &str) -> FaqItem {
        FaqItem {
            category: category.to_string(),
            question: question.to_string(),
            answer: "answer".to_string(),
        }
    }

    #[test]
    fn test_sections_follow_category_order() {
        let categories = vec![
            FaqCategory {
                slug: "ordering".to_string(),
                name: "Ordering".to_string(),
            },
            FaqCategory {
                slug: "shipping".to_string(),
                name: "Shipping".to_string(),
            },
        ];
        let items = [
            item("shipping", "How long?"),
            item("misc", "Who are you?"),
            item("ordering", "How do I order?"),
        ];
        let matches: Vec<&FaqItem> = items.iter().collect();

        let sections = sections(&categories, &matches);
        let names: Vec<&str> = sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Ordering", "Shipping", "misc"]);
    }

    #[test]
    fn test_empty_sections_dropped() {
        let categories = vec![FaqCategory {
            slug: "ordering".to_string(),
            name: "Ordering".to_string(),
        }];
        assert!(sections(&categories, &[]).is_empty());
    }
}
