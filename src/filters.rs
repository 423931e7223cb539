// src/filters.rs
use std::cmp::Ordering;
use std::str::FromStr;

use serde::Deserialize;
use sqlx::{Postgres, QueryBuilder};
use strum_macros::EnumString;

use crate::models::Product;

/// Query string of `GET /products`. `categories` may repeat.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ProductListingParams {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub referenced_name: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub order: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString)]
pub enum SortKey {
    #[strum(serialize = "price_asc")]
    PriceAsc,
    #[strum(serialize = "price_desc")]
    PriceDesc,
    #[strum(serialize = "date_asc")]
    DateAsc,
    #[default]
    #[strum(serialize = "date_desc")]
    DateDesc,
}

impl SortKey {
    /// Unknown or missing values fall back to `DateDesc`.
    pub fn from_param(order: Option<&str>) -> Self {
        order
            .and_then(|o| SortKey::from_str(o).ok())
            .unwrap_or_default()
    }

    pub fn order_by(&self) -> &'static str {
        match self {
            SortKey::PriceAsc => "price ASC",
            SortKey::PriceDesc => "price DESC",
            SortKey::DateAsc => "date_added ASC",
            SortKey::DateDesc => "date_added DESC",
        }
    }

    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortKey::PriceAsc => a.price.total_cmp(&b.price),
            SortKey::PriceDesc => b.price.total_cmp(&a.price),
            SortKey::DateAsc => a.date_added.cmp(&b.date_added),
            SortKey::DateDesc => b.date_added.cmp(&a.date_added),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Case-insensitive substring of `name`.
    NameContains(String),
    /// Case-insensitive substring of `referenced_name`.
    ReferencedNameContains(String),
    /// At least one of the values is in `categories`.
    AnyCategory(Vec<String>),
}

impl Predicate {
    fn push_sql(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Predicate::NameContains(term) => {
                builder.push("name ILIKE ").push_bind(like_pattern(term));
            }
            Predicate::ReferencedNameContains(term) => {
                builder
                    .push("referenced_name ILIKE ")
                    .push_bind(like_pattern(term));
            }
            Predicate::AnyCategory(categories) => {
                builder.push("(");
                for (i, category) in categories.iter().enumerate() {
                    if i > 0 {
                        builder.push(" OR ");
                    }
                    builder.push_bind(category.clone()).push(" = ANY(categories)");
                }
                builder.push(")");
            }
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Predicate::NameContains(term) => contains_ignore_case(&product.name, term),
            Predicate::ReferencedNameContains(term) => {
                contains_ignore_case(&product.referenced_name, term)
            }
            Predicate::AnyCategory(categories) => product
                .categories
                .as_deref()
                .is_some_and(|own| categories.iter().any(|c| own.contains(c))),
        }
    }
}

/// Request-scoped filter and ordering for a product listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySpec {
    pub predicates: Vec<Predicate>,
    pub sort_key: SortKey,
}

impl QuerySpec {
    /// Appends ` WHERE ... ORDER BY ...`. Every value goes through `push_bind`.
    pub fn push_sql(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        for (i, predicate) in self.predicates.iter().enumerate() {
            builder.push(if i == 0 { " WHERE " } else { " AND " });
            predicate.push_sql(builder);
        }
        builder.push(" ORDER BY ").push(self.sort_key.order_by());
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.predicates.iter().all(|p| p.matches(product))
    }
}

/// Builds a [`QuerySpec`] from listing parameters. Empty values add no filter.
pub fn compile(params: &ProductListingParams) -> QuerySpec {
    let mut predicates = Vec::new();

    if let Some(name) = params.name.as_deref().filter(|n| !n.is_empty()) {
        predicates.push(Predicate::NameContains(name.to_string()));
    }
    if let Some(ref_name) = params.referenced_name.as_deref().filter(|n| !n.is_empty()) {
        predicates.push(Predicate::ReferencedNameContains(ref_name.to_string()));
    }
    if !params.categories.is_empty() {
        predicates.push(Predicate::AnyCategory(params.categories.clone()));
    }

    QuerySpec {
        predicates,
        sort_key: SortKey::from_param(params.order.as_deref()),
    }
}

fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
