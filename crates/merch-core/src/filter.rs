//! Category filters and the filtered catalog view.
//!
//! Certificates cut across categories: they get their own filter whenever any
//! product matches the certificate predicate, and they stay visible under
//! every category filter.

use std::collections::{BTreeSet, HashMap};
use std::convert::Infallible;
use std::str::FromStr;

use crate::product::{category_label, Product, ProductId, CERTIFICATE_CATEGORY};

pub const ALL_FILTER_ID: &str = "all";
pub const ALL_FILTER_LABEL: &str = "Весь каталог";

/// Categories that get a filter button, in display order. Categories outside
/// this list never get a button.
pub const CATEGORY_PRIORITY: [&str; 4] = [CERTIFICATE_CATEGORY, "hoodie", "shorts", "longsleeve"];

/// Third hero counter; constant on the storefront.
const HERO_THIRD_STAT: usize = 100;

/// The currently selected filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum ActiveFilter {
    #[default]
    All,
    Certificate,
    Category(String),
}

impl ActiveFilter {
    /// Maps a filter id to a filter. Empty ids mean "all".
    #[must_use]
    pub fn from_id(id: &str) -> Self {
        match id {
            "" | ALL_FILTER_ID => Self::All,
            CERTIFICATE_CATEGORY => Self::Certificate,
            other => Self::Category(other.to_owned()),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::All => ALL_FILTER_ID,
            Self::Certificate => CERTIFICATE_CATEGORY,
            Self::Category(category) => category,
        }
    }
}

impl FromStr for ActiveFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_id(s))
    }
}

impl std::fmt::Display for ActiveFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// One entry of the filter bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterButton {
    pub id: &'static str,
    pub label: &'static str,
    pub active: bool,
}

/// Categories that deserve a filter button, in [`CATEGORY_PRIORITY`] order.
///
/// A literal category counts when at least one product carries it;
/// `certificate` also counts when any product matches the certificate
/// predicate.
#[must_use]
pub fn available_categories(catalog: &[Product]) -> Vec<&'static str> {
    let mut present: BTreeSet<&str> = catalog
        .iter()
        .filter_map(|p| p.category.as_deref())
        .filter(|c| !c.is_empty())
        .collect();
    if catalog.iter().any(Product::is_certificate) {
        present.insert(CERTIFICATE_CATEGORY);
    }

    CATEGORY_PRIORITY
        .into_iter()
        .filter(|c| present.contains(c))
        .collect()
}

/// Builds the filter bar: "all" first, then every available category.
///
/// The button whose id equals `active` is marked active; callers keep
/// `active` within the rendered ids (see [`crate::ViewState`]).
#[must_use]
pub fn build_filters(catalog: &[Product], active: &ActiveFilter) -> Vec<FilterButton> {
    let active_id = active.id();
    std::iter::once((ALL_FILTER_ID, ALL_FILTER_LABEL))
        .chain(
            available_categories(catalog)
                .into_iter()
                .map(|c| (c, category_label(c))),
        )
        .map(|(id, label)| FilterButton {
            id,
            label,
            active: id == active_id,
        })
        .collect()
}

/// Products visible under `active`, borrowed from `catalog`.
///
/// - `All`: the whole catalog in order.
/// - `Certificate`: certificate products in catalog order.
/// - `Category(c)`: products with literal category `c` followed by all
///   certificates, deduplicated by id. A repeated id keeps its first position
///   but the last instance seen. Products without an id are dropped.
#[must_use]
pub fn filtered_view<'a>(catalog: &'a [Product], active: &ActiveFilter) -> Vec<&'a Product> {
    match active {
        ActiveFilter::All => catalog.iter().collect(),
        ActiveFilter::Certificate => catalog.iter().filter(|p| p.is_certificate()).collect(),
        ActiveFilter::Category(category) => {
            let in_category = catalog
                .iter()
                .filter(|p| p.category.as_deref() == Some(category.as_str()));
            let certificates = catalog.iter().filter(|p| p.is_certificate());

            let mut order: Vec<&ProductId> = Vec::new();
            let mut by_id: HashMap<&ProductId, &Product> = HashMap::new();
            for product in in_category.chain(certificates) {
                let Some(id) = product.id.as_ref() else {
                    continue;
                };
                if by_id.insert(id, product).is_none() {
                    order.push(id);
                }
            }

            order
                .into_iter()
                .filter_map(|id| by_id.get(id).copied())
                .collect()
        }
    }
}

/// Counters shown in the page hero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeroStats {
    pub total_products: usize,
    /// Distinct non-empty literal categories.
    pub total_categories: usize,
    pub third: usize,
}

impl HeroStats {
    #[must_use]
    pub fn from_catalog(catalog: &[Product]) -> Self {
        let categories: BTreeSet<&str> = catalog
            .iter()
            .filter_map(|p| p.category.as_deref())
            .filter(|c| !c.is_empty())
            .collect();
        Self {
            total_products: catalog.len(),
            total_categories: categories.len(),
            third: HERO_THIRD_STAT,
        }
    }
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
