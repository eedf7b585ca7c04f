//! Client-side listing query: filter the live snapshot by the page's
//! criteria, then order it by the selected sort mode.
//!
//! Everything here is pure. The same snapshot and criteria always produce the
//! same sequence, and listings are never modified.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::listing::{Category, Condition, Listing, UnknownVariant};

/// Category selector; `All` disables the predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn label(self) -> &'static str {
        match self {
            CategoryFilter::All => "All",
            CategoryFilter::Only(c) => c.label(),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "All" {
            Ok(CategoryFilter::All)
        } else {
            s.parse().map(CategoryFilter::Only)
        }
    }
}

/// Condition selector; `Any` disables the predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionFilter {
    #[default]
    Any,
    Only(Condition),
}

impl ConditionFilter {
    pub fn label(self) -> &'static str {
        match self {
            ConditionFilter::Any => "Any",
            ConditionFilter::Only(c) => c.label(),
        }
    }
}

impl FromStr for ConditionFilter {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "Any" {
            Ok(ConditionFilter::Any)
        } else {
            s.parse().map(ConditionFilter::Only)
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortMode {
    #[default]
    Newest,
    Oldest,
    PriceAscending,
    PriceDescending,
}

impl SortMode {
    pub fn all() -> &'static [SortMode] {
        &[
            SortMode::Newest,
            SortMode::Oldest,
            SortMode::PriceAscending,
            SortMode::PriceDescending,
        ]
    }

    /// Stable code used as the `<option>` value.
    pub fn code(self) -> &'static str {
        match self {
            SortMode::Newest => "newest",
            SortMode::Oldest => "oldest",
            SortMode::PriceAscending => "price-asc",
            SortMode::PriceDescending => "price-desc",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortMode::Newest => "Newest",
            SortMode::Oldest => "Oldest",
            SortMode::PriceAscending => "Price: Low → High",
            SortMode::PriceDescending => "Price: High → Low",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for SortMode {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(SortMode::Newest),
            "oldest" => Ok(SortMode::Oldest),
            "price-asc" | "plh" => Ok(SortMode::PriceAscending),
            "price-desc" | "phl" => Ok(SortMode::PriceDescending),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// User-entered filter and sort state. Price bounds are kept as the raw
/// input text, they only take effect once they parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criteria {
    pub search: String,
    pub category: CategoryFilter,
    pub condition: ConditionFilter,
    pub min_price: String,
    pub max_price: String,
    pub city: String,
    pub sort: SortMode,
}

impl Criteria {
    pub fn clear(&mut self) {
        *self = Criteria::default();
    }

    /// Lower bound, if the input names a usable number.
    pub fn min_bound(&self) -> Option<f64> {
        parse_bound(&self.min_price)
    }

    pub fn max_bound(&self) -> Option<f64> {
        parse_bound(&self.max_price)
    }

    /// True iff the listing passes every active predicate.
    pub fn matches(&self, listing: &Listing) -> bool {
        self.filter_with(&Predicates::from(self), listing)
    }

    fn filter_with(&self, p: &Predicates, listing: &Listing) -> bool {
        if let Some(needle) = &p.search {
            let haystack = format!("{} {}", listing.title, listing.description).to_lowercase();
            if !haystack.contains(needle.as_str()) {
                return false;
            }
        }

        if let CategoryFilter::Only(c) = self.category {
            if listing.category != c {
                return false;
            }
        }

        if let ConditionFilter::Only(c) = self.condition {
            if listing.condition != c {
                return false;
            }
        }

        // Bounds only ever reject listings that carry a comparable price.
        if let Some(price) = listing.price.filter(|p| p.is_finite()) {
            if p.min.is_some_and(|min| price < min) {
                return false;
            }
            if p.max.is_some_and(|max| price > max) {
                return false;
            }
        }

        if let Some(city) = &p.city {
            if !listing.location.to_lowercase().contains(city.as_str()) {
                return false;
            }
        }

        true
    }
}

/// Criteria normalised once per pipeline run.
struct Predicates {
    search: Option<String>,
    min: Option<f64>,
    max: Option<f64>,
    city: Option<String>,
}

impl From<&Criteria> for Predicates {
    fn from(c: &Criteria) -> Self {
        Predicates {
            search: normalise(&c.search),
            min: c.min_bound(),
            max: c.max_bound(),
            city: normalise(&c.city),
        }
    }
}

fn normalise(text: &str) -> Option<String> {
    let t = text.trim().to_lowercase();
    (!t.is_empty()).then_some(t)
}

/// Blank, unparsable, non-finite and zero inputs leave the bound inactive.
pub fn parse_bound(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v != 0.0)
}

/// Keep the listings that satisfy `criteria`, preserving input order.
pub fn filter<'a>(listings: &'a [Listing], criteria: &Criteria) -> Vec<&'a Listing> {
    let predicates = Predicates::from(criteria);
    listings
        .iter()
        .filter(|l| criteria.filter_with(&predicates, l))
        .collect()
}

/// Stable sort: equal keys keep their relative input order.
pub fn sort(listings: &mut [&Listing], mode: SortMode) {
    match mode {
        SortMode::Newest => listings.sort_by_key(|l| std::cmp::Reverse(l.created_millis())),
        SortMode::Oldest => listings.sort_by_key(|l| l.created_millis()),
        SortMode::PriceAscending => {
            listings.sort_by(|a, b| a.price_key().total_cmp(&b.price_key()))
        }
        SortMode::PriceDescending => {
            listings.sort_by(|a, b| b.price_key().total_cmp(&a.price_key()))
        }
    }
}

/// Filter then sort, returning the listings in display order.
pub fn apply(listings: &[Listing], criteria: &Criteria) -> Vec<Listing> {
    let mut visible = filter(listings, criteria);
    sort(&mut visible, criteria.sort);
    visible.into_iter().cloned().collect()
}

/// Pipeline output plus the size of the snapshot it was drawn from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Visible {
    pub items: Vec<Listing>,
    pub total: usize,
}

impl Visible {
    pub fn summary(&self) -> String {
        format!("Showing {} of {}", self.items.len(), self.total)
    }
}

/// Caches the last pipeline result, keyed on snapshot revision + criteria.
#[derive(Debug, Default)]
pub struct QueryMemo {
    key: Option<(u64, Criteria)>,
    cached: Visible,
}

impl QueryMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// `revision` must change whenever the snapshot does.
    pub fn get(&mut self, revision: u64, listings: &[Listing], criteria: &Criteria) -> &Visible {
        let fresh = matches!(&self.key, Some((rev, c)) if *rev == revision && c == criteria);
        if !fresh {
            tracing::trace!(revision, "recomputing visible listings");
            self.cached = Visible {
                items: apply(listings, criteria),
                total: listings.len(),
            };
            self.key = Some((revision, criteria.clone()));
        }
        &self.cached
    }
}
