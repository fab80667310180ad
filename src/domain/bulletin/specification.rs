use super::model::Bulletin;
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// A single filter condition the store knows how to push down.
#[derive(Debug, Clone, PartialEq)]
pub enum BulletinFilter {
    OwnerNotEmpty,
    /// Substring of title or description after per-character Unicode
    /// lowercasing. No full case folding: `STRASSE` does not match `straße`.
    /// Postgres `ILIKE` follows the database collation, which agrees for
    /// one-to-one case mappings such as `É`/`é`.
    SearchString(String),
    MinPrice(Decimal),
    MaxPrice(Decimal),
    ByUser(Uuid),
    ByCategorySet(HashSet<Uuid>),
}

impl BulletinFilter {
    pub fn matches(&self, bulletin: &Bulletin) -> bool {
        match self {
            Self::OwnerNotEmpty => !bulletin.owner_id.is_nil(),
            Self::SearchString(needle) => {
                let needle = needle.to_lowercase();
                bulletin.title.to_lowercase().contains(&needle)
                    || bulletin.description.to_lowercase().contains(&needle)
            }
            Self::MinPrice(min) => bulletin.price >= *min,
            Self::MaxPrice(max) => bulletin.price <= *max,
            Self::ByUser(user_id) => bulletin.owner_id == *user_id,
            Self::ByCategorySet(ids) => ids.contains(&bulletin.category_id),
        }
    }

    /// Relative evaluation cost, lower runs first.
    fn cost(&self) -> u8 {
        match self {
            Self::OwnerNotEmpty | Self::ByUser(_) | Self::MinPrice(_) | Self::MaxPrice(_) => 0,
            Self::ByCategorySet(_) => 1,
            Self::SearchString(_) => 2,
        }
    }
}

pub type BulletinPredicate = Arc<dyn Fn(&Bulletin) -> bool + Send + Sync>;

/// Composable boolean predicate over a bulletin.
#[derive(Clone)]
pub enum Specification {
    Filter(BulletinFilter),
    Predicate(BulletinPredicate),
    And(Box<Specification>, Box<Specification>),
}

/// Leaf of a flattened specification.
pub enum Conjunct<'a> {
    Filter(&'a BulletinFilter),
    Predicate(&'a BulletinPredicate),
}

impl Specification {
    pub fn from_predicate<F>(predicate: F) -> Self
    where
        F: Fn(&Bulletin) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(predicate))
    }

    pub fn owner_not_empty() -> Self {
        Self::Filter(BulletinFilter::OwnerNotEmpty)
    }

    pub fn search_string(search: impl Into<String>) -> Self {
        Self::Filter(BulletinFilter::SearchString(search.into()))
    }

    pub fn min_price(price: Decimal) -> Self {
        Self::Filter(BulletinFilter::MinPrice(price))
    }

    pub fn max_price(price: Decimal) -> Self {
        Self::Filter(BulletinFilter::MaxPrice(price))
    }

    pub fn by_user(user_id: Uuid) -> Self {
        Self::Filter(BulletinFilter::ByUser(user_id))
    }

    pub fn by_category_set(category_ids: HashSet<Uuid>) -> Self {
        Self::Filter(BulletinFilter::ByCategorySet(category_ids))
    }

    pub fn and(self, other: Specification) -> Self {
        Self::And(Box::new(self), Box::new(other))
    }

    /// Evaluates the specification against one in-memory candidate.
    ///
    /// Filters are checked cheapest first and evaluation stops at the first
    /// unsatisfied one. Arbitrary predicates keep their position relative to
    /// each other and run after every filter.
    pub fn is_satisfied_by(&self, candidate: &Bulletin) -> bool {
        let mut filters = Vec::new();
        let mut predicates = Vec::new();
        for conjunct in self.conjuncts() {
            match conjunct {
                Conjunct::Filter(filter) => filters.push(filter),
                Conjunct::Predicate(predicate) => predicates.push(predicate),
            }
        }
        filters.sort_by_key(|f| f.cost());

        filters.iter().all(|f| f.matches(candidate))
            && predicates.iter().all(|p| p(candidate))
    }

    /// Flattens the AND tree into its leaves, left to right.
    pub fn conjuncts(&self) -> Vec<Conjunct<'_>> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(spec) = stack.pop() {
            match spec {
                Self::Filter(filter) => out.push(Conjunct::Filter(filter)),
                Self::Predicate(predicate) => out.push(Conjunct::Predicate(predicate)),
                Self::And(left, right) => {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
        out
    }

    /// Filters that can be translated into a store query.
    pub fn filters(&self) -> Vec<&BulletinFilter> {
        self.conjuncts()
            .into_iter()
            .filter_map(|c| match c {
                Conjunct::Filter(filter) => Some(filter),
                Conjunct::Predicate(_) => None,
            })
            .collect()
    }

    /// True when every leaf is a [`BulletinFilter`].
    pub fn is_translatable(&self) -> bool {
        self.conjuncts()
            .iter()
            .all(|c| matches!(c, Conjunct::Filter(_)))
    }
}

impl fmt::Debug for Specification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filter(filter) => write!(f, "{:?}", filter),
            Self::Predicate(_) => write!(f, "Predicate(<fn>)"),
            Self::And(left, right) => write!(f, "And({:?}, {:?})", left, right),
        }
    }
}
