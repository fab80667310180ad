use super::dto::SearchBulletinsRequest;
use super::specification::Specification;
use std::collections::HashSet;
use uuid::Uuid;

/// Turns request fields into a composite [`Specification`].
///
/// Absent fields add no constraint.
pub struct SpecificationBuilder;

impl SpecificationBuilder {
    pub fn from_search(request: &SearchBulletinsRequest) -> Specification {
        let mut spec = Specification::owner_not_empty();

        if let Some(search) = request.search.as_deref().map(str::trim) {
            if !search.is_empty() {
                spec = spec.and(Specification::search_string(search));
            }
        }
        if let Some(min_price) = request.min_price {
            spec = spec.and(Specification::min_price(min_price));
        }
        if let Some(max_price) = request.max_price {
            spec = spec.and(Specification::max_price(max_price));
        }
        if let Some(user_id) = request.user_id {
            spec = spec.and(Specification::by_user(user_id));
        }

        spec
    }

    /// Category membership only. Unlike [`Self::from_search`] this does not
    /// add the owner guard.
    pub fn from_category_ids(category_ids: HashSet<Uuid>) -> Specification {
        Specification::by_category_set(category_ids)
    }
}
