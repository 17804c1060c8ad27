//! Collision filtering for segment casts
//!
//! A filter carries a belongs-to mask, a collides-with mask, and a group
//! index. Two filters pass when each side's belongs-to mask overlaps the
//! other side's collides-with mask; a shared non-zero group index overrides
//! the masks (positive forces collision, negative forbids it).

/// Layer-mask collision filter attached to queries and colliders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionFilter {
    /// Layers this object belongs to
    pub belongs_to: u32,
    /// Layers this object collides with
    pub collides_with: u32,
    /// Group override: 0 = use masks, same positive = always collide,
    /// same negative = never collide
    pub group_index: i32,
}

impl CollisionFilter {
    /// Matches every layer and every group; the filter used for every
    /// pairwise query in this engine
    pub const MATCH_ALL: Self = Self {
        belongs_to: u32::MAX,
        collides_with: u32::MAX,
        group_index: 0,
    };

    /// Matches nothing
    pub const NONE: Self = Self {
        belongs_to: 0,
        collides_with: 0,
        group_index: 0,
    };

    /// Check whether a cast with this filter should test against `other`
    ///
    /// The mask test is mutual: this filter's belongs-to must be in the
    /// other's collides-with AND vice versa.
    pub fn should_collide(&self, other: &CollisionFilter) -> bool {
        if self.group_index != 0 && self.group_index == other.group_index {
            return self.group_index > 0;
        }

        (self.belongs_to & other.collides_with) != 0 && (other.belongs_to & self.collides_with) != 0
    }
}

impl Default for CollisionFilter {
    fn default() -> Self {
        Self::MATCH_ALL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_all_collides_with_itself() {
        assert!(CollisionFilter::MATCH_ALL.should_collide(&CollisionFilter::MATCH_ALL));
    }

    #[test]
    fn mask_test_is_mutual() {
        let a = CollisionFilter {
            belongs_to: 1 << 0,
            collides_with: 1 << 1,
            group_index: 0,
        };
        let b = CollisionFilter {
            belongs_to: 1 << 1,
            collides_with: 1 << 0,
            group_index: 0,
        };
        assert!(a.should_collide(&b));

        // One-way interest is not enough
        let deaf = CollisionFilter {
            belongs_to: 1 << 1,
            collides_with: 1 << 2,
            group_index: 0,
        };
        assert!(!a.should_collide(&deaf));
    }

    #[test]
    fn group_index_overrides_masks() {
        let mut a = CollisionFilter::NONE;
        let mut b = CollisionFilter::NONE;
        a.group_index = 7;
        b.group_index = 7;
        assert!(a.should_collide(&b), "shared positive group forces collision");

        let mut c = CollisionFilter::MATCH_ALL;
        let mut d = CollisionFilter::MATCH_ALL;
        c.group_index = -3;
        d.group_index = -3;
        assert!(!c.should_collide(&d), "shared negative group forbids collision");
    }

    #[test]
    fn none_matches_nothing() {
        assert!(!CollisionFilter::NONE.should_collide(&CollisionFilter::MATCH_ALL));
    }
}
