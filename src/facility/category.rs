//! # Spot and vehicle categories.
//!
//! A [`Category`] tags both a physical spot and the vehicle that wants one.
//! Three categories are active and own a free-spot pool; [`Category::Inactive`]
//! marks cells that can never be allocated.
//!
//! | Category                  | Code | Numeric | Pool |
//! |---------------------------|------|---------|------|
//! | [`Category::Motorcycle`]  | `M1` | 0       | yes  |
//! | [`Category::Bicycle`]     | `B1` | 1       | yes  |
//! | [`Category::Automobile`]  | `A1` | 2       | yes  |
//! | [`Category::Inactive`]    | `X0` | 3       | no   |

use std::fmt;
use std::str::FromStr;

/// Class of a parking spot or vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Motorcycle spot (`M1`).
    Motorcycle,
    /// Bicycle spot (`B1`).
    Bicycle,
    /// Automobile spot (`A1`).
    Automobile,
    /// Unusable cell (`X0`).
    Inactive,
}

impl Category {
    /// Every category, in numeric-code order.
    pub const ALL: [Category; 4] = [
        Category::Motorcycle,
        Category::Bicycle,
        Category::Automobile,
        Category::Inactive,
    ];

    /// Categories that can hold vehicles, in pool-index order.
    pub const ACTIVE: [Category; 3] = [
        Category::Motorcycle,
        Category::Bicycle,
        Category::Automobile,
    ];

    /// Short code used in reports (`M1`, `B1`, `A1`, `X0`).
    pub fn code(&self) -> &'static str {
        match self {
            Category::Motorcycle => "M1",
            Category::Bicycle => "B1",
            Category::Automobile => "A1",
            Category::Inactive => "X0",
        }
    }

    /// Lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Category::Motorcycle => "motorcycle",
            Category::Bicycle => "bicycle",
            Category::Automobile => "automobile",
            Category::Inactive => "inactive",
        }
    }

    /// Index of the category's free-spot pool, or `None` for [`Category::Inactive`].
    #[inline]
    pub fn pool_index(&self) -> Option<usize> {
        match self {
            Category::Motorcycle => Some(0),
            Category::Bicycle => Some(1),
            Category::Automobile => Some(2),
            Category::Inactive => None,
        }
    }

    /// True if spots of this category can be allocated.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.pool_index().is_some()
    }

    /// Maps a numeric code back to a category.
    ///
    /// Returns `None` for codes outside `0..=3`.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a string names no category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category {0:?}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Accepts the short code (`"A1"`) or the name (`"automobile"`), case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        let named = |c: &Category| {
            c.code().eq_ignore_ascii_case(needle) || c.name().eq_ignore_ascii_case(needle)
        };
        Self::ALL
            .into_iter()
            .find(named)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_indices_are_dense() {
        let idx: Vec<usize> = Category::ACTIVE
            .iter()
            .filter_map(|c| c.pool_index())
            .collect();
        assert_eq!(idx, vec![0, 1, 2]);
        assert_eq!(Category::Inactive.pool_index(), None);
    }

    #[test]
    fn numeric_codes_round_trip() {
        assert_eq!(Category::from_code(0), Some(Category::Motorcycle));
        assert_eq!(Category::from_code(3), Some(Category::Inactive));
        assert_eq!(Category::from_code(4), None);
    }

    #[test]
    fn parses_codes_and_names() {
        assert_eq!("a1".parse::<Category>(), Ok(Category::Automobile));
        assert_eq!("Bicycle".parse::<Category>(), Ok(Category::Bicycle));
        assert_eq!(" X0 ".parse::<Category>(), Ok(Category::Inactive));
        assert!("truck".parse::<Category>().is_err());
    }
}
