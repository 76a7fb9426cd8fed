//! # Spot addressing.
//!
//! - [`Coordinate`]: (floor, column, row) triple of a physical spot.
//! - [`SpotId`]: external handle, rendered as `floor-row-column`.
//! - [`Dimensions`]: the static size of the grid.

use std::fmt;
use std::str::FromStr;

use crate::error::FacilityError;

/// Location of one spot in the facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    /// Floor index.
    pub floor: usize,
    /// Column index within the floor.
    pub column: usize,
    /// Row index within the column.
    pub row: usize,
}

impl Coordinate {
    /// Creates a coordinate.
    pub const fn new(floor: usize, column: usize, row: usize) -> Self {
        Self { floor, column, row }
    }

    /// Canonical handle for this coordinate.
    #[inline]
    pub fn spot_id(self) -> SpotId {
        SpotId(self)
    }
}

/// Canonical identifier of a spot.
///
/// Displays as `floor-row-column`; note the row comes before the column.
///
/// ```
/// use parkvisor::{Coordinate, SpotId};
///
/// let id = Coordinate::new(2, 7, 4).spot_id();
/// assert_eq!(id.to_string(), "2-4-7");
/// assert_eq!("2-4-7".parse::<SpotId>().unwrap(), id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpotId(Coordinate);

impl SpotId {
    /// The coordinate this id refers to.
    #[inline]
    pub fn coordinate(&self) -> Coordinate {
        self.0
    }

    /// True if `raw` is this id's canonical string form.
    pub fn matches(&self, raw: &str) -> bool {
        raw.parse::<SpotId>().is_ok_and(|other| other == *self)
    }
}

impl From<Coordinate> for SpotId {
    fn from(c: Coordinate) -> Self {
        SpotId(c)
    }
}

impl fmt::Display for SpotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Coordinate { floor, column, row } = self.0;
        write!(f, "{floor}-{row}-{column}")
    }
}

/// Returned when a string is not a `floor-row-column` spot id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed spot id {0:?}")]
pub struct MalformedSpotId(pub String);

impl FromStr for SpotId {
    type Err = MalformedSpotId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || MalformedSpotId(s.to_string());

        let mut parts = s.split('-');
        let mut next = || -> Result<usize, MalformedSpotId> {
            let part = parts.next().ok_or_else(bad)?;
            // Reject "+1" and "01" so only the canonical rendering parses.
            if part.is_empty()
                || !part.bytes().all(|b| b.is_ascii_digit())
                || (part.len() > 1 && part.starts_with('0'))
            {
                return Err(bad());
            }
            part.parse().map_err(|_| bad())
        };

        let floor = next()?;
        let row = next()?;
        let column = next()?;
        if parts.next().is_some() {
            return Err(bad());
        }
        Ok(SpotId(Coordinate { floor, column, row }))
    }
}

/// Static size of the grid: floors × columns × rows.
///
/// Only [`Dimensions::new`] builds one, so the cell count always fits in
/// `usize`.
///
/// ```compile_fail
/// let dims = parkvisor::Dimensions {
///     floors: usize::MAX,
///     columns: 2,
///     rows: 1,
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    floors: usize,
    columns: usize,
    rows: usize,
}

impl Dimensions {
    /// Creates dimensions, rejecting sizes whose cell count overflows `usize`.
    pub fn new(floors: usize, columns: usize, rows: usize) -> Result<Self, FacilityError> {
        let dims = Self {
            floors,
            columns,
            rows,
        };
        if dims.checked_cells().is_none() {
            return Err(FacilityError::InvalidDimensions {
                floors,
                columns,
                rows,
            });
        }
        Ok(dims)
    }

    fn checked_cells(&self) -> Option<usize> {
        let per_floor = self.columns.checked_mul(self.rows)?;
        self.floors.checked_mul(per_floor)
    }

    /// Number of floors.
    #[inline]
    pub fn floors(&self) -> usize {
        self.floors
    }

    /// Columns per floor.
    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Rows per column.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Total number of cells.
    #[inline]
    pub fn cells(&self) -> usize {
        self.checked_cells().unwrap_or(usize::MAX)
    }

    /// True if `c` lies inside the grid.
    #[inline]
    pub fn contains(&self, c: Coordinate) -> bool {
        c.floor < self.floors && c.column < self.columns && c.row < self.rows
    }

    /// Flat index of `c` (floor-major, then column, then row).
    #[inline]
    pub(crate) fn index_of(&self, c: Coordinate) -> Option<usize> {
        self.contains(c)
            .then(|| (c.floor * self.columns + c.column) * self.rows + c.row)
    }

    /// All coordinates in visiting order: floor → column → row.
    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> + use<> {
        let dims = *self;
        (0..dims.cells()).map(move |i| dims.coordinate_at(i))
    }

    /// Inverse of [`index_of`](Self::index_of); `index` must be below `cells()`.
    fn coordinate_at(&self, index: usize) -> Coordinate {
        let row = index % self.rows;
        let column = index / self.rows % self.columns;
        let floor = index / self.rows / self.columns;
        Coordinate::new(floor, column, row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spot_id_puts_row_before_column() {
        let id = Coordinate::new(1, 20, 300).spot_id();
        assert_eq!(id.to_string(), "1-300-20");
        assert!(id.matches("1-300-20"));
        assert!(!id.matches("1-20-300"));
    }

    #[test]
    fn rejects_non_canonical_ids() {
        for raw in [
            "", "1-2", "1-2-3-4", "a-b-c", "1--3", "01-2-3", "+1-2-3", "-1-2-3",
        ] {
            assert!(raw.parse::<SpotId>().is_err(), "{raw:?} should not parse");
        }
        assert!("0-0-0".parse::<SpotId>().is_ok());
    }

    #[test]
    fn overflowing_dimensions_are_rejected() {
        assert!(Dimensions::new(usize::MAX, 2, 1).is_err());
        assert!(Dimensions::new(2, usize::MAX, 2).is_err());
        assert_eq!(Dimensions::new(8, 10, 10).map(|d| d.cells()), Ok(800));
        assert_eq!(Dimensions::new(0, 10, 10).map(|d| d.cells()), Ok(0));
    }

    #[test]
    fn accepted_dimensions_keep_their_sides() {
        let dims = Dimensions::new(usize::MAX, 1, 1).unwrap();
        assert_eq!((dims.floors(), dims.columns(), dims.rows()), (usize::MAX, 1, 1));
        assert_eq!(dims.cells(), usize::MAX);
        assert!(dims.contains(Coordinate::new(usize::MAX - 1, 0, 0)));
        assert!(!dims.contains(Coordinate::new(0, 1, 0)));
    }

    #[test]
    fn coordinates_visit_floor_column_row() {
        let dims = Dimensions::new(2, 2, 2).unwrap();
        let all: Vec<Coordinate> = dims.coordinates().collect();
        assert_eq!(all.len(), 8);
        assert_eq!(all[0], Coordinate::new(0, 0, 0));
        assert_eq!(all[1], Coordinate::new(0, 0, 1));
        assert_eq!(all[2], Coordinate::new(0, 1, 0));
        assert_eq!(all[7], Coordinate::new(1, 1, 1));
        for (i, c) in all.iter().enumerate() {
            assert_eq!(dims.index_of(*c), Some(i));
        }
        assert_eq!(dims.index_of(Coordinate::new(2, 0, 0)), None);
    }
}
