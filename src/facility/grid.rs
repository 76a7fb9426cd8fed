//! # Static occupancy grid.
//!
//! [`SpotGrid`] records the [`Category`] of every cell. It is filled exactly
//! once, when the facility is built, and is read-only afterwards; occupancy is
//! tracked by the free-spot pools and the vehicle registry, never here.
//!
//! Cells are stored densely, floor-major, then column, then row; that is also
//! the order in which seeding visits them.

use super::category::Category;
use super::random::RandomSource;
use super::spot::{Coordinate, Dimensions};

/// Category of every cell in the facility.
#[derive(Debug, Clone)]
pub struct SpotGrid {
    dims: Dimensions,
    cells: Vec<Category>,
}

impl SpotGrid {
    /// Grid with every cell [`Category::Inactive`].
    pub fn inactive(dims: Dimensions) -> Self {
        Self {
            dims,
            cells: vec![Category::Inactive; dims.cells()],
        }
    }

    /// Grid whose cells are assigned by `layout`, visited floor → column → row.
    pub fn from_fn(dims: Dimensions, mut layout: impl FnMut(Coordinate) -> Category) -> Self {
        let cells = dims.coordinates().map(&mut layout).collect();
        Self { dims, cells }
    }

    /// Grid where each cell independently draws one of the four categories uniformly.
    pub fn seeded<R: RandomSource + ?Sized>(dims: Dimensions, rng: &mut R) -> Self {
        Self::from_fn(dims, |_| {
            rng.choose_one_of(&Category::ALL)
                .copied()
                .unwrap_or(Category::Inactive)
        })
    }

    /// Size of the grid.
    #[inline]
    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    /// Category at `c`, or `None` outside the grid.
    pub fn get(&self, c: Coordinate) -> Option<Category> {
        self.dims.index_of(c).map(|i| self.cells[i])
    }

    /// Cells of `category`, in visiting order.
    pub fn cells_of(&self, category: Category) -> impl Iterator<Item = Coordinate> + '_ {
        self.dims
            .coordinates()
            .zip(self.cells.iter())
            .filter(move |(_, cell)| **cell == category)
            .map(|(c, _)| c)
    }

    /// Number of cells per category, indexed like [`Category::ALL`].
    pub fn counts(&self) -> [usize; 4] {
        let mut counts = [0usize; 4];
        for cell in &self.cells {
            let slot = Category::ALL.iter().position(|c| c == cell).unwrap_or(3);
            counts[slot] += 1;
        }
        counts
    }
}
