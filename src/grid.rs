use std::ops::{Index, IndexMut};

/// Smallest supported grid side: one interior cell surrounded by border.
pub const MIN_GRID_SIZE: usize = 3;

/// Square, fixed-size 2D grid stored row-major (`y * n + x`).
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    n: usize,
    cells: Vec<T>,
}

impl<T: Clone + Default> Grid<T> {
    /// Allocate an `n×n` grid filled with `T::default()`.
    pub fn new(n: usize) -> Self {
        Self { n, cells: vec![T::default(); n * n] }
    }

    /// Reset every cell to `T::default()`.
    pub fn clear(&mut self) {
        self.fill(T::default());
    }

    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }
}

impl<T> Grid<T> {
    /// Side length.
    pub fn size(&self) -> usize {
        self.n
    }

    #[inline(always)]
    pub const fn index_of(x: usize, y: usize, n: usize) -> usize {
        y * n + x
    }

    /// True if `(x, y)` lies anywhere inside `[0, n-1]²`.
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.n && (y as usize) < self.n
    }

    /// True if `(x, y)` lies in the open interior `[1, n-2]²`.
    pub fn is_interior(&self, x: i32, y: i32) -> bool {
        x >= 1 && y >= 1 && (x as usize) < self.n.saturating_sub(1) && (y as usize) < self.n.saturating_sub(1)
    }

    /// True if `(x, y)` is on row/column 0 or n-1.
    pub fn is_border(&self, x: usize, y: usize) -> bool {
        x == 0 || y == 0 || x == self.n - 1 || y == self.n - 1
    }

    pub fn get(&self, x: i32, y: i32) -> Option<&T> {
        if self.in_bounds(x, y) {
            Some(&self.cells[Self::index_of(x as usize, y as usize, self.n)])
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut T> {
        if self.in_bounds(x, y) {
            let n = self.n;
            Some(&mut self.cells[Self::index_of(x as usize, y as usize, n)])
        } else {
            None
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.cells.iter()
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    #[inline(always)]
    fn index(&self, (x, y): (usize, usize)) -> &T {
        &self.cells[Self::index_of(x, y, self.n)]
    }
}

impl<T> IndexMut<(usize, usize)> for Grid<T> {
    #[inline(always)]
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut T {
        let n = self.n;
        &mut self.cells[Self::index_of(x, y, n)]
    }
}
