//! Storage-free backends: coordinate-transformed and read-only windows
//! over a parent matrix.

use std::marker::PhantomData;

use crate::dims::{crop, sampler, Map};
use crate::error::MatrixError;
use crate::storage::{check_index, scan_start, Element, Matrix};

/// A matrix that is a transformed window over a parent matrix: a crop, a
/// reordering, a mirroring, or a lower-dimensional slice (see
/// [`crop`] and [`sampler`]).
///
/// The view presents its own shape and flat indexes, translated through a
/// [`Map`] on every access; no elements are copied, so writes through the
/// view land in the parent.
///
/// Clearing a view zeroes only the parent cells the view can reach.
///
/// # Examples
///
/// ```
/// use ndmatrix::{Grid, Matrix, View};
///
/// let mut m: Grid<i32> = Grid::new(&[4, 4]);
/// m.set_at(&[2, 3], 9);
///
/// let v = View::sample(&mut m, "yx", &[]).unwrap(); // transposed
/// assert_eq!(v.get_at(&[3, 2]), 9);
/// ```
#[derive(Debug)]
pub struct View<'a, T, P> {
    parent: &'a mut P,
    map: Map,
    marker: PhantomData<T>,
}

impl<'a, T: Element, P: Matrix<T>> View<'a, T, P> {
    /// Creates a view of `parent` through the given map.
    ///
    /// # Panics
    ///
    /// Panics if the map was built for a different parent shape.
    pub fn new(parent: &'a mut P, map: Map) -> Self {
        if map.original() != parent.dims() {
            panic!(
                "view map dimension mismatch: map expects parent shape {:?}, parent is {:?}",
                map.original().lengths(),
                parent.dims().lengths(),
            );
        }
        View {
            parent,
            map,
            marker: PhantomData,
        }
    }

    /// Creates a view of a sub-region of `parent`; shorthand for
    /// [`View::new`] with a [`crop`] map.
    pub fn crop(parent: &'a mut P, start_idx: usize, lengths: &[usize]) -> Self {
        let map = crop(parent.dims(), start_idx, lengths);
        View::new(parent, map)
    }

    /// Creates a view of `parent` with its axes reordered, mirrored,
    /// dropped, or bound to constants; shorthand for [`View::new`] with a
    /// parsed [`sampler`] pattern.
    pub fn sample(
        parent: &'a mut P,
        pattern: &str,
        constants: &[usize],
    ) -> Result<Self, MatrixError> {
        let map = sampler(pattern, constants)?.bind(parent.dims());
        Ok(View::new(parent, map))
    }
}

impl<T: Element, P: Matrix<T>> Matrix<T> for View<'_, T, P> {
    #[inline]
    fn dims(&self) -> &crate::dims::Dims {
        self.map.dims()
    }

    fn get(&self, idx: usize) -> T {
        check_index(idx, self.size());
        self.parent.get(self.map.map_index(idx))
    }

    fn set(&mut self, idx: usize, value: T) {
        check_index(idx, self.size());
        self.parent.set(self.map.map_index(idx), value);
    }

    fn next(&self, after: Option<usize>) -> Option<usize> {
        let zero = T::default();
        (scan_start(after)..self.size()).find(|&i| self.get(i) != zero)
    }

    fn clear(&mut self) {
        let mut it = self.next(None);
        while let Some(idx) = it {
            self.set(idx, T::default());
            it = self.next(Some(idx));
        }
    }
}

/// A read-only wrapper over any matrix.
///
/// Reads pass through, so later changes to the parent are visible;
/// [`set`](Matrix::set) and [`clear`](Matrix::clear) panic. Useful for
/// handing a matrix to code that should only inspect it.
#[derive(Debug)]
pub struct Const<'a, T, P> {
    parent: &'a P,
    marker: PhantomData<T>,
}

impl<'a, T: Element, P: Matrix<T>> Const<'a, T, P> {
    pub fn new(parent: &'a P) -> Self {
        Const {
            parent,
            marker: PhantomData,
        }
    }
}

impl<T: Element, P: Matrix<T>> Matrix<T> for Const<'_, T, P> {
    #[inline]
    fn dims(&self) -> &crate::dims::Dims {
        self.parent.dims()
    }

    fn get(&self, idx: usize) -> T {
        self.parent.get(idx)
    }

    fn set(&mut self, _idx: usize, _value: T) {
        panic!("const matrix is read only");
    }

    fn next(&self, after: Option<usize>) -> Option<usize> {
        self.parent.next(after)
    }

    fn clear(&mut self) {
        panic!("const matrix is read only");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Grid;

    fn numbered(lengths: &[usize]) -> Grid<i32> {
        let mut m = Grid::new(lengths);
        for i in 0..m.size() {
            m.set(i, i as i32);
        }
        m
    }

    #[test]
    fn test_crop_view_reads_and_writes_parent() {
        let mut m = numbered(&[4, 4]);
        let start = m.dims().index(&[1, 1]);
        {
            let mut v = View::crop(&mut m, start, &[2, 2]);
            assert_eq!(v.dims().lengths(), &[2, 2]);
            assert_eq!(v.get_at(&[0, 0]), 5);
            assert_eq!(v.get_at(&[1, 1]), 10);
            v.set_at(&[0, 1], -1);
        }
        assert_eq!(m.get_at(&[1, 2]), -1);
    }

    #[test]
    fn test_sample_view_transposes() {
        let mut m = numbered(&[4, 3]);
        let v = View::sample(&mut m, "yx", &[]).unwrap();
        assert_eq!(v.dims().lengths(), &[3, 4]);
        for y in 0..3 {
            for x in 0..4 {
                assert_eq!(v.get_at(&[y, x]), (x + 4 * y) as i32);
            }
        }
    }

    #[test]
    fn test_view_of_view() {
        let mut m = numbered(&[4, 4]);
        let mut t = View::sample(&mut m, "yx", &[]).unwrap();
        let v = View::crop(&mut t, 0, &[2, 2]);
        // transposed then cropped: (x, y) reads parent (y, x)
        assert_eq!(v.get_at(&[1, 0]), 4);
        assert_eq!(v.get_at(&[0, 1]), 1);
    }

    #[test]
    fn test_view_next_and_clear() {
        let mut m: Grid<i32> = Grid::new(&[4, 4]);
        m.set_at(&[0, 0], 1);
        m.set_at(&[2, 2], 2);
        m.set_at(&[3, 3], 3);
        let start = m.dims().index(&[2, 2]);
        {
            let mut v = View::crop(&mut m, start, &[2, 2]);
            // the crop sees cells (2,2) and (3,3) of the parent
            assert_eq!(v.next(None), Some(0));
            assert_eq!(v.next(Some(0)), Some(3));
            assert_eq!(v.next(Some(3)), None);
            v.clear();
        }
        // only cells inside the view were cleared
        assert_eq!(m.get_at(&[0, 0]), 1);
        assert_eq!(m.get_at(&[2, 2]), 0);
        assert_eq!(m.get_at(&[3, 3]), 0);
    }

    #[test]
    #[should_panic(expected = "dimension mismatch")]
    fn test_view_rejects_foreign_map() {
        let map = crate::dims::crop(&crate::dims::Dims::new(&[5, 5]), 0, &[2, 2]);
        let mut m: Grid<i32> = Grid::new(&[4, 4]);
        View::new(&mut m, map);
    }

    #[test]
    fn test_const_reads() {
        let m = numbered(&[3, 3]);
        let c = Const::new(&m);
        assert_eq!(c.get(4), 4);
        assert_eq!(c.next(None), Some(1));
        assert_eq!(c.size(), 9);
    }

    #[test]
    #[should_panic(expected = "read only")]
    fn test_const_set_panics() {
        let m = numbered(&[3, 3]);
        let mut c = Const::new(&m);
        c.set(0, 1);
    }

    #[test]
    #[should_panic(expected = "read only")]
    fn test_const_clear_panics() {
        let m = numbered(&[3, 3]);
        let mut c = Const::new(&m);
        c.clear();
    }
}
