//! Integration tests across storage backends.
//!
//! Exercises the shared matrix contract on every backend at once: reads of
//! fresh matrices, write-then-read, non-zero enumeration, clearing, and the
//! generic copy/reduce algorithms gluing backends together.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ndmatrix::{copy, reduce, Bit, Bool, Const, Diagonal, Grid, Matrix, SharedGrid, Sparse, View};

/// Collects the full enumeration order of a matrix.
fn collect_next<T: ndmatrix::Element, M: Matrix<T>>(m: &M) -> Vec<usize> {
    let mut found = Vec::new();
    let mut it = m.next(None);
    while let Some(idx) = it {
        found.push(idx);
        it = m.next(Some(idx));
    }
    found
}

/// Checks the contract shared by every backend, using writes that any of
/// them accepts (the diagonal backend included).
fn check_contract<M: Matrix<u8>>(m: &mut M, side: usize, ndim: usize) {
    assert_eq!(m.ndim(), ndim);
    assert_eq!(m.size(), side.pow(ndim as u32));

    // fresh matrices read zero everywhere and enumerate nothing
    for i in 0..m.size() {
        assert_eq!(m.get(i), 0);
    }
    assert_eq!(m.next(None), None);

    // writes along the diagonal are legal on every backend
    let cell = vec![side - 1; ndim];
    m.set_at(&cell, 1);
    assert_eq!(m.get_at(&cell), 1);
    assert_eq!(m.get(m.size() - 1), 1);

    // offsets wrap: reading one full turn away is the same cell
    let wrapped: Vec<usize> = cell.iter().map(|&c| c + side).collect();
    assert_eq!(m.get_at(&wrapped), 1);

    assert_eq!(collect_next(m), [m.size() - 1]);

    m.clear();
    assert_eq!(m.get_at(&cell), 0);
    assert_eq!(m.next(None), None);
}

#[test]
fn test_contract_all_backends() {
    check_contract(&mut Grid::new(&[5, 5, 5]), 5, 3);
    check_contract(&mut Bit::new(&[5, 5, 5]), 5, 3);
    check_contract(&mut Sparse::new(&[5, 5, 5]), 5, 3);
    check_contract(&mut Diagonal::new(3, 5), 5, 3);

    let mut buf = vec![0u8; 125];
    check_contract(&mut SharedGrid::new(&[5, 5, 5], &mut buf).unwrap(), 5, 3);
}

#[test]
fn test_enumeration_matches_across_backends() {
    // the same pinned pattern through every general-purpose backend
    let values = [0u8, 0, 1, 0, 2, 3, 4, 5, 6, 0, 0, 0, 0, 0, 0, 1];
    let expected = [2usize, 4, 5, 6, 7, 8, 15];

    let mut grid: Grid<u8> = Grid::new(&[4, 4]);
    let mut sparse: Sparse<u8> = Sparse::new(&[4, 4]);
    let mut bit = Bit::new(&[4, 4]);
    for (i, &v) in values.iter().enumerate() {
        grid.set(i, v);
        sparse.set(i, v);
        bit.set(i, if v > 0 { 1 } else { 0 });
    }

    assert_eq!(collect_next(&grid), expected);
    assert_eq!(collect_next(&sparse), expected);
    assert_eq!(collect_next(&bit), expected);
}

#[test]
fn test_randomized_backend_equivalence() {
    // scatter random writes (including overwrites and zero writes) into a
    // dense and a sparse matrix, then require identical reads and
    // enumeration from both
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut grid: Grid<i32> = Grid::new(&[17, 13, 7]);
    let mut sparse: Sparse<i32> = Sparse::new(&[17, 13, 7]);

    for _ in 0..2000 {
        let idx = rng.gen_range(0..grid.size());
        let value = rng.gen_range(-2..=2);
        grid.set(idx, value);
        sparse.set(idx, value);
    }

    for i in 0..grid.size() {
        assert_eq!(grid.get(i), sparse.get(i));
    }
    assert_eq!(collect_next(&grid), collect_next(&sparse));
    assert_eq!(
        reduce(&grid, 0i64, |a, b| a + b as i64),
        reduce(&sparse, 0i64, |a, b| a + b as i64),
    );
}

#[test]
fn test_copy_preserves_values_across_backends() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut src: Grid<u8> = Grid::new(&[9, 9]);
    for _ in 0..40 {
        let idx = rng.gen_range(0..src.size());
        src.set(idx, rng.gen_range(0..4));
    }

    let mut sparse: Sparse<u8> = Sparse::new(&[9, 9]);
    copy(&mut sparse, &src);
    let mut bit = Bit::new(&[9, 9]);
    copy(&mut bit, &sparse);

    for i in 0..src.size() {
        assert_eq!(sparse.get(i), src.get(i));
        assert_eq!(bit.get(i), u8::from(src.get(i) != 0));
    }
}

#[test]
fn test_grid_growth_keeps_contents() {
    // grow a grid step by step; contents must survive every step
    let mut rng = StdRng::seed_from_u64(99);
    let mut m: Grid<u16> = Grid::new(&[2, 2]);
    let mut reference = vec![vec![0u16; 64]; 64];

    let mut side = 2;
    while side < 64 {
        for _ in 0..side {
            let x = rng.gen_range(0..side);
            let y = rng.gen_range(0..side);
            let v = rng.gen_range(1..=u16::MAX);
            m.set_at(&[x, y], v);
            reference[y][x] = v;
        }
        side += rng.gen_range(1..=4);
        m.resize(&[side, side]);

        for (y, row) in reference.iter().enumerate().take(side) {
            for (x, &v) in row.iter().enumerate().take(side) {
                assert_eq!(m.get_at(&[x, y]), v, "after growing to {side}");
            }
        }
    }

    // compacting releases capacity without touching contents
    m.compact();
    for (y, row) in reference.iter().enumerate().take(side) {
        for (x, &v) in row.iter().enumerate().take(side) {
            assert_eq!(m.get_at(&[x, y]), v);
        }
    }
}

#[test]
fn test_views_compose_with_operations() {
    // build a numbered board, then copy out a transposed crop of it
    let mut board: Grid<i32> = Grid::new(&[8, 8]);
    for i in 0..board.size() {
        board.set(i, i as i32);
    }

    let start = board.dims().index(&[4, 2]);
    let mut window = View::crop(&mut board, start, &[3, 3]);
    let transposed = View::sample(&mut window, "yx", &[]).unwrap();

    let mut out: Grid<i32> = Grid::new(&[3, 3]);
    copy(&mut out, &transposed);
    for y in 0..3 {
        for x in 0..3 {
            // out (x, y) is board (4 + y, 2 + x)
            assert_eq!(out.get_at(&[x, y]), ((4 + y) + 8 * (2 + x)) as i32);
        }
    }
}

#[test]
fn test_const_wraps_any_backend() {
    let mut inner: Sparse<i32> = Sparse::new(&[6, 6]);
    inner.set_at(&[2, 2], -3);

    let c = Const::new(&inner);
    assert_eq!(c.get_at(&[2, 2]), -3);
    assert_eq!(collect_next(&c), collect_next(&inner));
    assert_eq!(reduce(&c, 0, |a, b| a + b), -3);
}

#[test]
#[should_panic(expected = "read only")]
fn test_const_rejects_writes() {
    let inner: Grid<i32> = Grid::new(&[2, 2]);
    let mut c = Const::new(&inner);
    c.set(0, 1);
}

#[test]
fn test_bool_backend_on_large_sparse_board() {
    let mut m = Bool::new(&[1000, 1000]);
    let cells = [[1usize, 2], [500, 500], [999, 999]];
    for cell in &cells {
        m.set_at(cell, true);
    }
    let expected: Vec<usize> = cells.iter().map(|c| m.dims().index(c)).collect();
    assert_eq!(collect_next(&m), expected);

    m.set_at(&[500, 500], false);
    assert_eq!(collect_next(&m).len(), 2);
}

#[test]
fn test_diagonal_interops_with_dense() {
    let diag: Diagonal<i32> = Diagonal::from_diagonal(2, vec![1, 2, 3, 4]);
    let mut dense: Grid<i32> = Grid::new(&[4, 4]);
    copy(&mut dense, &diag);

    for y in 0..4 {
        for x in 0..4 {
            let expected = if x == y { (x + 1) as i32 } else { 0 };
            assert_eq!(dense.get_at(&[x, y]), expected);
        }
    }
    assert_eq!(reduce(&dense, 0, |a, b| a + b), 10);
}
