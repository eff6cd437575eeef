//! Grid coordinate <-> linear index mapping for column-major array storage.
//!
//! Excel stores array elements column by column: all rows of column 0, then all rows of
//! column 1, and so on.

/// Linear storage index of (`column`, `row`) in an array with `row_count` rows.
///
/// Bounds are not checked; `row` must be `< row_count`.
pub fn linear_index(column: usize, row: usize, row_count: usize) -> usize {
    column * row_count + row
}

/// Inverse of [`linear_index`]: returns `(column, row)`.
///
/// # Panics
///
/// Panics if `row_count` is zero.
pub fn grid_position(index: usize, row_count: usize) -> (usize, usize) {
    assert!(row_count > 0, "array row count must be non-zero");
    (index / row_count, index % row_count)
}
