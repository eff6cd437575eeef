//! Array constants: the `rgcb` block that backs a `PtgArray` token.
//!
//! Layout: a 3-byte [`ArrayHeader`] followed by `rows × cols` [`ConstantValue`] entries in
//! column-major order. The linear order is kept internal; callers address elements by
//! `(column, row)`.

use std::fmt;

use crate::cursor::{ByteCursor, ByteSink};
use crate::error::{ArrayConstantError, DecodeArrayError, EncodeArrayError};
use crate::grid;
use crate::header::{ArrayHeader, HEADER_LEN};
use crate::options::DecodeOptions;
use crate::value::{ConstantValue, MIN_ENTRY_LEN};

#[derive(Clone, Debug, PartialEq)]
pub struct ArrayConstant {
    header: ArrayHeader,
    /// Column-major: (column `c`, row `r`) lives at `c * row_count + r`.
    values: Vec<ConstantValue>,
}

impl ArrayConstant {
    /// Build from values already in column-major order.
    pub fn new(
        column_count: usize,
        row_count: usize,
        values: Vec<ConstantValue>,
    ) -> Result<Self, ArrayConstantError> {
        let header = ArrayHeader::new(column_count, row_count)?;
        if values.len() != header.cell_count() {
            return Err(ArrayConstantError::Shape(format!(
                "{} values for a {column_count}x{row_count} array (expected {})",
                values.len(),
                header.cell_count()
            )));
        }
        Ok(Self { header, values })
    }

    pub fn filled(
        column_count: usize,
        row_count: usize,
        value: ConstantValue,
    ) -> Result<Self, ArrayConstantError> {
        let header = ArrayHeader::new(column_count, row_count)?;
        Ok(Self {
            values: vec![value; header.cell_count()],
            header,
        })
    }

    /// Build from row-major rows, the order an array literal `{a,b;c,d}` is written in.
    pub fn from_rows(rows: Vec<Vec<ConstantValue>>) -> Result<Self, ArrayConstantError> {
        let row_count = rows.len();
        let column_count = rows.first().map_or(0, Vec::len);
        if let Some((idx, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != column_count)
        {
            return Err(ArrayConstantError::Shape(format!(
                "row {idx} has {} values, expected {column_count}",
                row.len()
            )));
        }
        let header = ArrayHeader::new(column_count, row_count)?;

        let mut values = Vec::with_capacity(header.cell_count());
        for c in 0..column_count {
            for row in &rows {
                values.push(row[c].clone());
            }
        }
        Ok(Self { header, values })
    }

    pub fn column_count(&self) -> usize {
        self.header.column_count()
    }

    pub fn row_count(&self) -> usize {
        self.header.row_count()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false: an array constant has at least one cell.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values in storage (column-major) order.
    pub fn values(&self) -> &[ConstantValue] {
        &self.values
    }

    pub fn into_values(self) -> Vec<ConstantValue> {
        self.values
    }

    pub fn get(&self, column: usize, row: usize) -> Option<&ConstantValue> {
        if column >= self.column_count() || row >= self.row_count() {
            return None;
        }
        self.values.get(grid::linear_index(column, row, self.row_count()))
    }

    /// # Panics
    ///
    /// Panics if `column`/`row` are outside the array.
    pub fn value_at(&self, column: usize, row: usize) -> &ConstantValue {
        let index = self.checked_index(column, row);
        &self.values[index]
    }

    /// Replace one element in place, returning the previous value.
    ///
    /// # Panics
    ///
    /// Panics if `column`/`row` are outside the array.
    pub fn set_value_at(
        &mut self,
        column: usize,
        row: usize,
        value: ConstantValue,
    ) -> ConstantValue {
        let index = self.checked_index(column, row);
        std::mem::replace(&mut self.values[index], value)
    }

    /// Row-major view of the elements.
    pub fn rows(&self) -> Vec<Vec<&ConstantValue>> {
        (0..self.row_count())
            .map(|row| {
                (0..self.column_count())
                    .map(|column| self.value_at(column, row))
                    .collect()
            })
            .collect()
    }

    fn checked_index(&self, column: usize, row: usize) -> usize {
        assert!(
            column < self.column_count() && row < self.row_count(),
            "array constant index (column {column}, row {row}) out of bounds for {}x{} array",
            self.column_count(),
            self.row_count()
        );
        grid::linear_index(column, row, self.row_count())
    }

    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self, DecodeArrayError> {
        Self::read_with_options(cursor, &DecodeOptions::default())
    }

    pub fn read_with_options(
        cursor: &mut ByteCursor<'_>,
        options: &DecodeOptions,
    ) -> Result<Self, DecodeArrayError> {
        let start = cursor.position();
        let header = ArrayHeader::read(cursor)?;
        let cells = header.cell_count();
        log::trace!(
            "array constant at offset {start}: {} columns x {} rows",
            header.column_count(),
            header.row_count()
        );

        if cells > options.max_cells {
            return Err(DecodeArrayError::TooManyCells {
                cells,
                max: options.max_cells,
            });
        }
        // Reject impossible counts before allocating for them.
        let min_needed = cells.saturating_mul(MIN_ENTRY_LEN);
        if cursor.remaining() < min_needed {
            return Err(DecodeArrayError::UnexpectedEof {
                offset: cursor.position(),
                needed: min_needed,
                remaining: cursor.remaining(),
            });
        }

        let mut values = Vec::with_capacity(cells);
        for _ in 0..cells {
            values.push(ConstantValue::read_with_options(cursor, options)?);
        }
        Ok(Self { header, values })
    }

    /// Decode one block from the start of `data`, returning it with the number of bytes consumed.
    pub fn decode(data: &[u8]) -> Result<(Self, usize), DecodeArrayError> {
        let mut cursor = ByteCursor::new(data);
        let array = Self::read(&mut cursor)?;
        Ok((array, cursor.position()))
    }

    /// Decode `count` consecutive blocks, as stored for successive `PtgArray` tokens of a formula.
    pub fn read_all(data: &[u8], count: usize) -> Result<(Vec<Self>, usize), DecodeArrayError> {
        Self::read_all_with_options(data, count, &DecodeOptions::default())
    }

    /// [`ArrayConstant::read_all`] with `options` applied to every block.
    pub fn read_all_with_options(
        data: &[u8],
        count: usize,
        options: &DecodeOptions,
    ) -> Result<(Vec<Self>, usize), DecodeArrayError> {
        let mut cursor = ByteCursor::new(data);
        let mut out = Vec::new();
        for _ in 0..count {
            out.push(Self::read_with_options(&mut cursor, options)?);
        }
        Ok((out, cursor.position()))
    }

    pub fn encoded_len(&self) -> usize {
        HEADER_LEN
            + self
                .values
                .iter()
                .map(ConstantValue::encoded_len)
                .sum::<usize>()
    }

    pub fn write(&self, sink: &mut ByteSink<'_>) -> Result<(), EncodeArrayError> {
        self.header.write(sink)?;
        for value in &self.values {
            value.write(sink)?;
        }
        Ok(())
    }

    /// Write the block into `buf` at `offset`, returning the number of bytes written.
    pub fn write_to(&self, buf: &mut [u8], offset: usize) -> Result<usize, EncodeArrayError> {
        let needed = self.encoded_len();
        let available = buf.len().saturating_sub(offset);
        if available < needed {
            return Err(EncodeArrayError::BufferTooSmall {
                offset,
                needed,
                available,
            });
        }
        let mut sink = ByteSink::new(buf, offset);
        self.write(&mut sink)?;
        Ok(sink.written())
    }

    pub fn encode(&self) -> Result<Vec<u8>, EncodeArrayError> {
        let mut buf = vec![0u8; self.encoded_len()];
        self.write_to(&mut buf, 0)?;
        Ok(buf)
    }
}

/// Array literal text, e.g. `{1,2,3;4,5,6}`: `,` between columns, `;` between rows.
impl fmt::Display for ArrayConstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for row in 0..self.row_count() {
            if row > 0 {
                f.write_str(";")?;
            }
            for column in 0..self.column_count() {
                if column > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{}", self.value_at(column, row))?;
            }
        }
        f.write_str("}")
    }
}
