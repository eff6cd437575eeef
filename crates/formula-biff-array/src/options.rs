/// Largest array a BIFF8 header can describe: 256 columns × 65536 rows.
pub const MAX_ARRAY_CELLS: usize = 256 * 65536;

/// Knobs for [`crate::ArrayConstant::read_with_options`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Reject headers declaring more cells than this before allocating.
    pub max_cells: usize,
    /// Treat non-zero unused bytes in fixed-size entries, and boolean bytes other than 0/1, as
    /// corruption instead of ignoring them.
    pub strict_padding: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_cells: MAX_ARRAY_CELLS,
            strict_padding: false,
        }
    }
}

impl DecodeOptions {
    pub fn with_max_cells(mut self, max_cells: usize) -> Self {
        self.max_cells = max_cells;
        self
    }

    pub fn with_strict_padding(mut self, strict: bool) -> Self {
        self.strict_padding = strict;
        self
    }
}
