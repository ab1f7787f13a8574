use serde::{Deserialize, Serialize};

/// A 0-indexed cell coordinate.
///
/// - `row = 0` is spreadsheet row `1`
/// - `col = 0` is spreadsheet column `A`
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRef {
    /// 0-indexed row.
    pub row: u32,
    /// 0-indexed column.
    pub col: u32,
}

impl CellRef {
    /// Construct a new [`CellRef`].
    #[inline]
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}
