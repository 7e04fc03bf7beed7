//! Cell addressing in A1 notation: columns, single cells, rectangular ranges and sheet-qualified
//! references.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A spreadsheet column, stored as a zero-based index and displayed as letters (`A`, `Z`, `AA`).
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Column(u32);

impl Column {
    /// Creates a column from a zero-based index, so `0` is `A`.
    pub const fn from_index(index: u32) -> Self {
        Self(index)
    }

    /// Creates a single-letter column, e.g. `Column::letter(b'N')`.
    pub const fn letter(letter: u8) -> Self {
        assert!(letter.is_ascii_uppercase(), "column letter must be A-Z");
        Self((letter - b'A') as u32)
    }

    /// The zero-based index of this column.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut letters = Vec::new();
        let mut n = self.0 + 1;
        while n > 0 {
            let rem = (n - 1) % 26;
            letters.push((b'A' + rem as u8) as char);
            n = (n - 1) / 26;
        }
        let s: String = letters.iter().rev().collect();
        f.write_str(&s)
    }
}

impl FromStr for Column {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || !s.chars().all(|c| c.is_ascii_alphabetic()) {
            anyhow::bail!("Column must be one or more letters, got: '{s}'");
        }
        let mut n: u32 = 0;
        for c in s.to_ascii_uppercase().bytes() {
            n = n
                .checked_mul(26)
                .and_then(|n| n.checked_add((c - b'A') as u32 + 1))
                .ok_or_else(|| anyhow::anyhow!("Column is out of range: '{s}'"))?;
        }
        Ok(Self(n - 1))
    }
}

/// A single cell such as `C26`. Rows are one-based, as they are in the sheet.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct CellRef {
    column: Column,
    row: u32,
}

impl CellRef {
    pub const fn new(column: Column, row: u32) -> Self {
        Self { column, row }
    }

    pub fn column(&self) -> Column {
        self.column
    }

    pub fn row(&self) -> u32 {
        self.row
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column, self.row)
    }
}

impl FromStr for CellRef {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Expected format: "C26"
        let s = s.trim();
        let split = s
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| anyhow::anyhow!("Cell must be in format 'A1', got: '{s}'"))?;
        let (letters, digits) = s.split_at(split);
        let column = Column::from_str(letters)?;
        let row = digits
            .parse::<u32>()
            .map_err(|e| anyhow::anyhow!("Invalid row in cell '{s}': {e}"))?;
        if row == 0 {
            anyhow::bail!("Rows start at 1, got: '{s}'");
        }
        Ok(Self { column, row })
    }
}

impl Serialize for CellRef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CellRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        CellRef::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// A rectangular block of cells, inclusive on both ends, such as `A2:B23`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct CellRange {
    start: CellRef,
    end: CellRef,
}

impl CellRange {
    /// Creates a range. The corners are normalized so that `start` is top-left.
    pub fn new(a: CellRef, b: CellRef) -> Self {
        let start = CellRef::new(a.column.min(b.column), a.row.min(b.row));
        let end = CellRef::new(a.column.max(b.column), a.row.max(b.row));
        Self { start, end }
    }

    pub fn start(&self) -> CellRef {
        self.start
    }

    pub fn end(&self) -> CellRef {
        self.end
    }

    /// The smallest range that contains every cell of `cells`, `None` if there are none.
    pub fn covering(cells: &[CellRef]) -> Option<Self> {
        let (first, rest) = cells.split_first()?;
        Some(rest.iter().fold(Self::new(*first, *first), |range, cell| {
            Self::new(
                CellRef::new(range.start.column.min(cell.column), range.start.row.min(cell.row)),
                CellRef::new(range.end.column.max(cell.column), range.end.row.max(cell.row)),
            )
        }))
    }

    /// The zero-based `(row, column)` position of `cell` within this range, `None` if it lies
    /// outside.
    pub fn offset_of(&self, cell: CellRef) -> Option<(usize, usize)> {
        let inside = (self.start.row..=self.end.row).contains(&cell.row)
            && (self.start.column..=self.end.column).contains(&cell.column);
        inside.then(|| {
            (
                (cell.row - self.start.row) as usize,
                cell.column.index() - self.start.column.index(),
            )
        })
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

impl FromStr for CellRange {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (a, b) = s
            .split_once(':')
            .ok_or_else(|| anyhow::anyhow!("Range must be in format 'A1:B2', got: '{s}'"))?;
        Ok(Self::new(a.parse()?, b.parse()?))
    }
}

/// Qualifies an A1 reference with a sheet name, e.g. `'Март''26'!N:N`.
///
/// The sheet name is always quoted and embedded apostrophes are doubled. Period labels contain an
/// apostrophe, so this is never optional here.
pub fn qualify(sheet: &str, reference: impl fmt::Display) -> String {
    format!("'{}'!{reference}", sheet.replace('\'', "''"))
}

/// The A1 reference for an entire column, e.g. `N:N`.
pub fn whole_column(column: Column) -> String {
    format!("{column}:{column}")
}
