//! A1 notation helpers. Rows and columns are 1-based throughout.

use crate::error::{AppError, Result};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CellAddress {
    pub row: u32,
    pub column: u32,
}

impl CellAddress {
    pub fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Parse a single cell label such as `B7` or `aa10`.
    pub fn parse(label: &str) -> Result<Self> {
        let invalid = || AppError::InvalidArgument(format!("'{}' is not a cell address", label));

        let split = label
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(invalid)?;
        let (letters, digits) = label.split_at(split);

        let column = column_index(letters).ok_or_else(invalid)?;
        let row: u32 = digits.parse().map_err(|_| invalid())?;
        if row == 0 {
            return Err(invalid());
        }

        Ok(Self { row, column })
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_letter(self.column), self.row)
    }
}

/// `1` -> `A`, `27` -> `AA`. Zero has no letter and renders empty.
pub fn column_letter(mut index: u32) -> String {
    let mut letters = Vec::new();
    while index > 0 {
        let rem = ((index - 1) % 26) as u8;
        letters.push((b'A' + rem) as char);
        index = (index - 1) / 26;
    }
    letters.iter().rev().collect()
}

pub fn column_index(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }

    letters.chars().try_fold(0u32, |acc, c| {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = (c.to_ascii_uppercase() as u8 - b'A') as u32 + 1;
        acc.checked_mul(26)?.checked_add(digit)
    })
}

/// Prefix a range with a quoted worksheet title: `'My Sheet'!A1:B2`.
/// A worksheet title as a range covering the whole sheet: `'My ''WS'''`.
pub fn quoted_title(worksheet: &str) -> String {
    format!("'{}'", worksheet.replace('\'', "''"))
}

pub fn qualified(worksheet: &str, range: &str) -> String {
    format!("{}!{}", quoted_title(worksheet), range)
}
