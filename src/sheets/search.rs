use super::a1::CellAddress;
use crate::error::{AppError, Result};
use regex::{Regex, RegexBuilder};

#[derive(Debug, Clone)]
pub enum Query {
    Text(String),
    Pattern(Regex),
}

impl Query {
    pub fn text(value: impl Into<String>) -> Self {
        Query::Text(value.into())
    }

    pub fn pattern(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(Query::Pattern)
            .map_err(|e| AppError::InvalidArgument(format!("Invalid pattern: {}", e)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FindOptions {
    pub match_case: bool,
    pub match_entire_cell: bool,
}

impl Default for FindOptions {
    fn default() -> Self {
        Self {
            match_case: true,
            match_entire_cell: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellMatch {
    pub worksheet: String,
    pub address: CellAddress,
    pub value: String,
}

impl CellMatch {
    /// A1 label of the cell, e.g. `B7`.
    pub fn label(&self) -> String {
        self.address.to_string()
    }
}

pub(crate) struct Matcher {
    regex: Regex,
}

impl Matcher {
    pub(crate) fn new(query: &Query, options: FindOptions) -> Result<Self> {
        let pattern = match query {
            Query::Text(text) => regex::escape(text),
            Query::Pattern(regex) => regex.as_str().to_string(),
        };
        let pattern = match options.match_entire_cell {
            true => format!("^(?:{})$", pattern),
            false => pattern,
        };

        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(!options.match_case)
            .build()
            .map_err(|e| AppError::InvalidArgument(format!("Invalid pattern: {}", e)))?;

        Ok(Self { regex })
    }

    fn is_match(&self, cell: &str) -> bool {
        !cell.is_empty() && self.regex.is_match(cell)
    }
}

/// Matching cells of one worksheet, in row-major order.
pub(crate) fn find_in_grid(worksheet: &str, grid: &[Vec<String>], matcher: &Matcher) -> Vec<CellMatch> {
    grid.iter()
        .enumerate()
        .flat_map(|(row, cells)| {
            cells.iter().enumerate().filter_map(move |(column, cell)| {
                matcher.is_match(cell).then(|| CellMatch {
                    worksheet: worksheet.to_string(),
                    address: CellAddress::new(row as u32 + 1, column as u32 + 1),
                    value: cell.clone(),
                })
            })
        })
        .collect()
}
