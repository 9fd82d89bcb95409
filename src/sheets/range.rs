use super::a1::{self, CellAddress};
use crate::error::{AppError, Result};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static RANGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:'(?P<quoted>(?:[^']|'')+)'|(?P<bare>[A-Za-z0-9_]+))!(?P<start>[A-Za-z]+[0-9]+):(?P<end>[A-Za-z]+[0-9]+)$",
    )
    .expect("Invalid worksheet range regex")
});

/// A rectangular block on a named worksheet, e.g. `Data!A2:D3`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorksheetRange {
    pub worksheet: String,
    pub start: CellAddress,
    pub end: CellAddress,
}

impl WorksheetRange {
    pub fn new(worksheet: impl Into<String>, start: CellAddress, end: CellAddress) -> Self {
        Self {
            worksheet: worksheet.into(),
            start: CellAddress::new(start.row.min(end.row), start.column.min(end.column)),
            end: CellAddress::new(start.row.max(end.row), start.column.max(end.column)),
        }
    }

    /// Treat a cell's text as a reference to another range, if it is one.
    pub fn from_cell(text: &str) -> Option<Self> {
        text.trim().parse().ok()
    }

    pub fn rows(&self) -> std::ops::RangeInclusive<u32> {
        self.start.row..=self.end.row
    }

    pub fn columns(&self) -> std::ops::RangeInclusive<u32> {
        self.start.column..=self.end.column
    }
}

impl FromStr for WorksheetRange {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let caps = RANGE_REGEX.captures(s).ok_or_else(|| {
            AppError::InvalidArgument(format!(
                "'{}' is not a <worksheet>!<start>:<end> range",
                s
            ))
        })?;

        let worksheet = match (caps.name("quoted"), caps.name("bare")) {
            (Some(quoted), _) => quoted.as_str().replace("''", "'"),
            (None, Some(bare)) => bare.as_str().to_string(),
            (None, None) => unreachable!("regex requires a worksheet title"),
        };

        let start = CellAddress::parse(&caps["start"])?;
        let end = CellAddress::parse(&caps["end"])?;

        Ok(Self::new(worksheet, start, end))
    }
}

// Titles other than plain words must be quoted to parse back.
fn is_bare_title(title: &str) -> bool {
    !title.is_empty()
        && title
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl fmt::Display for WorksheetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match is_bare_title(&self.worksheet) {
            true => write!(f, "{}!{}:{}", self.worksheet, self.start, self.end),
            false => write!(
                f,
                "{}!{}:{}",
                a1::quoted_title(&self.worksheet),
                self.start,
                self.end
            ),
        }
    }
}
