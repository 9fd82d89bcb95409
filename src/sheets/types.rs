use crate::error::{AppError, Result};
use google_sheets4::api::SheetProperties;
use std::fmt;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spreadsheet {
    pub id: String,
    pub title: String,
    pub url: String,
}

impl Spreadsheet {
    pub(crate) fn url_for(id: &str) -> String {
        format!("https://docs.google.com/spreadsheets/d/{}", id)
    }
}

/// A spreadsheet file as listed by Drive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpreadsheetFile {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Worksheet {
    pub id: i32,
    pub title: String,
    pub index: u32,
    pub row_count: u32,
    pub column_count: u32,
}

impl TryFrom<SheetProperties> for Worksheet {
    type Error = AppError;

    fn try_from(props: SheetProperties) -> Result<Self> {
        let id = props
            .sheet_id
            .ok_or_else(|| AppError::Sheets("Sheet ID not found".to_string()))?;
        let grid = props.grid_properties.unwrap_or_default();

        Ok(Self {
            id,
            title: props.title.unwrap_or_default(),
            index: props.index.unwrap_or_default().max(0) as u32,
            row_count: grid.row_count.unwrap_or_default().max(0) as u32,
            column_count: grid.column_count.unwrap_or_default().max(0) as u32,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpreadsheetSelector {
    Title(String),
    Key(String),
    Url(String),
}

impl fmt::Display for SpreadsheetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpreadsheetSelector::Title(title) => write!(f, "titled '{}'", title),
            SpreadsheetSelector::Key(key) => write!(f, "with key {}", key),
            SpreadsheetSelector::Url(url) => write!(f, "at {}", url),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorksheetSelector {
    Title(String),
    Index(u32),
    Id(i32),
}

impl WorksheetSelector {
    pub(crate) fn matches(&self, worksheet: &Worksheet) -> bool {
        match self {
            WorksheetSelector::Title(title) => worksheet.title == *title,
            WorksheetSelector::Index(index) => worksheet.index == *index,
            WorksheetSelector::Id(id) => worksheet.id == *id,
        }
    }
}

impl fmt::Display for WorksheetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorksheetSelector::Title(title) => write!(f, "titled '{}'", title),
            WorksheetSelector::Index(index) => write!(f, "at index {}", index),
            WorksheetSelector::Id(id) => write!(f, "with id {}", id),
        }
    }
}

/// Pull the key out of `https://docs.google.com/spreadsheets/d/<key>/edit#gid=0`.
pub fn spreadsheet_key_from_url(url: &str) -> Result<String> {
    let invalid = || AppError::InvalidArgument(format!("'{}' is not a spreadsheet URL", url));

    let parsed = Url::parse(url).map_err(|_| invalid())?;
    let mut segments = parsed.path_segments().ok_or_else(invalid)?;

    segments
        .by_ref()
        .find(|segment| *segment == "spreadsheets")
        .ok_or_else(invalid)?;
    match (segments.next(), segments.next()) {
        (Some("d"), Some(key)) if !key.is_empty() => Ok(key.to_string()),
        _ => Err(invalid()),
    }
}
