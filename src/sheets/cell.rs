use crate::error::{AppError, Result};
use indexmap::IndexMap;
use serde::ser::{Serialize, Serializer};
use serde_json::Value;

/// Marker written in place of an empty string so it survives a round trip.
pub const BLANK_MARKER: &str = "<blank>";

const NULL_TEXT: &str = "None";

/// One row (or column) of data keyed by header, in header insertion order.
pub type Record = IndexMap<String, CellValue>;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Integer(i64),
    Bool(bool),
    Null,
    List(Vec<CellValue>),
    /// Records of another range that a cell referred to.
    Nested(Vec<Record>),
}

impl CellValue {
    /// Interpret the formatted text of a cell.
    pub fn from_cell_text(text: &str) -> Self {
        match text {
            "" | BLANK_MARKER => CellValue::Empty,
            "TRUE" => CellValue::Bool(true),
            "FALSE" => CellValue::Bool(false),
            NULL_TEXT => CellValue::Null,
            _ if text.len() >= 2 && text.starts_with('[') && text.ends_with(']') => {
                let items: Vec<CellValue> = text[1..text.len() - 1]
                    .split(',')
                    .map(|item| CellValue::from_cell_text(item.trim()))
                    .filter(|item| !item.is_empty())
                    .collect();
                match items.is_empty() {
                    true => CellValue::Empty,
                    false => CellValue::List(items),
                }
            }
            _ => text
                .parse::<i64>()
                .map(CellValue::Integer)
                .unwrap_or_else(|_| CellValue::Text(text.to_string())),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            CellValue::List(items) => items.is_empty(),
            CellValue::Nested(records) => records.is_empty(),
            CellValue::Integer(_) | CellValue::Bool(_) | CellValue::Null => false,
        }
    }

    /// Text as it would be typed into the sheet.
    pub fn to_cell_text(&self) -> Result<String> {
        match self {
            CellValue::Empty => Ok(String::new()),
            CellValue::Text(s) => Ok(s.clone()),
            CellValue::Integer(n) => Ok(n.to_string()),
            CellValue::Bool(true) => Ok("TRUE".to_string()),
            CellValue::Bool(false) => Ok("FALSE".to_string()),
            CellValue::Null => Ok(NULL_TEXT.to_string()),
            CellValue::List(items) => {
                let items = items
                    .iter()
                    .map(CellValue::to_cell_text)
                    .collect::<Result<Vec<_>>>()?;
                Ok(format!("[{}]", items.join(",")))
            }
            CellValue::Nested(_) => Err(AppError::InvalidArgument(
                "nested records cannot be written to a single cell".to_string(),
            )),
        }
    }

    /// JSON value for a Sheets `ValueRange`. `Empty` becomes null, which the
    /// API skips, so the cell keeps whatever it held.
    pub(crate) fn to_json(&self) -> Result<Value> {
        match self {
            CellValue::Empty => Ok(Value::Null),
            CellValue::Integer(n) => Ok(Value::from(*n)),
            CellValue::Bool(b) => Ok(Value::Bool(*b)),
            other => other.to_cell_text().map(Value::String),
        }
    }

    /// Swap empty strings for the blank marker.
    pub fn preserve_blank(self) -> Self {
        match self.is_empty() {
            true if matches!(self, CellValue::Empty | CellValue::Text(_)) => {
                CellValue::Text(BLANK_MARKER.to_string())
            }
            _ => self,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Integer(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            CellValue::Empty => serializer.serialize_str(""),
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::Integer(n) => serializer.serialize_i64(*n),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
            CellValue::Null => serializer.serialize_none(),
            CellValue::List(items) => items.serialize(serializer),
            CellValue::Nested(records) => records.serialize(serializer),
        }
    }
}

/// Read a cell returned by the Sheets API as display text.
pub(crate) fn json_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        other => other.to_string(),
    }
}
