pub mod a1;
mod auth;
pub mod cell;
mod client;
pub mod layout;
pub mod range;
mod records;
mod requests;
pub mod search;
pub mod types;

pub use auth::{AuthMode, CredentialSource, clear_tokens};
pub use cell::{CellValue, Record};
pub use client::{ClientOptions, SheetsClient};
pub use layout::Dimension;
pub use range::WorksheetRange;
pub use requests::ReplaceOptions;
pub use search::{CellMatch, FindOptions, Query};
pub use types::{Spreadsheet, SpreadsheetFile, SpreadsheetSelector, Worksheet, WorksheetSelector};

use crate::error::Result;
use a1::CellAddress;
use async_trait::async_trait;
use serde_json::Value;

/// Cell-level access to a spreadsheet, the part record handling builds on.
#[async_trait]
pub trait WorksheetOperations {
    /// Activate the worksheet with this title, adding it first if needed.
    async fn select_or_create_worksheet(&mut self, title: &str) -> Result<Worksheet>;

    /// Values of a row of the active worksheet, without trailing empties.
    async fn get_row(&self, index: u32) -> Result<Vec<String>>;

    /// Values of a column of the active worksheet, without trailing empties.
    async fn get_column(&self, index: u32) -> Result<Vec<String>>;

    /// Rows of a block on any worksheet. The selection is left alone.
    async fn get_values(&self, range: &WorksheetRange) -> Result<Vec<Vec<String>>>;

    /// Write `values` into the active worksheet starting at `anchor`, growing
    /// the grid when they do not fit. `None` cells are left untouched.
    async fn update_values(
        &mut self,
        anchor: CellAddress,
        values: Vec<Vec<Option<Value>>>,
        dimension: Dimension,
    ) -> Result<()>;
}
