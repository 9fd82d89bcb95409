//! Builders for the `batchUpdate` requests the client sends.

use super::layout::Dimension;
use super::types::Worksheet;
use google_sheets4::api::{
    AddSheetRequest, AppendDimensionRequest, DeleteSheetRequest, DimensionRange,
    FindReplaceRequest, InsertDimensionRequest, Request, SheetProperties, Spreadsheet,
    SpreadsheetProperties,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaceOptions {
    pub match_case: bool,
    pub match_entire_cell: bool,
    /// Treat the search text as a regular expression.
    pub regex: bool,
}

/// Body of a `spreadsheets.create` call for an empty spreadsheet.
pub(super) fn new_spreadsheet(title: &str) -> Spreadsheet {
    Spreadsheet {
        properties: Some(SpreadsheetProperties {
            title: Some(title.to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub(super) fn add_sheet(title: &str) -> Request {
    Request {
        add_sheet: Some(AddSheetRequest {
            properties: Some(SheetProperties {
                title: Some(title.to_string()),
                sheet_type: Some("GRID".to_string()),
                ..Default::default()
            }),
        }),
        ..Default::default()
    }
}

pub(super) fn delete_sheet(sheet_id: i32) -> Request {
    Request {
        delete_sheet: Some(DeleteSheetRequest {
            sheet_id: Some(sheet_id),
        }),
        ..Default::default()
    }
}

/// Insert one row or column before the 0-based `start`, copying the
/// formatting of the line before it when there is one.
pub(super) fn insert_dimension(sheet_id: i32, dimension: Dimension, start: u32) -> Request {
    Request {
        insert_dimension: Some(InsertDimensionRequest {
            range: Some(DimensionRange {
                sheet_id: Some(sheet_id),
                dimension: Some(dimension.as_api_str().to_string()),
                start_index: Some(start as i32),
                end_index: Some(start as i32 + 1),
            }),
            inherit_from_before: Some(start > 0),
        }),
        ..Default::default()
    }
}

fn append_dimension(sheet_id: i32, dimension: Dimension, length: u32) -> Request {
    Request {
        append_dimension: Some(AppendDimensionRequest {
            sheet_id: Some(sheet_id),
            dimension: Some(dimension.as_api_str().to_string()),
            length: Some(length as i32),
        }),
        ..Default::default()
    }
}

/// Requests that grow the grid to at least `rows` x `columns`.
pub(super) fn grow_to(worksheet: &Worksheet, rows: u32, columns: u32) -> Vec<Request> {
    let mut requests = Vec::new();

    if rows > worksheet.row_count {
        requests.push(append_dimension(
            worksheet.id,
            Dimension::Rows,
            rows - worksheet.row_count,
        ));
    }
    if columns > worksheet.column_count {
        requests.push(append_dimension(
            worksheet.id,
            Dimension::Columns,
            columns - worksheet.column_count,
        ));
    }

    requests
}

pub(super) fn find_replace(find: &str, replacement: &str, options: ReplaceOptions) -> Request {
    Request {
        find_replace: Some(FindReplaceRequest {
            find: Some(find.to_string()),
            replacement: Some(replacement.to_string()),
            all_sheets: Some(true),
            match_case: Some(options.match_case),
            match_entire_cell: Some(options.match_entire_cell),
            search_by_regex: Some(options.regex),
            ..Default::default()
        }),
        ..Default::default()
    }
}
