use super::a1::{self, CellAddress};
use super::cell::{BLANK_MARKER, CellValue, Record};
use super::layout::{Dimension, plan_by_header};
use super::range::WorksheetRange;
use super::WorksheetOperations;
use crate::error::{AppError, Result};
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, instrument};

// Guards against ranges that refer to each other.
const MAX_REFERENCE_DEPTH: usize = 16;

/// Write records under the headers found on line `header_index`.
pub(super) async fn update_by_header<W>(
    ws: &mut W,
    dimension: Dimension,
    records: &[Option<Record>],
    offset: u32,
    header_index: u32,
    case_sensitive: bool,
) -> Result<()>
where
    W: WorksheetOperations + ?Sized,
{
    if offset == 0 || header_index == 0 {
        return Err(AppError::InvalidArgument(
            "row and column indices start at 1".to_string(),
        ));
    }

    let headers = match dimension {
        Dimension::Rows => ws.get_row(header_index).await?,
        Dimension::Columns => ws.get_column(header_index).await?,
    };
    let plan = plan_by_header(&headers, records, case_sensitive)?;

    if !plan.new_headers.is_empty() {
        debug!(headers = ?plan.new_headers, "Adding headers");
        let line = plan
            .new_headers
            .into_iter()
            .map(|header| Some(Value::String(header)))
            .collect();
        let anchor = match dimension {
            Dimension::Rows => CellAddress::new(header_index, plan.first_new_header),
            Dimension::Columns => CellAddress::new(plan.first_new_header, header_index),
        };
        ws.update_values(anchor, vec![line], dimension).await?;
    }

    let anchor = match dimension {
        Dimension::Rows => CellAddress::new(offset, 1),
        Dimension::Columns => CellAddress::new(1, offset),
    };
    ws.update_values(anchor, plan.values, dimension).await
}

/// Add records below the last filled row of `worksheet` and return where they landed.
#[instrument(name = "Appending records", skip(ws, records), fields(count = records.len()))]
pub(super) async fn append_records<W>(
    ws: &mut W,
    worksheet: &str,
    records: Vec<Record>,
    preserve_blanks: bool,
) -> Result<WorksheetRange>
where
    W: WorksheetOperations + ?Sized,
{
    if records.is_empty() {
        return Err(AppError::InvalidArgument(
            "no records to append".to_string(),
        ));
    }

    ws.select_or_create_worksheet(worksheet).await?;

    // Row 1 holds the headers, so an empty sheet starts at row 2
    let filled = ws.get_column(1).await?.len() as u32;
    let first_row = match filled {
        0 => 2,
        n => n + 1,
    };

    let count = records.len() as u32;
    let records: Vec<Option<Record>> = records
        .into_iter()
        .map(|record| match preserve_blanks {
            true => record
                .into_iter()
                .map(|(key, value)| (key, value.preserve_blank()))
                .collect(),
            false => record,
        })
        .map(Some)
        .collect();

    update_by_header(ws, Dimension::Rows, &records, first_row, 1, true).await?;

    let width = ws.get_row(1).await?.len().max(1) as u32;
    Ok(WorksheetRange::new(
        worksheet,
        CellAddress::new(first_row, 1),
        CellAddress::new(first_row + count - 1, width),
    ))
}

/// Read the rows of `range` as records keyed by the headers in row 1.
///
/// Cells holding another range are replaced by that range's records.
pub(super) async fn read_range<W>(ws: &W, range: &WorksheetRange) -> Result<Vec<Record>>
where
    W: WorksheetOperations + ?Sized,
{
    read_range_at(ws, range.clone(), 0).await
}

fn read_range_at<'a, W>(
    ws: &'a W,
    range: WorksheetRange,
    depth: usize,
) -> Pin<Box<dyn Future<Output = Result<Vec<Record>>> + 'a>>
where
    W: WorksheetOperations + ?Sized,
{
    Box::pin(async move {
        if depth > MAX_REFERENCE_DEPTH {
            return Err(AppError::InvalidArgument(format!(
                "range references nest deeper than {} levels at {}",
                MAX_REFERENCE_DEPTH, range
            )));
        }
        debug!(%range, depth, "Reading range");

        let header_range = WorksheetRange::new(
            range.worksheet.clone(),
            CellAddress::new(1, range.start.column),
            CellAddress::new(1, range.end.column),
        );
        let headers = ws
            .get_values(&header_range)
            .await?
            .into_iter()
            .next()
            .unwrap_or_default();

        let mut records = Vec::new();
        for cells in ws.get_values(&range).await? {
            let mut record = Record::new();

            for (offset, cell) in cells.iter().enumerate() {
                let value = match WorksheetRange::from_cell(cell) {
                    Some(reference) => {
                        CellValue::Nested(read_range_at(ws, reference, depth + 1).await?)
                    }
                    None => CellValue::from_cell_text(cell),
                };

                if cell == BLANK_MARKER || !value.is_empty() {
                    let header = match headers.get(offset) {
                        Some(header) if !header.is_empty() => header.clone(),
                        _ => a1::column_letter(range.start.column + offset as u32),
                    };
                    record.insert(header, value);
                }
            }

            if !record.is_empty() {
                records.push(record);
            }
        }

        Ok(records)
    })
}
