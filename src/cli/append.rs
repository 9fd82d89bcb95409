use super::{CredentialArgs, spreadsheet_selector};
use sheets_client::error::Result;
use sheets_client::sheets::{CellValue, Record};
use std::io::Read;
use std::path::Path;
use tracing::info;

pub async fn execute(
    credentials: &CredentialArgs,
    spreadsheet: &str,
    worksheet: &str,
    file: &Path,
    preserve_blanks: bool,
) -> Result<()> {
    let reader = csv::ReaderBuilder::new().has_headers(true).from_path(file)?;
    let records = read_records(reader)?;

    let mut client = credentials.connect().await?;
    client.open_spreadsheet(spreadsheet_selector(spreadsheet)).await?;

    let range = client
        .append_records(worksheet, records, preserve_blanks)
        .await?;

    println!("{}", range);
    info!(range = %range, "Appended records");

    Ok(())
}

/// One record per CSV row, keyed by the header line. Values are kept as text.
fn read_records<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<Record>> {
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let record: Record = headers
            .iter()
            .zip(row.iter())
            .map(|(header, value)| (header.to_string(), CellValue::from(value)))
            .collect();
        records.push(record);
    }

    Ok(records)
}
