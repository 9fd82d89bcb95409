use super::{CredentialArgs, spreadsheet_selector};
use sheets_client::error::Result;
use sheets_client::sheets::WorksheetRange;

pub async fn execute(credentials: &CredentialArgs, spreadsheet: &str, range: &str) -> Result<()> {
    // Fail on a malformed range before prompting for consent
    let range: WorksheetRange = range.parse()?;

    let mut client = credentials.connect().await?;
    client.open_spreadsheet(spreadsheet_selector(spreadsheet)).await?;

    let records = client.read_range(&range).await?;
    println!("{}", serde_json::to_string_pretty(&records)?);

    Ok(())
}
