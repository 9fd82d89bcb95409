use super::CredentialArgs;
use dialoguer::Confirm;
use sheets_client::error::{AppError, Result};
use sheets_client::sheets::SpreadsheetSelector;
use tracing::info;

pub async fn execute(credentials: &CredentialArgs, title: &str, yes: bool) -> Result<()> {
    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete spreadsheet '{}'?", title))
            .default(false)
            .interact()
            .map_err(|e| AppError::Other(e.into()))?;
        if !confirmed {
            info!("Nothing deleted");
            return Ok(());
        }
    }

    let mut client = credentials.connect().await?;
    client
        .delete_spreadsheet(SpreadsheetSelector::Title(title.to_string()), false)
        .await
}
