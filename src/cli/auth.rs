use super::CredentialArgs;
use sheets_client::error::Result;
use sheets_client::sheets::{SheetsClient, clear_tokens};
use tracing::info;

pub async fn execute(credentials: &CredentialArgs, reset: bool) -> Result<()> {
    let options = credentials.client_options()?;
    if reset {
        clear_tokens(&options.token_cache_file()?)?;
    }

    let client = SheetsClient::new(&options).await?;

    info!(mode = %client.auth_mode(), "Google authentication verified");

    Ok(())
}
