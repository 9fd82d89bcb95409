use super::CredentialArgs;
use sheets_client::error::Result;
use tracing::info;

pub async fn execute(credentials: &CredentialArgs) -> Result<()> {
    let client = credentials.connect().await?;
    let files = client.list_spreadsheets().await?;

    for file in &files {
        println!("{}\t{}", file.id, file.title);
    }
    info!(count = files.len(), "Listed spreadsheets");

    Ok(())
}
