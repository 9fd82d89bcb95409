mod append;
mod auth;
mod delete;
mod find;
mod list;
mod read;
mod show;

use clap::{Args, Parser, Subcommand};
use sheets_client::config::Config;
use sheets_client::error::Result;
use sheets_client::sheets::{ClientOptions, SheetsClient, SpreadsheetSelector};
use std::path::PathBuf;

pub use show::ShowResource;

#[derive(Parser, Debug)]
#[command(name = "sheets-client")]
#[command(about = "Read and write Google Sheets with a service account or OAuth client", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub credentials: CredentialArgs,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub async fn run(&self) -> Result<()> {
        let credentials = &self.credentials;
        match &self.command {
            Commands::Auth { reset } => auth::execute(credentials, *reset).await,
            Commands::Show { resource } => resource.execute().await,
            Commands::List => list::execute(credentials).await,
            Commands::Delete { title, yes } => delete::execute(credentials, title, *yes).await,
            Commands::Read { spreadsheet, range } => {
                read::execute(credentials, spreadsheet, range).await
            }
            Commands::Append {
                spreadsheet,
                worksheet,
                file,
                preserve_blanks,
            } => {
                append::execute(credentials, spreadsheet, worksheet, file, *preserve_blanks).await
            }
            Commands::Find {
                spreadsheet,
                value,
                ignore_case,
                partial,
                regex,
            } => {
                let options = find::SearchFlags {
                    ignore_case: *ignore_case,
                    partial: *partial,
                    regex: *regex,
                };
                find::execute(credentials, spreadsheet, value, options).await
            }
        }
    }
}

/// Overrides for the `[google]` section of the config file.
#[derive(Args, Debug)]
pub struct CredentialArgs {
    /// Service account JSON key; takes precedence over the OAuth client secret
    #[arg(long, global = true, value_name = "PATH")]
    pub service_account: Option<PathBuf>,

    /// OAuth client secret JSON for the browser consent flow
    #[arg(long, global = true, value_name = "PATH")]
    pub client_secret: Option<PathBuf>,

    /// Drive folder ID to list and create spreadsheets in
    #[arg(long, global = true, value_name = "ID")]
    pub folder: Option<String>,
}

impl CredentialArgs {
    pub fn client_options(&self) -> Result<ClientOptions> {
        let mut google = Config::load()?.google;

        if let Some(path) = &self.service_account {
            google.service_account_file = Some(path.clone());
        }
        if let Some(path) = &self.client_secret {
            google.client_secret_file = Some(path.clone());
        }
        if let Some(folder) = &self.folder {
            google.folder_id = Some(folder.clone());
        }

        ClientOptions::from_config(&google)
    }

    pub async fn connect(&self) -> Result<SheetsClient> {
        SheetsClient::new(&self.client_options()?).await
    }
}

/// Spreadsheets are named on the command line by URL or by title.
pub fn spreadsheet_selector(arg: &str) -> SpreadsheetSelector {
    match arg.starts_with("https://") || arg.starts_with("http://") {
        true => SpreadsheetSelector::Url(arg.to_string()),
        false => SpreadsheetSelector::Title(arg.to_string()),
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Verify Google credentials
    Auth {
        /// Forget the cached OAuth token first
        #[arg(long)]
        reset: bool,
    },
    Show {
        #[command(subcommand)]
        resource: ShowResource,
    },
    /// List spreadsheets
    List,
    /// Delete a spreadsheet
    Delete {
        title: String,

        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Print a range as JSON records, e.g. `Data!A2:D10`
    Read { spreadsheet: String, range: String },
    /// Append the rows of a CSV file under the worksheet headers
    Append {
        spreadsheet: String,
        worksheet: String,
        file: PathBuf,

        /// Write empty CSV fields as <blank> so they read back as empty strings
        #[arg(long)]
        preserve_blanks: bool,
    },
    /// Find cells holding a value
    Find {
        spreadsheet: String,
        value: String,

        #[arg(long, short)]
        ignore_case: bool,

        /// Match part of a cell instead of the whole cell
        #[arg(long, short)]
        partial: bool,

        /// Treat the value as a regular expression
        #[arg(long, short)]
        regex: bool,
    },
}
