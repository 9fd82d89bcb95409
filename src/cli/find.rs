use super::{CredentialArgs, spreadsheet_selector};
use sheets_client::error::Result;
use sheets_client::sheets::{FindOptions, Query};
use tracing::info;

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchFlags {
    pub ignore_case: bool,
    pub partial: bool,
    pub regex: bool,
}

impl SearchFlags {
    fn query(&self, value: &str) -> Result<Query> {
        match self.regex {
            true => Query::pattern(value),
            false => Ok(Query::text(value)),
        }
    }

    fn options(&self) -> FindOptions {
        FindOptions {
            match_case: !self.ignore_case,
            match_entire_cell: !self.partial,
        }
    }
}

pub async fn execute(
    credentials: &CredentialArgs,
    spreadsheet: &str,
    value: &str,
    flags: SearchFlags,
) -> Result<()> {
    let query = flags.query(value)?;

    let mut client = credentials.connect().await?;
    client.open_spreadsheet(spreadsheet_selector(spreadsheet)).await?;

    let matches = client.find_cells(&query, flags.options()).await?;
    for cell in &matches {
        println!("{}!{}\t{}", cell.worksheet, cell.label(), cell.value);
    }
    info!(count = matches.len(), "Search finished");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheets_client::error::AppError;

    #[test]
    fn test_flags_to_options() {
        assert_eq!(SearchFlags::default().options(), FindOptions::default());

        let options = SearchFlags {
            ignore_case: true,
            partial: true,
            regex: false,
        }
        .options();
        assert!(!options.match_case);
        assert!(!options.match_entire_cell);
    }

    #[test]
    fn test_flags_to_query() {
        let flags = SearchFlags {
            regex: true,
            ..Default::default()
        };
        assert!(matches!(flags.query("ro.7"), Ok(Query::Pattern(_))));
        assert!(matches!(flags.query("("), Err(AppError::InvalidArgument(_))));
        assert!(matches!(
            SearchFlags::default().query("("),
            Ok(Query::Text(_))
        ));
    }
}
