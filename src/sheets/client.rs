use super::WorksheetOperations;
use super::a1::{self, CellAddress};
use super::auth::{AuthMode, CredentialSource, DRIVE_SCOPE, SPREADSHEETS_SCOPE};
use super::cell::{CellValue, Record, json_to_text};
use super::layout::Dimension;
use super::range::WorksheetRange;
use super::records;
use super::requests::{self, ReplaceOptions};
use super::search::{CellMatch, FindOptions, Matcher, Query, find_in_grid};
use super::types::{
    Spreadsheet, SpreadsheetFile, SpreadsheetSelector, Worksheet, WorksheetSelector,
    spreadsheet_key_from_url,
};
use crate::config::{Config, GoogleConfig};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use google_drive3::api::{DriveHub, File};
use google_sheets4::api::{BatchUpdateSpreadsheetRequest, BatchUpdateSpreadsheetResponse};
use google_sheets4::api::{Request, Sheets, ValueRange};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use indicatif::ProgressStyle;
use serde_json::Value;
use std::path::PathBuf;
use tracing::{Span, debug, info, instrument};
use tracing_indicatif::span_ext::IndicatifSpanExt;

type Connector = HttpsConnector<HttpConnector>;

const SPREADSHEET_MIME_TYPE: &str = "application/vnd.google-apps.spreadsheet";

const LIST_PAGE_SIZE: i32 = 100;

/// Everything needed to build a [`SheetsClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    pub service_account_file: Option<PathBuf>,
    pub client_secret_file: PathBuf,
    /// OAuth token cache. `None` means the XDG cache location.
    pub token_cache_file: Option<PathBuf>,
    pub folder_id: Option<String>,
}

impl ClientOptions {
    pub fn from_config(config: &GoogleConfig) -> Result<Self> {
        Ok(Self {
            service_account_file: config.service_account_file.clone(),
            client_secret_file: config.client_secret_file(),
            token_cache_file: None,
            folder_id: config.folder_id.clone(),
        })
    }

    pub fn token_cache_file(&self) -> Result<PathBuf> {
        match &self.token_cache_file {
            Some(path) => Ok(path.clone()),
            None => Config::token_cache_file(),
        }
    }

    pub fn credential_source(&self) -> Result<CredentialSource> {
        CredentialSource::resolve_with(
            self.service_account_file.as_deref(),
            &self.client_secret_file,
            || self.token_cache_file(),
        )
    }
}

/// Authenticated access to Google Sheets, with an active spreadsheet and
/// worksheet that most operations act on.
pub struct SheetsClient {
    sheets: Sheets<Connector>,
    drive: DriveHub<Connector>,
    auth_mode: AuthMode,
    folder_id: Option<String>,
    spreadsheet: Option<Spreadsheet>,
    worksheet: Option<Worksheet>,
}

impl SheetsClient {
    /// Create a new SheetsClient with authenticated access
    #[instrument(name = "Authenticating to Google Sheets", skip_all)]
    pub async fn new(options: &ClientOptions) -> Result<Self> {
        let source = options.credential_source()?;
        let auth_mode = source.mode();
        let auth = source.authenticate().await?;

        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()
            .map_err(|e| AppError::Config(format!("Failed to load TLS root certificates: {}", e)))?
            .https_or_http()
            .enable_http1()
            .build();

        let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(connector);

        let sheets = Sheets::new(client.clone(), auth.clone());
        let drive = DriveHub::new(client, auth);
        info!(mode = %auth_mode, "Authenticated to Google");

        Ok(Self {
            sheets,
            drive,
            auth_mode,
            folder_id: options.folder_id.clone(),
            spreadsheet: None,
            worksheet: None,
        })
    }

    pub fn auth_mode(&self) -> AuthMode {
        self.auth_mode
    }

    pub fn spreadsheet(&self) -> Option<&Spreadsheet> {
        self.spreadsheet.as_ref()
    }

    pub fn worksheet(&self) -> Option<&Worksheet> {
        self.worksheet.as_ref()
    }

    fn active_spreadsheet(&self, action: &str) -> Result<&Spreadsheet> {
        self.spreadsheet
            .as_ref()
            .ok_or_else(|| AppError::no_spreadsheet(action))
    }

    fn active_worksheet(&self, action: &str) -> Result<(&Spreadsheet, &Worksheet)> {
        let spreadsheet = self.active_spreadsheet(action)?;
        let worksheet = self
            .worksheet
            .as_ref()
            .ok_or_else(|| AppError::no_worksheet(action))?;
        Ok((spreadsheet, worksheet))
    }

    // Spreadsheets

    /// Spreadsheets in the configured folder, or every one the credentials can see.
    #[instrument(name = "Listing spreadsheets", skip(self))]
    pub async fn list_spreadsheets(&self) -> Result<Vec<SpreadsheetFile>> {
        self.search_files(None).await
    }

    #[instrument(name = "Creating spreadsheet", skip(self))]
    pub async fn create_spreadsheet(&mut self, title: &str) -> Result<Spreadsheet> {
        let (_, created) = self
            .sheets
            .spreadsheets()
            .create(requests::new_spreadsheet(title))
            .add_scope(SPREADSHEETS_SCOPE)
            .doit()
            .await
            .map_err(|e| AppError::Sheets(format!("Failed to create spreadsheet: {}", e)))?;

        let id = created
            .spreadsheet_id
            .ok_or_else(|| AppError::Sheets("Created spreadsheet has empty ID".to_string()))?;
        debug!(id = %id, "Created spreadsheet");

        if let Some(folder_id) = &self.folder_id {
            self.move_to_folder(&id, folder_id).await?;
        }

        self.activate(&SpreadsheetSelector::Key(id.clone()), &id)
            .await
    }

    // New spreadsheets land in the Drive root; a file may only have one parent
    #[instrument(name = "Moving spreadsheet to folder", skip(self))]
    async fn move_to_folder(&self, id: &str, folder_id: &str) -> Result<()> {
        let (_, file) = self
            .drive
            .files()
            .get(id)
            .param("fields", "parents")
            .add_scope(DRIVE_SCOPE)
            .doit()
            .await
            .map_err(|e| AppError::Drive(format!("Failed to get spreadsheet parents: {}", e)))?;
        let previous = file.parents.unwrap_or_default().join(",");

        let mut call = self
            .drive
            .files()
            .update(File::default(), id)
            .add_parents(folder_id)
            .add_scope(DRIVE_SCOPE);
        if !previous.is_empty() {
            call = call.remove_parents(&previous);
        }

        call.doit_without_upload()
            .await
            .map_err(|e| AppError::Drive(format!("Failed to move spreadsheet: {}", e)))?;

        Ok(())
    }

    /// Activate an existing spreadsheet and select its first worksheet.
    #[instrument(name = "Opening spreadsheet", skip(self), fields(spreadsheet = %selector))]
    pub async fn open_spreadsheet(&mut self, selector: SpreadsheetSelector) -> Result<Spreadsheet> {
        let id = self
            .resolve_spreadsheet_id(&selector)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Spreadsheet {}", selector)))?;

        self.activate(&selector, &id).await
    }

    pub async fn open_or_create_spreadsheet(&mut self, title: &str) -> Result<Spreadsheet> {
        match self.search_files(Some(title)).await?.into_iter().next() {
            Some(file) => self.open_spreadsheet(SpreadsheetSelector::Key(file.id)).await,
            None => self.create_spreadsheet(title).await,
        }
    }

    #[instrument(name = "Deleting spreadsheet", skip(self), fields(spreadsheet = %selector))]
    pub async fn delete_spreadsheet(
        &mut self,
        selector: SpreadsheetSelector,
        ignore_missing: bool,
    ) -> Result<()> {
        let missing = || match ignore_missing {
            true => {
                debug!("Spreadsheet already gone");
                Ok(())
            }
            false => Err(AppError::NotFound(format!("Spreadsheet {}", selector))),
        };

        let Some(id) = self.resolve_spreadsheet_id(&selector).await? else {
            return missing();
        };

        match self
            .drive
            .files()
            .delete(&id)
            .add_scope(DRIVE_SCOPE)
            .doit()
            .await
        {
            Ok(_) => {}
            Err(e) if is_not_found(&e) => return missing(),
            Err(e) => {
                return Err(AppError::Drive(format!(
                    "Failed to delete spreadsheet: {}",
                    e
                )));
            }
        }

        if self.spreadsheet.as_ref().is_some_and(|s| s.id == id) {
            self.spreadsheet = None;
            self.worksheet = None;
        }
        info!(id = %id, "Deleted spreadsheet");

        Ok(())
    }

    async fn activate(&mut self, selector: &SpreadsheetSelector, id: &str) -> Result<Spreadsheet> {
        let (spreadsheet, worksheets) = self
            .fetch_spreadsheet(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Spreadsheet {}", selector)))?;

        self.worksheet = worksheets
            .iter()
            .find(|ws| ws.index == 0)
            .or_else(|| worksheets.first())
            .cloned();
        self.spreadsheet = Some(spreadsheet.clone());
        debug!(title = %spreadsheet.title, worksheet = ?self.worksheet.as_ref().map(|ws| &ws.title), "Activated spreadsheet");

        Ok(spreadsheet)
    }

    async fn resolve_spreadsheet_id(&self, selector: &SpreadsheetSelector) -> Result<Option<String>> {
        match selector {
            SpreadsheetSelector::Title(title) => Ok(self
                .search_files(Some(title))
                .await?
                .into_iter()
                .next()
                .map(|file| file.id)),
            SpreadsheetSelector::Key(key) => Ok(Some(key.clone())),
            SpreadsheetSelector::Url(url) => spreadsheet_key_from_url(url).map(Some),
        }
    }

    async fn fetch_spreadsheet(&self, id: &str) -> Result<Option<(Spreadsheet, Vec<Worksheet>)>> {
        let result = self
            .sheets
            .spreadsheets()
            .get(id)
            .include_grid_data(false)
            .add_scope(SPREADSHEETS_SCOPE)
            .doit()
            .await;

        let (_, response) = match result {
            Ok(response) => response,
            Err(e) if is_not_found(&e) => return Ok(None),
            Err(e) => {
                return Err(AppError::Sheets(format!("Failed to get spreadsheet: {}", e)));
            }
        };

        let spreadsheet = Spreadsheet {
            id: id.to_string(),
            title: response
                .properties
                .and_then(|props| props.title)
                .unwrap_or_default(),
            url: response
                .spreadsheet_url
                .unwrap_or_else(|| Spreadsheet::url_for(id)),
        };
        let worksheets = response
            .sheets
            .unwrap_or_default()
            .into_iter()
            .filter_map(|sheet| sheet.properties)
            .map(Worksheet::try_from)
            .collect::<Result<Vec<_>>>()?;

        Ok(Some((spreadsheet, worksheets)))
    }

    async fn search_files(&self, title: Option<&str>) -> Result<Vec<SpreadsheetFile>> {
        let query = files_query(self.folder_id.as_deref(), title);
        debug!(query = %query, "Searching Drive");

        let mut files = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut call = self
                .drive
                .files()
                .list()
                .q(&query)
                .spaces("drive")
                .page_size(LIST_PAGE_SIZE)
                .add_scope(DRIVE_SCOPE);
            if let Some(token) = &page_token {
                call = call.page_token(token);
            }

            let (_, file_list) = call
                .doit()
                .await
                .map_err(|e| AppError::Drive(format!("Failed to list spreadsheets: {}", e)))?;

            files.extend(
                file_list
                    .files
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|file| {
                        Some(SpreadsheetFile {
                            id: file.id?,
                            title: file.name.unwrap_or_default(),
                        })
                    }),
            );

            match file_list.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(files)
    }

    // Worksheets

    pub async fn list_worksheets(&self) -> Result<Vec<Worksheet>> {
        let spreadsheet = self.active_spreadsheet("listing worksheets")?;
        let (_, worksheets) = self
            .fetch_spreadsheet(&spreadsheet.id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Spreadsheet '{}'", spreadsheet.title)))?;
        Ok(worksheets)
    }

    pub async fn select_worksheet(&mut self, selector: WorksheetSelector) -> Result<Worksheet> {
        let worksheet = self
            .list_worksheets()
            .await?
            .into_iter()
            .find(|ws| selector.matches(ws))
            .ok_or_else(|| AppError::NotFound(format!("Worksheet {}", selector)))?;

        self.worksheet = Some(worksheet.clone());
        Ok(worksheet)
    }

    #[instrument(name = "Creating worksheet", skip(self))]
    pub async fn create_worksheet(&mut self, title: &str) -> Result<Worksheet> {
        let response = self
            .batch_update(vec![requests::add_sheet(title)], "create worksheet")
            .await?;

        let properties = response
            .replies
            .and_then(|replies| replies.into_iter().next())
            .and_then(|reply| reply.add_sheet)
            .and_then(|add_sheet| add_sheet.properties)
            .ok_or_else(|| {
                AppError::Sheets("Failed to get sheet properties from create response".to_string())
            })?;

        let worksheet = Worksheet::try_from(properties)?;
        debug!(id = worksheet.id, "Created worksheet");
        self.worksheet = Some(worksheet.clone());

        Ok(worksheet)
    }

    /// Delete a worksheet of the active spreadsheet by ID.
    #[instrument(name = "Deleting worksheet", skip(self))]
    pub async fn delete_worksheet(&mut self, sheet_id: i32) -> Result<()> {
        self.active_worksheet("deleting a worksheet")?;

        let exists = self.list_worksheets().await?.iter().any(|ws| ws.id == sheet_id);
        if !exists {
            return Err(AppError::NotFound(format!("Worksheet with id {}", sheet_id)));
        }

        self.batch_update(vec![requests::delete_sheet(sheet_id)], "delete worksheet")
            .await?;

        if self.worksheet.as_ref().is_some_and(|ws| ws.id == sheet_id) {
            self.worksheet = None;
        }

        Ok(())
    }

    // Cell data

    /// Write a matrix of values, one row per line, starting at the 1-based offsets.
    pub async fn update_row_by_index(
        &mut self,
        values: &[Vec<CellValue>],
        row_offset: u32,
        column_offset: u32,
    ) -> Result<()> {
        let anchor = CellAddress::new(row_offset, column_offset);
        self.update_values(anchor, to_lines(values)?, Dimension::Rows)
            .await
    }

    /// Write a matrix of values, one column per line, starting at the 1-based offsets.
    pub async fn update_column_by_index(
        &mut self,
        values: &[Vec<CellValue>],
        column_offset: u32,
        row_offset: u32,
    ) -> Result<()> {
        let anchor = CellAddress::new(row_offset, column_offset);
        self.update_values(anchor, to_lines(values)?, Dimension::Columns)
            .await
    }

    pub async fn update_row_by_header(
        &mut self,
        records: &[Option<Record>],
        row_offset: u32,
        header_row: u32,
        case_sensitive: bool,
    ) -> Result<()> {
        records::update_by_header(
            self,
            Dimension::Rows,
            records,
            row_offset,
            header_row,
            case_sensitive,
        )
        .await
    }

    pub async fn update_column_by_header(
        &mut self,
        records: &[Option<Record>],
        column_offset: u32,
        header_column: u32,
        case_sensitive: bool,
    ) -> Result<()> {
        records::update_by_header(
            self,
            Dimension::Columns,
            records,
            column_offset,
            header_column,
            case_sensitive,
        )
        .await
    }

    /// Insert a row before the 1-based `at`, or after the last row.
    pub async fn add_row(&mut self, at: Option<u32>) -> Result<()> {
        self.insert_line(Dimension::Rows, at).await
    }

    /// Insert a column before the 1-based `at`, or after the last column.
    pub async fn add_column(&mut self, at: Option<u32>) -> Result<()> {
        self.insert_line(Dimension::Columns, at).await
    }

    #[instrument(name = "Inserting line", skip(self))]
    async fn insert_line(&mut self, dimension: Dimension, at: Option<u32>) -> Result<()> {
        let (_, worksheet) = self.active_worksheet("inserting rows or columns")?;

        let start = match (at, dimension) {
            (Some(0), _) => {
                return Err(AppError::InvalidArgument(
                    "row and column indices start at 1".to_string(),
                ));
            }
            (Some(at), _) => at - 1,
            (None, Dimension::Rows) => worksheet.row_count,
            (None, Dimension::Columns) => worksheet.column_count,
        };
        let request = requests::insert_dimension(worksheet.id, dimension, start);

        self.batch_update(vec![request], "insert row or column")
            .await?;

        if let Some(worksheet) = self.worksheet.as_mut() {
            match dimension {
                Dimension::Rows => worksheet.row_count += 1,
                Dimension::Columns => worksheet.column_count += 1,
            }
        }

        Ok(())
    }

    /// Append records under the headers of `worksheet`, creating it when needed.
    ///
    /// Returns the range that was written, e.g. `Data!A2:D3`.
    pub async fn append_records(
        &mut self,
        worksheet: &str,
        records: Vec<Record>,
        preserve_blanks: bool,
    ) -> Result<WorksheetRange> {
        records::append_records(self, worksheet, records, preserve_blanks).await
    }

    /// Read `range` of the active spreadsheet as records keyed by the row-1 headers.
    #[instrument(name = "Reading range", skip(self), fields(range = %range))]
    pub async fn read_range(&self, range: &WorksheetRange) -> Result<Vec<Record>> {
        self.active_spreadsheet("reading a range")?;
        records::read_range(self, range).await
    }

    /// Cells of every worksheet that match `query`.
    #[instrument(name = "Searching worksheets", skip(self, query))]
    pub async fn find_cells(&self, query: &Query, options: FindOptions) -> Result<Vec<CellMatch>> {
        let spreadsheet = self.active_spreadsheet("searching")?;
        let matcher = Matcher::new(query, options)?;
        let worksheets = self.list_worksheets().await?;

        let span = Span::current();
        span.pb_set_style(
            &ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
                .map_err(|e| AppError::Other(e.into()))?,
        );
        span.pb_set_message("Searching worksheets");
        span.pb_set_length(worksheets.len() as u64);

        let mut matches = Vec::new();
        for worksheet in &worksheets {
            let range = a1::quoted_title(&worksheet.title);
            let grid = self
                .fetch_values(&spreadsheet.id, &range, Dimension::Rows)
                .await?;
            matches.extend(find_in_grid(&worksheet.title, &grid, &matcher));
            span.pb_inc(1);
        }
        debug!(count = matches.len(), "Found cells");

        Ok(matches)
    }

    /// Replace the matched part of every matching cell. Returns the number of
    /// cells changed.
    #[instrument(name = "Replacing values", skip(self))]
    pub async fn replace_value(
        &self,
        find: &str,
        replacement: &str,
        options: ReplaceOptions,
    ) -> Result<u32> {
        self.active_spreadsheet("replacing values")?;

        let response = self
            .batch_update(
                vec![requests::find_replace(find, replacement, options)],
                "replace values",
            )
            .await?;

        let changed = response
            .replies
            .and_then(|replies| replies.into_iter().next())
            .and_then(|reply| reply.find_replace)
            .and_then(|reply| reply.occurrences_changed)
            .unwrap_or_default();
        debug!(changed, "Replaced values");

        Ok(changed.max(0) as u32)
    }

    async fn fetch_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        dimension: Dimension,
    ) -> Result<Vec<Vec<String>>> {
        let (_, response) = self
            .sheets
            .spreadsheets()
            .values_get(spreadsheet_id, range)
            .major_dimension(dimension.as_api_str())
            .value_render_option("FORMATTED_VALUE")
            .add_scope(SPREADSHEETS_SCOPE)
            .doit()
            .await
            .map_err(|e| AppError::Sheets(format!("Failed to read {}: {}", range, e)))?;

        // Values are Option<Vec<Vec<serde_json::Value>>>
        Ok(response
            .values
            .unwrap_or_default()
            .iter()
            .map(|line| line.iter().map(json_to_text).collect())
            .collect())
    }

    async fn fetch_line(&self, index: u32, dimension: Dimension) -> Result<Vec<String>> {
        let (spreadsheet, worksheet) = self.active_worksheet("reading cells")?;
        if index == 0 {
            return Err(AppError::InvalidArgument(
                "row and column indices start at 1".to_string(),
            ));
        }

        let line = match dimension {
            Dimension::Rows => format!("{}:{}", index, index),
            Dimension::Columns => {
                let letter = a1::column_letter(index);
                format!("{}:{}", letter, letter)
            }
        };
        let range = a1::qualified(&worksheet.title, &line);

        let mut cells = self
            .fetch_values(&spreadsheet.id, &range, dimension)
            .await?
            .into_iter()
            .next()
            .unwrap_or_default();
        while cells.last().is_some_and(|cell| cell.is_empty()) {
            cells.pop();
        }

        Ok(cells)
    }

    async fn batch_update(
        &self,
        requests: Vec<Request>,
        action: &str,
    ) -> Result<BatchUpdateSpreadsheetResponse> {
        let spreadsheet = self.active_spreadsheet(action)?;

        let batch_update = BatchUpdateSpreadsheetRequest {
            requests: Some(requests),
            include_spreadsheet_in_response: Some(false),
            ..Default::default()
        };

        let (_, response) = self
            .sheets
            .spreadsheets()
            .batch_update(batch_update, &spreadsheet.id)
            .add_scope(SPREADSHEETS_SCOPE)
            .doit()
            .await
            .map_err(|e| AppError::Sheets(format!("Failed to {}: {}", action, e)))?;

        Ok(response)
    }
}

#[async_trait]
impl WorksheetOperations for SheetsClient {
    #[instrument(name = "Ensuring worksheet exists", skip(self))]
    async fn select_or_create_worksheet(&mut self, title: &str) -> Result<Worksheet> {
        match self
            .select_worksheet(WorksheetSelector::Title(title.to_string()))
            .await
        {
            Ok(worksheet) => {
                debug!(id = worksheet.id, "Found existing worksheet");
                Ok(worksheet)
            }
            Err(AppError::NotFound(_)) => self.create_worksheet(title).await,
            Err(e) => Err(e),
        }
    }

    async fn get_row(&self, index: u32) -> Result<Vec<String>> {
        self.fetch_line(index, Dimension::Rows).await
    }

    async fn get_column(&self, index: u32) -> Result<Vec<String>> {
        self.fetch_line(index, Dimension::Columns).await
    }

    async fn get_values(&self, range: &WorksheetRange) -> Result<Vec<Vec<String>>> {
        let spreadsheet = self.active_spreadsheet("reading cells")?;
        let a1_range = a1::qualified(&range.worksheet, &format!("{}:{}", range.start, range.end));

        self.fetch_values(&spreadsheet.id, &a1_range, Dimension::Rows)
            .await
    }

    #[instrument(name = "Writing cells", skip(self, values), fields(anchor = %anchor))]
    async fn update_values(
        &mut self,
        anchor: CellAddress,
        values: Vec<Vec<Option<Value>>>,
        dimension: Dimension,
    ) -> Result<()> {
        let (spreadsheet, worksheet) = self.active_worksheet("writing cells")?;

        let depth = values.iter().map(Vec::len).max().unwrap_or(0) as u32;
        if values.is_empty() || depth == 0 {
            return Ok(());
        }
        let (rows, columns) = grid_extent(anchor, values.len() as u32, depth, dimension)?;

        let spreadsheet_id = spreadsheet.id.clone();
        let range = a1::qualified(&worksheet.title, &anchor.to_string());
        let grow = requests::grow_to(worksheet, rows, columns);

        if !grow.is_empty() {
            debug!(rows, columns, "Growing worksheet");
            self.batch_update(grow, "resize worksheet").await?;
            if let Some(worksheet) = self.worksheet.as_mut() {
                worksheet.row_count = worksheet.row_count.max(rows);
                worksheet.column_count = worksheet.column_count.max(columns);
            }
        }

        // Null cells are skipped by the API, leaving whatever they held
        let lines: Vec<Vec<Value>> = values
            .into_iter()
            .map(|line| line.into_iter().map(Option::unwrap_or_default).collect())
            .collect();

        let value_range = ValueRange {
            major_dimension: Some(dimension.as_api_str().to_string()),
            range: Some(range.clone()),
            values: Some(lines),
        };

        self.sheets
            .spreadsheets()
            .values_update(value_range, &spreadsheet_id, &range)
            .value_input_option("USER_ENTERED")
            .add_scope(SPREADSHEETS_SCOPE)
            .doit()
            .await
            .map_err(|e| AppError::Sheets(format!("Failed to write {}: {}", range, e)))?;

        Ok(())
    }
}

/// Last row and column touched by `count` lines of up to `depth` cells.
fn grid_extent(
    anchor: CellAddress,
    count: u32,
    depth: u32,
    dimension: Dimension,
) -> Result<(u32, u32)> {
    let (down, across) = match dimension {
        Dimension::Rows => (count, depth),
        Dimension::Columns => (depth, count),
    };
    let last = |start: u32, length: u32| {
        start.checked_add(length.saturating_sub(1)).ok_or_else(|| {
            AppError::InvalidArgument(format!("values written at {} run past the grid", anchor))
        })
    };

    Ok((last(anchor.row, down)?, last(anchor.column, across)?))
}

fn to_lines(values: &[Vec<CellValue>]) -> Result<Vec<Vec<Option<Value>>>> {
    values
        .iter()
        .map(|line| {
            line.iter()
                .map(|value| value.to_json().map(Some))
                .collect::<Result<Vec<_>>>()
        })
        .collect()
}

/// Drive search query for spreadsheets, optionally restricted to a folder and title.
fn files_query(folder_id: Option<&str>, title: Option<&str>) -> String {
    let mut clauses = vec![
        format!("mimeType='{}'", SPREADSHEET_MIME_TYPE),
        "trashed=false".to_string(),
    ];
    if let Some(folder_id) = folder_id {
        clauses.push(format!("'{}' in parents", escape_query_literal(folder_id)));
    }
    if let Some(title) = title {
        clauses.push(format!("name='{}'", escape_query_literal(title)));
    }
    clauses.join(" and ")
}

fn escape_query_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

fn is_not_found(err: &google_sheets4::Error) -> bool {
    match err {
        google_sheets4::Error::BadRequest(body) => {
            body.pointer("/error/code").and_then(Value::as_u64) == Some(404)
        }
        google_sheets4::Error::Failure(response) => response.status().as_u16() == 404,
        _ => false,
    }
}
