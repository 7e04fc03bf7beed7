//! Implements the `CellStore` trait using the `sheets::Client` to interact with a Google sheet.

use crate::api::{CellStore, TokenProvider};
use crate::error::Res;
use crate::model::{qualify, whole_column, CellRange, CellRef, Column};
use crate::Config;
use anyhow::Context;
use sheets::types::{
    BatchUpdateValuesRequest, DateTimeRenderOption, Dimension, ValueInputOption, ValueRange,
    ValueRenderOption,
};
use sheets::ClientError;
use tracing::trace;

/// Implements the `CellStore` trait using the `sheets::Client`. It takes a `TokenProvider`, on
/// which it calls refresh to keep the token up-to-date.
pub(super) struct GoogleStore {
    config: Config,
    token_provider: TokenProvider,
    client: sheets::Client,
}

impl GoogleStore {
    pub(super) async fn new(config: Config, mut token_provider: TokenProvider) -> Res<Self> {
        let client = create_sheets_client(&mut token_provider).await?;
        Ok(Self {
            config,
            token_provider,
            client,
        })
    }

    /// Refreshes the sheets client with a new access token if needed
    async fn refresh_client(&mut self) -> Res<()> {
        self.client = create_sheets_client(&mut self.token_provider).await?;
        Ok(())
    }

    /// Reads formatted values of a sheet-qualified A1 range, row by row.
    async fn values(&mut self, range: &str) -> Res<Vec<Vec<String>>> {
        self.refresh_client().await?;
        let response = self
            .client
            .spreadsheets()
            .values_get(
                self.config.spreadsheet_id(),
                range,
                DateTimeRenderOption::FormattedString,
                Dimension::Rows,
                ValueRenderOption::FormattedValue,
            )
            .await
            .map_err(map_client_error)
            .with_context(|| format!("Failed to read {range}"))?;
        Ok(response.body.values)
    }
}

#[async_trait::async_trait]
impl CellStore for GoogleStore {
    async fn read_column(&mut self, sheet: &str, column: Column) -> Res<Vec<String>> {
        trace!("read_column {column} of {sheet}");
        let rows = self.values(&qualify(sheet, whole_column(column))).await?;
        // Blank rows above the last filled one come back as empty rows.
        Ok(rows
            .into_iter()
            .map(|row| row.into_iter().next().unwrap_or_default())
            .collect())
    }

    async fn read_range(&mut self, sheet: &str, range: CellRange) -> Res<Vec<Vec<String>>> {
        trace!("read_range {range} of {sheet}");
        self.values(&qualify(sheet, range)).await
    }

    async fn read_cells(&mut self, sheet: &str, cells: &[CellRef]) -> Res<Vec<Option<String>>> {
        trace!("read_cells {cells:?} of {sheet}");
        let Some(range) = CellRange::covering(cells) else {
            return Ok(Vec::new());
        };
        // One request for the block that holds every cell, so the values are read together.
        let rows = self.values(&qualify(sheet, range)).await?;
        Ok(cells
            .iter()
            .map(|cell| {
                let (row, column) = range.offset_of(*cell)?;
                rows.get(row)
                    .and_then(|values| values.get(column))
                    .filter(|v| !v.is_empty())
                    .cloned()
            })
            .collect())
    }

    async fn write_cells(&mut self, sheet: &str, cells: &[(CellRef, String)]) -> Res<()> {
        trace!("write_cells {} cell(s) of {sheet}", cells.len());
        self.refresh_client().await?;
        let value_ranges: Vec<ValueRange> = cells
            .iter()
            .map(|(cell, value)| ValueRange {
                major_dimension: Some(Dimension::Rows),
                range: qualify(sheet, cell),
                values: vec![vec![value.clone()]],
            })
            .collect();

        let request = BatchUpdateValuesRequest {
            data: value_ranges,
            include_values_in_response: Some(false),
            response_date_time_render_option: None,
            response_value_render_option: None,
            value_input_option: Some(ValueInputOption::UserEntered),
        };

        self.client
            .spreadsheets()
            .values_batch_update(self.config.spreadsheet_id(), &request)
            .await
            .map_err(map_client_error)
            .with_context(|| format!("Failed to write {} cell(s) to '{sheet}'", cells.len()))?;
        Ok(())
    }
}

/// Creates a new sheets client with a refreshed access token.
async fn create_sheets_client(token_provider: &mut TokenProvider) -> Res<sheets::Client> {
    // Get the access token (will refresh if needed)
    let access_token = token_provider.token_with_refresh().await?;

    // The sheets crate requires client_id, client_secret, and redirect_uri, but we only need the
    // access token for API calls since we handle refresh ourselves.
    Ok(sheets::Client::new(
        String::new(),
        String::new(),
        String::new(),
        access_token.to_string(),
        String::new(),
    ))
}

fn map_client_error(e: sheets::ClientError) -> anyhow::Error {
    let error_name = match &e {
        ClientError::EmptyRefreshToken => "EmptyRefreshToken".to_string(),
        ClientError::FromUtf8Error(inner) => format!("FromUtf8Error {inner}"),
        ClientError::UrlParserError(inner) => format!("UrlParserError {inner}"),
        ClientError::SerdeJsonError(inner) => format!("SerdeJsonError {inner}"),
        ClientError::ReqwestError(inner) => format!("ReqwestError {inner}"),
        ClientError::InvalidHeaderValue(inner) => format!("InvalidHeaderValue {inner}"),
        ClientError::ReqwestMiddleWareError(inner) => format!("ReqwestMiddleWareError {inner}"),
        ClientError::HttpError { .. } => "HttpError".to_string(),
        ClientError::Other(_) => "Other".to_string(),
    };
    anyhow::Error::new(e).context(error_name)
}
