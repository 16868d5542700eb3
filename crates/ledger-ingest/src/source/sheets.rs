//! Google Sheets row source
//!
//! Talks to the Sheets v4 REST API directly with `reqwest`:
//!
//! 1. `GET /v4/spreadsheets/{id}` (titles only) to confirm the tab exists
//! 2. `GET /v4/spreadsheets/{id}/values/{tab}` for the cell grid
//!
//! The grid is turned into records the way a spreadsheet "all records" read
//! does it: the first row is the header, short rows are padded with blanks
//! and numeric-looking cells become numbers.

use super::{Result, RowSource, SourceError};
use crate::config::SheetsConfig;
use crate::record::{Cell, Record};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info};

/// Credentials for the Sheets API
#[derive(Clone, PartialEq, Eq)]
pub enum SheetsAuth {
    /// OAuth2 access token, sent as a bearer token
    AccessToken(String),
    /// API key, sent as the `key` query parameter (public sheets only)
    ApiKey(String),
}

impl std::fmt::Debug for SheetsAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetsAuth::AccessToken(_) => f.write_str("AccessToken(***)"),
            SheetsAuth::ApiKey(_) => f.write_str("ApiKey(***)"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMetadata {
    properties: SheetProperties,
    #[serde(default)]
    sheets: Vec<Sheet>,
}

#[derive(Debug, Deserialize)]
struct Sheet {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Sheets API client bound to one spreadsheet
pub struct SheetsClient {
    client: Client,
    base_url: Url,
    spreadsheet_id: String,
    auth: SheetsAuth,
}

impl SheetsClient {
    pub fn new(config: &SheetsConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| SourceError::Url(format!("{}: {}", config.base_url, e)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url,
            spreadsheet_id: config.spreadsheet_id.clone(),
            auth: config.auth.clone(),
        })
    }

    /// `{base}/v4/spreadsheets/{id}/{segments...}`, each segment percent-encoded
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SourceError::Url(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", self.spreadsheet_id.as_str()])
            .extend(segments);
        Ok(url)
    }

    fn get(&self, url: Url) -> RequestBuilder {
        let request = self.client.get(url);
        match &self.auth {
            SheetsAuth::AccessToken(token) => request.bearer_auth(token),
            SheetsAuth::ApiKey(key) => request.query(&[("key", key)]),
        }
    }

    async fn send<T: for<'de> Deserialize<'de>>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| SourceError::Decode(e.to_string()))
    }

    async fn metadata(&self) -> Result<SpreadsheetMetadata> {
        let request = self
            .get(self.url(&[])?)
            .query(&[("fields", "properties.title,sheets.properties.title")]);
        self.send(request).await
    }

    /// Confirm the tab exists and return the spreadsheet title.
    async fn open_tab(&self, tab: &str) -> Result<String> {
        let metadata = self.metadata().await?;
        let available: Vec<String> =
            metadata.sheets.into_iter().map(|s| s.properties.title).collect();

        if !available.iter().any(|title| title == tab) {
            return Err(SourceError::TabNotFound {
                tab: tab.to_string(),
                available,
            });
        }

        Ok(metadata.properties.title)
    }

    async fn values(&self, tab: &str) -> Result<Vec<Vec<Value>>> {
        let request = self
            .get(self.url(&["values", tab])?)
            .query(&[("valueRenderOption", "FORMATTED_VALUE")]);
        let range: ValueRange = self.send(request).await?;
        Ok(range.values)
    }
}

#[async_trait]
impl RowSource for SheetsClient {
    async fn fetch_rows(&self, tab: &str) -> Result<Vec<Record>> {
        let title = self.open_tab(tab).await?;
        info!("Connected to sheet: {} | Tab Name: {}", title, tab);

        let grid = self.values(tab).await?;
        debug!(tab, rows = grid.len(), "fetched value range");

        records_from_grid(grid)
    }
}

/// Build records from a value grid whose first row is the header.
///
/// Columns with a blank header are dropped. Rows shorter than the header are
/// padded with blank text.
pub fn records_from_grid(grid: Vec<Vec<Value>>) -> Result<Vec<Record>> {
    let mut rows = grid.into_iter();
    let Some(header_row) = rows.next() else {
        return Ok(Vec::new());
    };

    let mut seen = HashSet::new();
    let mut header = Vec::with_capacity(header_row.len());
    for value in &header_row {
        let name = header_text(value);
        if name.is_empty() {
            header.push(None);
            continue;
        }
        if !seen.insert(name.clone()) {
            return Err(SourceError::DuplicateHeader(name));
        }
        header.push(Some(name));
    }

    let records: Vec<Record> = rows
        .map(|row| {
            let mut cells = row.into_iter();
            header
                .iter()
                .map(|name| (name, cells.next()))
                .filter_map(|(name, value)| {
                    let name = name.as_ref()?;
                    let cell = value.map(numericise).unwrap_or_else(|| Cell::text(""));
                    Some((name.clone(), cell))
                })
                .collect::<Record>()
        })
        .collect();

    Ok(records)
}

fn header_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Numbers stay numbers; numeric-looking text becomes a number.
fn numericise(value: Value) -> Cell {
    match value {
        Value::Null => Cell::text(""),
        Value::Bool(b) => Cell::Bool(b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Cell::Integer(i),
            None => n.as_f64().map(Cell::Float).unwrap_or_else(|| Cell::text(n.to_string())),
        },
        Value::String(s) => {
            let trimmed = s.trim();
            if let Ok(i) = trimmed.parse::<i64>() {
                Cell::Integer(i)
            } else if let Some(f) = trimmed.parse::<f64>().ok().filter(|f| f.is_finite()) {
                Cell::Float(f)
            } else {
                Cell::Text(s)
            }
        },
        other => Cell::Text(other.to_string()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn grid(value: Value) -> Vec<Vec<Value>> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_empty_grid() {
        assert!(records_from_grid(Vec::new()).unwrap().is_empty());
        assert!(records_from_grid(grid(json!([["a", "b"]]))).unwrap().is_empty());
    }

    #[test]
    fn test_header_and_padding() {
        let records =
            records_from_grid(grid(json!([["code", "name", "note"], ["6100", "Office"]]))).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("code"), Some(&Cell::Integer(6100)));
        assert_eq!(records[0].get("name"), Some(&Cell::text("Office")));
        assert_eq!(records[0].get("note"), Some(&Cell::text("")));
    }

    #[test]
    fn test_numericise() {
        assert_eq!(numericise(json!("12.50")), Cell::Float(12.5));
        assert_eq!(numericise(json!(" 42 ")), Cell::Integer(42));
        assert_eq!(numericise(json!("$1,234.50")), Cell::text("$1,234.50"));
        assert_eq!(numericise(json!("1/20/2026")), Cell::text("1/20/2026"));
        assert_eq!(numericise(json!("NaN")), Cell::text("NaN"));
        assert_eq!(numericise(json!(true)), Cell::Bool(true));
        assert_eq!(numericise(json!(7)), Cell::Integer(7));
        assert_eq!(numericise(Value::Null), Cell::text(""));
    }

    #[test]
    fn test_blank_header_columns_dropped() {
        let records = records_from_grid(grid(json!([["code", "", "name"], ["1", "x", "Cash"]])))
            .unwrap();
        assert_eq!(records[0].get(""), None);
        assert_eq!(records[0].get("code"), Some(&Cell::Integer(1)));
        assert_eq!(records[0].get("name"), Some(&Cell::text("Cash")));
    }

    #[test]
    fn test_blank_rows_kept() {
        let records = records_from_grid(grid(json!([["code"], [], ["1"]]))).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("code"), Some(&Cell::text("")));
    }

    #[test]
    fn test_duplicate_header_rejected() {
        let err = records_from_grid(grid(json!([["code", "code"]]))).unwrap_err();
        assert!(matches!(err, SourceError::DuplicateHeader(name) if name == "code"));
    }
}
