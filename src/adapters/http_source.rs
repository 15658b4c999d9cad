use crate::adapters::csv_source::parse_csv;
use crate::core::{RawTable, SheetRef, TableSource};
use crate::utils::error::{EtlError, Result};
use reqwest::Client;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::time::Duration;
use url::form_urlencoded::byte_serialize;

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

// A sheet name must stay a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Downloads worksheets from a CSV export endpoint, e.g. a published sheet's
/// `.../export?format=csv&sheet={worksheet}` URL.
#[derive(Debug, Clone)]
pub struct HttpCsvSource {
    endpoint_template: String,
    client: Client,
}

impl HttpCsvSource {
    pub fn new(endpoint_template: impl Into<String>, timeout_seconds: Option<u64>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(
                timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS),
            ))
            .build()?;

        Ok(Self {
            endpoint_template: endpoint_template.into(),
            client,
        })
    }

    /// Fills the template. Placeholders before `?` are percent-encoded as path
    /// segments (`%20`), those in the query are form-encoded (`+`).
    pub fn url_for(&self, sheet: &SheetRef) -> String {
        match self.endpoint_template.split_once('?') {
            Some((path, query)) => format!(
                "{}?{}",
                fill(path, sheet, encode_path_segment),
                fill(query, sheet, encode_query_value)
            ),
            None => fill(&self.endpoint_template, sheet, encode_path_segment),
        }
    }
}

fn fill(template: &str, sheet: &SheetRef, encode: fn(&str) -> String) -> String {
    template
        .replace("{spreadsheet}", &encode(&sheet.spreadsheet))
        .replace("{worksheet}", &encode(&sheet.worksheet))
}

fn encode_path_segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

fn encode_query_value(value: &str) -> String {
    byte_serialize(value.as_bytes()).collect()
}

impl TableSource for HttpCsvSource {
    async fn fetch_table(&self, sheet: &SheetRef) -> Result<RawTable> {
        let url = self.url_for(sheet);
        tracing::debug!("Requesting worksheet {} from {}", sheet, url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        tracing::debug!("Export response status: {}", status);

        if !status.is_success() {
            return Err(EtlError::Source {
                message: format!("export of {} returned HTTP {}", sheet, status),
            });
        }

        let body = response.bytes().await?;
        parse_csv(&sheet.worksheet, &body)
    }
}
