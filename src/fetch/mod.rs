// src/fetch/mod.rs

use anyhow::{bail, Context, Result};
use reqwest::{header::CACHE_CONTROL, Client};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use crate::process::RawRow;

/// The sheet the page is driven by.
pub static DEFAULT_SHEET_ID: &str = "1F97w8RaNMX6n-P3Y1XXavYofRE85moAKdAkgZ5NOCnw";
pub static DEFAULT_TAB_NAME: &str = "Sheet1";

/// Which spreadsheet and tab to pull rows from.
#[derive(Debug, Clone)]
pub struct SheetSource {
    pub sheet_id: String,
    pub tab_name: String,
}

impl Default for SheetSource {
    fn default() -> Self {
        Self {
            sheet_id: DEFAULT_SHEET_ID.to_string(),
            tab_name: DEFAULT_TAB_NAME.to_string(),
        }
    }
}

/// Shape of the JSON object embedded in the gviz callback envelope.
#[derive(Debug, Deserialize)]
struct GvizResponse {
    table: GvizTable,
}

#[derive(Debug, Deserialize)]
struct GvizTable {
    #[serde(default)]
    cols: Vec<GvizCol>,
    #[serde(default)]
    rows: Vec<GvizRow>,
}

#[derive(Debug, Deserialize)]
struct GvizCol {
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GvizRow {
    #[serde(default)]
    c: Vec<Option<GvizCell>>,
}

#[derive(Debug, Deserialize)]
struct GvizCell {
    #[serde(default)]
    v: Option<Value>,
}

/// Build the gviz query URL for `src`. The tab name is user text and gets
/// encoded by the query serializer.
pub fn data_url(src: &SheetSource) -> Result<Url> {
    let base = format!(
        "https://docs.google.com/spreadsheets/d/{}/gviz/tq",
        src.sheet_id
    );
    let mut url = Url::parse(&base).with_context(|| format!("building URL for {}", base))?;
    url.query_pairs_mut()
        .append_pair("tqx", "out:json")
        .append_pair("sheet", &src.tab_name);
    Ok(url)
}

/// Fetch the sheet once, uncached, and turn the response into rows.
/// No retry; a transport failure propagates to the caller.
pub async fn load_rows(client: &Client, src: &SheetSource) -> Result<Vec<RawRow>> {
    let url = data_url(src)?;
    info!(%url, "fetching sheet");
    let text = client
        .get(url.clone())
        .header(CACHE_CONTROL, "no-store")
        .send()
        .await
        .with_context(|| format!("GET {}", url))?
        .error_for_status()?
        .text()
        .await
        .with_context(|| format!("reading body from {}", url))?;
    parse_rows(&text)
}

/// Unwrap the callback envelope and zip column headers with cell values.
///
/// The body is not valid JSON on its own; the embedded object is located
/// greedily from the first `{` to the last `}`, tolerating arbitrary wrapper
/// text on either side.
pub fn parse_rows(text: &str) -> Result<Vec<RawRow>> {
    let span = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => bail!("unexpected response format from the sheets endpoint"),
    };
    let gviz: GvizResponse = serde_json::from_str(span).context("parsing gviz payload")?;

    // Header per column: label preferred, id as fallback, trimmed.
    let headers: Vec<String> = gviz
        .table
        .cols
        .iter()
        .map(|c| {
            c.label
                .as_deref()
                .filter(|l| !l.trim().is_empty())
                .or(c.id.as_deref())
                .unwrap_or("")
                .trim()
                .to_string()
        })
        .collect();

    let mut out = Vec::with_capacity(gviz.table.rows.len());
    for row in &gviz.table.rows {
        let mut raw = RawRow::new();
        for (i, header) in headers.iter().enumerate() {
            // Null cells, null values, and cells past the row's declared
            // length all become the empty string.
            let value = row
                .c
                .get(i)
                .and_then(|cell| cell.as_ref())
                .and_then(|cell| cell.v.as_ref())
                .map(cell_text)
                .unwrap_or_default();
            raw.insert(header.clone(), value);
        }
        out.push(raw);
    }
    debug!(rows = out.len(), cols = headers.len(), "parsed sheet rows");
    Ok(out)
}

fn cell_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}
