//! Positional extraction of quota figures from the QuickCheck page
//!
//! The page offers no API; figures are found by table and row index. When the
//! upstream layout changes, only the constants below need updating.

use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;

use crate::core::{parse_bytes, Quota, QuotaError};

/// Table/row holding "seit dem DD.MM.YYYY"
const START_TABLE: usize = 1;
const START_ROW: usize = 0;
const START_SELECTOR: &str = "td[align='right'] > span.hd1";
const START_FORMAT: &str = "seit dem %d.%m.%Y";

/// Table/row holding the included and consumed volume
const VOLUME_TABLE: usize = 2;
const VOLUME_ROW: usize = 3;
const LIMIT_CELL: usize = 0;
const USED_CELL: usize = 1;

fn table_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("table").unwrap())
}

fn row_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("tr").unwrap())
}

fn cell_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("td").unwrap())
}

fn start_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse(START_SELECTOR).unwrap())
}

/// Build a [`Quota`] from the status page.
///
/// The period start is extracted first; if it is missing, the volume cells
/// are never looked at.
pub fn extract(document: &Html) -> Result<Quota, QuotaError> {
    let start = extract_start(document)?;
    let (limit, used) = extract_volume(document)?;

    tracing::debug!(%start, limit, used, "Extracted quota figures");
    Ok(Quota::new(start, limit, used))
}

fn extract_start(document: &Html) -> Result<NaiveDate, QuotaError> {
    let row = nth_row(document, START_TABLE, START_ROW)?;
    let text: String = row
        .select(start_selector())
        .flat_map(|el| el.text())
        .collect();

    if text.trim().is_empty() {
        return Err(QuotaError::layout(format!(
            "period start ({}) not found in table #{} row #{}",
            START_SELECTOR, START_TABLE, START_ROW
        )));
    }

    parse_start_date(&text)
}

/// Parse "seit dem DD.MM.YYYY"; runs of whitespace count as one space
pub fn parse_start_date(text: &str) -> Result<NaiveDate, QuotaError> {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    NaiveDate::parse_from_str(&normalized, START_FORMAT).map_err(|e| {
        QuotaError::layout_with(format!("cannot parse period start {:?}", normalized), e)
    })
}

fn extract_volume(document: &Html) -> Result<(u64, u64), QuotaError> {
    let row = nth_row(document, VOLUME_TABLE, VOLUME_ROW)?;
    let cells: Vec<ElementRef> = row.select(cell_selector()).take(USED_CELL + 1).collect();

    let limit = cell_bytes(&cells, LIMIT_CELL, "limit")?;
    let used = cell_bytes(&cells, USED_CELL, "used volume")?;
    Ok((limit, used))
}

fn cell_bytes(cells: &[ElementRef], index: usize, what: &str) -> Result<u64, QuotaError> {
    let cell = cells.get(index).ok_or_else(|| {
        QuotaError::layout(format!(
            "{} cell #{} missing in table #{} row #{}",
            what, index, VOLUME_TABLE, VOLUME_ROW
        ))
    })?;

    let text: String = cell.text().collect();
    parse_bytes(&text)
        .map_err(|e| QuotaError::layout_with(format!("cannot parse {} {:?}", what, text.trim()), e))
}

fn nth_row(document: &Html, table: usize, row: usize) -> Result<ElementRef<'_>, QuotaError> {
    let table_el = document
        .select(table_selector())
        .nth(table)
        .ok_or_else(|| QuotaError::layout(format!("table #{} not found", table)))?;

    table_el
        .select(row_selector())
        .nth(row)
        .ok_or_else(|| QuotaError::layout(format!("row #{} not found in table #{}", row, table)))
}
