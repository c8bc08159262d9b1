//! Model catalog JSON to [`Catalog`] loader.
//!
//! Accepts either a bare array of model entries or an object with a `models`
//! array. Keys follow the camelCase names of the published dataset. Optional
//! fields are read leniently: malformed citation counts or dates are logged
//! and dropped instead of failing the whole catalog.

use chrono::{DateTime, Datelike, NaiveDate};
use genmodel_core::{Catalog, ChartError, ModelRecord, UseCase};
use serde_json::Value;

/// Errors raised while reading a dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("Dataset contains no model list")]
    MissingData,
    #[error("Could not parse dataset: {0}")]
    Parse(String),
    #[error("Entry {index} is missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },
    #[error("Model {id} has unknown primary use case {value:?}")]
    UnknownUseCase { id: String, value: String },
    #[error(transparent)]
    Catalog(#[from] ChartError),
}

/// Parse a dataset from a JSON string and index it.
pub fn load_catalog_str(dataset_json: &str) -> Result<Catalog, DatasetError> {
    let value: Value =
        serde_json::from_str(dataset_json).map_err(|err| DatasetError::Parse(err.to_string()))?;
    load_catalog_value(&value)
}

/// Index an already parsed dataset.
pub fn load_catalog_value(dataset: &Value) -> Result<Catalog, DatasetError> {
    let records = parse_records(dataset)?;
    Ok(Catalog::new(records)?)
}

/// Records in dataset order, without indexing.
pub fn parse_records(dataset: &Value) -> Result<Vec<ModelRecord>, DatasetError> {
    let entries = match dataset {
        Value::Array(entries) => entries,
        Value::Object(map) => map
            .get("models")
            .and_then(Value::as_array)
            .ok_or(DatasetError::MissingData)?,
        _ => return Err(DatasetError::MissingData),
    };

    let records = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_record(index, entry))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(records = records.len(), "dataset parsed");
    Ok(records)
}

fn parse_record(index: usize, entry: &Value) -> Result<ModelRecord, DatasetError> {
    if !entry.is_object() {
        return Err(DatasetError::Parse(format!(
            "entry {index} is not an object"
        )));
    }

    let id = extract_string(entry, "id").ok_or(DatasetError::MissingField {
        index,
        field: "id",
    })?;
    let model = extract_string(entry, "model").unwrap_or_else(|| id.clone());

    let exact_date = entry
        .get("exactDate")
        .and_then(|value| parse_exact_date(&id, value));
    let year = match extract_year(entry) {
        Some(year) => year,
        None => exact_date
            .map(|date| date.year())
            .ok_or(DatasetError::MissingField {
                index,
                field: "year",
            })?,
    };

    let use_case_raw = extract_string(entry, "primaryUseCase").ok_or(DatasetError::MissingField {
        index,
        field: "primaryUseCase",
    })?;
    let primary_use_case: UseCase =
        use_case_raw
            .parse()
            .map_err(|_| DatasetError::UnknownUseCase {
                id: id.clone(),
                value: use_case_raw.clone(),
            })?;

    let citations = entry
        .get("citations")
        .and_then(|value| parse_citations(&id, value));

    Ok(ModelRecord {
        model_type: extract_string(entry, "type"),
        paper_title: extract_string(entry, "paperTitle"),
        pdf: extract_string(entry, "pdf"),
        flowchart: extract_string(entry, "flowchart"),
        high_level_intuition: extract_string(entry, "highLevelIntuition"),
        best_performance: extract_string(entry, "bestPerformance"),
        pros: extract_string_list(entry, "pros"),
        cons: extract_string_list(entry, "cons"),
        analogy: extract_string(entry, "analogy"),
        open_source: extract_string(entry, "openSource"),
        color: extract_string(entry, "color"),
        id,
        model,
        year,
        exact_date,
        primary_use_case,
        citations,
    })
}

/// Trimmed, non-empty string value of `field`.
fn extract_string(entry: &Value, field: &str) -> Option<String> {
    entry
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// A list of strings; a lone string counts as a one-item list.
fn extract_string_list(entry: &Value, field: &str) -> Vec<String> {
    match entry.get(field) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::String(item)) if !item.trim().is_empty() => vec![item.trim().to_string()],
        _ => Vec::new(),
    }
}

fn extract_year(entry: &Value) -> Option<i32> {
    match entry.get("year")? {
        Value::Number(number) => number.as_i64().and_then(|year| i32::try_from(year).ok()),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Citation counts may arrive as numbers or numeric strings.
fn parse_citations(id: &str, value: &Value) -> Option<u64> {
    let parsed = match value {
        Value::Null => return None,
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|n| *n >= 0.0).map(|n| n as u64)),
        Value::String(text) if text.trim().is_empty() => return None,
        Value::String(text) => {
            let text = text.trim();
            text.parse::<u64>().ok().or_else(|| {
                text.parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite() && *n >= 0.0)
                    .map(|n| n as u64)
            })
        }
        _ => None,
    };
    if parsed.is_none() {
        tracing::warn!(id, citations = %value, "ignoring unreadable citation count");
    }
    parsed
}

/// `YYYY-MM-DD`, `YYYY-MM` or an RFC 3339 timestamp.
fn parse_exact_date(id: &str, value: &Value) -> Option<NaiveDate> {
    let text = match value {
        Value::Null => return None,
        Value::String(text) if text.trim().is_empty() => return None,
        Value::String(text) => text.trim(),
        other => {
            tracing::warn!(id, exact_date = %other, "exactDate is not a string");
            return None;
        }
    };
    let parsed = parse_date(text);
    if parsed.is_none() {
        tracing::warn!(id, exact_date = text, "unparseable exactDate, using mid-year");
    }
    parsed
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| NaiveDate::parse_from_str(&format!("{text}-01"), "%Y-%m-%d").ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.naive_utc().date())
        })
}
