//! Sidebar search box: substring hits plus a keyboard-driven highlight.

use serde::{Deserialize, Serialize};

use crate::{Catalog, ModelRecord};

/// Case-insensitive substring match on the display name or the id.
pub fn matches_query(record: &ModelRecord, query: &str) -> bool {
    let needle = query.to_lowercase();
    record.model.to_lowercase().contains(&needle) || record.id.to_lowercase().contains(&needle)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchState {
    query: String,
    /// Matching ids in dataset order.
    results: Vec<String>,
    highlighted: Option<usize>,
}

impl SearchState {
    /// New state for `query`; the first hit, if any, is highlighted.
    pub fn with_query(catalog: &Catalog, query: &str) -> Self {
        let results: Vec<String> = if query.is_empty() {
            Vec::new()
        } else {
            catalog
                .records()
                .iter()
                .filter(|record| matches_query(record, query))
                .map(|record| record.id.clone())
                .collect()
        };
        let highlighted = (!results.is_empty()).then_some(0);
        Self {
            query: query.to_string(),
            results,
            highlighted,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[String] {
        &self.results
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn highlighted_id(&self) -> Option<&str> {
        self.highlighted.and_then(|index| self.result_id(index))
    }

    pub fn result_id(&self, index: usize) -> Option<&str> {
        self.results.get(index).map(String::as_str)
    }

    pub fn move_down(&self) -> Self {
        self.highlight_with(|index, last| (index + 1).min(last))
    }

    pub fn move_up(&self) -> Self {
        self.highlight_with(|index, _| index.saturating_sub(1))
    }

    /// Highlights `index` when it names an existing hit.
    pub fn hover(&self, index: usize) -> Self {
        if index >= self.results.len() {
            return self.clone();
        }
        Self {
            highlighted: Some(index),
            ..self.clone()
        }
    }

    fn highlight_with(&self, step: impl Fn(usize, usize) -> usize) -> Self {
        let Some(last) = self.results.len().checked_sub(1) else {
            return self.clone();
        };
        let current = self.highlighted.unwrap_or(0);
        Self {
            highlighted: Some(step(current, last)),
            ..self.clone()
        }
    }
}
