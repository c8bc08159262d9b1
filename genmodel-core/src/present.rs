//! Display helpers shared by the UI and the CLI.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::search::matches_query;
use crate::{Catalog, ModelRecord, SelectionState};

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Model families shown in the chart legend, with their node colors.
pub const MODEL_TYPE_LEGEND: [(&str, &str); 6] = [
    ("AR", "#ff6b00"),
    ("GAN", "#22c55e"),
    ("Flow", "#0ea5e9"),
    ("EBM", "#FFA500"),
    ("VAE", "#facc15"),
    ("Diff", "#f43f5e"),
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DetailValue {
    Text { text: String },
    Link { label: String, href: String },
    Image { src: String },
    List { items: Vec<String> },
    Empty,
}

/// One labelled row of the detail popup or the comparison table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DetailRow {
    pub label: &'static str,
    pub value: DetailValue,
}

/// Row labels, in display order.
pub const DETAIL_LABELS: [&str; 11] = [
    "Original Paper",
    "Year",
    "Type",
    "Use Case",
    "Flowchart",
    "High Level Intuition",
    "Best Performance",
    "Pros",
    "Cons",
    "ELI5 Analogy",
    "Open Source Code",
];

pub fn detail_rows(record: &ModelRecord) -> Vec<DetailRow> {
    let text = |value: Option<&String>| match value {
        Some(text) if !text.is_empty() => DetailValue::Text { text: text.clone() },
        _ => DetailValue::Empty,
    };
    let list = |items: &[String]| {
        if items.is_empty() {
            DetailValue::Empty
        } else {
            DetailValue::List {
                items: items.to_vec(),
            }
        }
    };

    let paper = match (&record.pdf, &record.paper_title) {
        (Some(pdf), _) => DetailValue::Link {
            label: "pdf".to_string(),
            href: pdf.clone(),
        },
        (None, title) => text(title.as_ref()),
    };
    let flowchart = match &record.flowchart {
        Some(src) if !src.is_empty() => DetailValue::Image { src: src.clone() },
        _ => DetailValue::Empty,
    };
    let open_source = match &record.open_source {
        Some(href) if !href.is_empty() => DetailValue::Link {
            label: href.clone(),
            href: href.clone(),
        },
        _ => DetailValue::Empty,
    };

    let values = [
        paper,
        DetailValue::Text {
            text: record.year.to_string(),
        },
        text(record.model_type.as_ref()),
        DetailValue::Text {
            text: record.primary_use_case.label().to_string(),
        },
        flowchart,
        text(record.high_level_intuition.as_ref()),
        text(record.best_performance.as_ref()),
        list(&record.pros),
        list(&record.cons),
        text(record.analogy.as_ref()),
        open_source,
    ];

    DETAIL_LABELS
        .into_iter()
        .zip(values)
        .map(|(label, value)| DetailRow { label, value })
        .collect()
}

/// Tooltip: model name followed by up to three pros.
pub fn hover_text(record: &ModelRecord) -> String {
    let mut text = record.model.clone();
    let pros: Vec<&String> = record
        .pros
        .iter()
        .take(3)
        .filter(|pro| !pro.is_empty())
        .collect();
    if !pros.is_empty() {
        text.push_str("\nPros:");
        for pro in pros {
            text.push_str("\n- ");
            text.push_str(pro);
        }
    }
    text
}

/// Short id printed inside a chart node.
pub fn node_label(record: &ModelRecord) -> String {
    record.id.chars().take(8).collect()
}

/// `Mon YYYY` from the exact date, otherwise just the year.
pub fn publication_label(record: &ModelRecord) -> String {
    match record.exact_date {
        Some(date) => format!("{} {}", MONTH_ABBREVIATIONS[date.month0() as usize], date.year()),
        None => record.year.to_string(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SidebarRow {
    pub id: String,
    pub short_id: String,
    pub name: String,
    pub published: String,
    pub selected: bool,
}

/// Sidebar table: records matching `query`, ordered by id.
pub fn sidebar_rows(catalog: &Catalog, query: &str, selection: &SelectionState) -> Vec<SidebarRow> {
    let mut records: Vec<&ModelRecord> = catalog
        .records()
        .iter()
        .filter(|record| query.is_empty() || matches_query(record, query))
        .collect();
    records.sort_by_cached_key(|record| record.id.to_lowercase());

    records
        .into_iter()
        .map(|record| SidebarRow {
            id: record.id.clone(),
            short_id: record.id.chars().take(9).collect(),
            name: record.model.clone(),
            published: publication_label(record),
            selected: selection.is_selected(&record.id),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UseCase;
    use chrono::NaiveDate;

    fn sample() -> ModelRecord {
        ModelRecord {
            id: "Transformer".to_string(),
            model: "Attention Is All You Need".to_string(),
            year: 2017,
            exact_date: NaiveDate::from_ymd_opt(2017, 6, 12),
            primary_use_case: UseCase::Text,
            pdf: Some("https://arxiv.org/pdf/1706.03762".to_string()),
            pros: vec![
                "Parallel".to_string(),
                String::new(),
                "Long context".to_string(),
                "Scales".to_string(),
            ],
            ..ModelRecord::default()
        }
    }

    #[test]
    fn detail_rows_follow_fixed_order() {
        let rows = detail_rows(&sample());
        assert_eq!(rows.len(), DETAIL_LABELS.len());
        assert_eq!(
            rows[0].value,
            DetailValue::Link {
                label: "pdf".to_string(),
                href: "https://arxiv.org/pdf/1706.03762".to_string(),
            }
        );
        assert_eq!(rows[3].label, "Use Case");
        assert_eq!(rows[8].value, DetailValue::Empty);
    }

    #[test]
    fn hover_text_lists_first_three_pros() {
        assert_eq!(
            hover_text(&sample()),
            "Attention Is All You Need\nPros:\n- Parallel\n- Long context"
        );
    }

    #[test]
    fn labels_are_shortened() {
        let record = sample();
        assert_eq!(node_label(&record), "Transfor");
        assert_eq!(publication_label(&record), "Jun 2017");
        let undated = ModelRecord {
            exact_date: None,
            ..record
        };
        assert_eq!(publication_label(&undated), "2017");
    }

    #[test]
    fn sidebar_sorts_by_id_and_marks_selection() {
        let make = |id: &str| ModelRecord {
            id: id.to_string(),
            model: id.to_string(),
            year: 2020,
            ..ModelRecord::default()
        };
        let catalog = Catalog::new(vec![make("vae"), make("GAN"), make("flow")]).unwrap();
        let selection = SelectionState::default().select_only(&catalog, "vae");
        let rows = sidebar_rows(&catalog, "", &selection);
        let ids: Vec<&str> = rows.iter().map(|row| row.id.as_str()).collect();
        assert_eq!(ids, vec!["flow", "GAN", "vae"]);
        assert!(rows[2].selected);

        let rows = sidebar_rows(&catalog, "A", &selection);
        assert_eq!(rows.len(), 2);
    }
}
