//! Core logic for the generative-model timeline: data model, chart
//! geometry and the interaction state machine.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

pub mod axis;
pub mod catalog;
pub mod explorer;
pub mod interaction;
pub mod layout;
pub mod present;
pub mod search;
pub mod viewport;

pub use axis::{AxisTick, TickKind};
pub use catalog::Catalog;
pub use explorer::{Button, Effect, Explorer, InputEvent, Key, Outcome};
pub use interaction::{Mode, SelectionState, ViewState};
pub use layout::{date_to_x, strip_layout, ChartLayout, NodePosition, PlacedNode, StripBand};
pub use search::SearchState;
pub use viewport::Viewport;

/// Use-case categories, in strip order from top to bottom.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub enum UseCase {
    #[default]
    Text,
    Image,
    Video,
    Audio,
    Tabular,
}

impl UseCase {
    pub const ALL: [UseCase; 5] = [
        UseCase::Text,
        UseCase::Image,
        UseCase::Video,
        UseCase::Audio,
        UseCase::Tabular,
    ];

    pub fn label(self) -> &'static str {
        match self {
            UseCase::Text => "Text",
            UseCase::Image => "Image",
            UseCase::Video => "Video",
            UseCase::Audio => "Audio",
            UseCase::Tabular => "Tabular",
        }
    }

    /// Glyph shown in the frozen label column.
    pub fn emoji(self) -> &'static str {
        match self {
            UseCase::Text => "✏️",
            UseCase::Image => "🖼️",
            UseCase::Video => "🎬",
            UseCase::Audio => "🎶",
            UseCase::Tabular => "📊",
        }
    }

    /// Position in strip order.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for UseCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for UseCase {
    type Err = ChartError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim();
        UseCase::ALL
            .into_iter()
            .find(|candidate| candidate.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ChartError::UnknownUseCase(value.to_string()))
    }
}

/// One paper/model entry of the catalog. Read-only once loaded.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModelRecord {
    pub id: String,
    pub model: String,
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exact_date: Option<NaiveDate>,
    pub primary_use_case: UseCase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citations: Option<u64>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub model_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paper_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flowchart: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_level_intuition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_performance: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pros: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cons: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analogy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl ModelRecord {
    /// Citation count used for vertical ranking; absent counts rank as zero.
    pub fn citation_metric(&self) -> u64 {
        self.citations.unwrap_or(0)
    }

    /// Exact publication date, or the middle of the publication year.
    pub fn effective_date(&self) -> NaiveDate {
        self.exact_date.unwrap_or_else(|| mid_year(self.year))
    }
}

/// July 1st of `year`; used when a record only carries its year.
pub fn mid_year(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 7, 1).unwrap_or(NaiveDate::MIN)
}

/// Chart geometry and interaction tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChartConfig {
    /// Left edge of the date axis.
    pub min_date: NaiveDate,
    /// Right edge of the date axis.
    pub max_date: NaiveDate,
    pub pixels_per_year: f64,
    /// Full board height, date axis included.
    pub board_height: f64,
    pub axis_height: f64,
    /// Width of the frozen strip-label column; node x offsets start after it.
    pub label_column_width: f64,
    pub node_size: f64,
    /// Fraction of a strip's height kept free at its top and bottom edge.
    pub strip_inset: f64,
    pub arrow_scroll_step: f64,
    /// Quarter ticks show above this zoom; below it year labels shorten.
    pub month_ticks_min_zoom: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            min_date: NaiveDate::from_ymd_opt(1986, 1, 1).unwrap_or(NaiveDate::MIN),
            max_date: NaiveDate::from_ymd_opt(2025, 7, 31).unwrap_or(NaiveDate::MAX),
            pixels_per_year: 240.0,
            board_height: 595.0,
            axis_height: 48.0,
            label_column_width: 104.0,
            node_size: 16.0,
            strip_inset: 0.05,
            arrow_scroll_step: 60.0,
            month_ticks_min_zoom: 0.55,
        }
    }
}

impl ChartConfig {
    pub fn pixels_per_month(&self) -> f64 {
        self.pixels_per_year / 12.0
    }

    /// Whole months between the axis bounds, ignoring the day of month.
    pub fn month_span(&self) -> i32 {
        (self.max_date.year() - self.min_date.year()) * 12
            + (self.max_date.month0() as i32 - self.min_date.month0() as i32)
    }

    /// Horizontal extent of the date axis in pixels.
    pub fn timeline_width(&self) -> f64 {
        f64::from(self.month_span()) * self.pixels_per_month()
    }

    /// Scrollable width: label column plus the date axis.
    pub fn content_width(&self) -> f64 {
        self.label_column_width + self.timeline_width()
    }

    /// Height shared by the use-case strips.
    pub fn strip_area_height(&self) -> f64 {
        self.board_height - self.axis_height
    }

    pub fn validate(&self) -> Result<(), ChartError> {
        if self.max_date < self.min_date {
            return Err(ChartError::InvalidConfig(format!(
                "max_date {} precedes min_date {}",
                self.max_date, self.min_date
            )));
        }
        if !(self.pixels_per_year > 0.0) {
            return Err(ChartError::InvalidConfig(
                "pixels_per_year must be positive".to_string(),
            ));
        }
        if !(self.strip_area_height() > 0.0) {
            return Err(ChartError::InvalidConfig(format!(
                "board_height {} leaves no room below axis_height {}",
                self.board_height, self.axis_height
            )));
        }
        if !(0.0..0.5).contains(&self.strip_inset) {
            return Err(ChartError::InvalidConfig(format!(
                "strip_inset {} must lie in [0, 0.5)",
                self.strip_inset
            )));
        }
        if self.node_size < 0.0 || self.label_column_width < 0.0 || self.arrow_scroll_step < 0.0
        {
            return Err(ChartError::InvalidConfig(
                "sizes and steps must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Errors raised while assembling a chart.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChartError {
    #[error("Invalid chart configuration: {0}")]
    InvalidConfig(String),
    #[error("Duplicate model id: {0}")]
    DuplicateId(String),
    #[error("Unknown use case: {0}")]
    UnknownUseCase(String),
}
