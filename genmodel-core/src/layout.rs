//! Chart geometry: strip bands, the date axis mapping and node placement.
//!
//! All coordinates are board pixels with the origin at the top-left corner of
//! the scrollable content; y grows downwards.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::axis::{self, AxisTick};
use crate::{Catalog, ChartConfig, ChartError, ModelRecord, UseCase};

/// Horizontal band of the chart owned by one category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct StripBand<C> {
    pub category: C,
    pub index: usize,
    pub top: f64,
    pub height: f64,
}

impl<C> StripBand<C> {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// Splits `total_height` into equal bands, one per category, in the given order.
pub fn strip_layout<C: Copy>(categories: &[C], total_height: f64) -> Vec<StripBand<C>> {
    if categories.is_empty() {
        return Vec::new();
    }
    let height = total_height / categories.len() as f64;
    categories
        .iter()
        .enumerate()
        .map(|(index, &category)| StripBand {
            category,
            index,
            top: index as f64 * height,
            height,
        })
        .collect()
}

/// Linear position of `date` on an axis of `width` pixels spanning `[min, max]`.
///
/// Dates outside the range clamp to the nearest edge. A zero-length range maps
/// every date to the left edge.
pub fn date_to_x(date: NaiveDate, min: NaiveDate, max: NaiveDate, width: f64) -> f64 {
    let span = max.signed_duration_since(min).num_days();
    if span <= 0 {
        return 0.0;
    }
    let offset = date.signed_duration_since(min).num_days();
    let frac = (offset as f64 / span as f64).clamp(0.0, 1.0);
    frac * width
}

/// Vertical slot for the member at `rank` of a strip holding `members` records.
///
/// Rank 0 (fewest citations) sits on the bottom inset and the last rank on the
/// top inset; the rest are spread evenly between them.
pub fn vertical_slot<C>(
    band: &StripBand<C>,
    rank: Option<usize>,
    members: usize,
    inset: f64,
) -> f64 {
    let rank = match rank {
        Some(rank) if members > 1 && rank < members => rank,
        _ => return band.center(),
    };
    let margin = inset * band.height;
    let upper = band.top + margin;
    let lower = band.bottom() - margin;
    let step = rank as f64 / (members - 1) as f64;
    lower - (lower - upper) * step
}

/// Center of a node on the board.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct NodePosition {
    pub x: f64,
    pub y: f64,
}

impl NodePosition {
    /// Top-left corner of a square node of side `size` centered here.
    pub fn top_left(&self, size: f64) -> (f64, f64) {
        (self.x - size / 2.0, self.y - size / 2.0)
    }
}

/// A record id paired with its computed position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlacedNode {
    pub id: String,
    pub use_case: UseCase,
    #[serde(flatten)]
    pub position: NodePosition,
}

/// Geometry derived from a [`ChartConfig`]; positions are pure functions of it.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    config: ChartConfig,
    strips: Vec<StripBand<UseCase>>,
    timeline_width: f64,
}

impl ChartLayout {
    pub fn new(config: ChartConfig) -> Result<Self, ChartError> {
        config.validate()?;
        let strips = strip_layout(&UseCase::ALL, config.strip_area_height());
        let timeline_width = config.timeline_width();
        tracing::debug!(
            strips = strips.len(),
            timeline_width,
            strip_height = config.strip_area_height(),
            "chart layout computed"
        );
        Ok(Self {
            config,
            strips,
            timeline_width,
        })
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn strips(&self) -> &[StripBand<UseCase>] {
        &self.strips
    }

    pub fn strip(&self, use_case: UseCase) -> Option<&StripBand<UseCase>> {
        self.strips.get(use_case.index())
    }

    pub fn timeline_width(&self) -> f64 {
        self.timeline_width
    }

    pub fn content_width(&self) -> f64 {
        self.config.label_column_width + self.timeline_width
    }

    /// Horizontal node center: label column plus the record's date offset.
    pub fn node_x(&self, record: &ModelRecord) -> f64 {
        self.config.label_column_width
            + date_to_x(
                record.effective_date(),
                self.config.min_date,
                self.config.max_date,
                self.timeline_width,
            )
    }

    /// Vertical node center inside the record's strip.
    pub fn node_y(&self, catalog: &Catalog, record: &ModelRecord) -> f64 {
        let Some(band) = self.strip(record.primary_use_case) else {
            return 0.0;
        };
        match catalog.rank_of(record) {
            Some((rank, members)) => {
                vertical_slot(band, Some(rank), members, self.config.strip_inset)
            }
            None => band.center(),
        }
    }

    pub fn position(&self, catalog: &Catalog, record: &ModelRecord) -> NodePosition {
        NodePosition {
            x: self.node_x(record),
            y: self.node_y(catalog, record),
        }
    }

    /// Positions for every record, in dataset order.
    pub fn placed_nodes(&self, catalog: &Catalog) -> Vec<PlacedNode> {
        catalog
            .records()
            .iter()
            .map(|record| PlacedNode {
                id: record.id.clone(),
                use_case: record.primary_use_case,
                position: self.position(catalog, record),
            })
            .collect()
    }

    /// Scroll offset that centers the record in a viewport of `viewport_width`.
    pub fn scroll_target(&self, catalog: &Catalog, id: &str, viewport_width: f64) -> Option<f64> {
        let record = catalog.get(id)?;
        Some((self.node_x(record) - viewport_width / 2.0).max(0.0))
    }

    pub fn axis_ticks(&self, zoom: f64) -> Vec<AxisTick> {
        axis::axis_ticks(&self.config, self.timeline_width, zoom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(id: &str, use_case: UseCase, citations: u64) -> ModelRecord {
        ModelRecord {
            id: id.to_string(),
            model: id.to_string(),
            year: 2018,
            primary_use_case: use_case,
            citations: Some(citations),
            ..ModelRecord::default()
        }
    }

    #[test]
    fn strips_partition_height() {
        let bands = strip_layout(&["a", "b", "c"], 300.0);
        assert_eq!(bands.len(), 3);
        assert_eq!(bands[0].top, 0.0);
        assert_eq!(bands[1].top, 100.0);
        assert_eq!(bands[2].bottom(), 300.0);
        assert_eq!(bands[2].category, "c");
        assert!(strip_layout::<&str>(&[], 300.0).is_empty());
    }

    #[test]
    fn date_mapping_clamps_outside_range() {
        let min = date(2000, 1, 1);
        let max = date(2010, 1, 1);
        assert_eq!(date_to_x(min, min, max, 1000.0), 0.0);
        assert_eq!(date_to_x(max, min, max, 1000.0), 1000.0);
        assert_eq!(date_to_x(date(1990, 5, 1), min, max, 1000.0), 0.0);
        assert_eq!(date_to_x(date(2030, 5, 1), min, max, 1000.0), 1000.0);
        assert_eq!(date_to_x(date(2005, 1, 1), min, min, 1000.0), 0.0);
    }

    #[test]
    fn single_member_is_centered() {
        let band = StripBand {
            category: (),
            index: 0,
            top: 100.0,
            height: 50.0,
        };
        assert_eq!(vertical_slot(&band, Some(0), 1, 0.05), 125.0);
        assert_eq!(vertical_slot(&band, None, 0, 0.05), 125.0);
    }

    #[test]
    fn two_members_sit_on_insets() {
        let band = StripBand {
            category: (),
            index: 0,
            top: 0.0,
            height: 200.0,
        };
        let low = vertical_slot(&band, Some(0), 2, 0.05);
        let high = vertical_slot(&band, Some(1), 2, 0.05);
        assert_eq!(low, 190.0);
        assert_eq!(high, 10.0);
        assert_eq!(low - high, 200.0 - 2.0 * 10.0);
    }

    #[test]
    fn more_cited_records_rise_to_the_top() {
        let catalog = Catalog::new(vec![
            record("ten", UseCase::Text, 10),
            record("fifty", UseCase::Text, 50),
            record("thirty", UseCase::Text, 30),
        ])
        .unwrap();
        let layout = ChartLayout::new(ChartConfig::default()).unwrap();

        let mut by_height: Vec<(f64, &str)> = catalog
            .records()
            .iter()
            .map(|r| (layout.node_y(&catalog, r), r.id.as_str()))
            .collect();
        by_height.sort_by(|a, b| a.0.total_cmp(&b.0));
        let order: Vec<&str> = by_height.into_iter().map(|(_, id)| id).collect();
        assert_eq!(order, vec!["fifty", "thirty", "ten"]);

        let band = layout.strip(UseCase::Text).unwrap();
        let middle = layout.node_y(&catalog, catalog.get("thirty").unwrap());
        assert!((middle - band.center()).abs() < 1e-9);
    }

    #[test]
    fn node_x_uses_mid_year_without_exact_date() {
        let layout = ChartLayout::new(ChartConfig::default()).unwrap();
        let mut dated = record("dated", UseCase::Image, 1);
        dated.exact_date = Some(date(2018, 7, 1));
        let undated = record("undated", UseCase::Image, 1);
        assert_eq!(layout.node_x(&dated), layout.node_x(&undated));
        assert!(layout.node_x(&undated) > layout.config().label_column_width);
    }

    #[test]
    fn scroll_target_clamps_at_zero() {
        let mut early = record("early", UseCase::Audio, 0);
        early.exact_date = Some(date(1986, 2, 1));
        let catalog = Catalog::new(vec![early]).unwrap();
        let layout = ChartLayout::new(ChartConfig::default()).unwrap();
        assert_eq!(layout.scroll_target(&catalog, "early", 1200.0), Some(0.0));
        assert_eq!(layout.scroll_target(&catalog, "missing", 1200.0), None);
    }
}
