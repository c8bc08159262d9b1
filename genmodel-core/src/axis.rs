//! Year and quarter ticks for the date axis.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::layout::date_to_x;
use crate::ChartConfig;

const QUARTERS: [(u32, &str); 3] = [(4, "Apr"), (7, "Jul"), (10, "Oct")];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TickKind {
    Year,
    Quarter,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AxisTick {
    pub kind: TickKind,
    pub date: NaiveDate,
    /// Board x, label column included.
    pub x: f64,
    pub label: String,
}

/// Ticks inside the configured date range, left to right.
///
/// Quarter ticks only appear when `zoom` exceeds `month_ticks_min_zoom`; below
/// that threshold year labels use the short `'86` form.
pub fn axis_ticks(config: &ChartConfig, timeline_width: f64, zoom: f64) -> Vec<AxisTick> {
    let show_quarters = zoom > config.month_ticks_min_zoom;
    let short_years = zoom < config.month_ticks_min_zoom;
    let in_range = |date: &NaiveDate| *date >= config.min_date && *date <= config.max_date;
    let to_x = |date: NaiveDate| {
        config.label_column_width
            + date_to_x(date, config.min_date, config.max_date, timeline_width)
    };

    let mut ticks = Vec::new();
    for year in config.min_date.year()..=config.max_date.year() {
        if let Some(date) = NaiveDate::from_ymd_opt(year, 1, 1).filter(in_range) {
            ticks.push(AxisTick {
                kind: TickKind::Year,
                date,
                x: to_x(date),
                label: year_label(year, short_years),
            });
        }
        if !show_quarters {
            continue;
        }
        for (month, name) in QUARTERS {
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, 1).filter(in_range) {
                ticks.push(AxisTick {
                    kind: TickKind::Quarter,
                    date,
                    x: to_x(date),
                    label: name.to_string(),
                });
            }
        }
    }
    ticks
}

fn year_label(year: i32, short: bool) -> String {
    if short {
        format!("'{:02}", year.rem_euclid(100))
    } else {
        year.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarters_hidden_when_zoomed_out() {
        let config = ChartConfig::default();
        let ticks = axis_ticks(&config, config.timeline_width(), 0.5);
        assert!(ticks.iter().all(|tick| tick.kind == TickKind::Year));
        assert_eq!(ticks.len(), 40);
        assert_eq!(ticks[0].label, "'86");
        assert_eq!(ticks[0].x, config.label_column_width);
    }

    #[test]
    fn quarters_stop_at_max_date() {
        let config = ChartConfig::default();
        let ticks = axis_ticks(&config, config.timeline_width(), 1.0);
        let last = ticks.last().unwrap();
        // The range ends in July 2025, so October 2025 is dropped.
        assert_eq!(last.label, "Jul");
        assert_eq!(last.date.year(), 2025);
        assert_eq!(ticks[0].label, "1986");
        assert!(ticks.windows(2).all(|pair| pair[0].x < pair[1].x));
    }
}
