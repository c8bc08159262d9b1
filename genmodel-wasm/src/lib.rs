//! Framework-neutral WASM <-> JavaScript bridge.

use chrono::NaiveDate;
use genmodel_core::{ChartConfig, ChartError, Explorer, InputEvent};
use genmodel_dataset::DatasetError;
use payload::ChartPayload;
use serde::{Deserialize, Serialize};
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

mod payload;

/// Partial config from JS; missing keys keep their defaults.
#[derive(Deserialize, Default)]
struct JsChartConfig {
    #[serde(default)]
    min_date: Option<String>,
    #[serde(default)]
    max_date: Option<String>,
    #[serde(default)]
    pixels_per_year: Option<f64>,
    #[serde(default)]
    board_height: Option<f64>,
    #[serde(default)]
    axis_height: Option<f64>,
    #[serde(default)]
    label_column_width: Option<f64>,
    #[serde(default)]
    node_size: Option<f64>,
    #[serde(default)]
    strip_inset: Option<f64>,
    #[serde(default)]
    arrow_scroll_step: Option<f64>,
    #[serde(default)]
    month_ticks_min_zoom: Option<f64>,
}

impl TryFrom<JsChartConfig> for ChartConfig {
    type Error = ChartError;

    fn try_from(cfg: JsChartConfig) -> Result<Self, Self::Error> {
        let mut base = ChartConfig::default();
        if let Some(date) = cfg.min_date {
            base.min_date = parse_config_date("min_date", &date)?;
        }
        if let Some(date) = cfg.max_date {
            base.max_date = parse_config_date("max_date", &date)?;
        }
        if let Some(value) = cfg.pixels_per_year {
            base.pixels_per_year = value;
        }
        if let Some(value) = cfg.board_height {
            base.board_height = value;
        }
        if let Some(value) = cfg.axis_height {
            base.axis_height = value;
        }
        if let Some(value) = cfg.label_column_width {
            base.label_column_width = value;
        }
        if let Some(value) = cfg.node_size {
            base.node_size = value;
        }
        if let Some(value) = cfg.strip_inset {
            base.strip_inset = value;
        }
        if let Some(value) = cfg.arrow_scroll_step {
            base.arrow_scroll_step = value;
        }
        if let Some(value) = cfg.month_ticks_min_zoom {
            base.month_ticks_min_zoom = value;
        }
        base.validate()?;
        Ok(base)
    }
}

fn parse_config_date(field: &str, value: &str) -> Result<NaiveDate, ChartError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ChartError::InvalidConfig(format!("{field} {value:?} is not YYYY-MM-DD")))
}

fn read_config(config: Option<JsValue>) -> Result<ChartConfig, JsValue> {
    let js_cfg = match config {
        Some(value) if !value.is_undefined() && !value.is_null() => from_value::<JsChartConfig>(
            value,
        )
        .map_err(|err| JsValue::from_str(&format!("Could not read config: {err}")))?,
        _ => JsChartConfig::default(),
    };
    ChartConfig::try_from(js_cfg).map_err(|err| JsValue::from_str(&format_chart_error(err)))
}

fn read_catalog(dataset: JsValue) -> Result<genmodel_core::Catalog, JsValue> {
    let value = from_value::<serde_json::Value>(dataset)
        .map_err(|err| JsValue::from_str(&format!("Could not read dataset JSON: {err}")))?;
    genmodel_dataset::load_catalog_value(&value)
        .map_err(|err| JsValue::from_str(&format_dataset_error(err)))
}

/// Positions every model of `dataset` and returns strips, nodes and axis ticks.
#[wasm_bindgen(js_name = layoutDataset)]
pub fn layout_dataset(
    dataset: JsValue,
    config: Option<JsValue>,
    zoom: Option<f64>,
) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let config = read_config(config)?;
    let catalog = read_catalog(dataset)?;
    let layout = genmodel_core::ChartLayout::new(config)
        .map_err(|err| JsValue::from_str(&format_chart_error(err)))?;

    let payload = ChartPayload::build(&layout, &catalog, zoom.unwrap_or(1.0));
    to_value(&payload).map_err(|err| JsValue::from_str(&format!("Could not serialize chart: {err}")))
}

/// Stateful explorer session driven by serialized input events.
#[wasm_bindgen]
pub struct ExplorerHandle {
    inner: Explorer,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StateView<'a> {
    view: &'a genmodel_core::ViewState,
    search: &'a genmodel_core::SearchState,
    scroll_left: f64,
    can_compare: bool,
    comparison: Vec<&'a str>,
}

#[wasm_bindgen]
impl ExplorerHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(dataset: JsValue, config: Option<JsValue>) -> Result<ExplorerHandle, JsValue> {
        #[cfg(target_arch = "wasm32")]
        console_error_panic_hook::set_once();

        let config = read_config(config)?;
        let catalog = read_catalog(dataset)?;
        let inner = Explorer::new(catalog, config)
            .map_err(|err| JsValue::from_str(&format_chart_error(err)))?;
        Ok(Self { inner })
    }

    /// Applies one event, e.g. `{type: "node_click", id: "GAN"}`, and returns
    /// `{changed, effects}`.
    pub fn dispatch(&mut self, event: JsValue) -> Result<JsValue, JsValue> {
        let event: InputEvent = from_value(event)
            .map_err(|err| JsValue::from_str(&format!("Could not read event: {err}")))?;
        let outcome = self.inner.handle(event);
        to_value(&outcome)
            .map_err(|err| JsValue::from_str(&format!("Could not serialize outcome: {err}")))
    }

    /// Current view snapshot for rendering.
    pub fn state(&self) -> Result<JsValue, JsValue> {
        let view = self.inner.view();
        let state = StateView {
            view,
            search: self.inner.search(),
            scroll_left: self.inner.viewport().scroll_left(),
            can_compare: view.selection.can_compare(),
            comparison: self
                .inner
                .comparison_rows()
                .into_iter()
                .map(|record| record.id.as_str())
                .collect(),
        };
        to_value(&state)
            .map_err(|err| JsValue::from_str(&format!("Could not serialize state: {err}")))
    }

    #[wasm_bindgen(js_name = scrollTarget)]
    pub fn scroll_target(&self, id: &str) -> Option<f64> {
        self.inner.scroll_target(id)
    }
}

fn format_chart_error(err: ChartError) -> String {
    format!("Chart error: {err}")
}

fn format_dataset_error(err: DatasetError) -> String {
    format!("Dataset error: {err}")
}
