use genmodel_core::present::{hover_text, node_label};
use genmodel_core::{AxisTick, Catalog, ChartLayout, UseCase};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StripPayload {
    pub use_case: UseCase,
    pub label: &'static str,
    pub emoji: &'static str,
    pub top: f64,
    pub height: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePayload {
    pub id: String,
    pub label: String,
    pub hover: String,
    pub color: Option<String>,
    /// Node center.
    pub x: f64,
    pub y: f64,
    /// Top-left corner for absolutely positioned markup.
    pub left: f64,
    pub top: f64,
}

/// Everything a host needs to draw the static chart.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPayload {
    pub content_width: f64,
    pub timeline_width: f64,
    pub strip_area_height: f64,
    pub node_size: f64,
    pub strips: Vec<StripPayload>,
    pub nodes: Vec<NodePayload>,
    pub ticks: Vec<AxisTick>,
}

impl ChartPayload {
    pub fn build(layout: &ChartLayout, catalog: &Catalog, zoom: f64) -> Self {
        let node_size = layout.config().node_size;
        let strips = layout
            .strips()
            .iter()
            .map(|band| StripPayload {
                use_case: band.category,
                label: band.category.label(),
                emoji: band.category.emoji(),
                top: band.top,
                height: band.height,
            })
            .collect();
        let nodes = catalog
            .records()
            .iter()
            .map(|record| {
                let position = layout.position(catalog, record);
                let (left, top) = position.top_left(node_size);
                NodePayload {
                    id: record.id.clone(),
                    label: node_label(record),
                    hover: hover_text(record),
                    color: record.color.clone(),
                    x: position.x,
                    y: position.y,
                    left,
                    top,
                }
            })
            .collect();

        Self {
            content_width: layout.content_width(),
            timeline_width: layout.timeline_width(),
            strip_area_height: layout.config().strip_area_height(),
            node_size,
            strips,
            nodes,
            ticks: layout.axis_ticks(zoom),
        }
    }
}
