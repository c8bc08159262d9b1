#![cfg(target_arch = "wasm32")]

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Node};

const STYLE_TAG_SELECTOR: &str = "style[data-genmodel-ui]";

/// Default CSS for the explorer along with overridable design tokens.
pub const DEFAULT_STYLES: &str = r#"
:root {
  --genmodel-font-family: 'Inter', system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
  --genmodel-bg: #ffffff;
  --genmodel-surface: #f8fafc;
  --genmodel-border: rgba(148, 163, 184, 0.35);
  --genmodel-text: #1f2933;
  --genmodel-muted: #52606d;
  --genmodel-accent: #2563eb;
  --genmodel-accent-soft: rgba(37, 99, 235, 0.12);
  --genmodel-strip-even: #f1f5f9;
  --genmodel-strip-odd: #ffffff;
  --genmodel-radius: 12px;
  --genmodel-overlay: rgba(15, 23, 42, 0.55);
}

.genmodel-root {
  font-family: var(--genmodel-font-family);
  color: var(--genmodel-text);
  background: var(--genmodel-bg);
  display: flex;
  flex-direction: column;
  gap: 12px;
  outline: none;
}

.genmodel-controls {
  display: flex;
  flex-wrap: wrap;
  gap: 8px;
}

.control-button {
  border: 1px solid var(--genmodel-border);
  border-radius: 999px;
  background: var(--genmodel-surface);
  color: var(--genmodel-text);
  padding: 6px 14px;
  font-size: 0.9rem;
  cursor: pointer;
}

.control-button.is-active {
  background: var(--genmodel-accent-soft);
  border-color: var(--genmodel-accent);
  color: var(--genmodel-accent);
}

.control-button.is-primary {
  background: var(--genmodel-accent);
  border-color: var(--genmodel-accent);
  color: #ffffff;
}

.genmodel-body {
  display: flex;
  gap: 12px;
  min-height: 0;
}

.genmodel-sidebar {
  flex: 0 0 300px;
  max-height: 640px;
  overflow-y: auto;
  border: 1px solid var(--genmodel-border);
  border-radius: var(--genmodel-radius);
  padding: 8px;
  position: relative;
}

.genmodel-sidebar.is-minimized {
  flex-basis: 36px;
  padding: 4px;
}

.sidebar-toggle {
  border: none;
  background: transparent;
  cursor: pointer;
  font-size: 1.1rem;
  color: var(--genmodel-muted);
}

.sidebar-search {
  position: relative;
  margin-bottom: 8px;
}

.sidebar-search input {
  width: 100%;
  box-sizing: border-box;
  padding: 6px 10px;
  border: 1px solid var(--genmodel-border);
  border-radius: 8px;
}

.search-results {
  position: absolute;
  z-index: 20;
  left: 0;
  right: 0;
  margin: 4px 0 0;
  padding: 4px 0;
  list-style: none;
  background: var(--genmodel-bg);
  border: 1px solid var(--genmodel-border);
  border-radius: 8px;
  box-shadow: 0 8px 24px rgba(15, 23, 42, 0.12);
  max-height: 240px;
  overflow-y: auto;
}

.search-result {
  display: flex;
  gap: 8px;
  padding: 4px 10px;
  cursor: pointer;
}

.search-result.is-highlighted {
  background: var(--genmodel-accent-soft);
}

.search-result-name {
  color: var(--genmodel-muted);
  overflow: hidden;
  text-overflow: ellipsis;
  white-space: nowrap;
}

.sidebar-table {
  width: 100%;
  border-collapse: collapse;
  font-size: 0.82rem;
}

.sidebar-table th {
  text-align: left;
  color: var(--genmodel-muted);
  font-weight: 600;
}

.sidebar-row {
  cursor: pointer;
}

.sidebar-row:hover,
.sidebar-row.is-selected {
  background: var(--genmodel-accent-soft);
}

.sidebar-published {
  white-space: nowrap;
  color: var(--genmodel-muted);
}

.genmodel-board {
  flex: 1 1 auto;
  overflow-x: auto;
  overflow-y: hidden;
  position: relative;
  border: 1px solid var(--genmodel-border);
  border-radius: var(--genmodel-radius);
  cursor: grab;
  user-select: none;
}

.genmodel-board.is-dragging {
  cursor: grabbing;
}

.board-canvas {
  position: relative;
}

.strip-area {
  position: relative;
}

.strip {
  position: absolute;
  left: 0;
  right: 0;
  border-bottom: 1px solid var(--genmodel-border);
}

.strip-0 {
  background: var(--genmodel-strip-even);
}

.strip-1 {
  background: var(--genmodel-strip-odd);
}

.strip-label {
  position: sticky;
  left: 0;
  z-index: 5;
  display: flex;
  height: 100%;
  align-items: center;
  gap: 6px;
  padding-left: 8px;
  box-sizing: border-box;
  background: inherit;
  font-weight: 600;
}

.model-node {
  position: absolute;
  z-index: 6;
  border-radius: 50%;
  border: 2px solid #ffffff;
  box-shadow: 0 1px 3px rgba(15, 23, 42, 0.3);
  cursor: pointer;
}

.model-node.is-selected {
  border-color: var(--genmodel-accent);
  box-shadow: 0 0 0 3px var(--genmodel-accent-soft);
}

.model-node-label {
  position: absolute;
  left: 50%;
  top: -16px;
  transform: translateX(-50%);
  font-size: 0.68rem;
  white-space: nowrap;
  pointer-events: none;
}

.axis {
  position: absolute;
  left: 0;
  right: 0;
  border-top: 1px solid var(--genmodel-muted);
}

.axis-tick {
  position: absolute;
  top: 0;
  height: 8px;
  border-left: 1px solid var(--genmodel-muted);
}

.axis-tick.is-quarter {
  height: 4px;
  border-color: var(--genmodel-border);
}

.axis-tick span {
  position: absolute;
  top: 10px;
  transform: translateX(-50%);
  font-size: 0.72rem;
  color: var(--genmodel-muted);
  white-space: nowrap;
}

.genmodel-legend {
  display: flex;
  flex-wrap: wrap;
  gap: 14px;
  font-size: 0.82rem;
}

.legend-item {
  display: inline-flex;
  align-items: center;
  gap: 6px;
}

.legend-swatch {
  width: 12px;
  height: 12px;
  border-radius: 50%;
}

.overlay {
  position: fixed;
  inset: 0;
  z-index: 50;
  display: flex;
  align-items: center;
  justify-content: center;
  background: var(--genmodel-overlay);
}

.popup {
  position: relative;
  max-width: min(920px, 92vw);
  max-height: 86vh;
  overflow-y: auto;
  background: var(--genmodel-bg);
  border-radius: var(--genmodel-radius);
  padding: 20px 24px;
  box-shadow: 0 24px 48px rgba(15, 23, 42, 0.25);
}

.popup h2 {
  margin-top: 0;
}

.popup-close {
  position: absolute;
  top: 10px;
  right: 12px;
  border: none;
  background: transparent;
  font-size: 1.4rem;
  cursor: pointer;
  color: var(--genmodel-muted);
}

.detail-table th,
.comparison-table th {
  text-align: left;
  vertical-align: top;
  padding: 6px 12px 6px 0;
  white-space: nowrap;
}

.detail-table td,
.comparison-table td {
  padding: 6px 12px 6px 0;
  vertical-align: top;
}

.detail-list {
  margin: 0;
  padding-left: 18px;
}

.detail-image {
  max-width: 320px;
  cursor: zoom-in;
}

.detail-empty {
  color: var(--genmodel-muted);
}

.comparison-scroll {
  overflow-x: auto;
}

.image-overlay {
  z-index: 60;
  cursor: zoom-out;
}

.enlarged-image {
  max-width: 92vw;
  max-height: 92vh;
  background: #ffffff;
  cursor: default;
}

@media (max-width: 960px) {
  .genmodel-body {
    flex-direction: column;
  }

  .genmodel-sidebar {
    flex-basis: auto;
    max-height: 320px;
  }
}
"#;

pub fn ensure_styles(document: &Document) -> Result<(), JsValue> {
    if document.query_selector(STYLE_TAG_SELECTOR)?.is_some() {
        return Ok(());
    }

    let head = document
        .head()
        .ok_or_else(|| JsValue::from_str("Document has no <head>"))?;

    let style_el = document.create_element("style")?;
    style_el.set_attribute("data-genmodel-ui", "v1")?;
    style_el.set_text_content(Some(DEFAULT_STYLES));
    head.append_child(&style_el.clone().dyn_into::<Node>()?)?;

    Ok(())
}
