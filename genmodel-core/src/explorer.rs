//! Host-independent event loop of the explorer.
//!
//! Hosts translate their native keyboard, pointer and widget callbacks into
//! [`InputEvent`]s, feed them to [`Explorer::handle`] and apply the returned
//! [`Effect`]s (scrolling, focusing the search box) on their side.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    Catalog, ChartConfig, ChartError, ChartLayout, ModelRecord, SearchState, ViewState, Viewport,
};

/// Keys the explorer reacts to, named after DOM `KeyboardEvent.key` values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Other(String),
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        match value {
            "Enter" => Key::Enter,
            "Escape" | "Esc" => Key::Escape,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => Key::Other(other.to_string()),
                }
            }
        }
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::from(value.as_str())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{c}"),
            Key::Enter => f.write_str("Enter"),
            Key::Escape => f.write_str("Escape"),
            Key::ArrowLeft => f.write_str("ArrowLeft"),
            Key::ArrowRight => f.write_str("ArrowRight"),
            Key::ArrowUp => f.write_str("ArrowUp"),
            Key::ArrowDown => f.write_str("ArrowDown"),
            Key::Other(name) => f.write_str(name),
        }
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        key.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Button {
    ToggleCompare,
    Reset,
    Compare,
    CloseDetail,
    CloseComparison,
    Help,
    CloseHelp,
    ToggleSidebar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    /// Global shortcut key; ignored while a text field has focus.
    Key {
        key: Key,
        #[serde(default)]
        text_input_focused: bool,
    },
    Wheel {
        delta_y: f64,
        #[serde(default)]
        shift: bool,
    },
    PointerDown {
        x: f64,
    },
    PointerMove {
        x: f64,
    },
    PointerUp,
    PointerLeave,
    /// The host scrolled natively (scrollbar, touch); keeps the viewport in sync.
    Scrolled {
        offset: f64,
    },
    Resize {
        width: f64,
    },
    NodeClick {
        id: String,
    },
    RowClick {
        id: String,
    },
    RowSelect {
        id: String,
    },
    /// Click outside any popup.
    Backdrop,
    Button {
        button: Button,
    },
    OpenImage {
        url: String,
    },
    CloseImage,
    SearchInput {
        query: String,
    },
    SearchKey {
        key: Key,
    },
    SearchHover {
        index: usize,
    },
    SearchPick {
        index: usize,
    },
}

/// Side effects the host has to carry out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    ScrollTo { offset: f64 },
    FocusSearch,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub changed: bool,
    pub effects: Vec<Effect>,
}

/// Catalog, layout and the mutable view snapshot of one session.
#[derive(Debug, Clone)]
pub struct Explorer {
    catalog: Arc<Catalog>,
    layout: Arc<ChartLayout>,
    view: ViewState,
    search: SearchState,
    viewport: Viewport,
}

impl PartialEq for Explorer {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.catalog, &other.catalog)
            && Arc::ptr_eq(&self.layout, &other.layout)
            && self.view == other.view
            && self.search == other.search
            && self.viewport == other.viewport
    }
}

impl Explorer {
    pub fn new(catalog: Catalog, config: ChartConfig) -> Result<Self, ChartError> {
        let layout = ChartLayout::new(config)?;
        let viewport = Viewport::new(layout.content_width());
        Ok(Self {
            catalog: Arc::new(catalog),
            layout: Arc::new(layout),
            view: ViewState::default(),
            search: SearchState::default(),
            viewport,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn layout(&self) -> &ChartLayout {
        &self.layout
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn open_record(&self) -> Option<&ModelRecord> {
        self.view.selection.open_record(&self.catalog)
    }

    /// Records shown in the comparison table, empty while it is hidden.
    pub fn comparison_rows(&self) -> Vec<&ModelRecord> {
        if !self.view.selection.comparison_visible {
            return Vec::new();
        }
        self.view.selection.comparison_rows(&self.catalog)
    }

    /// Offset centering `id` in the current viewport, `None` for unknown ids.
    pub fn scroll_target(&self, id: &str) -> Option<f64> {
        self.layout
            .scroll_target(&self.catalog, id, self.viewport.width())
    }

    pub fn handle(&mut self, event: InputEvent) -> Outcome {
        let before = (self.view.clone(), self.search.clone(), self.viewport);
        let mut effects = Vec::new();

        match event {
            InputEvent::Key {
                key,
                text_input_focused,
            } => {
                if !text_input_focused {
                    self.handle_shortcut(key, &mut effects);
                }
            }
            InputEvent::Wheel { delta_y, shift } => {
                if delta_y != 0.0 && !shift {
                    self.scroll_by(delta_y, &mut effects);
                }
            }
            InputEvent::PointerDown { x } => self.viewport.begin_drag(x),
            InputEvent::PointerMove { x } => {
                if self.viewport.drag_to(x) {
                    effects.push(self.scroll_effect());
                }
            }
            InputEvent::PointerUp | InputEvent::PointerLeave => self.viewport.end_drag(),
            InputEvent::Scrolled { offset } => {
                self.viewport.scroll_to(offset);
            }
            InputEvent::Resize { width } => {
                if self.viewport.resize(width) {
                    effects.push(self.scroll_effect());
                }
            }
            InputEvent::NodeClick { id } => {
                let next = self.view.selection.activate(&self.catalog, &id);
                self.view = self.view.with_selection(next);
            }
            InputEvent::RowClick { id } => {
                let next = self.view.selection.activate_row(&self.catalog, &id);
                self.view = self.view.with_selection(next);
                self.scroll_into_view(&id, &mut effects);
            }
            InputEvent::RowSelect { id } => {
                let next = self.view.selection.select_only(&self.catalog, &id);
                self.view = self.view.with_selection(next);
            }
            InputEvent::Backdrop => self.view = self.view.dismiss_overlay(),
            InputEvent::Button { button } => self.handle_button(button),
            InputEvent::OpenImage { url } => {
                if self.open_record().is_some() {
                    self.view = self.view.enlarge_image(Some(url));
                }
            }
            InputEvent::CloseImage => self.view = self.view.enlarge_image(None),
            InputEvent::SearchInput { query } => {
                self.search = SearchState::with_query(&self.catalog, &query);
            }
            InputEvent::SearchKey { key } => match key {
                Key::ArrowDown => self.search = self.search.move_down(),
                Key::ArrowUp => self.search = self.search.move_up(),
                Key::Enter => {
                    if let Some(id) = self.search.highlighted_id().map(str::to_string) {
                        self.activate_from_search(&id, &mut effects);
                    }
                }
                _ => {}
            },
            InputEvent::SearchHover { index } => self.search = self.search.hover(index),
            InputEvent::SearchPick { index } => {
                if let Some(id) = self.search.result_id(index).map(str::to_string) {
                    self.search = self.search.hover(index);
                    self.activate_from_search(&id, &mut effects);
                }
            }
        }

        let changed =
            self.view != before.0 || self.search != before.1 || self.viewport != before.2;
        if changed {
            tracing::debug!(
                mode = ?self.view.selection.mode(),
                selected = self.view.selection.selected_ids.len(),
                open = ?self.view.selection.open_record_id,
                comparison = self.view.selection.comparison_visible,
                scroll_left = self.viewport.scroll_left(),
                "explorer state changed"
            );
        }
        Outcome { changed, effects }
    }

    fn handle_shortcut(&mut self, key: Key, effects: &mut Vec<Effect>) {
        match key {
            Key::Char('c' | 'C') => self.handle_button(Button::ToggleCompare),
            Key::Char('r' | 'R') => self.handle_button(Button::Reset),
            Key::Char('/') => effects.push(Effect::FocusSearch),
            Key::Escape => self.view = self.view.escape(),
            Key::ArrowLeft => {
                let step = self.layout.config().arrow_scroll_step;
                self.scroll_by(-step, effects);
            }
            Key::ArrowRight => {
                let step = self.layout.config().arrow_scroll_step;
                self.scroll_by(step, effects);
            }
            _ => {}
        }
    }

    fn handle_button(&mut self, button: Button) {
        let selection = &self.view.selection;
        self.view = match button {
            Button::ToggleCompare => self.view.with_selection(selection.toggle_compare()),
            Button::Reset => self.view.with_selection(selection.reset()),
            Button::Compare => self.view.with_selection(selection.show_comparison()),
            Button::CloseDetail => self.view.with_selection(selection.close_detail()),
            Button::CloseComparison => self.view.with_selection(selection.close_comparison()),
            Button::Help => self.view.show_help(true),
            Button::CloseHelp => self.view.show_help(false),
            Button::ToggleSidebar => self.view.toggle_sidebar(),
        };
    }

    fn activate_from_search(&mut self, id: &str, effects: &mut Vec<Effect>) {
        let next = self.view.selection.activate(&self.catalog, id);
        self.view = self.view.with_selection(next);
        self.scroll_into_view(id, effects);
    }

    fn scroll_into_view(&mut self, id: &str, effects: &mut Vec<Effect>) {
        let Some(record) = self.catalog.get(id) else {
            return;
        };
        let target = self.viewport.centered_on(self.layout.node_x(record));
        self.viewport.scroll_to(target);
        effects.push(self.scroll_effect());
    }

    fn scroll_by(&mut self, delta: f64, effects: &mut Vec<Effect>) {
        if self.viewport.scroll_by(delta) {
            effects.push(self.scroll_effect());
        }
    }

    fn scroll_effect(&self) -> Effect {
        Effect::ScrollTo {
            offset: self.viewport.scroll_left(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SelectionState, UseCase};
    use chrono::NaiveDate;

    fn explorer() -> Explorer {
        let record = |id: &str, year: i32, citations: u64| ModelRecord {
            id: id.to_string(),
            model: format!("{id} model"),
            year,
            exact_date: NaiveDate::from_ymd_opt(year, 3, 1),
            primary_use_case: UseCase::Image,
            citations: Some(citations),
            ..ModelRecord::default()
        };
        let catalog = Catalog::new(vec![
            record("GAN", 2014, 60000),
            record("DCGAN", 2015, 15000),
            record("StyleGAN", 2019, 9000),
            record("DDPM", 2020, 12000),
        ])
        .unwrap();
        let mut explorer = Explorer::new(catalog, ChartConfig::default()).unwrap();
        explorer.handle(InputEvent::Resize { width: 1200.0 });
        explorer
    }

    fn key(name: &str) -> InputEvent {
        InputEvent::Key {
            key: Key::from(name),
            text_input_focused: false,
        }
    }

    fn click(id: &str) -> InputEvent {
        InputEvent::NodeClick { id: id.to_string() }
    }

    #[test]
    fn compare_flow_through_shortcuts() {
        let mut explorer = explorer();
        explorer.handle(key("c"));
        explorer.handle(click("StyleGAN"));
        explorer.handle(click("GAN"));
        explorer.handle(InputEvent::Button {
            button: Button::Compare,
        });

        let rows: Vec<&str> = explorer
            .comparison_rows()
            .into_iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(rows, vec!["GAN", "StyleGAN"]);

        explorer.handle(key("R"));
        assert_eq!(explorer.view().selection, SelectionState::default());
    }

    #[test]
    fn shortcuts_are_ignored_while_typing() {
        let mut explorer = explorer();
        let outcome = explorer.handle(InputEvent::Key {
            key: Key::Char('c'),
            text_input_focused: true,
        });
        assert!(!outcome.changed);
        assert!(!explorer.view().selection.compare_mode);

        let outcome = explorer.handle(key("/"));
        assert_eq!(outcome.effects, vec![Effect::FocusSearch]);
    }

    #[test]
    fn search_enter_opens_and_scrolls() {
        let mut explorer = explorer();
        explorer.handle(InputEvent::SearchInput {
            query: "gan".to_string(),
        });
        explorer.handle(InputEvent::SearchKey {
            key: Key::ArrowDown,
        });
        let outcome = explorer.handle(InputEvent::SearchKey { key: Key::Enter });

        assert_eq!(
            explorer.view().selection.open_record_id.as_deref(),
            Some("DCGAN")
        );
        let expected = explorer.scroll_target("DCGAN").unwrap();
        assert_eq!(outcome.effects, vec![Effect::ScrollTo { offset: expected }]);
        assert_eq!(explorer.viewport().scroll_left(), expected);
    }

    #[test]
    fn unknown_row_changes_nothing() {
        let mut explorer = explorer();
        let outcome = explorer.handle(InputEvent::RowClick {
            id: "missing".to_string(),
        });
        assert_eq!(outcome, Outcome::default());
    }

    #[test]
    fn backdrop_closes_detail_and_selection() {
        let mut explorer = explorer();
        explorer.handle(InputEvent::RowClick {
            id: "DDPM".to_string(),
        });
        assert!(explorer.view().selection.is_selected("DDPM"));
        explorer.handle(InputEvent::Backdrop);
        assert_eq!(explorer.view().selection, SelectionState::default());
    }

    #[test]
    fn wheel_and_arrows_scroll_horizontally() {
        let mut explorer = explorer();
        let outcome = explorer.handle(InputEvent::Wheel {
            delta_y: 120.0,
            shift: false,
        });
        assert_eq!(outcome.effects, vec![Effect::ScrollTo { offset: 120.0 }]);

        let outcome = explorer.handle(InputEvent::Wheel {
            delta_y: 120.0,
            shift: true,
        });
        assert!(outcome.effects.is_empty());

        explorer.handle(key("ArrowLeft"));
        assert_eq!(explorer.viewport().scroll_left(), 60.0);
        explorer.handle(key("ArrowLeft"));
        explorer.handle(key("ArrowLeft"));
        assert_eq!(explorer.viewport().scroll_left(), 0.0);
    }

    #[test]
    fn image_only_opens_over_detail() {
        let mut explorer = explorer();
        let image = || InputEvent::OpenImage {
            url: "flow.png".to_string(),
        };
        assert!(!explorer.handle(image()).changed);

        explorer.handle(click("GAN"));
        explorer.handle(image());
        assert_eq!(explorer.view().enlarged_image.as_deref(), Some("flow.png"));
        explorer.handle(key("Escape"));
        assert_eq!(explorer.view().enlarged_image, None);
        assert!(explorer.open_record().is_some());
    }

    #[test]
    fn events_deserialize_from_tagged_json() {
        let event: InputEvent =
            serde_json::from_str(r#"{"type":"key","key":"ArrowRight"}"#).unwrap();
        assert_eq!(
            event,
            InputEvent::Key {
                key: Key::ArrowRight,
                text_input_focused: false,
            }
        );
        let event: InputEvent =
            serde_json::from_str(r#"{"type":"button","button":"toggle_compare"}"#).unwrap();
        assert_eq!(
            event,
            InputEvent::Button {
                button: Button::ToggleCompare
            }
        );
    }

    #[test]
    fn row_select_and_close_detail_keep_comparison_consistent() {
        let mut explorer = explorer();
        explorer.handle(key("c"));
        explorer.handle(click("GAN"));
        explorer.handle(click("DCGAN"));
        explorer.handle(InputEvent::Button {
            button: Button::Compare,
        });
        assert_eq!(explorer.comparison_rows().len(), 2);

        explorer.handle(InputEvent::RowSelect {
            id: "DDPM".to_string(),
        });
        assert!(!explorer.view().selection.comparison_visible);
        assert!(explorer.comparison_rows().is_empty());

        explorer.handle(click("GAN"));
        explorer.handle(InputEvent::Button {
            button: Button::Compare,
        });
        assert!(explorer.view().selection.comparison_visible);
        explorer.handle(InputEvent::Button {
            button: Button::CloseDetail,
        });
        assert!(!explorer.view().selection.comparison_visible);
        assert!(explorer.view().selection.selected_ids.is_empty());
    }

    #[test]
    fn mode_switch_and_reset_drop_enlarged_image() {
        for shortcut in ["c", "r"] {
            let mut explorer = explorer();
            explorer.handle(click("GAN"));
            explorer.handle(InputEvent::OpenImage {
                url: "f.png".to_string(),
            });
            assert!(explorer.view().enlarged_image.is_some());

            explorer.handle(key(shortcut));
            assert_eq!(explorer.open_record(), None);
            assert_eq!(explorer.view().enlarged_image, None);
        }
    }

    #[test]
    fn resize_recenters_scroll_targets() {
        let mut explorer = explorer();
        let wide = explorer.scroll_target("DDPM").unwrap();
        let outcome = explorer.handle(InputEvent::Resize { width: 600.0 });
        assert!(outcome.changed);
        assert_eq!(explorer.viewport().width(), 600.0);
        let narrow = explorer.scroll_target("DDPM").unwrap();
        assert!((narrow - (wide + 300.0)).abs() < 1e-9);
    }

    #[test]
    fn escape_from_search_box_closes_help() {
        let mut explorer = explorer();
        explorer.handle(InputEvent::SearchInput {
            query: "gan".to_string(),
        });
        explorer.handle(InputEvent::Button { button: Button::Help });
        explorer.handle(InputEvent::Key {
            key: Key::Escape,
            text_input_focused: false,
        });
        assert!(!explorer.view().help_visible);
        assert_eq!(explorer.search().query(), "gan");
    }
}
