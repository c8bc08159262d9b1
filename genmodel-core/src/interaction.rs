//! Selection and overlay state.
//!
//! Every transition borrows the current snapshot and returns a new one, so a
//! host can keep old snapshots around (history, diffing, tests) for free.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{Catalog, ModelRecord};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Single record detail viewing.
    Browse,
    /// Multi-select for side-by-side comparison.
    Compare,
}

/// Which records are selected, opened or compared.
///
/// `open_record_id` is only ever set outside compare mode, and
/// `comparison_visible` only inside it with at least two selected ids.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    pub compare_mode: bool,
    pub selected_ids: BTreeSet<String>,
    pub open_record_id: Option<String>,
    pub comparison_visible: bool,
}

impl SelectionState {
    pub fn mode(&self) -> Mode {
        if self.compare_mode {
            Mode::Compare
        } else {
            Mode::Browse
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_ids.contains(id)
    }

    /// Flips the mode and drops everything tied to the previous one.
    pub fn toggle_compare(&self) -> Self {
        Self {
            compare_mode: !self.compare_mode,
            ..Self::default()
        }
    }

    /// Back to an empty browse state.
    pub fn reset(&self) -> Self {
        Self::default()
    }

    /// Node or search activation: opens the record in browse mode, toggles
    /// its selection in compare mode. Unknown ids leave the state untouched.
    pub fn activate(&self, catalog: &Catalog, id: &str) -> Self {
        if !catalog.contains(id) {
            return self.clone();
        }
        if self.compare_mode {
            self.toggle_selected(id)
        } else {
            Self {
                open_record_id: Some(id.to_string()),
                ..self.clone()
            }
        }
    }

    /// Sidebar row activation: like [`activate`](Self::activate), but in
    /// browse mode the row also becomes the only selected one.
    pub fn activate_row(&self, catalog: &Catalog, id: &str) -> Self {
        if !catalog.contains(id) || self.compare_mode {
            return self.activate(catalog, id);
        }
        Self {
            selected_ids: BTreeSet::from([id.to_string()]),
            open_record_id: Some(id.to_string()),
            ..self.clone()
        }
    }

    /// Makes `id` the only selected record (sidebar radio button).
    pub fn select_only(&self, catalog: &Catalog, id: &str) -> Self {
        if !catalog.contains(id) {
            return self.clone();
        }
        Self {
            selected_ids: BTreeSet::from([id.to_string()]),
            // A single selection can no longer back the comparison table.
            comparison_visible: false,
            ..self.clone()
        }
    }

    /// Set toggle: present ids are removed, absent ones added.
    pub fn toggle_selected(&self, id: &str) -> Self {
        let mut selected_ids = self.selected_ids.clone();
        if !selected_ids.remove(id) {
            selected_ids.insert(id.to_string());
        }
        let comparison_visible = self.comparison_visible && selected_ids.len() >= 2;
        Self {
            selected_ids,
            comparison_visible,
            ..self.clone()
        }
    }

    pub fn can_compare(&self) -> bool {
        self.compare_mode && self.selected_ids.len() >= 2
    }

    /// Shows the comparison table when [`can_compare`](Self::can_compare) holds.
    pub fn show_comparison(&self) -> Self {
        Self {
            comparison_visible: self.can_compare(),
            ..self.clone()
        }
    }

    /// Hides the comparison table; the selection survives.
    pub fn close_comparison(&self) -> Self {
        Self {
            comparison_visible: false,
            ..self.clone()
        }
    }

    /// Closes the detail popup and clears any lingering row selection, which
    /// also takes the comparison table down with it.
    pub fn close_detail(&self) -> Self {
        Self {
            open_record_id: None,
            selected_ids: BTreeSet::new(),
            comparison_visible: false,
            ..self.clone()
        }
    }

    pub fn open_record<'a>(&self, catalog: &'a Catalog) -> Option<&'a ModelRecord> {
        if self.compare_mode {
            return None;
        }
        catalog.get(self.open_record_id.as_deref()?)
    }

    /// Selected records in dataset order, the column order of the comparison table.
    pub fn comparison_rows<'a>(&self, catalog: &'a Catalog) -> Vec<&'a ModelRecord> {
        catalog.filter_ids(|id| self.selected_ids.contains(id))
    }
}

/// Selection plus the presentation chrome around it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub selection: SelectionState,
    pub sidebar_minimized: bool,
    pub help_visible: bool,
    /// Flowchart image shown full-size on top of the detail popup.
    pub enlarged_image: Option<String>,
}

impl ViewState {
    /// Swaps in a new selection. The enlarged image belongs to the detail
    /// popup, so it closes whenever no record stays open.
    pub fn with_selection(&self, selection: SelectionState) -> Self {
        let enlarged_image = match selection.open_record_id {
            Some(_) if !selection.compare_mode => self.enlarged_image.clone(),
            _ => None,
        };
        Self {
            selection,
            enlarged_image,
            ..self.clone()
        }
    }

    pub fn toggle_sidebar(&self) -> Self {
        Self {
            sidebar_minimized: !self.sidebar_minimized,
            ..self.clone()
        }
    }

    pub fn show_help(&self, visible: bool) -> Self {
        Self {
            help_visible: visible,
            ..self.clone()
        }
    }

    pub fn enlarge_image(&self, url: Option<String>) -> Self {
        Self {
            enlarged_image: url,
            ..self.clone()
        }
    }

    /// Closes the top-most dismissable overlay, if any: enlarged image, then
    /// help, then the comparison table, then the detail popup.
    pub fn dismiss_overlay(&self) -> Self {
        if self.enlarged_image.is_some() {
            self.enlarge_image(None)
        } else if self.help_visible {
            self.show_help(false)
        } else if self.selection.comparison_visible {
            self.with_selection(self.selection.close_comparison())
        } else if self.selection.open_record_id.is_some() {
            self.with_selection(self.selection.close_detail())
        } else {
            self.clone()
        }
    }

    /// Escape closes the enlarged image first, then the help overlay.
    pub fn escape(&self) -> Self {
        if self.enlarged_image.is_some() {
            self.enlarge_image(None)
        } else if self.help_visible {
            self.show_help(false)
        } else {
            self.clone()
        }
    }
}
