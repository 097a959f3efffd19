//! Filter panel: owns the current `{country, model}` selection and the last
//! dataset, derives dropdown option sets, and notifies a registered
//! subscriber with the active subset whenever the selection changes.

use crate::models::{FilterField, FilterState, Record};
use num_format::{Locale, ToFormattedString};
use std::collections::BTreeSet;

/// Distinct selectable values per filter field, alphabetically sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub countries: Vec<String>,
    pub models: Vec<String>,
}

/// Snapshot of the panel's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterStats {
    pub total: usize,
    pub filtered: usize,
    pub active_filters: usize,
}

/// Invoked with the dataset to display (full or filtered) plus the current
/// selection whenever it changes.
pub type FilterChangeCallback = Box<dyn FnMut(&[Record], &FilterState)>;

/// The only component holding data across calls: the working dataset and
/// the current selection.
#[derive(Default)]
pub struct FilterPanel {
    data: Vec<Record>,
    filters: FilterState,
    options: FilterOptions,
    status: String,
    on_change: Option<FilterChangeCallback>,
}

impl FilterPanel {
    pub fn new() -> Self {
        FilterPanel::default()
    }

    /// One-time setup: reset the selection and status line.
    pub fn initialize(&mut self) {
        self.filters = FilterState::default();
        self.refresh_status();
    }

    /// Replace the working dataset, recompute the option sets, and refresh
    /// the status line. Does not notify: data replacement is driven by the
    /// host, which triggers its own chart updates.
    pub fn update_data(&mut self, data: Vec<Record>) {
        self.data = data;
        self.options = derive_options(&self.data);
        self.refresh_status();
    }

    /// Apply a new dropdown selection for one field. The empty string
    /// means "no filter". Notifies the subscriber, if any, with either the
    /// full dataset (nothing active) or the filtered subset.
    pub fn set_filter(&mut self, field: FilterField, selection: &str) {
        let value = if selection.is_empty() {
            None
        } else {
            Some(selection.to_string())
        };
        match field {
            FilterField::Country => self.filters.country = value,
            FilterField::Model => self.filters.model = value,
        }
        self.refresh_status();
        self.notify();
    }

    /// Reset both fields and notify with the full dataset.
    pub fn clear_all_filters(&mut self) {
        self.filters = FilterState::default();
        self.refresh_status();
        self.notify();
    }

    /// Records passing every active filter field.
    pub fn get_filtered_data(&self) -> Vec<Record> {
        if self.data.is_empty() {
            return Vec::new();
        }
        self.data
            .iter()
            .filter(|r| self.filters.matches(r))
            .cloned()
            .collect()
    }

    /// The dataset a chart should display right now.
    pub fn active_data(&self) -> Vec<Record> {
        if self.filters.has_active() {
            self.get_filtered_data()
        } else {
            self.data.clone()
        }
    }

    pub fn set_filter_change_callback(&mut self, callback: FilterChangeCallback) {
        self.on_change = Some(callback);
    }

    pub fn get_current_filters(&self) -> FilterState {
        self.filters.clone()
    }

    pub fn has_active_filters(&self) -> bool {
        self.filters.has_active()
    }

    pub fn get_filter_stats(&self) -> FilterStats {
        FilterStats {
            total: self.data.len(),
            filtered: self.get_filtered_data().len(),
            active_filters: self.filters.active_count(),
        }
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn status_text(&self) -> &str {
        &self.status
    }

    fn notify(&mut self) {
        if self.on_change.is_none() {
            return;
        }
        let payload: Vec<Record> = if self.filters.has_active() {
            self.get_filtered_data()
        } else {
            self.data.clone()
        };
        if let Some(cb) = self.on_change.as_mut() {
            cb(&payload, &self.filters);
        }
    }

    fn refresh_status(&mut self) {
        let total = self.data.len();
        if total == 0 {
            self.status = "No data loaded".to_string();
            return;
        }

        let filtered = if self.filters.has_active() {
            self.get_filtered_data().len()
        } else {
            total
        };

        let mut status = format!(
            "Showing {} of {} records",
            filtered.to_formatted_string(&Locale::en),
            total.to_formatted_string(&Locale::en)
        );

        let mut active: Vec<String> = Vec::new();
        if let Some(c) = self.filters.country.as_deref() {
            active.push(format!("country: {c}"));
        }
        if let Some(m) = self.filters.model.as_deref() {
            active.push(format!("model: {m}"));
        }
        if active.is_empty() {
            status.push_str("\nNo filters active - showing all data");
        } else {
            status.push_str(&format!("\nActive filters: {}", active.join(", ")));
        }
        self.status = status;
    }
}

/// Distinct non-empty trimmed values per field, alphabetically sorted.
fn derive_options(data: &[Record]) -> FilterOptions {
    let countries: BTreeSet<String> = data
        .iter()
        .filter_map(|r| r.country())
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect();
    let models: BTreeSet<String> = data
        .iter()
        .filter_map(|r| r.model())
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect();
    FilterOptions {
        countries: countries.into_iter().collect(),
        models: models.into_iter().collect(),
    }
}
