use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::JobType;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    #[default]
    All,
    Recommended,
    Recent,
    Saved,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Match,
    Date,
    Salary,
}

/// The complete set of filter and sort choices at a point in time.
///
/// Plain value: the session owns mutation, the pipeline only reads it.
/// Sets are ordered so two equal criteria always serialize and hash the same.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub active_tab: Tab,
    pub search_text: String,
    /// Empty = no type restriction.
    pub selected_types: BTreeSet<JobType>,
    pub location_text: String,
    pub sort_key: SortKey,
    pub saved_ids: BTreeSet<String>,
}

impl FilterCriteria {
    pub fn is_saved(&self, id: &str) -> bool {
        self.saved_ids.contains(id)
    }

    /// Adds or removes a bookmark. Returns whether the id is saved afterwards.
    pub fn toggle_saved(&mut self, id: &str) -> bool {
        if self.saved_ids.remove(id) {
            false
        } else {
            self.saved_ids.insert(id.to_string());
            true
        }
    }

    /// Adds or removes a type from the type filter. Returns whether it is selected afterwards.
    pub fn toggle_type(&mut self, job_type: JobType) -> bool {
        if self.selected_types.remove(&job_type) {
            false
        } else {
            self.selected_types.insert(job_type);
            true
        }
    }
}
