//! Search criteria and load tuning.

use super::change_set::{ChangeSet, ChangeSetState};
use serde::{Deserialize, Serialize};

/// Filter over persisted change sets. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSetSearchCriteria {
    pub user_guid: Option<String>,
    /// Accepted states; empty accepts all.
    pub states: Vec<ChangeSetState>,
    /// Case-insensitive substring of the name.
    pub name_contains: Option<String>,
}

impl ChangeSetSearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_user(mut self, user_guid: impl Into<String>) -> Self {
        self.user_guid = Some(user_guid.into());
        self
    }

    pub fn in_states(mut self, states: impl IntoIterator<Item = ChangeSetState>) -> Self {
        self.states = states.into_iter().collect();
        self
    }

    pub fn name_contains(mut self, fragment: impl Into<String>) -> Self {
        self.name_contains = Some(fragment.into());
        self
    }

    pub fn matches(&self, change_set: &ChangeSet) -> bool {
        if let Some(user) = &self.user_guid {
            if change_set.created_by_user_guid.as_deref() != Some(user.as_str()) {
                return false;
            }
        }
        if !self.states.is_empty() && !self.states.contains(&change_set.state) {
            return false;
        }
        match &self.name_contains {
            Some(fragment) => change_set
                .name
                .to_lowercase()
                .contains(&fragment.to_lowercase()),
            None => true,
        }
    }
}

/// What to load alongside a change set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSetLoadTuner {
    pub load_member_objects: bool,
    /// Only meaningful together with `load_member_objects`.
    pub load_metadata: bool,
}

impl ChangeSetLoadTuner {
    /// Members and their metadata.
    pub fn all() -> Self {
        Self {
            load_member_objects: true,
            load_metadata: true,
        }
    }

    /// The change set record only.
    pub fn none() -> Self {
        Self {
            load_member_objects: false,
            load_metadata: false,
        }
    }
}

impl Default for ChangeSetLoadTuner {
    fn default() -> Self {
        Self::all()
    }
}
