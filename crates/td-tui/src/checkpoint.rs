//! Review card shown while an investigation waits at the first checkpoint:
//! three editable fields, each picked from a fixed dropdown.

use std::collections::BTreeMap;

use td_core::types::{InvestigationId, TicketData};

pub const CLASSIFICATION_OPTIONS: &[&str] = &["product_bug", "connector_bug", "feature_request"];

pub const PRODUCT_AREA_OPTIONS: &[&str] = &[
    "Platform / UI",
    "Connectors",
    "Access Profiles",
    "Access Requests",
    "Access Reviews",
    "API / Terraform",
    "Automations",
    "Notifications",
    "Policies",
    "RBAC",
    "Thomas - AI Agent",
    "External Ticketing",
    "Other",
];

pub const PRIORITY_OPTIONS: &[&str] = &["P1", "P2", "P3", "P4"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewField {
    #[default]
    Classification,
    ProductArea,
    Priority,
}

impl ReviewField {
    pub const ALL: [ReviewField; 3] = [
        ReviewField::Classification,
        ReviewField::ProductArea,
        ReviewField::Priority,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ReviewField::Classification => "Classification",
            ReviewField::ProductArea => "Product Area",
            ReviewField::Priority => "Priority",
        }
    }

    /// Field name in the control plane's update body.
    pub fn wire_key(self) -> &'static str {
        match self {
            ReviewField::Classification => "classification",
            ReviewField::ProductArea => "product_area",
            ReviewField::Priority => "priority",
        }
    }

    pub fn options(self) -> &'static [&'static str] {
        match self {
            ReviewField::Classification => CLASSIFICATION_OPTIONS,
            ReviewField::ProductArea => PRODUCT_AREA_OPTIONS,
            ReviewField::Priority => PRIORITY_OPTIONS,
        }
    }

    pub fn next(self) -> Self {
        match self {
            ReviewField::Classification => ReviewField::ProductArea,
            ReviewField::ProductArea => ReviewField::Priority,
            ReviewField::Priority => ReviewField::Classification,
        }
    }

    pub fn prev(self) -> Self {
        self.next().next()
    }
}

/// Operator's working copy of the ticket fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckpointDraft {
    pub focus: ReviewField,
    pub dropdown_open: bool,
    pub dropdown_index: usize,
    pub classification: String,
    pub product_area: String,
    pub priority: String,
    /// Investigation the draft was seeded for. Cleared on every selection
    /// change so the next ticket-data arrival re-seeds.
    pub loaded_for: Option<InvestigationId>,
}

impl CheckpointDraft {
    pub fn seed(&mut self, id: InvestigationId, data: &TicketData) {
        *self = Self {
            classification: data.classification.clone(),
            product_area: data.product_area.clone(),
            priority: data.priority.clone(),
            loaded_for: Some(id),
            ..Self::default()
        };
    }

    pub fn invalidate(&mut self) {
        self.loaded_for = None;
        self.dropdown_open = false;
    }

    pub fn value(&self, field: ReviewField) -> &str {
        match field {
            ReviewField::Classification => &self.classification,
            ReviewField::ProductArea => &self.product_area,
            ReviewField::Priority => &self.priority,
        }
    }

    fn value_mut(&mut self, field: ReviewField) -> &mut String {
        match field {
            ReviewField::Classification => &mut self.classification,
            ReviewField::ProductArea => &mut self.product_area,
            ReviewField::Priority => &mut self.priority,
        }
    }

    /// Open the focused field's dropdown on its current value.
    pub fn open_dropdown(&mut self) {
        let current = self.value(self.focus);
        self.dropdown_index = self
            .focus
            .options()
            .iter()
            .position(|opt| *opt == current)
            .unwrap_or(0);
        self.dropdown_open = true;
    }

    pub fn dropdown_up(&mut self) {
        self.dropdown_index = self.dropdown_index.saturating_sub(1);
    }

    pub fn dropdown_down(&mut self) {
        let last = self.focus.options().len().saturating_sub(1);
        self.dropdown_index = (self.dropdown_index + 1).min(last);
    }

    /// Commit the highlighted option into the focused field.
    pub fn pick(&mut self) {
        if let Some(opt) = self.focus.options().get(self.dropdown_index) {
            *self.value_mut(self.focus) = (*opt).to_string();
        }
        self.dropdown_open = false;
    }

    /// Fields whose draft differs from the loaded ticket, keyed by wire name.
    /// Without ticket data nothing counts as edited.
    pub fn changed_fields(&self, original: Option<&TicketData>) -> BTreeMap<String, String> {
        let Some(td) = original else {
            return BTreeMap::new();
        };
        ReviewField::ALL
            .into_iter()
            .filter(|f| {
                let loaded = match f {
                    ReviewField::Classification => &td.classification,
                    ReviewField::ProductArea => &td.product_area,
                    ReviewField::Priority => &td.priority,
                };
                self.value(*f) != loaded
            })
            .map(|f| (f.wire_key().to_string(), self.value(f).to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket() -> TicketData {
        TicketData {
            classification: "product_bug".into(),
            product_area: "Connectors".into(),
            priority: "P3".into(),
            ..Default::default()
        }
    }

    #[test]
    fn dropdown_preselects_current_value() {
        let mut draft = CheckpointDraft::default();
        draft.seed(1, &ticket());
        draft.focus = ReviewField::Priority;
        draft.open_dropdown();
        assert!(draft.dropdown_open);
        assert_eq!(draft.dropdown_index, 2);
    }

    #[test]
    fn unknown_value_opens_at_top() {
        let mut draft = CheckpointDraft::default();
        draft.classification = "something_else".into();
        draft.open_dropdown();
        assert_eq!(draft.dropdown_index, 0);
    }

    #[test]
    fn dropdown_index_is_clamped() {
        let mut draft = CheckpointDraft::default();
        draft.seed(1, &ticket());
        draft.focus = ReviewField::Priority;
        draft.open_dropdown();
        for _ in 0..10 {
            draft.dropdown_down();
        }
        assert_eq!(draft.dropdown_index, PRIORITY_OPTIONS.len() - 1);
        draft.pick();
        assert_eq!(draft.priority, "P4");
        assert!(!draft.dropdown_open);
    }

    #[test]
    fn changed_fields_uses_wire_keys() {
        let mut draft = CheckpointDraft::default();
        draft.seed(1, &ticket());
        assert!(draft.changed_fields(Some(&ticket())).is_empty());

        draft.product_area = "RBAC".into();
        let changed = draft.changed_fields(Some(&ticket()));
        assert_eq!(changed.len(), 1);
        assert_eq!(changed["product_area"], "RBAC");
        assert!(draft.changed_fields(None).is_empty());
    }

    #[test]
    fn focus_cycles_both_ways() {
        assert_eq!(ReviewField::Priority.next(), ReviewField::Classification);
        assert_eq!(ReviewField::Classification.prev(), ReviewField::Priority);
    }
}
