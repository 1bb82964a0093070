//! Audience step — sidebar attribute checkboxes driving a segment builder.

use std::collections::HashMap;

use audience_segmentation::{AttributeCatalog, ConditionUpdate, Segment, SegmentBuilder};
use tracing::debug;
use uuid::Uuid;

/// State of the audience step: which checkboxes are ticked and the segment
/// being built.
#[derive(Debug, Clone)]
pub struct AudienceStep {
    catalog: AttributeCatalog,
    checked: HashMap<String, bool>,
    builder: SegmentBuilder,
}

impl AudienceStep {
    pub fn new(catalog: AttributeCatalog) -> Self {
        Self {
            catalog,
            checked: HashMap::new(),
            builder: SegmentBuilder::new(),
        }
    }

    pub fn catalog(&self) -> &AttributeCatalog {
        &self.catalog
    }

    pub fn builder(&self) -> &SegmentBuilder {
        &self.builder
    }

    pub fn builder_mut(&mut self) -> &mut SegmentBuilder {
        &mut self.builder
    }

    pub fn is_checked(&self, key: &str) -> bool {
        self.checked.get(key).copied().unwrap_or(false)
    }

    /// Ticks or clears a sidebar checkbox. Ticking appends a condition for
    /// the checkbox's attribute; clearing removes every condition on that
    /// attribute. Unknown keys are ignored.
    pub fn set_checkbox(&mut self, key: &str, checked: bool) {
        let Some(checkbox) = self.catalog.checkbox(key) else {
            debug!(key, "Ignoring unknown attribute checkbox");
            return;
        };
        let attribute = checkbox.attribute.clone();
        self.checked.insert(key.to_string(), checked);

        if checked {
            self.builder.add_condition_for_attribute(attribute);
        } else {
            self.builder.remove_conditions_for_attribute(&attribute);
        }
    }

    /// Picks a new attribute for a condition and drops its now meaningless
    /// values.
    pub fn select_attribute(&mut self, group_id: Uuid, condition_id: Uuid, attribute: &str) -> bool {
        self.builder.update_condition(
            group_id,
            condition_id,
            ConditionUpdate::Attribute(attribute.to_string()),
        ) && self
            .builder
            .update_condition(group_id, condition_id, ConditionUpdate::Values(Vec::new()))
    }

    /// Replaces the segment being built, e.g. with one loaded from disk.
    /// Checkbox state is left untouched.
    pub fn load_segment(&mut self, segment: Segment) {
        self.builder = SegmentBuilder::from_segment(segment);
    }

    /// Whether the user may leave the step.
    pub fn can_continue(&self) -> bool {
        self.builder.has_any_usable_condition()
    }

    /// "Limpar tudo": drops every group and unticks every checkbox.
    pub fn clear(&mut self) {
        self.builder.clear();
        self.checked.clear();
    }
}

impl Default for AudienceStep {
    fn default() -> Self {
        Self::new(AttributeCatalog::default())
    }
}
