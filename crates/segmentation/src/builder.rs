//! Segment builder — invariant-preserving edits of an audience segment.
//!
//! Every mutator is total: unknown group or condition ids are ignored. After
//! each call the segment holds no empty group and its first group carries no
//! connective.

use audience_core::types::ExpressionMode;
use tracing::debug;
use uuid::Uuid;

use crate::expression;
use crate::predicates::{
    Condition, ConditionGroup, ConditionUpdate, Connective, Segment,
};

#[derive(Debug, Clone, Default)]
pub struct SegmentBuilder {
    segment: Segment,
}

impl SegmentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopts an existing segment, pruning empty groups and clearing the
    /// first group's connective.
    pub fn from_segment(segment: Segment) -> Self {
        let mut builder = Self { segment };
        builder.normalize();
        builder
    }

    pub fn segment(&self) -> &Segment {
        &self.segment
    }

    pub fn into_segment(self) -> Segment {
        self.segment
    }

    pub fn is_empty(&self) -> bool {
        self.segment.is_empty()
    }

    /// Gates leaving the audience step: at least one condition has both an
    /// attribute and a value.
    pub fn has_any_usable_condition(&self) -> bool {
        self.segment.conditions().any(|c| c.is_usable())
    }

    pub fn usable_condition_count(&self) -> usize {
        self.segment.usable_condition_count()
    }

    pub fn find_condition(&self, group_id: Uuid, condition_id: Uuid) -> Option<&Condition> {
        self.segment
            .groups
            .iter()
            .find(|g| g.id == group_id)?
            .conditions
            .iter()
            .find(|c| c.id == condition_id)
    }

    /// Appends an `EQUALS` condition for `attribute` to the last group.
    pub fn add_condition_for_attribute(&mut self, attribute: impl Into<String>) -> Uuid {
        let condition = Condition::new(attribute);
        debug!(attribute = %condition.attribute, "Adding condition for attribute");
        self.push_condition(condition)
    }

    /// Appends a condition with no attribute selected to the last group.
    pub fn add_blank_condition(&mut self) -> Uuid {
        debug!("Adding blank condition");
        self.push_condition(Condition::blank())
    }

    fn push_condition(&mut self, condition: Condition) -> Uuid {
        let id = condition.id;
        match self.segment.groups.last_mut() {
            Some(group) => group.conditions.push(condition),
            None => self.segment.groups.push(ConditionGroup::new(condition, None)),
        }
        id
    }

    /// Removes every condition referencing `attribute` in every group.
    /// Returns how many conditions were removed.
    pub fn remove_conditions_for_attribute(&mut self, attribute: &str) -> usize {
        let mut removed = 0;
        for group in &mut self.segment.groups {
            let before = group.conditions.len();
            group.conditions.retain(|c| c.attribute != attribute);
            removed += before - group.conditions.len();
        }
        self.normalize();
        debug!(attribute, removed, "Removed conditions for attribute");
        removed
    }

    /// Replaces one field of a condition. Returns `false` when either id is
    /// unknown. Changing the attribute leaves the values untouched.
    pub fn update_condition(
        &mut self,
        group_id: Uuid,
        condition_id: Uuid,
        update: ConditionUpdate,
    ) -> bool {
        let Some(condition) = self.condition_mut(group_id, condition_id) else {
            debug!(%group_id, %condition_id, "Ignoring update for unknown condition");
            return false;
        };
        debug!(%group_id, %condition_id, ?update, "Updating condition");
        condition.apply(update);
        true
    }

    /// Checks (`selected = true`) or unchecks a single value of a condition.
    pub fn toggle_value(
        &mut self,
        group_id: Uuid,
        condition_id: Uuid,
        value: &str,
        selected: bool,
    ) -> bool {
        let Some(current) = self
            .find_condition(group_id, condition_id)
            .map(|c| c.values.clone())
        else {
            return false;
        };

        let values = if selected {
            let mut values = current;
            if !values.iter().any(|v| v == value) {
                values.push(value.to_string());
            }
            values
        } else {
            current.into_iter().filter(|v| v != value).collect()
        };

        self.update_condition(group_id, condition_id, ConditionUpdate::Values(values))
    }

    /// Deletes a condition, dropping its group if it was the last one.
    pub fn delete_condition(&mut self, group_id: Uuid, condition_id: Uuid) -> bool {
        let Some(group) = self.segment.groups.iter_mut().find(|g| g.id == group_id) else {
            return false;
        };
        let before = group.conditions.len();
        group.conditions.retain(|c| c.id != condition_id);
        let deleted = group.conditions.len() < before;
        if deleted {
            self.normalize();
            debug!(%group_id, %condition_id, groups = self.segment.groups.len(), "Deleted condition");
        }
        deleted
    }

    /// Appends a group holding one blank condition. Returns the new group and
    /// condition ids.
    pub fn add_group(&mut self, connective: Connective) -> (Uuid, Uuid) {
        let condition = Condition::blank();
        let condition_id = condition.id;
        let connective = if self.segment.groups.is_empty() {
            None
        } else {
            Some(connective)
        };
        let group = ConditionGroup::new(condition, connective);
        let group_id = group.id;
        self.segment.groups.push(group);
        debug!(%group_id, ?connective, "Added group");
        (group_id, condition_id)
    }

    /// Overwrites the connective of the group at `index`. The first group
    /// never takes one.
    pub fn set_group_connective(&mut self, index: usize, connective: Connective) {
        if index == 0 {
            return;
        }
        if let Some(group) = self.segment.groups.get_mut(index) {
            group.connective = Some(connective);
        }
    }

    pub fn clear(&mut self) {
        self.segment.groups.clear();
    }

    /// Serializes the current segment.
    pub fn expression(&self, mode: ExpressionMode) -> String {
        expression::build_expression(&self.segment, mode)
    }

    fn condition_mut(&mut self, group_id: Uuid, condition_id: Uuid) -> Option<&mut Condition> {
        self.segment
            .groups
            .iter_mut()
            .find(|g| g.id == group_id)?
            .conditions
            .iter_mut()
            .find(|c| c.id == condition_id)
    }

    fn normalize(&mut self) {
        self.segment.groups.retain(|g| !g.conditions.is_empty());
        if let Some(first) = self.segment.groups.first_mut() {
            first.connective = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicates::ConditionOperator;

    fn values(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_first_attribute_creates_first_group() {
        let mut builder = SegmentBuilder::new();
        assert!(builder.is_empty());

        builder.add_condition_for_attribute("Estado");

        let segment = builder.segment();
        assert_eq!(segment.groups.len(), 1);
        let group = &segment.groups[0];
        assert_eq!(group.connective, None);
        assert_eq!(group.conditions.len(), 1);
        assert_eq!(group.conditions[0].attribute, "Estado");
        assert_eq!(group.conditions[0].operator, ConditionOperator::Equals);
        assert!(group.conditions[0].values.is_empty());
    }

    #[test]
    fn test_conditions_append_to_last_group() {
        let mut builder = SegmentBuilder::new();
        builder.add_condition_for_attribute("Estado");
        builder.add_group(Connective::Or);
        builder.add_condition_for_attribute("Produto");
        builder.add_blank_condition();

        let groups = &builder.segment().groups;
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].conditions.len(), 1);
        assert_eq!(groups[1].conditions.len(), 3);
        assert_eq!(groups[1].conditions[1].attribute, "Produto");
        assert_eq!(groups[1].conditions[2].attribute, "");
    }

    #[test]
    fn test_remove_attribute_across_groups() {
        let mut builder = SegmentBuilder::new();
        builder.add_condition_for_attribute("Produto");
        builder.add_condition_for_attribute("Estado");
        builder.add_group(Connective::And);
        builder.add_condition_for_attribute("Produto");
        builder.add_group(Connective::Or);
        let (_, blank) = builder.add_group(Connective::Or);
        let last_group = builder.segment().groups[3].id;
        builder.update_condition(last_group, blank, ConditionUpdate::Attribute("Produto".into()));

        let removed = builder.remove_conditions_for_attribute("Produto");
        assert_eq!(removed, 3);

        // The fourth group only held a Produto condition and is gone.
        let groups = &builder.segment().groups;
        assert_eq!(groups.len(), 3);
        assert!(builder.segment().conditions().all(|c| c.attribute != "Produto"));
        assert!(groups.iter().all(|g| !g.conditions.is_empty()));
    }

    #[test]
    fn test_removing_first_group_clears_new_first_connective() {
        let mut builder = SegmentBuilder::new();
        builder.add_condition_for_attribute("Estado");
        builder.add_group(Connective::Or);

        builder.remove_conditions_for_attribute("Estado");

        let groups = &builder.segment().groups;
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].connective, None);
    }

    #[test]
    fn test_update_condition_fields() {
        let mut builder = SegmentBuilder::new();
        let cond = builder.add_blank_condition();
        let group = builder.segment().groups[0].id;

        assert!(builder.update_condition(group, cond, ConditionUpdate::Attribute("Perfil_segmento".into())));
        assert!(builder.update_condition(group, cond, ConditionUpdate::Values(values(&["PF1", "PF2"]))));
        assert!(builder.update_condition(
            group,
            cond,
            ConditionUpdate::Operator(ConditionOperator::NotEquals)
        ));

        let condition = builder.find_condition(group, cond).unwrap();
        assert_eq!(condition.attribute, "Perfil_segmento");
        assert_eq!(condition.values, values(&["PF1", "PF2"]));
        assert_eq!(condition.operator, ConditionOperator::NotEquals);
    }

    #[test]
    fn test_update_unknown_ids_is_noop() {
        let mut builder = SegmentBuilder::new();
        let cond = builder.add_condition_for_attribute("Estado");
        let group = builder.segment().groups[0].id;
        let before = builder.segment().clone();

        assert!(!builder.update_condition(Uuid::new_v4(), cond, ConditionUpdate::Values(values(&["PR"]))));
        assert!(!builder.update_condition(group, Uuid::new_v4(), ConditionUpdate::Values(values(&["PR"]))));
        assert_eq!(builder.segment(), &before);
    }

    #[test]
    fn test_toggle_value_keeps_order_and_skips_duplicates() {
        let mut builder = SegmentBuilder::new();
        let cond = builder.add_condition_for_attribute("Estado");
        let group = builder.segment().groups[0].id;

        builder.toggle_value(group, cond, "SP", true);
        builder.toggle_value(group, cond, "PR", true);
        builder.toggle_value(group, cond, "SP", true);
        assert_eq!(builder.find_condition(group, cond).unwrap().values, values(&["SP", "PR"]));

        builder.toggle_value(group, cond, "SP", false);
        assert_eq!(builder.find_condition(group, cond).unwrap().values, values(&["PR"]));

        assert!(!builder.toggle_value(Uuid::new_v4(), cond, "SP", true));
    }

    #[test]
    fn test_delete_last_condition_prunes_group() {
        let mut builder = SegmentBuilder::new();
        builder.add_condition_for_attribute("Estado");
        let (group, cond) = builder.add_group(Connective::And);
        assert_eq!(builder.segment().groups.len(), 2);

        assert!(builder.delete_condition(group, cond));
        assert_eq!(builder.segment().groups.len(), 1);

        assert!(!builder.delete_condition(group, cond));
    }

    #[test]
    fn test_delete_only_condition_empties_segment() {
        let mut builder = SegmentBuilder::new();
        let cond = builder.add_condition_for_attribute("Estado");
        let group = builder.segment().groups[0].id;

        builder.delete_condition(group, cond);
        assert!(builder.is_empty());
    }

    #[test]
    fn test_add_group_on_empty_segment_has_no_connective() {
        let mut builder = SegmentBuilder::new();
        builder.add_group(Connective::Or);
        let groups = &builder.segment().groups;
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].connective, None);
        assert_eq!(groups[0].conditions.len(), 1);
        assert_eq!(groups[0].conditions[0].attribute, "");
    }

    #[test]
    fn test_set_group_connective_ignores_first_and_out_of_range() {
        let mut builder = SegmentBuilder::new();
        builder.add_condition_for_attribute("Estado");
        builder.add_group(Connective::And);

        builder.set_group_connective(0, Connective::Or);
        builder.set_group_connective(5, Connective::Or);
        builder.set_group_connective(1, Connective::Or);

        let groups = &builder.segment().groups;
        assert_eq!(groups[0].connective, None);
        assert_eq!(groups[1].connective, Some(Connective::Or));
    }

    #[test]
    fn test_usable_condition_gate() {
        let mut builder = SegmentBuilder::new();
        assert!(!builder.has_any_usable_condition());

        let cond = builder.add_condition_for_attribute("Estado");
        let blank = builder.add_blank_condition();
        let group = builder.segment().groups[0].id;
        builder.update_condition(group, blank, ConditionUpdate::Values(values(&["PR"])));
        assert!(!builder.has_any_usable_condition());

        builder.update_condition(group, cond, ConditionUpdate::Values(values(&["PR"])));
        assert!(builder.has_any_usable_condition());
        assert_eq!(builder.usable_condition_count(), 1);
    }

    #[test]
    fn test_clear() {
        let mut builder = SegmentBuilder::new();
        builder.add_condition_for_attribute("Estado");
        builder.add_group(Connective::Or);
        builder.clear();
        assert!(builder.is_empty());
        assert!(!builder.has_any_usable_condition());
    }

    #[test]
    fn test_from_segment_normalizes() {
        let mut first = ConditionGroup::new(Condition::new("Estado"), Some(Connective::And));
        first.conditions.clear();
        let second = ConditionGroup::new(Condition::new("Produto"), Some(Connective::Or));
        let segment = Segment {
            groups: vec![first, second],
        };

        let builder = SegmentBuilder::from_segment(segment);
        let groups = &builder.segment().groups;
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].connective, None);
        assert_eq!(groups[0].conditions[0].attribute, "Produto");
    }
}
