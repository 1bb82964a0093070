//! Condition, group and segment types that make up an audience filter.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Top-level audience filter: an ordered, flat sequence of groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    #[serde(default)]
    pub groups: Vec<ConditionGroup>,
}

/// Conditions combined by an implicit AND, joined to the previous group by
/// `connective`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionGroup {
    pub id: Uuid,
    pub conditions: Vec<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connective: Option<Connective>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub id: Uuid,
    /// Attribute key; empty while the user has not picked one.
    #[serde(default)]
    pub attribute: String,
    pub operator: ConditionOperator,
    #[serde(default)]
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConditionOperator {
    #[default]
    Equals,
    NotEquals,
    Contains,
    NotContains,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Connective {
    And,
    Or,
}

/// A single field replacement applied by `SegmentBuilder::update_condition`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionUpdate {
    Attribute(String),
    Operator(ConditionOperator),
    Values(Vec<String>),
}

impl ConditionOperator {
    pub const ALL: [ConditionOperator; 4] = [
        ConditionOperator::Equals,
        ConditionOperator::NotEquals,
        ConditionOperator::Contains,
        ConditionOperator::NotContains,
    ];

    /// Label shown in the condition row and the confirmation panel.
    pub fn label(&self) -> &'static str {
        match self {
            ConditionOperator::Equals => "é igual a",
            ConditionOperator::NotEquals => "não é igual a",
            ConditionOperator::Contains => "contém",
            ConditionOperator::NotContains => "não contém",
        }
    }
}

impl Connective {
    /// Token written into the filter expression.
    pub fn token(&self) -> &'static str {
        match self {
            Connective::And => "AND",
            Connective::Or => "OR",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Connective::And => "E",
            Connective::Or => "OU",
        }
    }
}

impl Condition {
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            attribute: attribute.into(),
            operator: ConditionOperator::Equals,
            values: Vec::new(),
        }
    }

    pub fn blank() -> Self {
        Self::new(String::new())
    }

    /// Only usable conditions emit clauses.
    pub fn is_usable(&self) -> bool {
        !self.attribute.is_empty() && !self.values.is_empty()
    }

    pub fn apply(&mut self, update: ConditionUpdate) {
        match update {
            ConditionUpdate::Attribute(attribute) => self.attribute = attribute,
            ConditionUpdate::Operator(operator) => self.operator = operator,
            ConditionUpdate::Values(values) => self.values = values,
        }
    }
}

impl ConditionGroup {
    pub fn new(first: Condition, connective: Option<Connective>) -> Self {
        Self {
            id: Uuid::new_v4(),
            conditions: vec![first],
            connective,
        }
    }

    pub fn usable_conditions(&self) -> impl Iterator<Item = &Condition> {
        self.conditions.iter().filter(|c| c.is_usable())
    }
}

impl Segment {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// All conditions in group order, then condition order.
    pub fn conditions(&self) -> impl Iterator<Item = &Condition> {
        self.groups.iter().flat_map(|g| g.conditions.iter())
    }

    pub fn usable_condition_count(&self) -> usize {
        self.groups.iter().map(|g| g.usable_conditions().count()).sum()
    }
}
