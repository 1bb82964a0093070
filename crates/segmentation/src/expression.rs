//! Serializes a segment into the boolean filter expression sent with the
//! campaign request.
//!
//! Grammar, per condition (`field` is the attribute lower-cased with
//! underscores removed):
//!
//! | operator       | one value              | several values                          |
//! |----------------|------------------------|-----------------------------------------|
//! | `EQUALS`       | `field = 'v'`          | `field IN ('a','b')`                    |
//! | `NOT_CONTAINS` | `field NOT LIKE '%v%'` | one `NOT LIKE` per value, `AND`-joined  |
//! | `NOT_EQUALS`   | extended only: `!=`    | extended only: `NOT IN`                 |
//! | `CONTAINS`     | extended only: `LIKE`  | extended only: `OR`-joined `LIKE`s      |
//!
//! Usable conditions inside a group are joined with `AND`; groups are joined
//! with their own connective.

use audience_core::types::ExpressionMode;

use crate::predicates::{Condition, ConditionOperator, Connective, Segment};

/// Column name derived from an attribute key: `Perfil_segmento` → `perfilsegmento`.
pub fn field_name(attribute: &str) -> String {
    attribute.to_lowercase().replace('_', "")
}

/// Builds the full filter expression for `segment`.
pub fn build_expression(segment: &Segment, mode: ExpressionMode) -> String {
    match mode {
        ExpressionMode::Compatible => build_compatible(segment),
        ExpressionMode::Extended => build_extended(segment),
    }
}

/// Clause for a single condition, or `None` if the condition is unusable or
/// its operator has no rendition in `mode`.
pub fn clause_for(condition: &Condition, mode: ExpressionMode) -> Option<String> {
    if !condition.is_usable() {
        return None;
    }
    let field = field_name(&condition.attribute);
    let quote = |v: &String| quoted(v, mode);
    let values = &condition.values;

    let clause = match (condition.operator, mode) {
        (ConditionOperator::Equals, _) => {
            if values.len() == 1 {
                format!("{field} = {}", quote(&values[0]))
            } else {
                format!("{field} IN ({})", list(values, mode))
            }
        }
        (ConditionOperator::NotContains, _) => values
            .iter()
            .map(|v| format!("{field} NOT LIKE {}", quote(&format!("%{v}%"))))
            .collect::<Vec<_>>()
            .join(" AND "),
        (ConditionOperator::NotEquals, ExpressionMode::Extended) => {
            if values.len() == 1 {
                format!("{field} != {}", quote(&values[0]))
            } else {
                format!("{field} NOT IN ({})", list(values, mode))
            }
        }
        (ConditionOperator::Contains, ExpressionMode::Extended) => {
            let likes: Vec<String> = values
                .iter()
                .map(|v| format!("{field} LIKE {}", quote(&format!("%{v}%"))))
                .collect();
            if likes.len() == 1 {
                likes.concat()
            } else {
                format!("({})", likes.join(" OR "))
            }
        }
        (ConditionOperator::NotEquals | ConditionOperator::Contains, ExpressionMode::Compatible) => {
            String::new()
        }
    };

    (!clause.is_empty()).then_some(clause)
}

fn group_clauses(conditions: &[Condition], mode: ExpressionMode) -> String {
    conditions
        .iter()
        .filter_map(|c| clause_for(c, mode))
        .collect::<Vec<_>>()
        .join(" AND ")
}

// A group's connective is written before its content even when the group
// renders nothing, which leaves `"<clause> OR "` for an unusable last group.
fn build_compatible(segment: &Segment) -> String {
    let mut expression = String::new();
    for (index, group) in segment.groups.iter().enumerate() {
        if index > 0 {
            if let Some(connective) = group.connective {
                expression.push(' ');
                expression.push_str(connective.token());
                expression.push(' ');
            }
        }
        expression.push_str(&group_clauses(&group.conditions, ExpressionMode::Compatible));
    }
    expression
}

fn build_extended(segment: &Segment) -> String {
    let mut expression = String::new();
    for group in &segment.groups {
        let content = group_clauses(&group.conditions, ExpressionMode::Extended);
        if content.is_empty() {
            continue;
        }
        if !expression.is_empty() {
            let connective = group.connective.unwrap_or(Connective::And);
            expression.push(' ');
            expression.push_str(connective.token());
            expression.push(' ');
        }
        expression.push_str(&content);
    }
    expression
}

fn quoted(value: &str, mode: ExpressionMode) -> String {
    match mode {
        ExpressionMode::Compatible => format!("'{value}'"),
        ExpressionMode::Extended => format!("'{}'", value.replace('\'', "''")),
    }
}

fn list(values: &[String], mode: ExpressionMode) -> String {
    values
        .iter()
        .map(|v| quoted(v, mode))
        .collect::<Vec<_>>()
        .join(",")
}
