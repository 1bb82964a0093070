//! Human-readable rendition of a segment for the confirmation panel.

use serde::Serialize;

use crate::predicates::Segment;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SummaryLine {
    /// Connective badge shown between two groups.
    Connective { label: String },
    Condition {
        attribute: String,
        operator: String,
        values: Vec<String>,
        /// Whether an "E" badge follows, i.e. another condition of the same
        /// group comes next.
        joined_with_next: bool,
    },
}

pub fn describe(segment: &Segment) -> Vec<SummaryLine> {
    let mut lines = Vec::new();
    for (index, group) in segment.groups.iter().enumerate() {
        if index > 0 {
            if let Some(connective) = group.connective {
                lines.push(SummaryLine::Connective {
                    label: connective.label().to_string(),
                });
            }
        }
        let last = group.conditions.len().saturating_sub(1);
        for (pos, cond) in group.conditions.iter().enumerate() {
            lines.push(SummaryLine::Condition {
                attribute: cond.attribute.clone(),
                operator: cond.operator.label().to_string(),
                values: cond.values.clone(),
                joined_with_next: pos < last,
            });
        }
    }
    lines
}

/// Plain-text form, one line per entry.
pub fn render(lines: &[SummaryLine]) -> String {
    lines
        .iter()
        .map(|line| match line {
            SummaryLine::Connective { label } => format!("[{label}]"),
            SummaryLine::Condition {
                attribute,
                operator,
                values,
                joined_with_next,
            } => {
                let mut text = format!("> {attribute} {operator}");
                if !values.is_empty() {
                    text.push(' ');
                    text.push_str(&values.join("; "));
                }
                if *joined_with_next {
                    text.push_str(" [E]");
                }
                text
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
