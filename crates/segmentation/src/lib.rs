//! Audience segment building — condition groups, invariant-preserving edits,
//! and serialization into a boolean filter expression.

pub mod builder;
pub mod catalog;
pub mod expression;
pub mod payload;
pub mod predicates;
pub mod summary;

pub use builder::SegmentBuilder;
pub use catalog::AttributeCatalog;
pub use expression::build_expression;
pub use payload::AudiencePayloadAssembler;
pub use predicates::{
    Condition, ConditionGroup, ConditionOperator, ConditionUpdate, Connective, Segment,
};

pub use audience_core::types::ExpressionMode;
