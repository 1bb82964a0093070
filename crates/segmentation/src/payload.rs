//! Builds the audience section of the campaign request from a finished
//! segment.

use audience_core::types::{
    AudienceAttributes, AudienceData, ExpressionMode, RegistrationFields, RelationshipFields,
};
use tracing::debug;

use crate::catalog::{AttributeCatalog, PRODUCT_KEY, PROFILE_SEGMENT_KEY, REGION_KEY};
use crate::expression;
use crate::predicates::Segment;

pub struct AudiencePayloadAssembler<'a> {
    catalog: &'a AttributeCatalog,
}

impl<'a> AudiencePayloadAssembler<'a> {
    pub fn new(catalog: &'a AttributeCatalog) -> Self {
        Self { catalog }
    }

    /// Every selected profile segment, in encounter order.
    pub fn profile_segments(&self, segment: &Segment) -> Vec<String> {
        values_for(segment, PROFILE_SEGMENT_KEY)
    }

    /// Every selected product name, in encounter order.
    pub fn products(&self, segment: &Segment) -> Vec<String> {
        values_for(segment, PRODUCT_KEY)
    }

    /// First value of the first region condition that has one. Region
    /// conditions with no values selected are skipped.
    pub fn region(&self, segment: &Segment) -> String {
        segment
            .conditions()
            .filter(|c| c.attribute == REGION_KEY)
            .find_map(|c| c.values.first().cloned())
            .unwrap_or_default()
    }

    pub fn assemble(
        &self,
        audience_name: impl Into<String>,
        segment: &Segment,
        mode: ExpressionMode,
    ) -> AudienceData {
        let unknown = segment
            .conditions()
            .flat_map(|c| c.values.iter().map(move |v| (c.attribute.as_str(), v.as_str())))
            .filter(|(attr, value)| {
                self.catalog.get(attr).is_some() && !self.catalog.is_known_value(attr, value)
            })
            .count();
        if unknown > 0 {
            debug!(unknown, "Segment carries values outside the catalog domains");
        }

        AudienceData {
            audience_name: audience_name.into(),
            attributes: AudienceAttributes {
                registration_fields: RegistrationFields {
                    state: self.region(segment),
                    ..Default::default()
                },
                product_fields: self.products(segment),
                relationship_fields: RelationshipFields {
                    profile_segment: self.profile_segments(segment),
                },
            },
            segment_expression: expression::build_expression(segment, mode),
        }
    }
}

fn values_for(segment: &Segment, attribute: &str) -> Vec<String> {
    segment
        .conditions()
        .filter(|c| c.attribute == attribute)
        .flat_map(|c| c.values.iter().cloned())
        .collect()
}
