use serde::{Deserialize, Serialize};

/// Which rendition of the segment expression grammar to produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpressionMode {
    /// Byte-for-byte what the campaign request UI has always produced,
    /// including its gaps for `NOT_EQUALS`/`CONTAINS` and trailing connectives.
    #[default]
    Compatible,
    /// Renders every operator and only joins groups that produced clauses.
    Extended,
}

/// Campaign objective chosen on the first wizard step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectiveKey {
    Eventos,
    DataComemorativaLocais,
    ReenviarEmailNaoLido,
    SorteiosPremiacoesRegionais,
    OfertasProdutos,
}

impl ObjectiveKey {
    pub const ALL: [ObjectiveKey; 5] = [
        ObjectiveKey::Eventos,
        ObjectiveKey::DataComemorativaLocais,
        ObjectiveKey::ReenviarEmailNaoLido,
        ObjectiveKey::SorteiosPremiacoesRegionais,
        ObjectiveKey::OfertasProdutos,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ObjectiveKey::Eventos => "Eventos",
            ObjectiveKey::DataComemorativaLocais => "DataComemorativaLocais",
            ObjectiveKey::ReenviarEmailNaoLido => "ReenviarEmailNaoLido",
            ObjectiveKey::SorteiosPremiacoesRegionais => "SorteiosPremiacoesRegionais",
            ObjectiveKey::OfertasProdutos => "OfertasProdutos",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ObjectiveKey::Eventos => "Eventos",
            ObjectiveKey::DataComemorativaLocais => "Datas comemorativas locais",
            ObjectiveKey::ReenviarEmailNaoLido => "Reenviar para quem não abriu o e-mail",
            ObjectiveKey::SorteiosPremiacoesRegionais => "Sorteios ou premiações regionais",
            ObjectiveKey::OfertasProdutos => "Ofertas de produtos",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.key() == key)
    }
}

impl std::fmt::Display for ObjectiveKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

// ─── Submission payload ─────────────────────────────────────────────────

/// Body posted to the campaign endpoint once the audience is confirmed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective: Option<ObjectiveSelection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<AudienceData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveSelection {
    pub objective_key: ObjectiveKey,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudienceData {
    pub audience_name: String,
    pub attributes: AudienceAttributes,
    pub segment_expression: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudienceAttributes {
    pub registration_fields: RegistrationFields,
    pub product_fields: Vec<String>,
    pub relationship_fields: RelationshipFields,
}

/// Registration fields. Only `state` is ever filled from the segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistrationFields {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub state: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipFields {
    pub profile_segment: Vec<String>,
}
