//! Attribute catalog — which attributes a condition may reference and the
//! fixed value domain behind each of them.

use serde::Serialize;

pub const PROFILE_SEGMENT_KEY: &str = "Perfil_segmento";
pub const REGION_KEY: &str = "Estado";
pub const PRODUCT_KEY: &str = "Produto";

/// The enumerated domains a value dropdown can draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueDomain {
    ProfileSegment,
    Region,
    Product,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValueOption {
    pub value: &'static str,
    pub label: &'static str,
}

const fn opt(value: &'static str, label: &'static str) -> ValueOption {
    ValueOption { value, label }
}

const PROFILE_SEGMENTS: &[ValueOption] = &[
    opt("PF1", "PF1"),
    opt("PF2", "PF2"),
    opt("PF3", "PF3"),
];

const REGIONS: &[ValueOption] = &[
    opt("AC", "Acre"),
    opt("AL", "Alagoas"),
    opt("AP", "Amapá"),
    opt("AM", "Amazonas"),
    opt("BA", "Bahia"),
    opt("CE", "Ceará"),
    opt("DF", "Distrito Federal"),
    opt("ES", "Espírito Santo"),
    opt("GO", "Goiás"),
    opt("MA", "Maranhão"),
    opt("MT", "Mato Grosso"),
    opt("MS", "Mato Grosso do Sul"),
    opt("MG", "Minas Gerais"),
    opt("PA", "Pará"),
    opt("PB", "Paraíba"),
    opt("PR", "Paraná"),
    opt("PE", "Pernambuco"),
    opt("PI", "Piauí"),
    opt("RJ", "Rio de Janeiro"),
    opt("RN", "Rio Grande do Norte"),
    opt("RS", "Rio Grande do Sul"),
    opt("RO", "Rondônia"),
    opt("RR", "Roraima"),
    opt("SC", "Santa Catarina"),
    opt("SP", "São Paulo"),
    opt("SE", "Sergipe"),
    opt("TO", "Tocantins"),
];

const PRODUCTS: &[ValueOption] = &[
    opt("Consórcio", "Consórcio"),
    opt("Seguro Residencial", "Seguro Residencial"),
    opt("Seguro Auto", "Seguro Auto"),
    opt("Previdência", "Previdência"),
    opt("Conta Corrente", "Conta Corrente"),
    opt("Cartão de Crédito", "Cartão de Crédito"),
];

impl ValueDomain {
    pub fn options(&self) -> &'static [ValueOption] {
        match self {
            ValueDomain::ProfileSegment => PROFILE_SEGMENTS,
            ValueDomain::Region => REGIONS,
            ValueDomain::Product => PRODUCTS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeDefinition {
    pub key: String,
    pub display_label: String,
    pub domain: ValueDomain,
}

/// Sidebar section an attribute checkbox is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeCategory {
    Registration,
    Product,
    Relationship,
    Engagement,
}

impl AttributeCategory {
    pub fn label(&self) -> &'static str {
        match self {
            AttributeCategory::Registration => "Campos de cadastro",
            AttributeCategory::Product => "Campos de Produto",
            AttributeCategory::Relationship => "Campos de relacionamento",
            AttributeCategory::Engagement => "Campos de engajamento",
        }
    }
}

/// A sidebar checkbox. Several checkboxes may map to the same attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeCheckbox {
    pub key: String,
    pub label: String,
    pub category: AttributeCategory,
    pub attribute: String,
}

#[derive(Debug, Clone)]
pub struct AttributeCatalog {
    attributes: Vec<AttributeDefinition>,
    checkboxes: Vec<AttributeCheckbox>,
}

impl AttributeCatalog {
    pub fn new(attributes: Vec<AttributeDefinition>, checkboxes: Vec<AttributeCheckbox>) -> Self {
        Self {
            attributes,
            checkboxes,
        }
    }

    pub fn attributes(&self) -> &[AttributeDefinition] {
        &self.attributes
    }

    pub fn get(&self, key: &str) -> Option<&AttributeDefinition> {
        self.attributes.iter().find(|a| a.key == key)
    }

    /// Options for the value dropdown of `key`; empty for attributes without
    /// a domain.
    pub fn value_options(&self, key: &str) -> &'static [ValueOption] {
        self.get(key).map(|a| a.domain.options()).unwrap_or(&[])
    }

    pub fn is_known_value(&self, key: &str, value: &str) -> bool {
        self.value_options(key).iter().any(|o| o.value == value)
    }

    pub fn checkboxes(&self) -> &[AttributeCheckbox] {
        &self.checkboxes
    }

    pub fn checkbox(&self, key: &str) -> Option<&AttributeCheckbox> {
        self.checkboxes.iter().find(|c| c.key == key)
    }
}

fn attribute(key: &str, domain: ValueDomain) -> AttributeDefinition {
    AttributeDefinition {
        key: key.to_string(),
        display_label: key.to_string(),
        domain,
    }
}

fn checkbox(key: &str, label: &str, category: AttributeCategory, attribute: &str) -> AttributeCheckbox {
    AttributeCheckbox {
        key: key.to_string(),
        label: label.to_string(),
        category,
        attribute: attribute.to_string(),
    }
}

impl Default for AttributeCatalog {
    fn default() -> Self {
        use AttributeCategory::*;
        Self::new(
            vec![
                attribute(PROFILE_SEGMENT_KEY, ValueDomain::ProfileSegment),
                attribute(REGION_KEY, ValueDomain::Region),
                attribute(PRODUCT_KEY, ValueDomain::Product),
            ],
            vec![
                checkbox("nome", "Nome", Registration, "Nome"),
                checkbox("email", "E-mail", Registration, "E-mail"),
                checkbox("telefone", "Telefone", Registration, "Telefone"),
                checkbox("estado", "Estado", Registration, REGION_KEY),
                checkbox("consorcio", "Consórcio", Product, PRODUCT_KEY),
                checkbox("seguroResidencial", "Seguro residencial", Product, PRODUCT_KEY),
                checkbox("perfilSegmento", "Perfil_Segmento", Relationship, PROFILE_SEGMENT_KEY),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_attributes_and_domains() {
        let catalog = AttributeCatalog::default();
        let keys: Vec<&str> = catalog.attributes().iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, vec!["Perfil_segmento", "Estado", "Produto"]);

        assert_eq!(catalog.value_options(PROFILE_SEGMENT_KEY).len(), 3);
        assert_eq!(catalog.value_options(REGION_KEY).len(), 27);
        assert_eq!(catalog.value_options(PRODUCT_KEY).len(), 6);
    }

    #[test]
    fn test_unknown_attribute_has_no_options() {
        let catalog = AttributeCatalog::default();
        assert!(catalog.get("Nome").is_none());
        assert!(catalog.value_options("Nome").is_empty());
        assert!(!catalog.is_known_value("Nome", "x"));
    }

    #[test]
    fn test_region_labels() {
        let catalog = AttributeCatalog::default();
        let pr = catalog
            .value_options(REGION_KEY)
            .iter()
            .find(|o| o.value == "PR")
            .unwrap();
        assert_eq!(pr.label, "Paraná");
        assert!(catalog.is_known_value(REGION_KEY, "SP"));
        assert!(!catalog.is_known_value(REGION_KEY, "XX"));
    }

    #[test]
    fn test_product_checkboxes_share_attribute() {
        let catalog = AttributeCatalog::default();
        let consorcio = catalog.checkbox("consorcio").unwrap();
        let seguro = catalog.checkbox("seguroResidencial").unwrap();
        assert_eq!(consorcio.attribute, PRODUCT_KEY);
        assert_eq!(seguro.attribute, PRODUCT_KEY);
        assert_eq!(consorcio.category, AttributeCategory::Product);
        assert!(catalog.checkbox("missing").is_none());
    }
}
