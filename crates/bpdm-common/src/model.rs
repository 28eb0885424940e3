//! Business-partner payload types shared between the Gate and Pool APIs.

use serde::{Deserialize, Serialize};

/// The three business-partner record types (LSA = legal entity / site / address).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartnerType {
    LegalEntity,
    Site,
    Address,
}

impl std::fmt::Display for PartnerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LegalEntity => write!(f, "LegalEntity"),
            Self::Site => write!(f, "Site"),
            Self::Address => write!(f, "Address"),
        }
    }
}

/// Legal-entity payload as submitted by a data provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalEntityDto {
    /// Registered legal name.
    pub legal_name: String,

    /// Abbreviated legal name, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_short_name: Option<String>,

    /// Legal form code (e.g. "GMBH", "LLC").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_form: Option<String>,
}

/// Site payload (a physical location belonging to a legal entity).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteDto {
    /// Site name.
    pub name: String,
}

/// Address payload (belongs to a legal entity or a site).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressDto {
    /// City name.
    pub city: String,

    /// ISO 3166-1 alpha-2 country code.
    pub country: String,

    /// Street name and number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,

    /// Postal code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partner_type_display() {
        assert_eq!(PartnerType::LegalEntity.to_string(), "LegalEntity");
        assert_eq!(PartnerType::Site.to_string(), "Site");
        assert_eq!(PartnerType::Address.to_string(), "Address");
    }

    #[test]
    fn test_legal_entity_wire_format() {
        let dto = LegalEntityDto {
            legal_name: "Acme Corporation".to_string(),
            legal_short_name: Some("Acme".to_string()),
            legal_form: None,
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["legalName"], "Acme Corporation");
        assert_eq!(json["legalShortName"], "Acme");
        assert!(json.get("legalForm").is_none());
    }
}
