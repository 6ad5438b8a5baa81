//! Shipping address and ubigeo types.
//!
//! Ubigeo is Peru's geographic coding for department/province/district;
//! addresses reference a district by its ubigeo code.

use serde::{Deserialize, Serialize};

use huellitas_core::AddressId;

/// A user's shipping address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    /// Absent until the address has been saved.
    #[serde(default)]
    pub id: Option<AddressId>,
    pub zone: String,
    /// Street type (avenue, street, passage).
    pub street_type: String,
    pub street_name: String,
    pub number: String,
    pub postal_code: String,
    /// Free-text landmark reference for the courier.
    pub reference: String,
    pub ubigeo_code: String,
    /// Resolved ubigeo record, when the backend embeds it.
    #[serde(default)]
    pub ubigeo: Option<Ubigeo>,
}

/// A ubigeo record (district-level geographic code).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ubigeo {
    pub code: String,
    pub department: String,
    pub province: String,
    pub district: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_address_deserializes_without_id_or_ubigeo() {
        let json = r#"{
            "zone": "Urb. Santa Patricia",
            "street_type": "avenue",
            "street_name": "La Molina",
            "number": "1234",
            "postal_code": "15024",
            "reference": "Front of the park",
            "ubigeo_code": "140101"
        }"#;
        let address: Address = serde_json::from_str(json).unwrap();
        assert!(address.id.is_none());
        assert!(address.ubigeo.is_none());
        assert_eq!(address.ubigeo_code, "140101");
    }
}
