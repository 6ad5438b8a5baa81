//! Request and response payloads for the backend API.

use serde::{Deserialize, Serialize};

use huellitas_core::DocumentTypeId;

use crate::models::document::DocumentLookup;
use crate::models::user::{Person, ProfileField};

/// Login credentials.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login payload: the identity plus the bearer token.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub person: Person,
    pub token: String,
}

/// New-account registration payload.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub document_type_id: DocumentTypeId,
    pub document_number: String,
    pub given_name: String,
    pub paternal_surname: String,
    pub maternal_surname: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub username: String,
    pub password: String,
}

/// Password reset confirmation payload.
#[derive(Debug, Clone, Serialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub token: String,
    pub password: String,
    pub password_confirmation: String,
}

/// Full profile update (PUT): nested person section.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person: Option<UpdatePersonFields>,
}

/// Contact fields of the nested person section.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdatePersonFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_phone: Option<String>,
}

/// Partial profile update (PATCH): flat structure, absent fields untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PartialProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_phone: Option<String>,
}

impl PartialProfileUpdate {
    /// An update touching a single field.
    #[must_use]
    pub fn from_field(field: ProfileField, value: String) -> Self {
        let mut update = Self::default();
        match field {
            ProfileField::Username => update.username = Some(value),
            ProfileField::PersonalEmail => update.personal_email = Some(value),
            ProfileField::SecondaryEmail => update.secondary_email = Some(value),
            ProfileField::PersonalPhone => update.personal_phone = Some(value),
            ProfileField::SecondaryPhone => update.secondary_phone = Some(value),
        }
        update
    }
}

/// Generic acknowledgement from mutation endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Ack {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Laravel-resource style envelope wrapping a list or record in `data`.
#[derive(Debug, Clone, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// Envelope used by profile and address endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(default)]
    pub message: Option<String>,
}

/// Existence check result (username / document already registered).
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Existence {
    pub exists: bool,
}

/// Result of a DNI/RUC registry lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct LookupResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<DocumentLookup>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_update_serializes_only_set_fields() {
        let update = PartialProfileUpdate::from_field(
            ProfileField::PersonalPhone,
            "987654321".to_owned(),
        );
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"personal_phone":"987654321"}"#);
    }

    #[test]
    fn test_register_request_omits_absent_phone() {
        let request = RegisterRequest {
            document_type_id: DocumentTypeId::new(1),
            document_number: "45678912".to_owned(),
            given_name: "Ana".to_owned(),
            paternal_surname: "Torres".to_owned(),
            maternal_surname: "Rojas".to_owned(),
            email: "ana@example.com".to_owned(),
            phone: None,
            username: "atorres".to_owned(),
            password: "hunter2hunter2".to_owned(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("phone").is_none());
        assert_eq!(json["document_type_id"], 1);
    }

    #[test]
    fn test_lookup_response_tolerates_missing_data() {
        let json = r#"{"success": false, "error": "not found"}"#;
        let response: LookupResponse = serde_json::from_str(json).unwrap();
        assert!(!response.success);
        assert!(response.data.is_none());
        assert_eq!(response.error.as_deref(), Some("not found"));
    }
}
