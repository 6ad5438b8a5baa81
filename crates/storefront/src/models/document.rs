//! Identity document types.
//!
//! Registration asks for a national identity document; DNI and RUC numbers
//! can be resolved against the national registry through the backend.

use serde::{Deserialize, Serialize};

use huellitas_core::DocumentTypeId;

/// An identity document type (DNI, RUC, passport, immigration card).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentType {
    pub id: DocumentTypeId,
    pub name: String,
}

/// Person data resolved from a DNI or RUC lookup.
///
/// Used to prefill the registration form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentLookup {
    pub document_number: String,
    pub given_name: String,
    pub paternal_surname: String,
    pub maternal_surname: String,
    pub full_name: String,
}
