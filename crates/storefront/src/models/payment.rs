//! Payment method types.

use serde::{Deserialize, Serialize};

use huellitas_core::{PaymentMethodId, RecordStatus};

/// A payment method offered at checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: PaymentMethodId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: RecordStatus,
}
