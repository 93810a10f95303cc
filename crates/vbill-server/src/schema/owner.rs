//! Owner label and enrollment request/response types.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct OwnerResponse {
    pub owner_label: String,
    /// Whether the current owner has completed voice enrollment.
    pub enrolled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetOwnerRequest {
    pub owner_label: String,
}

/// Sets the enrollment flag of the current owner.
#[derive(Debug, Clone, Deserialize)]
pub struct SetEnrollmentRequest {
    pub enrolled: bool,
}
