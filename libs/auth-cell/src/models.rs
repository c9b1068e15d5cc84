use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One row of an identity store: an admin, doctor or patient account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub id: Uuid,
    /// Username for admins, email for doctors and patients.
    pub identifier: String,
    #[serde(default, skip_serializing)]
    pub password_hash: String,
}
