//! the authenticated caller.

use serde::{Deserialize, Serialize};

/// principal derived from a verified token; lives only for the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    /// user id.
    pub id: i64,
    /// e-mail address.
    pub email: String,
    /// display name.
    pub name: String,
    /// role the privileges were resolved from.
    #[serde(rename = "roleId")]
    pub role_id: i64,
}
