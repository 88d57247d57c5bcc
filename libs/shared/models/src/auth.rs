use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const ROLE_CUSTOMER: &str = "customer";
pub const ROLE_STAFF: &str = "staff";
pub const ROLE_ADMIN: &str = "admin";

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub exp: Option<u64>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub iat: Option<u64>,
}

/// Authenticated identity extracted from a verified token. The booking core
/// trusts this pair of (id, role) and never re-derives it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub role: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some(ROLE_ADMIN)
    }

    pub fn is_staff(&self) -> bool {
        self.role.as_deref() == Some(ROLE_STAFF)
    }

    pub fn is_customer(&self) -> bool {
        self.role.as_deref() == Some(ROLE_CUSTOMER)
    }
}
