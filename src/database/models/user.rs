use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Profile of the authenticated principal, owned by the identity provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub email_verified: bool,
}
