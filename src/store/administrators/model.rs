use crate::store::AccountStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Administrator {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    pub status: AccountStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing)]
    pub password_hash: Option<String>,
}
