use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Child {
    pub id: Uuid,
    pub parent_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub school_level: String,
    pub created_at: NaiveDateTime,
}
