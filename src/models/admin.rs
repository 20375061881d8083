//! Administrator model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Administrator account, identified by its badge number (`matricula`)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Admin {
    pub id: uuid::Uuid,
    /// Badge number used to log in
    pub matricula: String,
    /// Display name
    pub nome: String,
    /// Argon2 PHC string, never sent to clients
    #[serde(skip_serializing, default)]
    pub senha_hash: String,
    pub created_at: DateTime<Utc>,
}
