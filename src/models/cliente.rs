//! Client (`cliente`) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{non_blank, FieldErrors};
use crate::error::AppResult;

/// Client record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Cliente {
    pub id: Uuid,
    pub nome: String,
    pub telefone: Option<String>,
    pub email: Option<String>,
    pub endereco: Option<String>,
    pub observacoes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Minimal client reference, used by pickers and appointment joins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ClienteOption {
    pub id: Uuid,
    pub nome: String,
}

/// Create / update client request.
///
/// Every field is optional at the wire level so that a missing name is
/// reported as a validation error instead of a body rejection.
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct ClienteInput {
    pub nome: Option<String>,
    pub telefone: Option<String>,
    pub email: Option<String>,
    pub endereco: Option<String>,
    pub observacoes: Option<String>,
}

/// Validated client fields, ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct NewCliente {
    pub nome: String,
    pub telefone: Option<String>,
    pub email: Option<String>,
    pub endereco: Option<String>,
    pub observacoes: Option<String>,
}

impl ClienteInput {
    pub fn validate(self) -> AppResult<NewCliente> {
        let mut errors = FieldErrors::default();

        let nome = non_blank(self.nome);
        if nome.is_none() {
            errors.missing("nome");
        }

        match nome {
            Some(nome) if errors.is_empty() => Ok(NewCliente {
                nome,
                telefone: non_blank(self.telefone),
                email: non_blank(self.email),
                endereco: non_blank(self.endereco),
                observacoes: non_blank(self.observacoes),
            }),
            _ => Err(errors.into()),
        }
    }
}

/// What deleting a client does to the appointments that reference it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeletePolicy {
    /// Keep the appointments and clear their client reference
    Detach,
    /// Refuse to delete a client that still has appointments
    Block,
    /// Delete the appointments together with the client
    Cascade,
}
