//! Appointment (`atendimento`) model

use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{non_blank, ClienteOption, FieldErrors};
use crate::error::AppResult;

/// Appointment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AtendimentoStatus {
    Pendente,
    EmAndamento,
    Concluido,
    Cancelado,
}

impl AtendimentoStatus {
    pub const ALL: [AtendimentoStatus; 4] = [
        AtendimentoStatus::Pendente,
        AtendimentoStatus::EmAndamento,
        AtendimentoStatus::Concluido,
        AtendimentoStatus::Cancelado,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AtendimentoStatus::Pendente => "pendente",
            AtendimentoStatus::EmAndamento => "em_andamento",
            AtendimentoStatus::Concluido => "concluido",
            AtendimentoStatus::Cancelado => "cancelado",
        }
    }

    /// Human label used in listings and reports
    pub fn label(&self) -> &'static str {
        match self {
            AtendimentoStatus::Pendente => "Pendente",
            AtendimentoStatus::EmAndamento => "Em Andamento",
            AtendimentoStatus::Concluido => "Concluido",
            AtendimentoStatus::Cancelado => "Cancelado",
        }
    }
}

impl std::fmt::Display for AtendimentoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AtendimentoStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AtendimentoStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Invalid appointment status: {}", s))
    }
}

// SQLx conversion for AtendimentoStatus (stored as TEXT)
impl sqlx::Type<Postgres> for AtendimentoStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for AtendimentoStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for AtendimentoStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

/// Appointment record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Atendimento {
    pub id: Uuid,
    /// Owning client; null once the client was deleted under the detach policy
    pub cliente_id: Option<Uuid>,
    /// Scheduled local date and time
    pub data_atendimento: NaiveDateTime,
    pub tipo: String,
    pub descricao: Option<String>,
    pub status: AtendimentoStatus,
    #[serde(with = "rust_decimal::serde::float_option", default)]
    pub valor: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Appointment joined with its client's id and name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AtendimentoComCliente {
    #[serde(flatten)]
    pub atendimento: Atendimento,
    /// Null when the client no longer exists
    pub clientes: Option<ClienteOption>,
}

/// Flat row shape of the appointment/client LEFT JOIN
#[derive(Debug, FromRow)]
pub(crate) struct AtendimentoJoinRow {
    #[sqlx(flatten)]
    pub atendimento: Atendimento,
    pub cliente_nome: Option<String>,
}

impl From<AtendimentoJoinRow> for AtendimentoComCliente {
    fn from(row: AtendimentoJoinRow) -> Self {
        let clientes = row
            .atendimento
            .cliente_id
            .zip(row.cliente_nome)
            .map(|(id, nome)| ClienteOption { id, nome });
        Self {
            atendimento: row.atendimento,
            clientes,
        }
    }
}

/// Create / update appointment request, as submitted by the dashboard form
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct AtendimentoInput {
    pub cliente_id: Option<String>,
    /// `YYYY-MM-DDTHH:MM`, optionally with seconds, or RFC 3339
    pub data_atendimento: Option<String>,
    pub tipo: Option<String>,
    pub descricao: Option<String>,
    /// One of `pendente`, `em_andamento`, `concluido`, `cancelado`
    pub status: Option<String>,
    /// Number or numeric string; blank or null means no value
    #[schema(value_type = Option<f64>)]
    pub valor: Option<Value>,
}

/// Validated appointment fields, ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct NewAtendimento {
    pub cliente_id: Uuid,
    pub data_atendimento: NaiveDateTime,
    pub tipo: String,
    pub descricao: Option<String>,
    pub status: AtendimentoStatus,
    pub valor: Option<Decimal>,
}

impl AtendimentoInput {
    pub fn validate(self) -> AppResult<NewAtendimento> {
        let mut errors = FieldErrors::default();

        let cliente_id = match non_blank(self.cliente_id) {
            None => {
                errors.missing("cliente_id");
                None
            }
            Some(raw) => match Uuid::parse_str(&raw) {
                Ok(id) => Some(id),
                Err(_) => {
                    errors.invalid("cliente_id", "not a valid identifier");
                    None
                }
            },
        };

        let data_atendimento = match non_blank(self.data_atendimento) {
            None => {
                errors.missing("data_atendimento");
                None
            }
            Some(raw) => {
                let parsed = parse_data_atendimento(&raw);
                if parsed.is_none() {
                    errors.invalid("data_atendimento", "expected YYYY-MM-DDTHH:MM");
                }
                parsed
            }
        };

        let tipo = non_blank(self.tipo);
        if tipo.is_none() {
            errors.missing("tipo");
        }

        let status = match non_blank(self.status) {
            None => {
                errors.missing("status");
                None
            }
            Some(raw) => match raw.parse::<AtendimentoStatus>() {
                Ok(status) => Some(status),
                Err(_) => {
                    errors.invalid("status", "expected pendente, em_andamento, concluido or cancelado");
                    None
                }
            },
        };

        let valor = match parse_valor(self.valor) {
            Ok(valor) => valor,
            Err(reason) => {
                errors.invalid("valor", reason);
                None
            }
        };

        match (cliente_id, data_atendimento, tipo, status) {
            (Some(cliente_id), Some(data_atendimento), Some(tipo), Some(status)) if errors.is_empty() => {
                Ok(NewAtendimento {
                    cliente_id,
                    data_atendimento,
                    tipo,
                    descricao: non_blank(self.descricao),
                    status,
                    valor,
                })
            }
            _ => Err(errors.into()),
        }
    }
}

/// Parse the scheduled time as sent by a datetime-local input or an RFC 3339 client
pub fn parse_data_atendimento(raw: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];

    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.naive_utc())
        })
}

/// Largest value the `NUMERIC(12, 2)` column holds
const MAX_VALOR: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

/// Parse a monetary value; `Ok(None)` when absent or blank
fn parse_valor(raw: Option<Value>) -> Result<Option<Decimal>, &'static str> {
    let parsed = match raw {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            Decimal::from_str(&s.replace(',', ".")).map_err(|_| "must be a number")?
        }
        Some(Value::Number(n)) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .map_err(|_| "must be a number")?
        }
        Some(_) => return Err("must be a number"),
    };

    if parsed.is_sign_negative() && !parsed.is_zero() {
        return Err("must not be negative");
    }
    let rounded = parsed.round_dp(2);
    if rounded > MAX_VALOR {
        return Err("too large");
    }
    Ok(Some(rounded))
}
