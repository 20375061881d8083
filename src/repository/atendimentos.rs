//! Appointments repository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::AtendimentoStore;
use crate::{
    error::AppResult,
    models::{
        atendimento::AtendimentoJoinRow, Atendimento, AtendimentoComCliente, AtendimentoStatus,
        NewAtendimento,
    },
};

const SELECT_WITH_CLIENTE: &str = r#"
    SELECT a.*, c.nome AS cliente_nome
    FROM atendimentos a
    LEFT JOIN clientes c ON c.id = a.cliente_id
"#;

#[derive(Clone)]
pub struct AtendimentosRepository {
    pool: Pool<Postgres>,
}

impl AtendimentosRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AtendimentoStore for AtendimentosRepository {
    async fn list_with_clientes(&self, limit: Option<i64>) -> AppResult<Vec<AtendimentoComCliente>> {
        let query = format!(
            "{} ORDER BY a.data_atendimento DESC LIMIT $1",
            SELECT_WITH_CLIENTE
        );
        // LIMIT NULL means no limit in Postgres
        let rows = sqlx::query_as::<_, AtendimentoJoinRow>(&query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(AtendimentoComCliente::from).collect())
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<AtendimentoComCliente>> {
        let query = format!("{} WHERE a.id = $1", SELECT_WITH_CLIENTE);
        let row = sqlx::query_as::<_, AtendimentoJoinRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(AtendimentoComCliente::from))
    }

    async fn create(&self, data: &NewAtendimento) -> AppResult<Atendimento> {
        let row = sqlx::query_as::<_, Atendimento>(
            r#"
            INSERT INTO atendimentos (cliente_id, data_atendimento, tipo, descricao, status, valor)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(data.cliente_id)
        .bind(data.data_atendimento)
        .bind(&data.tipo)
        .bind(&data.descricao)
        .bind(data.status)
        .bind(data.valor)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, data: &NewAtendimento) -> AppResult<Option<Atendimento>> {
        let row = sqlx::query_as::<_, Atendimento>(
            r#"
            UPDATE atendimentos
            SET cliente_id = $1, data_atendimento = $2, tipo = $3, descricao = $4,
                status = $5, valor = $6, updated_at = $7
            WHERE id = $8
            RETURNING *
            "#,
        )
        .bind(data.cliente_id)
        .bind(data.data_atendimento)
        .bind(&data.tipo)
        .bind(&data.descricao)
        .bind(data.status)
        .bind(data.valor)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM atendimentos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn count(&self, status: Option<AtendimentoStatus>) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM atendimentos WHERE ($1::text IS NULL OR status = $1)",
        )
        .bind(status.map(|s| s.as_str()))
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
