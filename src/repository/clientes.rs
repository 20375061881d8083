//! Clients repository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::ClienteStore;
use crate::{
    error::{AppError, AppResult},
    models::{Cliente, ClienteOption, DeletePolicy, NewCliente},
};

#[derive(Clone)]
pub struct ClientesRepository {
    pool: Pool<Postgres>,
}

impl ClientesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClienteStore for ClientesRepository {
    async fn list(&self) -> AppResult<Vec<Cliente>> {
        let rows = sqlx::query_as::<_, Cliente>("SELECT * FROM clientes ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn options(&self) -> AppResult<Vec<ClienteOption>> {
        let rows = sqlx::query_as::<_, ClienteOption>("SELECT id, nome FROM clientes ORDER BY nome ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<Cliente>> {
        let row = sqlx::query_as::<_, Cliente>("SELECT * FROM clientes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create(&self, data: &NewCliente) -> AppResult<Cliente> {
        let row = sqlx::query_as::<_, Cliente>(
            r#"
            INSERT INTO clientes (nome, telefone, email, endereco, observacoes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&data.nome)
        .bind(&data.telefone)
        .bind(&data.email)
        .bind(&data.endereco)
        .bind(&data.observacoes)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, data: &NewCliente) -> AppResult<Option<Cliente>> {
        let row = sqlx::query_as::<_, Cliente>(
            r#"
            UPDATE clientes
            SET nome = $1, telefone = $2, email = $3, endereco = $4, observacoes = $5, updated_at = $6
            WHERE id = $7
            RETURNING *
            "#,
        )
        .bind(&data.nome)
        .bind(&data.telefone)
        .bind(&data.email)
        .bind(&data.endereco)
        .bind(&data.observacoes)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid, policy: DeletePolicy) -> AppResult<u64> {
        let mut tx = self.pool.begin().await?;

        // Inserts referencing this client wait on the row lock until the policy is applied
        sqlx::query("SELECT 1 FROM clientes WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        match policy {
            DeletePolicy::Detach => {
                sqlx::query("UPDATE atendimentos SET cliente_id = NULL, updated_at = $1 WHERE cliente_id = $2")
                    .bind(Utc::now())
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
            }
            DeletePolicy::Block => {
                let referencing: i64 =
                    sqlx::query_scalar("SELECT COUNT(*) FROM atendimentos WHERE cliente_id = $1")
                        .bind(id)
                        .fetch_one(&mut *tx)
                        .await?;
                if referencing > 0 {
                    return Err(AppError::Conflict(format!(
                        "Client {} still has {} appointment(s)",
                        id, referencing
                    )));
                }
            }
            DeletePolicy::Cascade => {
                sqlx::query("DELETE FROM atendimentos WHERE cliente_id = $1")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        let result = sqlx::query("DELETE FROM clientes WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected())
    }

    async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clientes")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
