//! Administrators repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::AdminStore;
use crate::{error::AppResult, models::Admin};

#[derive(Clone)]
pub struct AdminsRepository {
    pool: Pool<Postgres>,
}

impl AdminsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminStore for AdminsRepository {
    /// Badge numbers are compared exactly
    async fn find_by_matricula(&self, matricula: &str) -> AppResult<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE matricula = $1")
            .bind(matricula)
            .fetch_optional(&self.pool)
            .await?;
        Ok(admin)
    }

    async fn upsert(&self, matricula: &str, nome: &str, senha_hash: &str) -> AppResult<Admin> {
        let admin = sqlx::query_as::<_, Admin>(
            r#"
            INSERT INTO admins (matricula, nome, senha_hash)
            VALUES ($1, $2, $3)
            ON CONFLICT (matricula)
            DO UPDATE SET nome = EXCLUDED.nome, senha_hash = EXCLUDED.senha_hash
            RETURNING *
            "#,
        )
        .bind(matricula)
        .bind(nome)
        .bind(senha_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(admin)
    }
}
