//! Repository layer for database operations
//!
//! Each table has a Postgres repository and a store trait the services
//! depend on, so the services can run against any implementation.

pub mod admins;
pub mod atendimentos;
pub mod clientes;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        Admin, Atendimento, AtendimentoComCliente, AtendimentoStatus, Cliente, ClienteOption,
        DeletePolicy, NewAtendimento, NewCliente,
    },
};

/// Administrator lookups
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminStore: Send + Sync {
    async fn find_by_matricula(&self, matricula: &str) -> AppResult<Option<Admin>>;

    /// Insert an administrator, or replace name and password of an existing badge
    async fn upsert(&self, matricula: &str, nome: &str, senha_hash: &str) -> AppResult<Admin>;
}

/// Client persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClienteStore: Send + Sync {
    /// All clients, newest first
    async fn list(&self) -> AppResult<Vec<Cliente>>;

    /// Id/name pairs ordered by name
    async fn options(&self) -> AppResult<Vec<ClienteOption>>;

    async fn get(&self, id: Uuid) -> AppResult<Option<Cliente>>;

    async fn create(&self, data: &NewCliente) -> AppResult<Cliente>;

    /// `None` when no client has this id
    async fn update(&self, id: Uuid, data: &NewCliente) -> AppResult<Option<Cliente>>;

    /// Delete a client, applying `policy` to its appointments. Returns the number of clients removed.
    async fn delete(&self, id: Uuid, policy: DeletePolicy) -> AppResult<u64>;

    async fn count(&self) -> AppResult<i64>;
}

/// Appointment persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AtendimentoStore: Send + Sync {
    /// Appointments joined with their client, latest schedule first
    async fn list_with_clientes(&self, limit: Option<i64>) -> AppResult<Vec<AtendimentoComCliente>>;

    async fn get(&self, id: Uuid) -> AppResult<Option<AtendimentoComCliente>>;

    async fn create(&self, data: &NewAtendimento) -> AppResult<Atendimento>;

    /// `None` when no appointment has this id
    async fn update(&self, id: Uuid, data: &NewAtendimento) -> AppResult<Option<Atendimento>>;

    /// Returns the number of rows removed
    async fn delete(&self, id: Uuid) -> AppResult<u64>;

    /// Count appointments, optionally restricted to one status
    async fn count(&self, status: Option<AtendimentoStatus>) -> AppResult<i64>;
}

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub admins: admins::AdminsRepository,
    pub clientes: clientes::ClientesRepository,
    pub atendimentos: atendimentos::AtendimentosRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            admins: admins::AdminsRepository::new(pool.clone()),
            clientes: clientes::ClientesRepository::new(pool.clone()),
            atendimentos: atendimentos::AtendimentosRepository::new(pool.clone()),
            pool,
        }
    }
}
