//! Business logic services

pub mod atendimentos;
pub mod auth;
pub mod clientes;
pub mod dashboard;
pub mod redis;
pub mod report;
pub mod sessions;

use std::sync::Arc;

use crate::{
    config::AppConfig,
    repository::{AdminStore, AtendimentoStore, ClienteStore, Repository},
};
use sessions::SessionStore;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub sessions: sessions::SessionService,
    pub clientes: clientes::ClientesService,
    pub atendimentos: atendimentos::AtendimentosService,
    pub dashboard: dashboard::DashboardService,
}

impl Services {
    /// Create all services on top of the Postgres repository
    pub fn new(repository: Repository, config: &AppConfig, session_store: Arc<dyn SessionStore>) -> Self {
        Self::from_stores(
            Arc::new(repository.admins),
            Arc::new(repository.clientes),
            Arc::new(repository.atendimentos),
            session_store,
            config,
        )
    }

    /// Create all services from arbitrary store implementations
    pub fn from_stores(
        admins: Arc<dyn AdminStore>,
        clientes: Arc<dyn ClienteStore>,
        atendimentos: Arc<dyn AtendimentoStore>,
        session_store: Arc<dyn SessionStore>,
        config: &AppConfig,
    ) -> Self {
        let clientes = clientes::ClientesService::new(clientes, config.clients.delete_policy);
        let atendimentos = atendimentos::AtendimentosService::new(atendimentos);

        Self {
            auth: auth::AuthService::new(admins),
            sessions: sessions::SessionService::new(session_store, config.session_max_age()),
            dashboard: dashboard::DashboardService::new(clientes.clone(), atendimentos.clone()),
            clientes,
            atendimentos,
        }
    }
}
