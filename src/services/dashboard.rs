//! Dashboard aggregation

use serde::Serialize;
use utoipa::ToSchema;

use super::{atendimentos::AtendimentosService, clientes::ClientesService};
use crate::{
    error::AppResult,
    models::{AtendimentoComCliente, AtendimentoStatus},
};

/// Number of appointments in the recent-activity feed
pub const RECENT_LIMIT: i64 = 5;

/// Dashboard counters and recent activity
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_clientes: i64,
    pub total_atendimentos: i64,
    pub atendimentos_pendentes: i64,
    pub atendimentos_recentes: Vec<AtendimentoComCliente>,
}

#[derive(Clone)]
pub struct DashboardService {
    clientes: ClientesService,
    atendimentos: AtendimentosService,
}

impl DashboardService {
    pub fn new(clientes: ClientesService, atendimentos: AtendimentosService) -> Self {
        Self { clientes, atendimentos }
    }

    /// Four independent reads; they are not taken from a single snapshot
    pub async fn summary(&self) -> AppResult<DashboardSummary> {
        let (total_clientes, total_atendimentos, atendimentos_pendentes, atendimentos_recentes) = tokio::try_join!(
            self.clientes.count(),
            self.atendimentos.count(),
            self.atendimentos.count_by_status(AtendimentoStatus::Pendente),
            self.atendimentos.recent(RECENT_LIMIT),
        )?;

        Ok(DashboardSummary {
            total_clientes,
            total_atendimentos,
            atendimentos_pendentes,
            atendimentos_recentes,
        })
    }
}
