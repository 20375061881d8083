//! Appointment record service

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Atendimento, AtendimentoComCliente, AtendimentoInput, AtendimentoStatus},
    repository::AtendimentoStore,
};

#[derive(Clone)]
pub struct AtendimentosService {
    store: Arc<dyn AtendimentoStore>,
}

impl AtendimentosService {
    pub fn new(store: Arc<dyn AtendimentoStore>) -> Self {
        Self { store }
    }

    /// All appointments, latest schedule first, each with its client's id and name
    pub async fn list_with_client_names(&self) -> AppResult<Vec<AtendimentoComCliente>> {
        self.store.list_with_clientes(None).await
    }

    /// The `limit` most recently scheduled appointments
    pub async fn recent(&self, limit: i64) -> AppResult<Vec<AtendimentoComCliente>> {
        self.store.list_with_clientes(Some(limit)).await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<AtendimentoComCliente> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Appointment {} not found", id)))
    }

    pub async fn create(&self, input: AtendimentoInput) -> AppResult<Atendimento> {
        let data = input.validate()?;
        let atendimento = self.store.create(&data).await.map_err(unknown_client)?;
        tracing::info!(atendimento_id = %atendimento.id, cliente_id = %data.cliente_id, "Appointment created");
        Ok(atendimento)
    }

    pub async fn update(&self, id: Uuid, input: AtendimentoInput) -> AppResult<Atendimento> {
        let data = input.validate()?;
        let atendimento = self
            .store
            .update(id, &data)
            .await
            .map_err(unknown_client)?
            .ok_or_else(|| AppError::NotFound(format!("Appointment {} not found", id)))?;
        tracing::info!(atendimento_id = %id, "Appointment updated");
        Ok(atendimento)
    }

    /// Delete an appointment. Deleting an id that does not exist succeeds.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let removed = self.store.delete(id).await?;
        if removed > 0 {
            tracing::info!(atendimento_id = %id, "Appointment deleted");
        }
        Ok(())
    }

    pub async fn count(&self) -> AppResult<i64> {
        self.store.count(None).await
    }

    pub async fn count_by_status(&self, status: AtendimentoStatus) -> AppResult<i64> {
        self.store.count(Some(status)).await
    }
}

/// The only foreign key of an appointment is its client
fn unknown_client(err: AppError) -> AppError {
    match err {
        AppError::Conflict(_) => AppError::Conflict("Client referenced by cliente_id does not exist".to_string()),
        other => other,
    }
}
