//! Client record service

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Cliente, ClienteInput, ClienteOption, DeletePolicy},
    repository::ClienteStore,
};

#[derive(Clone)]
pub struct ClientesService {
    store: Arc<dyn ClienteStore>,
    delete_policy: DeletePolicy,
}

impl ClientesService {
    pub fn new(store: Arc<dyn ClienteStore>, delete_policy: DeletePolicy) -> Self {
        Self { store, delete_policy }
    }

    pub async fn list(&self) -> AppResult<Vec<Cliente>> {
        self.store.list().await
    }

    pub async fn options(&self) -> AppResult<Vec<ClienteOption>> {
        self.store.options().await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Cliente> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Client {} not found", id)))
    }

    pub async fn create(&self, input: ClienteInput) -> AppResult<Cliente> {
        let data = input.validate()?;
        let cliente = self.store.create(&data).await?;
        tracing::info!(cliente_id = %cliente.id, "Client created");
        Ok(cliente)
    }

    pub async fn update(&self, id: Uuid, input: ClienteInput) -> AppResult<Cliente> {
        let data = input.validate()?;
        let cliente = self
            .store
            .update(id, &data)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Client {} not found", id)))?;
        tracing::info!(cliente_id = %id, "Client updated");
        Ok(cliente)
    }

    /// Delete a client. Deleting an id that does not exist succeeds.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let removed = self.store.delete(id, self.delete_policy).await?;
        if removed == 0 {
            tracing::debug!(cliente_id = %id, "Delete of missing client ignored");
        } else {
            tracing::info!(cliente_id = %id, policy = ?self.delete_policy, "Client deleted");
        }
        Ok(())
    }

    pub async fn count(&self) -> AppResult<i64> {
        self.store.count().await
    }
}
