//! Administrator credential checks

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::{
    error::{AppError, AppResult},
    models::Admin,
    repository::AdminStore,
};

#[derive(Clone)]
pub struct AuthService {
    admins: Arc<dyn AdminStore>,
}

impl AuthService {
    pub fn new(admins: Arc<dyn AdminStore>) -> Self {
        Self { admins }
    }

    /// Check a badge number and password.
    ///
    /// Unknown badge, wrong password and store failures all come back as
    /// `None`, so callers cannot tell them apart.
    pub async fn verify_admin(&self, matricula: &str, senha: &str) -> Option<Admin> {
        let admin = match self.admins.find_by_matricula(matricula).await {
            Ok(Some(admin)) => admin,
            Ok(None) => {
                tracing::warn!(matricula, "Login attempt for unknown badge");
                return None;
            }
            Err(e) => {
                tracing::error!(matricula, "Admin lookup failed during login: {}", e);
                return None;
            }
        };

        if Self::verify_password(&admin.senha_hash, senha) {
            Some(admin)
        } else {
            tracing::warn!(matricula, "Login attempt with wrong password");
            None
        }
    }

    /// Reload the administrator behind a session, without a password check
    pub async fn get_logged_admin(&self, matricula: &str) -> Option<Admin> {
        match self.admins.find_by_matricula(matricula).await {
            Ok(admin) => admin,
            Err(e) => {
                tracing::error!(matricula, "Admin lookup failed for session: {}", e);
                None
            }
        }
    }

    /// Create or reset an administrator account
    pub async fn provision_admin(&self, matricula: &str, nome: &str, senha: &str) -> AppResult<Admin> {
        let matricula = matricula.trim();
        if matricula.is_empty() || senha.is_empty() {
            return Err(AppError::Validation(
                "Missing required fields: matricula, senha".to_string(),
            ));
        }
        let hash = Self::hash_password(senha)?;
        self.admins.upsert(matricula, nome.trim(), &hash).await
    }

    /// Verify a password against a stored Argon2 hash
    fn verify_password(hash: &str, password: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => {
                tracing::error!("Stored password hash is not a valid PHC string");
                false
            }
        }
    }

    /// Hash a password using Argon2
    pub fn hash_password(password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}
