//! Data models for KALM

pub mod admin;
pub mod atendimento;
pub mod cliente;

// Re-export commonly used types
pub use admin::Admin;
pub use atendimento::{Atendimento, AtendimentoComCliente, AtendimentoInput, AtendimentoStatus, NewAtendimento};
pub use cliente::{Cliente, ClienteInput, ClienteOption, DeletePolicy, NewCliente};

use crate::error::AppError;

/// Trim a submitted form value, treating blank strings as absent
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Collects per-field problems of a submitted form so they can be reported at once
#[derive(Debug, Default)]
pub(crate) struct FieldErrors {
    missing: Vec<&'static str>,
    invalid: Vec<String>,
}

impl FieldErrors {
    pub fn missing(&mut self, field: &'static str) {
        self.missing.push(field);
    }

    pub fn invalid(&mut self, field: &'static str, reason: &str) {
        self.invalid.push(format!("{} ({})", field, reason));
    }

    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.invalid.is_empty()
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        let mut parts = Vec::new();
        if !errors.missing.is_empty() {
            parts.push(format!("Missing required fields: {}", errors.missing.join(", ")));
        }
        if !errors.invalid.is_empty() {
            parts.push(format!("Invalid fields: {}", errors.invalid.join(", ")));
        }
        AppError::Validation(parts.join("; "))
    }
}
