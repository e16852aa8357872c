use thiserror::Error;

use crate::domain::agent::AgentId;
use crate::domain::customer::CustomerId;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown {kind} `{value}`")]
    UnknownVariant { kind: &'static str, value: String },
}

/// Failure reported by a capability provider for a single action.
///
/// The `Display` text is what ends up after `Error: ` in rendered answers,
/// so the wording of the user-facing variants is part of the contract.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Unknown action: {0}")]
    UnknownAction(String),
    #[error("Missing parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("Customer {0} not found")]
    CustomerNotFound(CustomerId),
    #[error("Failed to update customer {0}")]
    UpdateRejected(CustomerId),
    #[error("Failed to create ticket for customer {0}")]
    TicketRejected(CustomerId),
    #[error("No provider registered for {0}")]
    Unavailable(AgentId),
    #[error("Storage failure: {0}")]
    Storage(String),
    #[error("Malformed payload: {0}")]
    Encoding(String),
}

impl ProviderError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter { name, reason: reason.into() }
    }

    pub fn error_class(&self) -> &'static str {
        match self {
            Self::UnknownAction(_) => "unknown_action",
            Self::MissingParameter(_) | Self::InvalidParameter { .. } => "bad_request",
            Self::CustomerNotFound(_) => "not_found",
            Self::UpdateRejected(_) | Self::TicketRejected(_) => "rejected",
            Self::Unavailable(_) => "unavailable",
            Self::Storage(_) => "storage",
            Self::Encoding(_) => "encoding",
        }
    }
}

impl From<DomainError> for ProviderError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::UnknownVariant { kind, value } => Self::InvalidParameter {
                name: kind,
                reason: format!("unsupported value `{value}`"),
            },
        }
    }
}
