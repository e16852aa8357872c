use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use concierge_core::domain::customer::{Customer, CustomerId, CustomerStatus, CustomerUpdate};
use concierge_core::domain::ticket::{NewTicket, Ticket, TicketPriority, TicketStatus};

pub mod customer;
pub mod memory;
pub mod ticket;

pub use customer::SqlCustomerRepository;
pub use memory::InMemoryCustomerDirectory;
pub use ticket::SqlTicketRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError>;

    /// Customers ordered by id, optionally filtered by status.
    async fn list(
        &self,
        status: Option<CustomerStatus>,
        limit: u32,
    ) -> Result<Vec<Customer>, RepositoryError>;

    /// Applies `update` and returns the refreshed record, or `None` when no
    /// customer with `id` exists.
    async fn update(
        &self,
        id: CustomerId,
        update: &CustomerUpdate,
    ) -> Result<Option<Customer>, RepositoryError>;
}

#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// All tickets for a customer, newest first.
    async fn history_for_customer(&self, id: CustomerId) -> Result<Vec<Ticket>, RepositoryError>;

    /// Opens a ticket. Returns `None` when the customer does not exist.
    async fn create(&self, ticket: NewTicket) -> Result<Option<Ticket>, RepositoryError>;

    async fn list_by_priority(
        &self,
        priority: TicketPriority,
    ) -> Result<Vec<Ticket>, RepositoryError>;

    async fn list_by_status(&self, status: TicketStatus) -> Result<Vec<Ticket>, RepositoryError>;
}

pub(crate) fn parse_timestamp(column: &str, raw: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Decode(format!("{column}: {e}")))
}
