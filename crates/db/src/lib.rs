pub mod connection;
pub mod fixtures;
pub mod migrations;
pub mod repositories;

pub use connection::{connect, connect_in_memory, connect_with_settings, DbPool};
pub use fixtures::{SeedResult, SupportSeedDataset, VerificationResult};
pub use repositories::{
    CustomerRepository, InMemoryCustomerDirectory, RepositoryError, SqlCustomerRepository,
    SqlTicketRepository, TicketRepository,
};
