pub mod config;
pub mod domain;
pub mod errors;
pub mod trace;

pub use domain::agent::{AgentId, Capability};
pub use domain::customer::{Customer, CustomerId, CustomerStatus, CustomerUpdate};
pub use domain::support::{CustomerContext, SupportAssessment, SupportIntent};
pub use domain::ticket::{NewTicket, Ticket, TicketId, TicketPriority, TicketStatus};
pub use errors::{DomainError, ProviderError};
pub use trace::{CoordinationTrace, CoordinationTraceEntry};
