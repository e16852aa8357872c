use concierge_core::domain::customer::{Customer, CustomerId, CustomerStatus};
use concierge_core::domain::ticket::{Ticket, TicketId, TicketPriority, TicketStatus};

use crate::connection::DbPool;
use crate::repositories::{parse_timestamp, InMemoryCustomerDirectory, RepositoryError};

const SEED_CUSTOMERS: &[SeedCustomer] = &[
    SeedCustomer {
        id: 1,
        name: "John Doe",
        email: "john.doe@example.com",
        phone: "555-0101",
        status: CustomerStatus::Active,
        created_at: "2024-01-02T10:00:00+00:00",
    },
    SeedCustomer {
        id: 2,
        name: "Jane Smith",
        email: "jane.smith@example.com",
        phone: "555-0102",
        status: CustomerStatus::Active,
        created_at: "2024-01-03T11:15:00+00:00",
    },
    SeedCustomer {
        id: 3,
        name: "Bob Johnson",
        email: "bob.johnson@example.com",
        phone: "555-0103",
        status: CustomerStatus::Disabled,
        created_at: "2024-01-04T08:30:00+00:00",
    },
    SeedCustomer {
        id: 4,
        name: "Alice Williams",
        email: "alice.w@techcorp.com",
        phone: "555-0104",
        status: CustomerStatus::Active,
        created_at: "2024-01-05T13:45:00+00:00",
    },
    SeedCustomer {
        id: 5,
        name: "Charlie Brown",
        email: "charlie.brown@email.com",
        phone: "555-0105",
        status: CustomerStatus::Active,
        created_at: "2024-01-06T09:20:00+00:00",
    },
    SeedCustomer {
        id: 6,
        name: "Diana Prince",
        email: "diana.prince@company.org",
        phone: "555-0106",
        status: CustomerStatus::Active,
        created_at: "2024-01-07T16:05:00+00:00",
    },
    SeedCustomer {
        id: 7,
        name: "Edward Norton",
        email: "edward.n@example.com",
        phone: "555-0107",
        status: CustomerStatus::Disabled,
        created_at: "2024-01-08T12:40:00+00:00",
    },
    SeedCustomer {
        id: 8,
        name: "Fiona Green",
        email: "fiona.green@startup.io",
        phone: "555-0108",
        status: CustomerStatus::Active,
        created_at: "2024-01-09T15:10:00+00:00",
    },
];

const SEED_TICKETS: &[SeedTicket] = &[
    SeedTicket {
        id: 1,
        customer_id: 1,
        issue: "Cannot login to account",
        status: TicketStatus::Open,
        priority: TicketPriority::High,
        created_at: "2024-03-01T09:00:00+00:00",
    },
    SeedTicket {
        id: 2,
        customer_id: 1,
        issue: "Request for invoice copy",
        status: TicketStatus::Resolved,
        priority: TicketPriority::Low,
        created_at: "2024-02-10T14:30:00+00:00",
    },
    SeedTicket {
        id: 3,
        customer_id: 2,
        issue: "Billing discrepancy on last statement",
        status: TicketStatus::InProgress,
        priority: TicketPriority::Medium,
        created_at: "2024-03-05T10:20:00+00:00",
    },
    SeedTicket {
        id: 4,
        customer_id: 2,
        issue: "Feature request: dark mode",
        status: TicketStatus::Open,
        priority: TicketPriority::Low,
        created_at: "2024-01-20T16:45:00+00:00",
    },
    SeedTicket {
        id: 5,
        customer_id: 3,
        issue: "Account reactivation request",
        status: TicketStatus::Resolved,
        priority: TicketPriority::Medium,
        created_at: "2024-01-05T11:00:00+00:00",
    },
    SeedTicket {
        id: 6,
        customer_id: 4,
        issue: "Payment failed on renewal",
        status: TicketStatus::Open,
        priority: TicketPriority::High,
        created_at: "2024-03-08T08:15:00+00:00",
    },
    SeedTicket {
        id: 7,
        customer_id: 5,
        issue: "Password reset not received",
        status: TicketStatus::Resolved,
        priority: TicketPriority::Medium,
        created_at: "2024-02-25T17:30:00+00:00",
    },
    SeedTicket {
        id: 8,
        customer_id: 6,
        issue: "Data export timing out",
        status: TicketStatus::Open,
        priority: TicketPriority::Medium,
        created_at: "2024-03-10T13:00:00+00:00",
    },
    SeedTicket {
        id: 9,
        customer_id: 6,
        issue: "API rate limit questions",
        status: TicketStatus::InProgress,
        priority: TicketPriority::Low,
        created_at: "2024-02-28T09:40:00+00:00",
    },
    SeedTicket {
        id: 10,
        customer_id: 8,
        issue: "Suspected unauthorized access",
        status: TicketStatus::Open,
        priority: TicketPriority::High,
        created_at: "2024-03-12T07:55:00+00:00",
    },
];

/// Deterministic customer-support dataset: eight customers (two disabled)
/// and ten tickets spread across every status and priority.
pub struct SupportSeedDataset;

impl SupportSeedDataset {
    pub const SQL: &str = include_str!("../../../config/fixtures/support_seed_data.sql");

    /// Loads (or restores) the dataset. Safe to run repeatedly.
    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let mut tx = pool.begin().await?;
        sqlx::raw_sql(Self::SQL).execute(&mut *tx).await?;
        tx.commit().await?;

        Ok(SeedResult {
            customers_seeded: SEED_CUSTOMERS.len(),
            tickets_seeded: SEED_TICKETS.len(),
        })
    }

    /// Checks every seeded row against its canonical values.
    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let mut checks = Vec::new();

        for customer in SEED_CUSTOMERS {
            let matches: i64 = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM customers
                 WHERE id = ?1 AND name = ?2 AND email = ?3 AND phone = ?4 AND status = ?5)",
            )
            .bind(customer.id)
            .bind(customer.name)
            .bind(customer.email)
            .bind(customer.phone)
            .bind(customer.status.as_str())
            .fetch_one(pool)
            .await?;
            checks.push((customer.name, matches == 1));
        }

        for ticket in SEED_TICKETS {
            let matches: i64 = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM tickets
                 WHERE id = ?1 AND customer_id = ?2 AND issue = ?3
                   AND status = ?4 AND priority = ?5)",
            )
            .bind(ticket.id)
            .bind(ticket.customer_id)
            .bind(ticket.issue)
            .bind(ticket.status.as_str())
            .bind(ticket.priority.as_str())
            .fetch_one(pool)
            .await?;
            checks.push((ticket.issue, matches == 1));
        }

        let all_present = checks.iter().all(|(_, ok)| *ok);
        Ok(VerificationResult { all_present, checks })
    }

    /// Removes the seeded rows, leaving any other data in place.
    pub async fn clean(pool: &DbPool) -> Result<(), RepositoryError> {
        let mut tx = pool.begin().await?;

        let ticket_ids = sql_array_from_ids(SEED_TICKETS.iter().map(|t| t.id));
        let customer_ids = sql_array_from_ids(SEED_CUSTOMERS.iter().map(|c| c.id));

        sqlx::query(&format!("DELETE FROM tickets WHERE id IN {ticket_ids}"))
            .execute(&mut *tx)
            .await?;
        sqlx::query(&format!("DELETE FROM customers WHERE id IN {customer_ids}"))
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// The same dataset held in process memory, for runs without a database.
    pub fn in_memory() -> Result<InMemoryCustomerDirectory, RepositoryError> {
        let customers =
            SEED_CUSTOMERS.iter().map(SeedCustomer::to_customer).collect::<Result<_, _>>()?;
        let tickets = SEED_TICKETS.iter().map(SeedTicket::to_ticket).collect::<Result<_, _>>()?;
        Ok(InMemoryCustomerDirectory::with_records(customers, tickets))
    }
}

#[derive(Debug, Clone, Copy)]
struct SeedCustomer {
    id: i64,
    name: &'static str,
    email: &'static str,
    phone: &'static str,
    status: CustomerStatus,
    created_at: &'static str,
}

impl SeedCustomer {
    fn to_customer(&self) -> Result<Customer, RepositoryError> {
        let created_at = parse_timestamp("created_at", self.created_at)?;
        Ok(Customer {
            id: CustomerId(self.id),
            name: self.name.to_string(),
            email: self.email.to_string(),
            phone: Some(self.phone.to_string()),
            status: self.status,
            created_at,
            updated_at: created_at,
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct SeedTicket {
    id: i64,
    customer_id: i64,
    issue: &'static str,
    status: TicketStatus,
    priority: TicketPriority,
    created_at: &'static str,
}

impl SeedTicket {
    fn to_ticket(&self) -> Result<Ticket, RepositoryError> {
        Ok(Ticket {
            id: TicketId(self.id),
            customer_id: CustomerId(self.customer_id),
            issue: self.issue.to_string(),
            status: self.status,
            priority: self.priority,
            created_at: parse_timestamp("created_at", self.created_at)?,
        })
    }
}

fn sql_array_from_ids(ids: impl Iterator<Item = i64>) -> String {
    let joined = ids.map(|id| id.to_string()).collect::<Vec<_>>().join(",");
    format!("({joined})")
}

#[derive(Debug)]
pub struct SeedResult {
    pub customers_seeded: usize,
    pub tickets_seeded: usize,
}

#[derive(Debug)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}
