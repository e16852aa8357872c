use chrono::Utc;
use sqlx::Row;

use concierge_core::domain::customer::CustomerId;
use concierge_core::domain::ticket::{NewTicket, Ticket, TicketId, TicketPriority, TicketStatus};

use super::{parse_timestamp, RepositoryError, TicketRepository};
use crate::DbPool;

pub struct SqlTicketRepository {
    pool: DbPool,
}

impl SqlTicketRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_ticket(row: &sqlx::sqlite::SqliteRow) -> Result<Ticket, RepositoryError> {
    let id: i64 = row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let customer_id: i64 =
        row.try_get("customer_id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let issue: String = row.try_get("issue").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let status_str: String =
        row.try_get("status").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let priority_str: String =
        row.try_get("priority").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let created_at_str: String =
        row.try_get("created_at").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    Ok(Ticket {
        id: TicketId(id),
        customer_id: CustomerId(customer_id),
        issue,
        status: status_str
            .parse::<TicketStatus>()
            .map_err(|e| RepositoryError::Decode(e.to_string()))?,
        priority: priority_str
            .parse::<TicketPriority>()
            .map_err(|e| RepositoryError::Decode(e.to_string()))?,
        created_at: parse_timestamp("created_at", &created_at_str)?,
    })
}

#[async_trait::async_trait]
impl TicketRepository for SqlTicketRepository {
    async fn history_for_customer(&self, id: CustomerId) -> Result<Vec<Ticket>, RepositoryError> {
        let rows: Vec<sqlx::sqlite::SqliteRow> = sqlx::query(
            "SELECT id, customer_id, issue, status, priority, created_at
             FROM tickets
             WHERE customer_id = ?
             ORDER BY created_at DESC, id DESC",
        )
        .bind(id.0)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_ticket).collect::<Result<Vec<_>, _>>()
    }

    async fn create(&self, ticket: NewTicket) -> Result<Option<Ticket>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let customer_exists: i64 =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM customers WHERE id = ?1)")
                .bind(ticket.customer_id.0)
                .fetch_one(&mut *tx)
                .await?;
        if customer_exists == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO tickets (customer_id, issue, status, priority, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(ticket.customer_id.0)
        .bind(&ticket.issue)
        .bind(TicketStatus::Open.as_str())
        .bind(ticket.priority.as_str())
        .bind(created_at.to_rfc3339())
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(Some(Ticket {
            id: TicketId(result.last_insert_rowid()),
            customer_id: ticket.customer_id,
            issue: ticket.issue,
            status: TicketStatus::Open,
            priority: ticket.priority,
            created_at,
        }))
    }

    async fn list_by_priority(
        &self,
        priority: TicketPriority,
    ) -> Result<Vec<Ticket>, RepositoryError> {
        let rows: Vec<sqlx::sqlite::SqliteRow> = sqlx::query(
            "SELECT id, customer_id, issue, status, priority, created_at
             FROM tickets
             WHERE priority = ?
             ORDER BY created_at DESC, id DESC",
        )
        .bind(priority.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_ticket).collect::<Result<Vec<_>, _>>()
    }

    async fn list_by_status(&self, status: TicketStatus) -> Result<Vec<Ticket>, RepositoryError> {
        let rows: Vec<sqlx::sqlite::SqliteRow> = sqlx::query(
            "SELECT id, customer_id, issue, status, priority, created_at
             FROM tickets
             WHERE status = ?
             ORDER BY created_at DESC, id DESC",
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_ticket).collect::<Result<Vec<_>, _>>()
    }
}
