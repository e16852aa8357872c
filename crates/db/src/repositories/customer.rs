use chrono::Utc;
use sqlx::Row;

use concierge_core::domain::customer::{Customer, CustomerId, CustomerStatus, CustomerUpdate};

use super::{parse_timestamp, CustomerRepository, RepositoryError};
use crate::DbPool;

pub struct SqlCustomerRepository {
    pool: DbPool,
}

impl SqlCustomerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_customer(row: &sqlx::sqlite::SqliteRow) -> Result<Customer, RepositoryError> {
    let id: i64 = row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let name: String = row.try_get("name").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let email: String =
        row.try_get("email").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let phone: Option<String> =
        row.try_get("phone").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let status_str: String =
        row.try_get("status").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let created_at_str: String =
        row.try_get("created_at").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let updated_at_str: String =
        row.try_get("updated_at").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    let status = status_str
        .parse::<CustomerStatus>()
        .map_err(|e| RepositoryError::Decode(e.to_string()))?;

    Ok(Customer {
        id: CustomerId(id),
        name,
        email,
        phone,
        status,
        created_at: parse_timestamp("created_at", &created_at_str)?,
        updated_at: parse_timestamp("updated_at", &updated_at_str)?,
    })
}

#[async_trait::async_trait]
impl CustomerRepository for SqlCustomerRepository {
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, name, email, phone, status, created_at, updated_at
             FROM customers WHERE id = ?",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_customer).transpose()
    }

    async fn list(
        &self,
        status: Option<CustomerStatus>,
        limit: u32,
    ) -> Result<Vec<Customer>, RepositoryError> {
        let rows: Vec<sqlx::sqlite::SqliteRow> = if let Some(status) = status {
            sqlx::query(
                "SELECT id, name, email, phone, status, created_at, updated_at
                 FROM customers
                 WHERE status = ?
                 ORDER BY id ASC
                 LIMIT ?",
            )
            .bind(status.as_str())
            .bind(limit)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query(
                "SELECT id, name, email, phone, status, created_at, updated_at
                 FROM customers
                 ORDER BY id ASC
                 LIMIT ?",
            )
            .bind(limit)
            .fetch_all(&self.pool)
            .await?
        };

        rows.iter().map(row_to_customer).collect::<Result<Vec<_>, _>>()
    }

    async fn update(
        &self,
        id: CustomerId,
        update: &CustomerUpdate,
    ) -> Result<Option<Customer>, RepositoryError> {
        let result = sqlx::query(
            "UPDATE customers SET
                 name = COALESCE(?, name),
                 email = COALESCE(?, email),
                 phone = COALESCE(?, phone),
                 status = COALESCE(?, status),
                 updated_at = ?
             WHERE id = ?",
        )
        .bind(update.name.as_deref())
        .bind(update.email.as_deref())
        .bind(update.phone.as_deref())
        .bind(update.status.map(CustomerStatus::as_str))
        .bind(Utc::now().to_rfc3339())
        .bind(id.0)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_by_id(id).await
    }
}
