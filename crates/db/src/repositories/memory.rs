use std::collections::BTreeMap;

use chrono::Utc;
use tokio::sync::RwLock;

use concierge_core::domain::customer::{Customer, CustomerId, CustomerStatus, CustomerUpdate};
use concierge_core::domain::ticket::{NewTicket, Ticket, TicketId, TicketPriority, TicketStatus};

use super::{CustomerRepository, RepositoryError, TicketRepository};

/// Customers and tickets held in process memory. Ordering matches the SQL
/// repositories so either backend renders identical responses.
#[derive(Default)]
pub struct InMemoryCustomerDirectory {
    customers: RwLock<BTreeMap<CustomerId, Customer>>,
    tickets: RwLock<BTreeMap<TicketId, Ticket>>,
}

impl InMemoryCustomerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(customers: Vec<Customer>, tickets: Vec<Ticket>) -> Self {
        Self {
            customers: RwLock::new(customers.into_iter().map(|c| (c.id, c)).collect()),
            tickets: RwLock::new(tickets.into_iter().map(|t| (t.id, t)).collect()),
        }
    }

    pub async fn customer_count(&self) -> usize {
        self.customers.read().await.len()
    }

    pub async fn ticket_count(&self) -> usize {
        self.tickets.read().await.len()
    }
}

fn newest_first(mut tickets: Vec<Ticket>) -> Vec<Ticket> {
    tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    tickets
}

#[async_trait::async_trait]
impl CustomerRepository for InMemoryCustomerDirectory {
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let customers = self.customers.read().await;
        Ok(customers.get(&id).cloned())
    }

    async fn list(
        &self,
        status: Option<CustomerStatus>,
        limit: u32,
    ) -> Result<Vec<Customer>, RepositoryError> {
        let customers = self.customers.read().await;
        Ok(customers
            .values()
            .filter(|c| status.map_or(true, |s| c.status == s))
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        id: CustomerId,
        update: &CustomerUpdate,
    ) -> Result<Option<Customer>, RepositoryError> {
        let mut customers = self.customers.write().await;
        Ok(customers.get_mut(&id).map(|customer| {
            customer.apply(update, Utc::now());
            customer.clone()
        }))
    }
}

#[async_trait::async_trait]
impl TicketRepository for InMemoryCustomerDirectory {
    async fn history_for_customer(&self, id: CustomerId) -> Result<Vec<Ticket>, RepositoryError> {
        let tickets = self.tickets.read().await;
        Ok(newest_first(tickets.values().filter(|t| t.customer_id == id).cloned().collect()))
    }

    async fn create(&self, ticket: NewTicket) -> Result<Option<Ticket>, RepositoryError> {
        if !self.customers.read().await.contains_key(&ticket.customer_id) {
            return Ok(None);
        }

        let mut tickets = self.tickets.write().await;
        let next_id = tickets.keys().next_back().map_or(1, |id| id.0 + 1);
        let created = Ticket {
            id: TicketId(next_id),
            customer_id: ticket.customer_id,
            issue: ticket.issue,
            status: TicketStatus::Open,
            priority: ticket.priority,
            created_at: Utc::now(),
        };
        tickets.insert(created.id, created.clone());
        Ok(Some(created))
    }

    async fn list_by_priority(
        &self,
        priority: TicketPriority,
    ) -> Result<Vec<Ticket>, RepositoryError> {
        let tickets = self.tickets.read().await;
        Ok(newest_first(tickets.values().filter(|t| t.priority == priority).cloned().collect()))
    }

    async fn list_by_status(&self, status: TicketStatus) -> Result<Vec<Ticket>, RepositoryError> {
        let tickets = self.tickets.read().await;
        Ok(newest_first(tickets.values().filter(|t| t.status == status).cloned().collect()))
    }
}

#[cfg(test)]
mod tests {
    use concierge_core::domain::customer::{CustomerId, CustomerStatus, CustomerUpdate};
    use concierge_core::domain::ticket::{NewTicket, TicketId, TicketPriority, TicketStatus};

    use super::InMemoryCustomerDirectory;
    use crate::repositories::{CustomerRepository, TicketRepository};
    use crate::SupportSeedDataset;

    fn seeded() -> InMemoryCustomerDirectory {
        SupportSeedDataset::in_memory().expect("seed dataset")
    }

    #[tokio::test]
    async fn list_orders_by_id_and_filters_status() {
        let directory = seeded();

        let active = directory.list(Some(CustomerStatus::Active), 10).await.expect("list");
        let ids: Vec<i64> = active.iter().map(|c| c.id.0).collect();
        assert_eq!(ids, vec![1, 2, 4, 5, 6, 8]);

        let limited = directory.list(None, 2).await.expect("list");
        assert_eq!(limited.len(), 2);
    }

    #[tokio::test]
    async fn update_changes_only_requested_fields() {
        let directory = seeded();

        let updated = directory
            .update(CustomerId(1), &CustomerUpdate::email("new@example.com"))
            .await
            .expect("update")
            .expect("customer 1 exists");
        assert_eq!(updated.email, "new@example.com");
        assert_eq!(updated.name, "John Doe");

        let missing = directory
            .update(CustomerId(77), &CustomerUpdate::phone("555-0000"))
            .await
            .expect("update");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn created_tickets_take_next_id_and_lead_history() {
        let directory = seeded();

        let ticket = directory
            .create(NewTicket {
                customer_id: CustomerId(5),
                issue: "Refund not processed".to_string(),
                priority: TicketPriority::Medium,
            })
            .await
            .expect("create")
            .expect("customer 5 exists");
        assert_eq!(ticket.id, TicketId(11));
        assert_eq!(ticket.status, TicketStatus::Open);

        let history = directory.history_for_customer(CustomerId(5)).await.expect("history");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, TicketId(11));
    }

    #[tokio::test]
    async fn priority_listing_is_newest_first() {
        let directory = seeded();

        let high = directory.list_by_priority(TicketPriority::High).await.expect("list");
        let ids: Vec<i64> = high.iter().map(|t| t.id.0).collect();
        assert_eq!(ids, vec![10, 6, 1]);
    }
}
