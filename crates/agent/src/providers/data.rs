use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use concierge_core::domain::agent::{AgentId, Capability};
use concierge_core::domain::customer::{CustomerStatus, CustomerUpdate};
use concierge_core::domain::ticket::{TicketPriority, TicketStatus};
use concierge_core::errors::ProviderError;
use concierge_db::{CustomerRepository, TicketRepository};

use super::{mentions_any, storage, to_payload, ActionRequest, CapabilityProvider};

const ACTIONS: &[&str] = &[
    "get_customer",
    "list_customers",
    "update_customer",
    "get_history",
    "validate_customer",
    "get_premium_customers",
    "list_tickets",
];

const KEYWORDS: &[&str] = &[
    "customer",
    "account",
    "profile",
    "information",
    "data",
    "email",
    "phone",
    "status",
    "update",
    "get",
    "fetch",
    "retrieve",
];

const DEFAULT_LIST_LIMIT: u32 = 10;
const PREMIUM_LIST_LIMIT: u32 = 100;

/// Fetches, lists and updates customer records and their ticket history.
pub struct CustomerDataAgent {
    customers: Arc<dyn CustomerRepository>,
    tickets: Arc<dyn TicketRepository>,
}

impl CustomerDataAgent {
    pub fn new(customers: Arc<dyn CustomerRepository>, tickets: Arc<dyn TicketRepository>) -> Self {
        Self { customers, tickets }
    }

    async fn get_customer(&self, request: &ActionRequest) -> Result<Value, ProviderError> {
        let id = request.customer_id()?;
        let customer = self
            .customers
            .find_by_id(id)
            .await
            .map_err(storage)?
            .ok_or(ProviderError::CustomerNotFound(id))?;
        to_payload(&customer)
    }

    async fn list_customers(&self, request: &ActionRequest) -> Result<Value, ProviderError> {
        let status = request.optional_str("status")?.map(str::parse::<CustomerStatus>).transpose()?;
        let limit = request.optional_u32("limit")?.unwrap_or(DEFAULT_LIST_LIMIT);
        let customers = self.customers.list(status, limit).await.map_err(storage)?;
        to_payload(&customers)
    }

    async fn update_customer(&self, request: &ActionRequest) -> Result<Value, ProviderError> {
        let id = request.customer_id()?;
        let update = request
            .optional_typed::<CustomerUpdate>("updates")?
            .ok_or(ProviderError::MissingParameter("updates"))?;
        if update.is_empty() {
            return Err(ProviderError::UpdateRejected(id));
        }

        let customer = self
            .customers
            .update(id, &update)
            .await
            .map_err(storage)?
            .ok_or(ProviderError::UpdateRejected(id))?;
        to_payload(&customer)
    }

    async fn get_history(&self, request: &ActionRequest) -> Result<Value, ProviderError> {
        let id = request.customer_id()?;
        let history = self.tickets.history_for_customer(id).await.map_err(storage)?;
        to_payload(&history)
    }

    async fn validate_customer(&self, request: &ActionRequest) -> Result<Value, ProviderError> {
        let id = request.customer_id()?;
        let exists = self.customers.find_by_id(id).await.map_err(storage)?.is_some();
        Ok(json!({ "exists": exists }))
    }

    async fn get_premium_customers(&self) -> Result<Value, ProviderError> {
        let customers = self
            .customers
            .list(Some(CustomerStatus::Active), PREMIUM_LIST_LIMIT)
            .await
            .map_err(storage)?;
        to_payload(&customers)
    }

    /// Tickets across all customers, filtered by priority, status or both.
    async fn list_tickets(&self, request: &ActionRequest) -> Result<Value, ProviderError> {
        let priority =
            request.optional_str("priority")?.map(str::parse::<TicketPriority>).transpose()?;
        let status = request.optional_str("status")?.map(str::parse::<TicketStatus>).transpose()?;

        let tickets = match (priority, status) {
            (Some(priority), status) => {
                let mut tickets =
                    self.tickets.list_by_priority(priority).await.map_err(storage)?;
                if let Some(status) = status {
                    tickets.retain(|ticket| ticket.status == status);
                }
                tickets
            }
            (None, Some(status)) => self.tickets.list_by_status(status).await.map_err(storage)?,
            (None, None) => {
                return Err(ProviderError::invalid(
                    "priority",
                    "a priority or status filter is required",
                ));
            }
        };
        to_payload(&tickets)
    }
}

#[async_trait]
impl CapabilityProvider for CustomerDataAgent {
    fn id(&self) -> AgentId {
        AgentId::CustomerData
    }

    fn capability(&self) -> Capability {
        Capability::Data
    }

    fn actions(&self) -> &'static [&'static str] {
        ACTIONS
    }

    fn can_handle(&self, text: &str) -> bool {
        mentions_any(text, KEYWORDS)
    }

    async fn handle(&self, request: &ActionRequest) -> Result<Value, ProviderError> {
        tracing::debug!(
            event_name = "agent.data.request",
            action = %request.action,
            origin = %request.origin,
            "customer data request"
        );

        let result = match request.action.as_str() {
            "get_customer" => self.get_customer(request).await,
            "list_customers" => self.list_customers(request).await,
            "update_customer" => self.update_customer(request).await,
            "get_history" => self.get_history(request).await,
            "validate_customer" => self.validate_customer(request).await,
            "get_premium_customers" => self.get_premium_customers().await,
            "list_tickets" => self.list_tickets(request).await,
            other => Err(ProviderError::UnknownAction(other.to_string())),
        };

        if let Err(error) = &result {
            tracing::warn!(
                event_name = "agent.data.failed",
                action = %request.action,
                error_class = error.error_class(),
                error = %error,
                "customer data request failed"
            );
        }
        result
    }
}
