//! Strategy execution per complexity tier, plus typed wrappers around the
//! raw dispatches each strategy issues.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use concierge_core::domain::agent::AgentId;
use concierge_core::domain::customer::{Customer, CustomerId, CustomerStatus, CustomerUpdate};
use concierge_core::domain::support::SupportAssessment;
use concierge_core::domain::ticket::{Ticket, TicketId, TicketPriority, TicketStatus};
use concierge_core::errors::ProviderError;

use crate::classifier::{ComplexityTier, QueryAnalysis};
use crate::dispatch::Dispatcher;
use crate::synthesis::ResponseBlock;

mod complex;
mod multi_step;
mod simple;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkflowPhase {
    Classified,
    Executing,
    Synthesizing,
    Done,
}

impl WorkflowPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Classified => "classified",
            Self::Executing => "executing",
            Self::Synthesizing => "synthesizing",
            Self::Done => "done",
        }
    }
}

/// Runs the strategy selected by the analysis tier.
pub async fn execute(analysis: &QueryAnalysis, dispatcher: &mut Dispatcher) -> Vec<ResponseBlock> {
    match analysis.complexity_tier {
        ComplexityTier::Simple => simple::run(analysis, dispatcher).await,
        ComplexityTier::Complex => complex::run(analysis, dispatcher).await,
        ComplexityTier::MultiStep => multi_step::run(analysis, dispatcher).await,
    }
}

/// Confirmation returned by the support service's `create_ticket` action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketReceipt {
    pub ticket_id: TicketId,
    pub customer_id: CustomerId,
    pub issue: String,
    pub priority: TicketPriority,
    pub status: TicketStatus,
}

impl fmt::Display for TicketReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ticket #{} created for customer {} ({} priority)",
            self.ticket_id,
            self.customer_id,
            self.priority.as_str()
        )
    }
}

fn decode<T: DeserializeOwned>(payload: Result<Value, ProviderError>) -> Result<T, ProviderError> {
    serde_json::from_value(payload?).map_err(|e| ProviderError::Encoding(e.to_string()))
}

fn params(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

pub(crate) async fn get_customer(
    dispatcher: &mut Dispatcher,
    id: CustomerId,
) -> Result<Customer, ProviderError> {
    let response = dispatcher
        .dispatch(AgentId::CustomerData, "get_customer", params(json!({ "customer_id": id })))
        .await;
    decode(response.payload)
}

pub(crate) async fn list_customers(
    dispatcher: &mut Dispatcher,
    status: Option<CustomerStatus>,
    limit: u32,
) -> Result<Vec<Customer>, ProviderError> {
    let response = dispatcher
        .dispatch(
            AgentId::CustomerData,
            "list_customers",
            params(json!({ "status": status, "limit": limit })),
        )
        .await;
    decode(response.payload)
}

pub(crate) async fn update_customer(
    dispatcher: &mut Dispatcher,
    id: CustomerId,
    update: &CustomerUpdate,
) -> Result<Customer, ProviderError> {
    let response = dispatcher
        .dispatch(
            AgentId::CustomerData,
            "update_customer",
            params(json!({ "customer_id": id, "updates": update })),
        )
        .await;
    decode(response.payload)
}

pub(crate) async fn get_history(
    dispatcher: &mut Dispatcher,
    id: CustomerId,
) -> Result<Vec<Ticket>, ProviderError> {
    let response = dispatcher
        .dispatch(AgentId::CustomerData, "get_history", params(json!({ "customer_id": id })))
        .await;
    decode(response.payload)
}

pub(crate) async fn premium_customers(
    dispatcher: &mut Dispatcher,
) -> Result<Vec<Customer>, ProviderError> {
    let response =
        dispatcher.dispatch(AgentId::CustomerData, "get_premium_customers", Map::new()).await;
    decode(response.payload)
}

pub(crate) async fn list_tickets(
    dispatcher: &mut Dispatcher,
    priority: Option<TicketPriority>,
    status: Option<TicketStatus>,
) -> Result<Vec<Ticket>, ProviderError> {
    let response = dispatcher
        .dispatch(
            AgentId::CustomerData,
            "list_tickets",
            params(json!({ "priority": priority, "status": status })),
        )
        .await;
    decode(response.payload)
}

pub(crate) async fn handle_query(
    dispatcher: &mut Dispatcher,
    query: &str,
    customer: Option<&Customer>,
) -> Result<SupportAssessment, ProviderError> {
    let mut parameters = params(json!({ "query": query }));
    if let Some(customer) = customer {
        let record =
            serde_json::to_value(customer).map_err(|e| ProviderError::Encoding(e.to_string()))?;
        parameters.insert("customer_data".to_string(), record);
    }
    let response = dispatcher.dispatch(AgentId::Support, "handle_query", parameters).await;
    decode(response.payload)
}

pub(crate) async fn create_ticket(
    dispatcher: &mut Dispatcher,
    id: CustomerId,
    issue: &str,
    priority: Option<TicketPriority>,
) -> Result<TicketReceipt, ProviderError> {
    let mut parameters = params(json!({ "customer_id": id, "issue": issue }));
    if let Some(priority) = priority {
        parameters.insert("priority".to_string(), json!(priority));
    }
    let response = dispatcher.dispatch(AgentId::Support, "create_ticket", parameters).await;
    decode(response.payload)
}
