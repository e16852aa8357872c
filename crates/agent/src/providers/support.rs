use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use concierge_core::domain::agent::{AgentId, Capability};
use concierge_core::domain::support::{CustomerContext, SupportAssessment, SupportIntent};
use concierge_core::domain::ticket::{NewTicket, TicketPriority};
use concierge_core::errors::ProviderError;
use concierge_db::TicketRepository;

use super::{mentions_any, storage, to_payload, ActionRequest, CapabilityProvider};

const ACTIONS: &[&str] = &["handle_query", "create_ticket", "analyze_urgency", "detect_intents"];

const KEYWORDS: &[&str] = &[
    "help",
    "support",
    "issue",
    "problem",
    "ticket",
    "upgrade",
    "cancel",
    "billing",
    "refund",
    "assistance",
    "question",
    "how to",
    "can't",
    "cannot",
    "error",
];

const HIGH_URGENCY: &[&str] = &[
    "urgent",
    "immediately",
    "critical",
    "emergency",
    "asap",
    "charged twice",
    "cannot access",
    "locked out",
    "security",
    "fraud",
    "unauthorized",
    "hacked",
];

const MEDIUM_URGENCY: &[&str] = &[
    "billing",
    "payment",
    "refund",
    "cancel",
    "upgrade",
    "not working",
    "broken",
    "error",
    "failed",
];

/// Intent keyword table, in detection order.
const INTENT_KEYWORDS: &[(SupportIntent, &[&str])] = &[
    (SupportIntent::Billing, &["billing", "charged", "payment", "invoice", "refund"]),
    (SupportIntent::Cancellation, &["cancel", "unsubscribe", "stop subscription"]),
    (SupportIntent::Upgrade, &["upgrade", "premium", "tier", "plan change"]),
    (SupportIntent::Technical, &["not working", "error", "bug", "broken", "crash"]),
    (SupportIntent::Account, &["account", "profile", "password", "login", "access"]),
    (SupportIntent::Information, &["show", "get", "display", "what", "status"]),
];

const CONTEXT_KEYWORDS: &[&str] = &[
    "my account",
    "my subscription",
    "my billing",
    "my profile",
    "customer id",
    "i am",
    "i'm",
    "upgrade my",
    "cancel my",
];

const NO_INTENT_SOLUTION: &str =
    "I'm here to help. Could you provide more details about your issue?";
const GENERIC_SOLUTION: &str = "I'm here to help. Let me look into this for you.";

pub fn analyze_urgency(text: &str) -> TicketPriority {
    if mentions_any(text, HIGH_URGENCY) {
        TicketPriority::High
    } else if mentions_any(text, MEDIUM_URGENCY) {
        TicketPriority::Medium
    } else {
        TicketPriority::Low
    }
}

pub fn detect_intents(text: &str) -> Vec<SupportIntent> {
    INTENT_KEYWORDS
        .iter()
        .filter(|(_, keywords)| mentions_any(text, keywords))
        .map(|(intent, _)| *intent)
        .collect()
}

pub fn needs_customer_context(text: &str) -> bool {
    mentions_any(text, CONTEXT_KEYWORDS)
}

fn solution_for(intent: Option<SupportIntent>) -> &'static str {
    match intent {
        None => NO_INTENT_SOLUTION,
        Some(SupportIntent::Billing) => {
            "I can help you with billing issues. \
             Let me review your account and recent transactions."
        }
        Some(SupportIntent::Upgrade) => {
            "I'd be happy to help you upgrade your account. \
             Let me check your current plan and available options."
        }
        Some(SupportIntent::Technical) => {
            "I understand you're experiencing technical difficulties. \
             Let me investigate this issue for you."
        }
        Some(SupportIntent::Cancellation) => {
            "I'm sorry to hear you want to cancel. Let me help you with that process."
        }
        Some(SupportIntent::Account) => {
            "I can assist you with your account. Let me pull up your information."
        }
        Some(SupportIntent::Information) => GENERIC_SOLUTION,
    }
}

/// Builds the assessment for a support query, echoing any attached customer.
pub fn assess(query: &str, customer: Option<&CustomerContext>) -> SupportAssessment {
    let priority = analyze_urgency(query);
    let intents = detect_intents(query);
    let solution = solution_for(intents.first().copied()).to_string();

    SupportAssessment {
        priority,
        needs_customer_context: needs_customer_context(query),
        needs_escalation: intents.len() > 1 || priority == TicketPriority::High,
        intents,
        solution,
        customer_name: customer.and_then(|c| c.name.clone()),
        customer_status: customer.and_then(CustomerContext::known_status),
    }
}

/// Classifies support queries and opens tickets.
pub struct SupportAgent {
    tickets: Arc<dyn TicketRepository>,
}

impl SupportAgent {
    pub fn new(tickets: Arc<dyn TicketRepository>) -> Self {
        Self { tickets }
    }

    fn handle_query(&self, request: &ActionRequest) -> Result<Value, ProviderError> {
        let query = request.required_str("query")?;
        let customer = request.optional_typed::<CustomerContext>("customer_data")?;
        to_payload(&assess(query, customer.as_ref()))
    }

    async fn create_ticket(&self, request: &ActionRequest) -> Result<Value, ProviderError> {
        let customer_id = request.customer_id()?;
        let issue = request.required_str("issue")?.to_string();
        let priority = match request.optional_str("priority")? {
            Some(raw) => raw.parse::<TicketPriority>()?,
            None => analyze_urgency(&issue),
        };

        let ticket = self
            .tickets
            .create(NewTicket { customer_id, issue, priority })
            .await
            .map_err(storage)?
            .ok_or(ProviderError::TicketRejected(customer_id))?;

        tracing::info!(
            event_name = "agent.support.ticket_created",
            ticket_id = ticket.id.0,
            customer_id = customer_id.0,
            priority = priority.as_str(),
            "support ticket created"
        );

        Ok(json!({
            "ticket_id": ticket.id,
            "customer_id": ticket.customer_id,
            "issue": ticket.issue,
            "priority": ticket.priority,
            "status": ticket.status,
        }))
    }
}

#[async_trait]
impl CapabilityProvider for SupportAgent {
    fn id(&self) -> AgentId {
        AgentId::Support
    }

    fn capability(&self) -> Capability {
        Capability::Support
    }

    fn actions(&self) -> &'static [&'static str] {
        ACTIONS
    }

    fn can_handle(&self, text: &str) -> bool {
        mentions_any(text, KEYWORDS)
    }

    async fn handle(&self, request: &ActionRequest) -> Result<Value, ProviderError> {
        tracing::debug!(
            event_name = "agent.support.request",
            action = %request.action,
            origin = %request.origin,
            "support request"
        );

        let result = match request.action.as_str() {
            "handle_query" => self.handle_query(request),
            "create_ticket" => self.create_ticket(request).await,
            "analyze_urgency" => {
                request.required_str("query").map(|q| json!({ "priority": analyze_urgency(q) }))
            }
            "detect_intents" => {
                request.required_str("query").map(|q| json!({ "intents": detect_intents(q) }))
            }
            other => Err(ProviderError::UnknownAction(other.to_string())),
        };

        if let Err(error) = &result {
            tracing::warn!(
                event_name = "agent.support.failed",
                action = %request.action,
                error_class = error.error_class(),
                error = %error,
                "support request failed"
            );
        }
        result
    }
}
