use std::sync::Arc;

use uuid::Uuid;

use concierge_core::domain::customer::CustomerId;
use concierge_core::domain::ticket::{Ticket, TicketPriority, TicketStatus};
use concierge_core::errors::ProviderError;
use concierge_core::trace::CoordinationTraceEntry;

use crate::classifier::{self, QueryAnalysis};
use crate::dispatch::Dispatcher;
use crate::providers::ProviderRegistry;
use crate::synthesis::{ResponseBlock, ResponseSynthesizer};
use crate::workflow::{self, TicketReceipt, WorkflowPhase};

/// Routes free-text queries through classification, strategy execution and
/// synthesis. One query is in flight per runtime.
pub struct AgentRuntime {
    dispatcher: Dispatcher,
}

impl AgentRuntime {
    pub fn new(registry: ProviderRegistry) -> Self {
        Self { dispatcher: Dispatcher::new(Arc::new(registry)) }
    }

    pub fn analyze(&self, query: &str) -> QueryAnalysis {
        classifier::analyze(query, self.dispatcher.registry())
    }

    /// Answers `query`. Every failure is rendered into the returned text.
    pub async fn process(&mut self, query: &str) -> String {
        let correlation_id = Uuid::new_v4().to_string();
        self.dispatcher.begin(correlation_id.clone());
        let dispatches_before = self.dispatcher.dispatch_count();

        tracing::info!(
            event_name = "router.query.received",
            correlation_id = %correlation_id,
            query_len = query.len(),
            "query received"
        );

        let analysis = self.analyze(query);
        tracing::info!(
            event_name = "router.query.classified",
            correlation_id = %correlation_id,
            tier = analysis.complexity_tier.as_str(),
            customer_id = analysis.customer_id.map(|id| id.0),
            capabilities = ?analysis.required_capabilities,
            needs_coordination = analysis.needs_coordination,
            "query classified"
        );
        log_phase(&correlation_id, WorkflowPhase::Classified);

        log_phase(&correlation_id, WorkflowPhase::Executing);
        let blocks = workflow::execute(&analysis, &mut self.dispatcher).await;

        log_phase(&correlation_id, WorkflowPhase::Synthesizing);
        let answer = ResponseSynthesizer::render(&blocks);

        log_phase(&correlation_id, WorkflowPhase::Done);
        tracing::info!(
            event_name = "router.query.completed",
            correlation_id = %correlation_id,
            dispatches = self.dispatcher.dispatch_count() - dispatches_before,
            "query completed"
        );
        answer
    }

    /// Opens a support ticket directly, bypassing classification.
    pub async fn open_ticket(
        &mut self,
        customer_id: CustomerId,
        issue: &str,
        priority: Option<TicketPriority>,
    ) -> String {
        match self.create_ticket(customer_id, issue, priority).await {
            Ok(receipt) => receipt.to_string(),
            Err(error) => ResponseSynthesizer::render(&[ResponseBlock::failure(error)]),
        }
    }

    /// Typed form of [`AgentRuntime::open_ticket`].
    pub async fn create_ticket(
        &mut self,
        customer_id: CustomerId,
        issue: &str,
        priority: Option<TicketPriority>,
    ) -> Result<TicketReceipt, ProviderError> {
        let correlation_id = Uuid::new_v4().to_string();
        self.dispatcher.begin(correlation_id);
        workflow::create_ticket(&mut self.dispatcher, customer_id, issue, priority).await
    }

    /// Tickets across all customers matching a priority, a status, or both.
    pub async fn list_tickets(
        &mut self,
        priority: Option<TicketPriority>,
        status: Option<TicketStatus>,
    ) -> Result<Vec<Ticket>, ProviderError> {
        let correlation_id = Uuid::new_v4().to_string();
        self.dispatcher.begin(correlation_id);
        workflow::list_tickets(&mut self.dispatcher, priority, status).await
    }

    pub fn trace(&self) -> &[CoordinationTraceEntry] {
        self.dispatcher.trace()
    }

    pub fn clear_trace(&mut self) {
        self.dispatcher.clear_trace();
    }

    pub fn dispatch_count(&self) -> usize {
        self.dispatcher.dispatch_count()
    }
}

fn log_phase(correlation_id: &str, phase: WorkflowPhase) {
    tracing::debug!(
        event_name = "router.workflow.phase",
        correlation_id = %correlation_id,
        phase = phase.as_str(),
        "workflow phase"
    );
}
