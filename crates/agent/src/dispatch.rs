use std::sync::Arc;

use serde_json::{Map, Value};

use concierge_core::domain::agent::AgentId;
use concierge_core::errors::ProviderError;
use concierge_core::trace::{CoordinationTrace, CoordinationTraceEntry};

use crate::providers::{ActionRequest, ProviderRegistry};

/// Normalized outcome of one dispatch.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentResponse {
    pub agent: AgentId,
    pub payload: Result<Value, ProviderError>,
}

impl AgentResponse {
    pub fn success(&self) -> bool {
        self.payload.is_ok()
    }
}

/// Sends actions to registered providers and records every exchange.
pub struct Dispatcher {
    registry: Arc<ProviderRegistry>,
    trace: CoordinationTrace,
    correlation_id: String,
    dispatch_count: usize,
}

impl Dispatcher {
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self {
            registry,
            trace: CoordinationTrace::default(),
            correlation_id: String::new(),
            dispatch_count: 0,
        }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Tags subsequent trace entries and log events with `correlation_id`.
    pub fn begin(&mut self, correlation_id: impl Into<String>) {
        self.correlation_id = correlation_id.into();
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    /// Invokes `action` on `target`. Never fails: a missing provider or an
    /// action outside its catalog becomes a failed response.
    pub async fn dispatch(
        &mut self,
        target: AgentId,
        action: &str,
        parameters: Map<String, Value>,
    ) -> AgentResponse {
        let rendered = Value::Object(parameters.clone()).to_string();
        self.record(AgentId::Router, target, format!("{action} with params: {rendered}"));
        self.dispatch_count += 1;

        tracing::info!(
            event_name = "router.dispatch.sent",
            correlation_id = %self.correlation_id,
            target = %target,
            action,
            "dispatching action"
        );

        let payload = match self.registry.get(target) {
            None => Err(ProviderError::Unavailable(target)),
            Some(provider) if !provider.actions().iter().any(|known| *known == action) => {
                Err(ProviderError::UnknownAction(action.to_string()))
            }
            Some(provider) => {
                let request = ActionRequest::new(action, parameters, AgentId::Router);
                provider.handle(&request).await
            }
        };

        let response = AgentResponse { agent: target, payload };
        let outcome = if response.success() { "Success" } else { "Failed" };
        self.record(target, AgentId::Router, format!("Response: {outcome}"));

        tracing::info!(
            event_name = "router.dispatch.received",
            correlation_id = %self.correlation_id,
            target = %target,
            action,
            success = response.success(),
            "provider responded"
        );
        response
    }

    /// Records a coordination message that is not itself a dispatch.
    pub fn note(&mut self, to: AgentId, summary: impl Into<String>) {
        self.record(AgentId::Router, to, summary.into());
    }

    fn record(&mut self, from: AgentId, to: AgentId, summary: String) {
        let entry = CoordinationTraceEntry::new(self.correlation_id.clone(), from, to, summary);
        self.trace.record(entry);
    }

    pub fn trace(&self) -> &[CoordinationTraceEntry] {
        self.trace.entries()
    }

    pub fn clear_trace(&mut self) {
        self.trace.clear();
    }

    /// Dispatches issued since construction.
    pub fn dispatch_count(&self) -> usize {
        self.dispatch_count
    }
}
