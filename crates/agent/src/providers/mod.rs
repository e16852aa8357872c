//! Capability providers: the services the router dispatches actions to.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use concierge_core::domain::agent::{AgentId, Capability};
use concierge_core::domain::customer::CustomerId;
use concierge_core::errors::ProviderError;
use concierge_db::{CustomerRepository, RepositoryError, TicketRepository};

pub mod data;
pub mod support;

pub use data::CustomerDataAgent;
pub use support::SupportAgent;

/// A named action addressed to one provider.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionRequest {
    pub action: String,
    pub parameters: Map<String, Value>,
    pub origin: AgentId,
}

impl ActionRequest {
    pub fn new(action: impl Into<String>, parameters: Map<String, Value>, origin: AgentId) -> Self {
        Self { action: action.into(), parameters, origin }
    }

    fn present(&self, name: &str) -> Option<&Value> {
        self.parameters.get(name).filter(|value| !value.is_null())
    }

    pub fn customer_id(&self) -> Result<CustomerId, ProviderError> {
        let value =
            self.present("customer_id").ok_or(ProviderError::MissingParameter("customer_id"))?;
        value
            .as_i64()
            .map(CustomerId)
            .ok_or_else(|| ProviderError::invalid("customer_id", "expected an integer"))
    }

    pub fn required_str(&self, name: &'static str) -> Result<&str, ProviderError> {
        self.optional_str(name)?.ok_or(ProviderError::MissingParameter(name))
    }

    pub fn optional_str(&self, name: &'static str) -> Result<Option<&str>, ProviderError> {
        match self.present(name) {
            None => Ok(None),
            Some(value) => value
                .as_str()
                .map(Some)
                .ok_or_else(|| ProviderError::invalid(name, "expected a string")),
        }
    }

    pub fn optional_u32(&self, name: &'static str) -> Result<Option<u32>, ProviderError> {
        match self.present(name) {
            None => Ok(None),
            Some(value) => value
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| ProviderError::invalid(name, "expected a non-negative integer")),
        }
    }

    /// Deserializes an optional structured parameter.
    pub fn optional_typed<T: DeserializeOwned>(
        &self,
        name: &'static str,
    ) -> Result<Option<T>, ProviderError> {
        self.present(name)
            .map(|value| {
                serde_json::from_value(value.clone())
                    .map_err(|e| ProviderError::invalid(name, e.to_string()))
            })
            .transpose()
    }
}

/// Uniform action-dispatch contract shared by every provider.
#[async_trait]
pub trait CapabilityProvider: Send + Sync {
    fn id(&self) -> AgentId;

    fn capability(&self) -> Capability;

    /// The advertised action catalog.
    fn actions(&self) -> &'static [&'static str];

    /// Lexical relevance check used only for capability detection.
    fn can_handle(&self, text: &str) -> bool;

    async fn handle(&self, request: &ActionRequest) -> Result<Value, ProviderError>;
}

#[derive(Default)]
pub struct ProviderRegistry {
    providers: BTreeMap<AgentId, Arc<dyn CapabilityProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The customer-data and support providers over a shared store.
    pub fn standard(
        customers: Arc<dyn CustomerRepository>,
        tickets: Arc<dyn TicketRepository>,
    ) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(CustomerDataAgent::new(customers, tickets.clone())));
        registry.register(Arc::new(SupportAgent::new(tickets)));
        registry
    }

    pub fn register(&mut self, provider: Arc<dyn CapabilityProvider>) {
        tracing::debug!(
            event_name = "router.provider.registered",
            provider = %provider.id(),
            capability = provider.capability().as_str(),
            "capability provider registered"
        );
        self.providers.insert(provider.id(), provider);
    }

    pub fn get(&self, id: AgentId) -> Option<Arc<dyn CapabilityProvider>> {
        self.providers.get(&id).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn CapabilityProvider>> {
        self.providers.values()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

pub(crate) fn mentions_any(text: &str, keywords: &[&str]) -> bool {
    let lowered = text.to_lowercase();
    keywords.iter().any(|keyword| lowered.contains(keyword))
}

pub(crate) fn to_payload<T: Serialize>(value: &T) -> Result<Value, ProviderError> {
    serde_json::to_value(value).map_err(|e| ProviderError::Encoding(e.to_string()))
}

pub(crate) fn storage(error: RepositoryError) -> ProviderError {
    ProviderError::Storage(error.to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Map, Value};

    use concierge_core::domain::agent::AgentId;
    use concierge_core::domain::customer::CustomerId;
    use concierge_core::errors::ProviderError;

    use super::ActionRequest;

    fn request(parameters: Value) -> ActionRequest {
        let parameters: Map<String, Value> = match parameters {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        ActionRequest::new("get_customer", parameters, AgentId::Router)
    }

    #[test]
    fn customer_id_must_be_present_and_integral() {
        assert_eq!(request(json!({"customer_id": 7})).customer_id(), Ok(CustomerId(7)));
        assert_eq!(
            request(json!({})).customer_id(),
            Err(ProviderError::MissingParameter("customer_id"))
        );
        assert!(matches!(
            request(json!({"customer_id": "seven"})).customer_id(),
            Err(ProviderError::InvalidParameter { name: "customer_id", .. })
        ));
    }

    #[test]
    fn null_parameters_count_as_absent() {
        let req = request(json!({"status": null, "limit": 3}));
        assert_eq!(req.optional_str("status"), Ok(None));
        assert_eq!(req.optional_u32("limit"), Ok(Some(3)));
        assert_eq!(req.required_str("status"), Err(ProviderError::MissingParameter("status")));
    }
}
