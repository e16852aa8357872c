use serde::{Deserialize, Serialize};

use crate::domain::customer::CustomerStatus;
use crate::domain::ticket::TicketPriority;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportIntent {
    Billing,
    Cancellation,
    Upgrade,
    Technical,
    Account,
    Information,
}

impl SupportIntent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Billing => "billing",
            Self::Cancellation => "cancellation",
            Self::Upgrade => "upgrade",
            Self::Technical => "technical",
            Self::Account => "account",
            Self::Information => "information",
        }
    }
}

/// The fields the support service reads from an attached customer record.
/// Any other fields are ignored and both known ones may be absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct CustomerContext {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl CustomerContext {
    /// The status, when it names a known [`CustomerStatus`].
    pub fn known_status(&self) -> Option<CustomerStatus> {
        self.status.as_deref().and_then(|raw| raw.parse().ok())
    }
}

/// Outcome of the support service's `handle_query` action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportAssessment {
    pub priority: TicketPriority,
    pub intents: Vec<SupportIntent>,
    pub needs_customer_context: bool,
    pub needs_escalation: bool,
    pub solution: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_status: Option<CustomerStatus>,
}

impl SupportAssessment {
    pub fn primary_intent(&self) -> Option<SupportIntent> {
        self.intents.first().copied()
    }
}
