use std::fmt;

use serde::{Deserialize, Serialize};

/// Participants that exchange messages during query coordination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgentId {
    Router,
    CustomerData,
    Support,
}

impl AgentId {
    pub fn name(self) -> &'static str {
        match self {
            Self::Router => "RouterAgent",
            Self::CustomerData => "CustomerDataAgent",
            Self::Support => "SupportAgent",
        }
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Data,
    Support,
}

impl Capability {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::Support => "support",
        }
    }

    /// The provider that serves this capability.
    pub fn provider(self) -> AgentId {
        match self {
            Self::Data => AgentId::CustomerData,
            Self::Support => AgentId::Support,
        }
    }
}
