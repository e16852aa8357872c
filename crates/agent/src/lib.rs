//! Query routing and multi-agent coordination.
//!
//! A raw customer-service query is classified (`classifier`), executed by the
//! strategy for its complexity tier (`workflow`) through a tracing dispatcher
//! (`dispatch`), and rendered into a single answer (`synthesis`). The
//! capability providers the router talks to live in `providers`.
//!
//! # Key Types
//!
//! - `AgentRuntime` - per-session orchestrator (see `runtime`)
//! - `CapabilityProvider` - action-dispatch contract for providers
//! - `QueryAnalysis` - classification result driving strategy choice

pub mod classifier;
pub mod dispatch;
pub mod providers;
pub mod runtime;
pub mod synthesis;
pub mod workflow;

pub use classifier::{ComplexityTier, QueryAnalysis};
pub use dispatch::{AgentResponse, Dispatcher};
pub use providers::{ActionRequest, CapabilityProvider, ProviderRegistry};
pub use runtime::AgentRuntime;
pub use synthesis::{ResponseBlock, ResponseSynthesizer};
pub use workflow::TicketReceipt;
