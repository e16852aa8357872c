use concierge_agent::AgentRuntime;
use concierge_core::config::LoadOptions;
use concierge_core::domain::ticket::{Ticket, TicketPriority, TicketStatus};
use serde_json::json;

use crate::bootstrap::{bootstrap, BootstrapError};
use crate::commands::{async_runtime, CommandResult, Failure};

#[derive(Clone, Debug, Default)]
pub struct TicketFilterArgs {
    pub priority: Option<String>,
    pub status: Option<String>,
    pub seed: bool,
}

pub fn run(args: TicketFilterArgs) -> CommandResult {
    let priority = match args.priority.as_deref().map(str::parse::<TicketPriority>).transpose() {
        Ok(priority) => priority,
        Err(error) => {
            return CommandResult::failure("tickets", "invalid_argument", error.to_string(), 2)
        }
    };
    let status = match args.status.as_deref().map(str::parse::<TicketStatus>).transpose() {
        Ok(status) => status,
        Err(error) => {
            return CommandResult::failure("tickets", "invalid_argument", error.to_string(), 2)
        }
    };
    if priority.is_none() && status.is_none() {
        return CommandResult::failure(
            "tickets",
            "invalid_argument",
            "pass --priority, --status, or both",
            2,
        );
    }

    let runtime = match async_runtime("tickets") {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    let result: Result<Vec<Ticket>, Failure> = runtime.block_on(async {
        let store = bootstrap(LoadOptions::default()).await.map_err(BootstrapError::into_failure)?;
        if args.seed {
            if let Err(error) = store.seed().await {
                store.close().await;
                return Err(error.into_failure());
            }
        }

        let mut agent = AgentRuntime::new(store.registry());
        let listed = agent.list_tickets(priority, status).await;
        store.close().await;
        listed.map_err(|error| (error.error_class(), error.to_string(), 6))
    });

    match result {
        Ok(tickets) => CommandResult::success_with_details(
            "tickets",
            format!("Found {} tickets", tickets.len()),
            Some(json!({ "tickets": tickets })),
        ),
        Err(failure) => CommandResult::from_failure("tickets", failure),
    }
}
