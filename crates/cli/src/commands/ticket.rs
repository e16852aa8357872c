use concierge_agent::{AgentRuntime, TicketReceipt};
use concierge_core::config::LoadOptions;
use concierge_core::domain::customer::CustomerId;
use concierge_core::domain::ticket::TicketPriority;
use serde_json::json;

use crate::bootstrap::{bootstrap, BootstrapError};
use crate::commands::{async_runtime, CommandResult, Failure};

#[derive(Clone, Debug, Default)]
pub struct TicketArgs {
    pub customer_id: i64,
    pub issue: String,
    /// `low`, `medium` or `high`; the issue's urgency decides when absent.
    pub priority: Option<String>,
    pub seed: bool,
}

pub fn run(args: TicketArgs) -> CommandResult {
    let priority = match args.priority.as_deref().map(str::parse::<TicketPriority>).transpose() {
        Ok(priority) => priority,
        Err(error) => {
            return CommandResult::failure("ticket", "invalid_argument", error.to_string(), 2)
        }
    };

    let runtime = match async_runtime("ticket") {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    let result: Result<TicketReceipt, Failure> = runtime.block_on(async {
        let store = bootstrap(LoadOptions::default()).await.map_err(BootstrapError::into_failure)?;
        if args.seed {
            if let Err(error) = store.seed().await {
                store.close().await;
                return Err(error.into_failure());
            }
        }

        let mut agent = AgentRuntime::new(store.registry());
        let created =
            agent.create_ticket(CustomerId(args.customer_id), &args.issue, priority).await;
        store.close().await;
        created.map_err(|error| (error.error_class(), error.to_string(), 6))
    });

    match result {
        Ok(receipt) => CommandResult::success_with_details(
            "ticket",
            receipt.to_string(),
            Some(json!({ "ticket": receipt })),
        ),
        Err(failure) => CommandResult::from_failure("ticket", failure),
    }
}
