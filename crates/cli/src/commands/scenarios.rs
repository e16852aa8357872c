use concierge_agent::AgentRuntime;
use concierge_core::config::LoadOptions;
use serde::Serialize;
use serde_json::json;

use crate::bootstrap::{bootstrap, BootstrapError};
use crate::commands::{async_runtime, CommandResult, Failure};

/// Reference conversations run against a freshly seeded store.
pub const SCENARIOS: &[(&str, &str)] = &[
    ("simple_lookup", "Get customer information for ID 5"),
    ("coordinated_help", "I'm customer 2 and need help upgrading my account"),
    ("active_with_open_tickets", "Show me all active customers who have open tickets"),
    ("escalation", "I've been charged twice, please refund immediately!"),
    (
        "multi_intent_update",
        "Update my email to newemail@test.com and show my ticket history for customer 1",
    ),
];

#[derive(Debug, Serialize)]
struct ScenarioRun {
    name: &'static str,
    query: &'static str,
    tier: &'static str,
    answer: String,
    dispatches: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<Vec<String>>,
}

pub fn run(trace: bool) -> CommandResult {
    let runtime = match async_runtime("scenarios") {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    let result: Result<Vec<ScenarioRun>, Failure> = runtime.block_on(async {
        let store = bootstrap(LoadOptions::default()).await.map_err(BootstrapError::into_failure)?;
        if let Err(error) = store.seed().await {
            store.close().await;
            return Err(error.into_failure());
        }

        let mut agent = AgentRuntime::new(store.registry());
        let mut runs = Vec::with_capacity(SCENARIOS.len());
        for &(name, query) in SCENARIOS {
            let before = agent.dispatch_count();
            let tier = agent.analyze(query).complexity_tier.as_str();
            let answer = agent.process(query).await;
            runs.push(ScenarioRun {
                name,
                query,
                tier,
                answer,
                dispatches: agent.dispatch_count() - before,
                trace: trace.then(|| agent.trace().iter().map(|entry| entry.render()).collect()),
            });
            agent.clear_trace();
        }

        store.close().await;
        Ok(runs)
    });

    match result {
        Ok(runs) => CommandResult::success_with_details(
            "scenarios",
            format!("ran {} reference scenarios", runs.len()),
            Some(json!({ "scenarios": runs })),
        ),
        Err(failure) => CommandResult::from_failure("scenarios", failure),
    }
}
