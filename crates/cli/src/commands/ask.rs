use concierge_agent::AgentRuntime;
use concierge_core::config::LoadOptions;
use serde_json::{json, Value};

use crate::bootstrap::{bootstrap, BootstrapError};
use crate::commands::{async_runtime, CommandResult, Failure};

#[derive(Clone, Copy, Debug, Default)]
pub struct AskOptions {
    /// Attach the rendered coordination trace to the output.
    pub trace: bool,
    /// Load the deterministic dataset before answering.
    pub seed: bool,
}

pub fn run(query: &str, options: AskOptions) -> CommandResult {
    let runtime = match async_runtime("ask") {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    let result: Result<(String, Value), Failure> = runtime.block_on(async {
        let store = bootstrap(LoadOptions::default()).await.map_err(BootstrapError::into_failure)?;
        if options.seed {
            if let Err(error) = store.seed().await {
                store.close().await;
                return Err(error.into_failure());
            }
        }

        let mut agent = AgentRuntime::new(store.registry());
        let analysis = agent.analyze(query);
        let answer = agent.process(query).await;

        let mut details = json!({
            "analysis": analysis,
            "dispatches": agent.dispatch_count(),
        });
        if options.trace {
            details["trace"] = agent.trace().iter().map(|entry| entry.render()).collect();
        }

        store.close().await;
        Ok((answer, details))
    });

    match result {
        Ok((answer, details)) => CommandResult::success_with_details("ask", answer, Some(details)),
        Err(failure) => CommandResult::from_failure("ask", failure),
    }
}
