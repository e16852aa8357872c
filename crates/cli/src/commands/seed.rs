use concierge_core::config::LoadOptions;
use concierge_db::SeedResult;
use serde_json::json;

use crate::bootstrap::{bootstrap, BootstrapError};
use crate::commands::{async_runtime, CommandResult, Failure};

pub fn run() -> CommandResult {
    let runtime = match async_runtime("seed") {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    let result: Result<SeedResult, Failure> = runtime.block_on(async {
        let store = bootstrap(LoadOptions::default()).await.map_err(BootstrapError::into_failure)?;
        let seeded = store.seed().await;
        store.close().await;
        seeded.map_err(BootstrapError::into_failure)
    });

    match result {
        Ok(seeded) => CommandResult::success_with_details(
            "seed",
            format!(
                "Support seed dataset loaded: {} customers, {} tickets",
                seeded.customers_seeded, seeded.tickets_seeded
            ),
            Some(json!({
                "customers_seeded": seeded.customers_seeded,
                "tickets_seeded": seeded.tickets_seeded,
            })),
        ),
        Err(failure) => CommandResult::from_failure("seed", failure),
    }
}
