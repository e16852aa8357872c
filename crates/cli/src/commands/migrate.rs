use concierge_core::config::LoadOptions;

use crate::bootstrap::{bootstrap, BootstrapError};
use crate::commands::{async_runtime, CommandResult, Failure};

pub fn run() -> CommandResult {
    let runtime = match async_runtime("migrate") {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    let result = runtime.block_on(async {
        let store = bootstrap(LoadOptions::default()).await.map_err(BootstrapError::into_failure)?;
        store.close().await;
        Ok::<(), Failure>(())
    });

    match result {
        Ok(()) => CommandResult::success("migrate", "applied pending migrations"),
        Err(failure) => CommandResult::from_failure("migrate", failure),
    }
}
