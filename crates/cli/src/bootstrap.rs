use std::sync::Arc;

use concierge_agent::ProviderRegistry;
use concierge_core::config::{AppConfig, ConfigError, LoadOptions};
use concierge_db::{
    connect_with_settings, migrations, DbPool, RepositoryError, SeedResult,
    SqlCustomerRepository, SqlTicketRepository, SupportSeedDataset,
};
use thiserror::Error;
use tracing::info;

/// A migrated support store, ready to back the providers.
pub struct SupportStore {
    pub config: AppConfig,
    pub db_pool: DbPool,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("configuration issue: {0}")]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("seed load failed: {0}")]
    Seed(#[source] RepositoryError),
    #[error("{0}")]
    Verification(String),
}

impl BootstrapError {
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Config(_) => "config_validation",
            Self::DatabaseConnect(_) => "db_connectivity",
            Self::Migration(_) => "migration",
            Self::Seed(_) => "seed_execution",
            Self::Verification(_) => "seed_verification",
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::DatabaseConnect(_) => 4,
            Self::Migration(_) | Self::Seed(_) => 5,
            Self::Verification(_) => 6,
        }
    }

    pub(crate) fn into_failure(self) -> crate::commands::Failure {
        (self.error_class(), self.to_string(), self.exit_code())
    }
}

pub async fn bootstrap(options: LoadOptions) -> Result<SupportStore, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting support store bootstrap"
    );
    let config = AppConfig::load(options)?;

    let db_pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    Ok(SupportStore { config, db_pool })
}

impl SupportStore {
    /// Loads the deterministic dataset and checks every seeded row is present.
    pub async fn seed(&self) -> Result<SeedResult, BootstrapError> {
        let seeded = SupportSeedDataset::load(&self.db_pool).await.map_err(BootstrapError::Seed)?;
        let verification =
            SupportSeedDataset::verify(&self.db_pool).await.map_err(BootstrapError::Seed)?;

        if !verification.all_present {
            return Err(BootstrapError::Verification(verification_message(&verification.checks)));
        }

        info!(
            event_name = "system.bootstrap.seeded",
            correlation_id = "bootstrap",
            customers = seeded.customers_seeded,
            tickets = seeded.tickets_seeded,
            "support seed dataset loaded"
        );
        Ok(seeded)
    }

    pub fn registry(&self) -> ProviderRegistry {
        ProviderRegistry::standard(
            Arc::new(SqlCustomerRepository::new(self.db_pool.clone())),
            Arc::new(SqlTicketRepository::new(self.db_pool.clone())),
        )
    }

    pub async fn close(self) {
        self.db_pool.close().await;
    }
}

fn verification_message(checks: &[(&'static str, bool)]) -> String {
    let failed_checks =
        checks.iter().filter_map(|(check, passed)| (!passed).then_some(*check)).collect::<Vec<_>>();
    if failed_checks.is_empty() {
        "Some seed data failed to load".to_string()
    } else {
        format!("Seed verification failed for checks: {}", failed_checks.join(", "))
    }
}
