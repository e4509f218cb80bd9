#![cfg(test)]
use migration::MigratorTrait;
use models::db::{connect, connect_with_config};
use sea_orm::DatabaseConnection;
use tokio::sync::OnceCell;

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<()> = OnceCell::const_new();

pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    // Run migrations exactly once, with a throwaway connection
    MIGRATED
        .get_or_init(|| async {
            let db = connect().await.expect("connect db for migration");
            migration::Migrator::up(&db, None).await.expect("migrate up");
            drop(db);
        })
        .await;

    // Return a fresh connection for the current test's runtime
    if let Ok(mut cfg) = configs::load_default().map(|c| c.database) {
        cfg.normalize_from_env();
        if cfg.validate().is_ok() {
            return connect_with_config(&cfg).await;
        }
    }
    connect().await
}
