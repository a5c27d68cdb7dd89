use crate::config;
use crate::database::DatabaseManager;

/// Exit successfully once the database answers, or fail after the configured attempts
pub async fn wait_for_db() -> anyhow::Result<()> {
    let pool = DatabaseManager::wait_until_ready(&config::config().database).await?;
    pool.close().await;
    Ok(())
}

pub async fn migrate() -> anyhow::Result<()> {
    let pool = DatabaseManager::wait_until_ready(&config::config().database).await?;
    DatabaseManager::migrate(&pool).await?;
    pool.close().await;
    Ok(())
}
