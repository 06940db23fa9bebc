use crate::{
    config::AppConfig,
    errors::{AppError, SystemError},
    repositories::{
        accounts::{AccountRepository, PgAccountRepository},
        weekly_routes::{PgWeeklyRouteRepository, WeeklyRouteRepository},
    },
};
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};
use std::{sync::Arc, time::Duration};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub accounts: Arc<dyn AccountRepository>,
    pub weekly_routes: Arc<dyn WeeklyRouteRepository>,
}

impl AppState {
    /// 連上資料庫、跑 migration, 組出正式環境用的 state
    pub async fn new(config: AppConfig) -> Result<Self, AppError> {
        let pool = get_connection(&config).await?;

        sqlx::migrate!()
            .run(&pool)
            .await
            .map_err(|err| SystemError::Internal(format!("migration failed: {err}")))?;

        Ok(Self {
            config: Arc::new(config),
            accounts: Arc::new(PgAccountRepository::new(pool.clone())),
            weekly_routes: Arc::new(PgWeeklyRouteRepository::new(pool)),
        })
    }

    #[cfg(test)]
    pub fn with_repositories(
        config: AppConfig,
        accounts: Arc<dyn AccountRepository>,
        weekly_routes: Arc<dyn WeeklyRouteRepository>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            accounts,
            weekly_routes,
        }
    }
}

async fn get_connection(config: &AppConfig) -> Result<Pool<Postgres>, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(Duration::from_secs(3))
        .connect(&config.database_url)
        .await?;

    tracing::debug!("connected to database");

    Ok(pool)
}
