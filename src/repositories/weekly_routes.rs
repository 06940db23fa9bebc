use crate::structs::weekly_routes::{DbWeeklyRoutes, WeeklyRouteRecord};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{types::Json, Error, PgPool};
use uuid::Uuid;

/// 排線結果的存放處, 同一個 (user, week_start_date) 後寫的蓋掉先寫的
#[async_trait]
pub trait WeeklyRouteRepository: Send + Sync {
    async fn upsert_weekly_routes(&self, record: &WeeklyRouteRecord) -> Result<(), Error>;

    async fn get_weekly_routes(
        &self,
        user_id: Uuid,
        week_start_date: NaiveDate,
    ) -> Result<Option<WeeklyRouteRecord>, Error>;
}

#[derive(Clone)]
pub struct PgWeeklyRouteRepository {
    pool: PgPool,
}

impl PgWeeklyRouteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WeeklyRouteRepository for PgWeeklyRouteRepository {
    async fn upsert_weekly_routes(&self, record: &WeeklyRouteRecord) -> Result<(), Error> {
        let query = r#"
            INSERT INTO weekly_routes (user_id, week_number, week_start_date, origin_address, routes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
            ON CONFLICT (user_id, week_start_date)
            DO UPDATE SET
                week_number = EXCLUDED.week_number,
                origin_address = EXCLUDED.origin_address,
                routes = EXCLUDED.routes,
                updated_at = NOW();
        "#;

        sqlx::query(query)
            .bind(record.user_id) // $1
            .bind(record.week_number as i32) // $2
            .bind(record.week_start_date) // $3
            .bind(&record.origin_address) // $4
            .bind(Json(&record.routes)) // $5
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn get_weekly_routes(
        &self,
        user_id: Uuid,
        week_start_date: NaiveDate,
    ) -> Result<Option<WeeklyRouteRecord>, Error> {
        let row = sqlx::query_as::<_, DbWeeklyRoutes>(
            r#"
                SELECT user_id, week_number, week_start_date, origin_address, routes
                FROM weekly_routes
                WHERE user_id = $1 AND week_start_date = $2
            "#,
        )
        .bind(user_id)
        .bind(week_start_date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(WeeklyRouteRecord::from))
    }
}
