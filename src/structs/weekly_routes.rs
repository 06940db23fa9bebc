use crate::structs::accounts::Account;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    FlexDay,
}

impl RouteDay {
    pub const ALL: [RouteDay; 6] = [
        RouteDay::Monday,
        RouteDay::Tuesday,
        RouteDay::Wednesday,
        RouteDay::Thursday,
        RouteDay::Friday,
        RouteDay::FlexDay,
    ];
}

impl fmt::Display for RouteDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRoute {
    pub stops: Vec<Account>,
    pub google_route: String,
}

/// 一週六個桶子的排線結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WeeklyRoutes {
    pub monday: DailyRoute,
    pub tuesday: DailyRoute,
    pub wednesday: DailyRoute,
    pub thursday: DailyRoute,
    pub friday: DailyRoute,
    pub flex_day: DailyRoute,
}

impl WeeklyRoutes {
    pub fn day(&self, day: RouteDay) -> &DailyRoute {
        match day {
            RouteDay::Monday => &self.monday,
            RouteDay::Tuesday => &self.tuesday,
            RouteDay::Wednesday => &self.wednesday,
            RouteDay::Thursday => &self.thursday,
            RouteDay::Friday => &self.friday,
            RouteDay::FlexDay => &self.flex_day,
        }
    }

    pub fn total_stops(&self) -> usize {
        RouteDay::ALL
            .iter()
            .map(|day| self.day(*day).stops.len())
            .sum()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRoutesRequest {
    pub week_number: u32,
    pub week_start_date: String,
    pub origin_address: Option<String>,
}

/// 存進 weekly_routes 的一筆紀錄, 以 (user_id, week_start_date) 為 key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyRouteRecord {
    pub user_id: Uuid,
    pub week_number: u32,
    pub week_start_date: NaiveDate,
    pub origin_address: String,
    pub routes: WeeklyRoutes,
}

#[derive(FromRow)]
pub struct DbWeeklyRoutes {
    pub user_id: Uuid,
    pub week_number: i32,
    pub week_start_date: NaiveDate,
    pub origin_address: String,
    pub routes: Json<WeeklyRoutes>,
}

impl From<DbWeeklyRoutes> for WeeklyRouteRecord {
    fn from(row: DbWeeklyRoutes) -> Self {
        Self {
            user_id: row.user_id,
            week_number: row.week_number.max(0) as u32,
            week_start_date: row.week_start_date,
            origin_address: row.origin_address,
            routes: row.routes.0,
        }
    }
}
