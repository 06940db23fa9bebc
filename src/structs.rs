pub mod accounts;
pub mod weekly_routes;
