pub mod accounts;
#[cfg(test)]
pub mod memory;
pub mod weekly_routes;
