pub mod route_assignment;
pub mod route_link;
