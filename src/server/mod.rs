pub mod auth_routes;
pub mod server;
