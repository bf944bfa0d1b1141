pub mod common;

mod http_routes;
