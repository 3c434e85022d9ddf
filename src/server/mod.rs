pub mod api_routes;
pub mod server;
