pub mod client;
pub mod endpoints;
pub mod plant_request;
