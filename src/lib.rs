pub mod auth;
pub mod backends;
pub mod configuration;
pub mod error;
pub mod logger;
pub mod middleware;
pub mod routes;
pub mod schemas;
pub mod startup;
pub mod store;
pub mod telemetry;
pub mod validators;
