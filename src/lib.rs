pub mod configuration;
pub mod db_interaction;
pub mod domain;
pub mod models;
pub mod password;
pub mod role_middleware;
pub mod routes;
pub mod schema;
pub mod session_state;
pub mod startup;
pub mod telemetry;
pub mod utils;
