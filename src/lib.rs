pub mod ajax;
pub mod client;
pub mod configuration;
pub mod encoded_id;
pub mod errors;
pub mod listing;
pub mod pagination;
pub mod routes;
pub mod session_state;
pub mod startup;
pub mod telemetry;
