pub mod configuration;
pub mod console;
pub mod domain;
pub mod driver_registry;
pub mod notifier;
pub mod preferences;
pub mod request_repository;
pub mod startup;
pub mod store;
pub mod submission;
pub mod telemetry;
mod utils;
