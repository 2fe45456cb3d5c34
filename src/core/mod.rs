pub mod converter;
pub mod engine;
pub mod profiles;
pub mod types;
