pub mod auth;
pub mod catalog;
pub mod env_config;
pub mod error;
pub mod http;
