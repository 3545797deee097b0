pub mod backend;
pub mod error;
pub mod proxy;
pub mod web_client;
