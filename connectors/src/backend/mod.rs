pub mod portal_backend;
pub mod wallet_backend;
