pub mod chain;
pub mod credential;
pub mod error;
pub mod signin;
pub mod units;
