pub mod balances;
pub mod run_batch;
pub mod send;
