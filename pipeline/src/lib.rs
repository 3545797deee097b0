pub mod batch;
pub mod commands;
pub mod config;
pub mod error;
pub mod outcome;
pub mod stage;
pub mod stages;
pub mod workflow;
