pub mod cli;
pub mod collector;
pub mod config;
pub mod domain;
pub mod error;
pub mod export;
pub mod landscape;
pub mod pipeline;
pub mod shell;
pub mod telemetry;
