pub mod metrics;
pub mod orchestrator;
pub mod render;

pub use orchestrator::{Report, generate_report, today};
