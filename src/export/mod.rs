pub mod filename;
pub mod layout;
pub mod notify;
pub mod pdf;
pub mod pipeline;

pub use filename::export_file_name;
pub use notify::{NoticeLevel, Notification};
pub use pipeline::{ExportJob, ExportOutcome, ExportPipeline, ExportStatus};
