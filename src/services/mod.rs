pub mod record_service;

pub use record_service::{BatchOutcome, Identity, RecordService};
