pub mod manager;
pub mod models;
pub mod query_builder;
pub mod record;
pub mod repository;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use record::{Operation, Record, RecordError};
pub use repository::PgRepository;
pub use store::{RecordStore, Row};
