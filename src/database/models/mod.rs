// Report kinds served under /api/v1/{slug}
pub mod contractor;
pub mod dairy_site;
pub mod diesel;
pub mod mnr;
pub mod nmr_vehicle;
pub mod painting;
pub mod stock;
pub mod task;
pub mod vehicle_log;

pub use contractor::Contractor;
pub use dairy_site::DairySite;
pub use diesel::Diesel;
pub use mnr::Mnr;
pub use nmr_vehicle::NmrVehicle;
pub use painting::Painting;
pub use stock::Stock;
pub use task::Task;
pub use vehicle_log::VehicleLog;

use crate::report::schema::{RecordSchema, Reportable};

/// Every registered report kind, in route registration order
pub const ALL: &[&RecordSchema] = &[
    Contractor::SCHEMA,
    DairySite::SCHEMA,
    Painting::SCHEMA,
    Mnr::SCHEMA,
    NmrVehicle::SCHEMA,
    Task::SCHEMA,
    VehicleLog::SCHEMA,
    Stock::SCHEMA,
    Diesel::SCHEMA,
];

/// Look up a report kind by route slug, kind name, or table name (case-insensitive)
pub fn find(name: &str) -> Option<&'static RecordSchema> {
    ALL.iter().copied().find(|schema| {
        schema.slug.eq_ignore_ascii_case(name)
            || schema.kind.eq_ignore_ascii_case(name)
            || schema.table.eq_ignore_ascii_case(name)
    })
}
