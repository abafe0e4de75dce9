use crate::report::schema::{
    FieldDef, FieldType, RecordSchema, Reportable, SubmitterFields, CREATED_AT, DELETED_AT, ID, UPDATED_AT,
};

/// Vehicle usage log. Older field devices post these with snake_case keys,
/// so most external names match the storage columns.
pub struct VehicleLog;

pub const VEHICLE_LOG: RecordSchema = RecordSchema {
    kind: "VehicleLog",
    slug: "vehicle-log",
    table: "vehicle_logs",
    fields: &[
        FieldDef::uuid("id", ID),
        FieldDef::text("email", "email").required(),
        FieldDef::text("site_location", "site_location").required(),
        FieldDef::text("working_zone", "working_zone"),
        FieldDef::timestamp("date", "date").required(),
        FieldDef::text("vehicle_type", "vehicle_type").required(),
        FieldDef::text("registration_number", "registration_number"),
        FieldDef::text("owner_name", "owner_name"),
        FieldDef::text("driver_name", "driver_name"),
        FieldDef::text_array("starting_reading_files", "starting_reading_files"),
        FieldDef::text_array("closing_reading_files", "closing_reading_files"),
        FieldDef::text("reading_total_km_hrs", "reading_total_km_hrs"),
        FieldDef::text("total_working_hours", "total_working_hours"),
        FieldDef::text("diesel_issued_litres", "diesel_issued_litres"),
        FieldDef::text("work_description", "work_description"),
        FieldDef::text_array("work_images", "work_images"),
        FieldDef::text("remarks", "remarks"),
        FieldDef::text("siteEngineerName", "site_engineer_name").required(),
        FieldDef::text("siteEngineerPhone", "site_engineer_phone").required(),
        FieldDef::number("latitude", "latitude").required(),
        FieldDef::number("longitude", "longitude").required(),
        FieldDef::timestamp("submittedAt", "submitted_at").required(),
        FieldDef::timestamp("createdAt", CREATED_AT),
        FieldDef::timestamp("updatedAt", UPDATED_AT),
        FieldDef::internal(DELETED_AT, FieldType::Timestamp),
    ],
    submitter: SubmitterFields { name: "siteEngineerName", phone: "siteEngineerPhone" },
};

impl Reportable for VehicleLog {
    const SCHEMA: &'static RecordSchema = &VEHICLE_LOG;
}
