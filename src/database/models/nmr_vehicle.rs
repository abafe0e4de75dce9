use crate::report::schema::{
    FieldDef, FieldType, RecordSchema, Reportable, SubmitterFields, CREATED_AT, DELETED_AT, ID, UPDATED_AT,
};

pub struct NmrVehicle;

pub const NMR_VEHICLE: RecordSchema = RecordSchema {
    kind: "NmrVehicle",
    slug: "nmr-vehicle",
    table: "nmr_vehicles",
    fields: &[
        FieldDef::uuid("id", ID),
        FieldDef::text("nameOfSite", "name_of_site").required(),
        FieldDef::text("zoneName", "zone_name").required(),
        FieldDef::text("workDescription", "work_description").required(),
        FieldDef::text("vehicleType", "vehicle_type"),
        FieldDef::text("workedHoursPerDay", "worked_hours_per_day").required(),
        FieldDef::json("uom", "uom").required(),
        FieldDef::text("contractorName", "contractor_name").required(),
        FieldDef::text("attendanceTakenBy", "attendance_taken_by").required(),
        FieldDef::text("attendancePhone", "attendance_phone").required(),
        FieldDef::json("workPhotos", "work_photos").required(),
        FieldDef::text("remarks", "remarks"),
        FieldDef::number("latitude", "latitude").required(),
        FieldDef::number("longitude", "longitude").required(),
        FieldDef::timestamp("submittedAt", "submitted_at").required(),
        FieldDef::timestamp("createdAt", CREATED_AT),
        FieldDef::timestamp("updatedAt", UPDATED_AT),
        FieldDef::internal(DELETED_AT, FieldType::Timestamp),
    ],
    submitter: SubmitterFields { name: "attendanceTakenBy", phone: "attendancePhone" },
};

impl Reportable for NmrVehicle {
    const SCHEMA: &'static RecordSchema = &NMR_VEHICLE;
}
