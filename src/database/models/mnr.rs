use crate::report::schema::{
    FieldDef, FieldType, RecordSchema, Reportable, SubmitterFields, CREATED_AT, DELETED_AT, ID, UPDATED_AT,
};

/// Muster-roll attendance (labour counts per site)
pub struct Mnr;

pub const MNR: RecordSchema = RecordSchema {
    kind: "Mnr",
    slug: "mnr",
    table: "mnrs",
    fields: &[
        FieldDef::uuid("id", ID),
        FieldDef::text("nameOfSite", "name_of_site").required(),
        FieldDef::text("zoneName", "zone_name").required(),
        FieldDef::text("workDescription", "work_description").required(),
        FieldDef::text("skilledLabourCount", "skilled_labour_count").required(),
        FieldDef::text("unskilledLabourCount", "unskilled_labour_count").required(),
        FieldDef::text("womenCount", "women_count").required(),
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

impl Reportable for Mnr {
    const SCHEMA: &'static RecordSchema = &MNR;
}
