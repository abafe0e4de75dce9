use crate::report::schema::{
    FieldDef, FieldType, RecordSchema, Reportable, SubmitterFields, CREATED_AT, DELETED_AT, ID, UPDATED_AT,
};

pub struct DairySite;

// Timestamps are stored but never exposed on dairy site reports.
pub const DAIRY_SITE: RecordSchema = RecordSchema {
    kind: "DairySite",
    slug: "dairysite",
    table: "dairy_sites",
    fields: &[
        FieldDef::uuid("id", ID),
        FieldDef::text("nameOfSite", "name_of_site"),
        FieldDef::text("todaysWork", "todays_work"),
        FieldDef::text("siteEngineerName", "site_engineer_name"),
        FieldDef::text("siteEngineerPhone", "site_engineer_phone"),
        FieldDef::number("latitude", "latitude"),
        FieldDef::number("longitude", "longitude"),
        FieldDef::timestamp("submittedAt", "submitted_at"),
        FieldDef::internal(CREATED_AT, FieldType::Timestamp),
        FieldDef::internal(UPDATED_AT, FieldType::Timestamp),
        FieldDef::internal(DELETED_AT, FieldType::Timestamp),
    ],
    submitter: SubmitterFields { name: "siteEngineerName", phone: "siteEngineerPhone" },
};

impl Reportable for DairySite {
    const SCHEMA: &'static RecordSchema = &DAIRY_SITE;
}
