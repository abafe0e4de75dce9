use crate::report::schema::{
    FieldDef, FieldType, RecordSchema, Reportable, SubmitterFields, CREATED_AT, DELETED_AT, ID, UPDATED_AT,
};

/// Daily contractor work report: chainage covered, diesel used, meter photos
pub struct Contractor;

pub const CONTRACTOR: RecordSchema = RecordSchema {
    kind: "Contractor",
    slug: "contractor",
    table: "contractors",
    fields: &[
        FieldDef::uuid("id", ID),
        FieldDef::text("siteName", "site_name").required(),
        FieldDef::text("contractorName", "contractor_name").required(),
        FieldDef::text("contractorPhone", "contractor_phone").required(),
        FieldDef::text("chainageFrom", "chainage_from").required(),
        FieldDef::text("chainageTo", "chainage_to").required(),
        FieldDef::text("actualMeters", "actual_meters").required(),
        FieldDef::text("dieselTaken", "diesel_taken").required(),
        FieldDef::text_array("meterPhotos", "meter_photos"),
        FieldDef::text("cardNumber", "card_number").required(),
        FieldDef::text_array("areaPhotos", "area_photos"),
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

impl Reportable for Contractor {
    const SCHEMA: &'static RecordSchema = &CONTRACTOR;
}
