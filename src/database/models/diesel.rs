use crate::report::schema::{
    FieldDef, FieldType, RecordSchema, Reportable, SubmitterFields, CREATED_AT, DELETED_AT, ID, UPDATED_AT,
};

/// Diesel issue slip for a vehicle at a site
pub struct Diesel;

pub const DIESEL: RecordSchema = RecordSchema {
    kind: "Diesel",
    slug: "diesel",
    table: "diesels",
    fields: &[
        FieldDef::uuid("id", ID),
        FieldDef::text("nameOfSite", "name_of_site").required(),
        FieldDef::text("contractorName", "contractor_name"),
        FieldDef::text("vehicleNumber", "vehicle_number").required(),
        FieldDef::text("cardNumber", "card_number"),
        FieldDef::text("quantityInLiters", "quantity_in_liters").required(),
        FieldDef::text("amountPaid", "amount_paid"),
        FieldDef::text_array("meterReadingPhotos", "meter_reading_photos"),
        FieldDef::text_array("billPhotos", "bill_photos"),
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

impl Reportable for Diesel {
    const SCHEMA: &'static RecordSchema = &DIESEL;
}
