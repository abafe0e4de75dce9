use crate::report::schema::{
    FieldDef, FieldType, RecordSchema, Reportable, SubmitterFields, CREATED_AT, DELETED_AT, ID, UPDATED_AT,
};

/// Pipe painting report
pub struct Painting;

pub const PAINTING: RecordSchema = RecordSchema {
    kind: "Painting",
    slug: "painting",
    table: "paintings",
    fields: &[
        FieldDef::uuid("id", ID),
        FieldDef::text("nameOfYard", "name_of_yard"),
        FieldDef::text("contractorName", "contractor_name"),
        FieldDef::text("workDoneActivity", "work_done_activity").required(),
        FieldDef::integer("numberOfCoats", "number_of_coats").required(),
        FieldDef::text("diaOfPipe", "dia_of_pipe").required(),
        FieldDef::text("pipeNo", "pipe_no").required(),
        FieldDef::text("lengthOfPipe", "length_of_pipe").required(),
        FieldDef::text("squareMeters", "square_meters").required(),
        FieldDef::text_array("photoOfPaintedPipe", "photo_of_painted_pipe").required(),
        FieldDef::text("remarks", "remarks"),
        FieldDef::text("siteEngineerName", "site_engineer_name"),
        FieldDef::text("phoneNumber", "phone_number"),
        FieldDef::number("latitude", "latitude").required(),
        FieldDef::number("longitude", "longitude").required(),
        FieldDef::timestamp("submittedAt", "submitted_at").required(),
        FieldDef::timestamp("createdAt", CREATED_AT),
        FieldDef::timestamp("updatedAt", UPDATED_AT),
        FieldDef::internal(DELETED_AT, FieldType::Timestamp),
    ],
    submitter: SubmitterFields { name: "siteEngineerName", phone: "phoneNumber" },
};

impl Reportable for Painting {
    const SCHEMA: &'static RecordSchema = &PAINTING;
}
