use crate::report::schema::{
    FieldDef, FieldType, RecordSchema, Reportable, SubmitterFields, CREATED_AT, DELETED_AT, ID, UPDATED_AT,
};

/// Yard stock movement (material in/out against an invoice or challan)
pub struct Stock;

pub const STOCK: RecordSchema = RecordSchema {
    kind: "Stock",
    slug: "stock",
    table: "stocks",
    fields: &[
        FieldDef::uuid("id", ID),
        FieldDef::text("yardName", "yard_name").required(),
        FieldDef::text("contractorName", "contractor_name"),
        FieldDef::text("inOut", "in_out").required(),
        FieldDef::text("itemDescription", "item_description").required(),
        FieldDef::text("pipeDia", "pipe_dia"),
        FieldDef::text("itemQuantity", "item_quantity"),
        FieldDef::text("totalLength", "total_length"),
        FieldDef::text("specialItemDescription", "special_item_description"),
        FieldDef::text("defectiveMaterial", "defective_material"),
        FieldDef::timestamp("invoiceDate", "invoice_date"),
        FieldDef::json("challanFiles", "challan_files"),
        FieldDef::text("remarks", "remarks"),
        FieldDef::text("yardInchargeName", "yard_incharge_name").required(),
        FieldDef::text("yardInchargePhone", "yard_incharge_phone").required(),
        FieldDef::number("latitude", "latitude").required(),
        FieldDef::number("longitude", "longitude").required(),
        FieldDef::timestamp("submittedAt", "submitted_at").required(),
        FieldDef::timestamp("createdAt", CREATED_AT),
        FieldDef::timestamp("updatedAt", UPDATED_AT),
        FieldDef::internal(DELETED_AT, FieldType::Timestamp),
    ],
    submitter: SubmitterFields { name: "yardInchargeName", phone: "yardInchargePhone" },
};

impl Reportable for Stock {
    const SCHEMA: &'static RecordSchema = &STOCK;
}
